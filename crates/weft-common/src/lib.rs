//! Common types and utilities for the weft transform.
//!
//! This crate provides foundational types used across all weft crates:
//! - Source positions (`SourceLocation`, `Span`)
//! - Comments attached to a unit (`Comment`)
//! - Diagnostics with stable codes and message templates
//! - Traversal limits

// Position/Span types for source locations
pub mod position;
pub use position::{SourceLocation, Span};

// Comments collected by the external parser
pub mod comments;
pub use comments::Comment;

// Centralized limits and thresholds
pub mod limits;

pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, diagnostic_codes, format_message,
    get_diagnostic_message,
};
