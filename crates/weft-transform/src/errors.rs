//! Unit-fatal transform errors.
//!
//! Every variant aborts the current unit only. The caller's arena is left as
//! it was before the pass started.

use crate::marker::MARKER;
use thiserror::Error;
use weft_common::diagnostics::diagnostic_codes;
use weft_common::{Diagnostic, SourceLocation};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A marker outside every recognized parameter/argument pattern.
    #[error("{file}:{location}: unexpected '_'")]
    UnexpectedMarker {
        file: String,
        location: SourceLocation,
    },

    /// A marker call whose nearest enclosing function was not transformed.
    #[error("{file}:{location}: '_' used in a function that does not declare a '_' parameter")]
    ScopeError {
        file: String,
        location: SourceLocation,
    },

    #[error("{file}:{location}: too many '_' arguments: at most {limit} are allowed in one call")]
    TooManyMarkers {
        file: String,
        location: SourceLocation,
        limit: usize,
    },

    #[error("{file}:{location}: parameter '_' not allowed: function already marked '{modifier}'")]
    IncompatibleModifiers {
        file: String,
        location: SourceLocation,
        modifier: &'static str,
    },

    #[error("{file}:{location}: cannot transform nested function declaration '{name}': use a function expression instead")]
    NestedDeclaration {
        file: String,
        location: SourceLocation,
        name: String,
    },

    /// Deeper than the pass will walk. Raised instead of leaving the subtree
    /// untransformed.
    #[error("{file}:{location}: syntax tree nesting exceeds {limit} levels")]
    NestingTooDeep {
        file: String,
        location: SourceLocation,
        limit: u32,
    },

    #[error("{file}: invalid runtime '{value}': expected one of {expected}")]
    InvalidRuntimeConfiguration {
        file: String,
        value: String,
        expected: String,
    },
}

impl TransformError {
    /// Stable diagnostic code.
    pub const fn code(&self) -> u32 {
        match self {
            Self::UnexpectedMarker { .. } => diagnostic_codes::UNEXPECTED_MARKER,
            Self::ScopeError { .. } => diagnostic_codes::SCOPE_ERROR,
            Self::TooManyMarkers { .. } => diagnostic_codes::TOO_MANY_MARKERS,
            Self::IncompatibleModifiers { .. } => diagnostic_codes::INCOMPATIBLE_MODIFIERS,
            Self::NestedDeclaration { .. } => diagnostic_codes::NESTED_DECLARATION,
            Self::NestingTooDeep { .. } => diagnostic_codes::NESTING_TOO_DEEP,
            Self::InvalidRuntimeConfiguration { .. } => {
                diagnostic_codes::INVALID_RUNTIME_CONFIGURATION
            }
        }
    }

    /// Kebab-case kind name, as used in host tool output.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::UnexpectedMarker { .. } => "unexpected-marker",
            Self::ScopeError { .. } => "scope-error",
            Self::TooManyMarkers { .. } => "too-many-markers",
            Self::IncompatibleModifiers { .. } => "incompatible-modifiers",
            Self::NestedDeclaration { .. } => "nested-declaration-error",
            Self::NestingTooDeep { .. } => "nesting-too-deep",
            Self::InvalidRuntimeConfiguration { .. } => "invalid-runtime-configuration",
        }
    }

    pub fn file(&self) -> &str {
        match self {
            Self::UnexpectedMarker { file, .. }
            | Self::ScopeError { file, .. }
            | Self::TooManyMarkers { file, .. }
            | Self::IncompatibleModifiers { file, .. }
            | Self::NestedDeclaration { file, .. }
            | Self::NestingTooDeep { file, .. }
            | Self::InvalidRuntimeConfiguration { file, .. } => file,
        }
    }

    /// Source location, unknown for configuration errors.
    pub const fn location(&self) -> SourceLocation {
        match self {
            Self::UnexpectedMarker { location, .. }
            | Self::ScopeError { location, .. }
            | Self::TooManyMarkers { location, .. }
            | Self::IncompatibleModifiers { location, .. }
            | Self::NestedDeclaration { location, .. }
            | Self::NestingTooDeep { location, .. } => *location,
            Self::InvalidRuntimeConfiguration { .. } => SourceLocation::new(0, 0),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let limit;
        let args: Vec<&str> = match self {
            Self::UnexpectedMarker { .. } | Self::ScopeError { .. } => vec![MARKER],
            Self::TooManyMarkers { limit: max, .. } => {
                limit = max.to_string();
                vec![MARKER, limit.as_str()]
            }
            Self::NestingTooDeep { limit: max, .. } => {
                limit = max.to_string();
                vec![limit.as_str()]
            }
            Self::IncompatibleModifiers { modifier, .. } => vec![MARKER, *modifier],
            Self::NestedDeclaration { name, .. } => vec![name.as_str()],
            Self::InvalidRuntimeConfiguration {
                value, expected, ..
            } => vec![value.as_str(), expected.as_str()],
        };
        Diagnostic::from_code(self.code(), self.file(), self.location(), &args)
    }
}

pub type TransformResult<T> = Result<T, TransformError>;

#[cfg(test)]
#[path = "../tests/errors.rs"]
mod tests;
