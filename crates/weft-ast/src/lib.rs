//! Syntax tree for the weft transform.
//!
//! The tree is owned by a [`NodeArena`] and addressed by [`NodeIndex`]. The
//! external parser fills the arena (directly or through [`estree`]), the
//! transform rewrites it in place, and the external printer reads it back.
//!
//! - [`node`]: node payloads and the fieldless [`SyntaxKind`] used for dispatch
//! - [`arena`]: storage and builders for synthesized nodes
//! - [`node_access`]: typed accessors and child enumeration
//! - [`estree`]: conversion from/to ESTree JSON
//! - [`printer`]: readable JavaScript rendering for tests and traces

pub mod arena;
pub mod estree;
pub mod node;
pub mod node_access;
pub mod printer;

pub use arena::NodeArena;
pub use node::{
    ClassKind, FunctionData, FunctionKind, ImportKind, LiteralValue, MethodKind, Node, NodeData,
    NodeIndex, NodeList, PropertyKind, SourceType, SyntaxKind, VariableKind,
};
