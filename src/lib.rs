//! weft: marker-driven asynchronous source transform for JavaScript.
//!
//! The workspace crates do the work:
//!
//! - [`weft_common`]: positions, comments, limits and diagnostics
//! - [`weft_ast`]: the node arena, ESTree interop and the debug printer
//! - [`weft_transform`]: the suspension-marker rewrite itself
//!
//! This crate re-exports them and adds [`transform_estree`], which runs one
//! unit from ESTree JSON to ESTree JSON.

pub mod tracing_config;

pub use weft_ast as ast;
pub use weft_common as common;
pub use weft_transform as transform;

pub use weft_ast::estree::EstreeError;
pub use weft_ast::printer::render;
pub use weft_ast::{NodeArena, NodeIndex};
pub use weft_common::{Diagnostic, DiagnosticCategory, SourceLocation};
pub use weft_transform::{
    TransformError, TransformOptions, TransformOutput, select_runtime, transform_program,
};

use serde_json::Value;
use thiserror::Error;

/// Failure of [`transform_estree`].
#[derive(Debug, Error)]
pub enum WeftError {
    #[error(transparent)]
    Estree(#[from] EstreeError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// A transformed unit in ESTree form.
#[derive(Debug, Clone)]
pub struct EstreeOutput {
    pub program: Value,
    pub warnings: Vec<Diagnostic>,
    pub program_async: bool,
    pub transformed: bool,
}

/// Import an ESTree `Program`, transform it and export the result.
pub fn transform_estree(
    program: &Value,
    options: &TransformOptions,
) -> Result<EstreeOutput, WeftError> {
    let (mut arena, root) = weft_ast::estree::import_program(program)?;
    let output = transform_program(&mut arena, root, options)?;
    Ok(EstreeOutput {
        program: weft_ast::estree::export_node(&arena, output.program),
        warnings: output.warnings,
        program_async: output.program_async,
        transformed: output.transformed,
    })
}

/// [`transform_estree`] over JSON text, returning JSON text.
pub fn transform_estree_str(
    program: &str,
    options: &TransformOptions,
) -> Result<(String, Vec<Diagnostic>), WeftError> {
    let value: Value = serde_json::from_str(program).map_err(EstreeError::from)?;
    let output = transform_estree(&value, options)?;
    let text = serde_json::to_string(&output.program).map_err(EstreeError::from)?;
    Ok((text, output.warnings))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;
