//! Suspension-marker rewrite for JavaScript syntax trees.
//!
//! Functions that take the reserved marker `_` as a parameter are rewritten
//! into coroutines adapted by a runtime, and calls that pass `_` become
//! runtime dispatch calls wrapped in the profile's suspension form.
//!
//! The entry point is [`transform_program`]. It runs on a copy of the arena
//! and only replaces the caller's arena when the whole unit succeeded.
//!
//! - [`marker`]: marker and dialect recognition
//! - [`runtime`]: runtime profiles and selection
//! - [`hoist`]: function declaration hoisting
//! - [`function_wrapper`]: outer/inner function rewrite
//! - [`call_site`]: call-site planning and dispatch emission
//! - [`fast_iteration`]: native iteration under the fiber profile
//! - [`pass`]: the traversal driver
//! - [`bootstrap`]: program prologue and entry coroutine

pub mod bootstrap;
pub mod call_site;
pub mod errors;
pub mod fast_iteration;
pub mod function_wrapper;
pub mod hoist;
pub mod marker;
pub mod options;
pub mod pass;
pub mod runtime;
pub mod state;

pub use errors::{TransformError, TransformResult};
pub use marker::{MARKER, MarkerKind};
pub use options::{FileDirectives, PackageManifest, TransformOptions, is_eligible};
pub use pass::TransformPass;
pub use runtime::{DEFAULT_RUNTIME, PROFILES, RuntimeProfile, Suspension, select_runtime};
pub use state::{Annotation, NodeAnnotations, TransformState};

use weft_ast::{NodeArena, NodeIndex, printer};
use weft_common::Diagnostic;

/// Result of transforming one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformOutput {
    pub program: NodeIndex,
    /// Non-fatal diagnostics, empty when the unit is quiet
    pub warnings: Vec<Diagnostic>,
    /// The top level performs marker calls and was wrapped
    pub program_async: bool,
    /// False for ineligible units, which are returned untouched
    pub transformed: bool,
}

impl TransformOutput {
    pub fn untouched(program: NodeIndex) -> Self {
        Self {
            program,
            warnings: Vec::new(),
            program_async: false,
            transformed: false,
        }
    }
}

/// Transform one unit in place.
///
/// On error the arena is left exactly as it was.
pub fn transform_program(
    arena: &mut NodeArena,
    program: NodeIndex,
    options: &TransformOptions,
) -> TransformResult<TransformOutput> {
    let file = options.file_name().to_string();
    let _span = tracing::debug_span!("transform_unit", file = %file).entered();

    let directives = FileDirectives::from_program(arena, program);
    if !is_eligible(arena, program, options, &directives) {
        tracing::debug!("unit not eligible, left untouched");
        return Ok(TransformOutput::untouched(program));
    }

    let (profile, defaulted) = select_runtime(options.runtime.as_deref(), &file)?;
    tracing::debug!(runtime = profile.name, "selected runtime");

    let mut working = arena.clone();
    let mut state = TransformState::new(&working, profile, options, directives);
    if let Some(warning) = defaulted {
        state.warn(warning);
    }

    TransformPass::new(&mut working, &mut state).run(program)?;
    bootstrap::bootstrap(&mut working, &mut state, program);

    let program_async = state.program_async;
    let warnings = state.finish();
    tracing::trace!(output = %printer::render(&working, program), "transformed unit");

    *arena = working;
    Ok(TransformOutput {
        program,
        warnings,
        program_async,
        transformed: true,
    })
}
