//! Runtime profiles and selection.

use crate::errors::{TransformError, TransformResult};
use weft_common::diagnostics::diagnostic_codes;
use weft_common::{Diagnostic, SourceLocation};

/// Profile used when no runtime is configured.
pub const DEFAULT_RUNTIME: &str = "callbacks";

/// Named suspension strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeProfile {
    pub name: &'static str,
    /// Coroutines are `async` functions and suspension is `await`.
    pub uses_native_coroutine: bool,
    /// Coroutines are `function*` and suspension is `yield`.
    pub uses_generator_coroutine: bool,
    /// Generated generators need `regeneratorRuntime` in scope.
    pub needs_generator_polyfill: bool,
}

/// How a rewritten call site is suspended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suspension {
    Await,
    Yield,
    /// The adapter blocks transparently.
    Direct,
}

pub static PROFILES: &[RuntimeProfile] = &[
    RuntimeProfile {
        name: "callbacks",
        uses_native_coroutine: false,
        uses_generator_coroutine: true,
        needs_generator_polyfill: true,
    },
    RuntimeProfile {
        name: "generators",
        uses_native_coroutine: false,
        uses_generator_coroutine: true,
        needs_generator_polyfill: false,
    },
    RuntimeProfile {
        name: "await",
        uses_native_coroutine: true,
        uses_generator_coroutine: false,
        needs_generator_polyfill: false,
    },
    RuntimeProfile {
        name: "fibers",
        uses_native_coroutine: false,
        uses_generator_coroutine: false,
        needs_generator_polyfill: false,
    },
];

impl RuntimeProfile {
    pub fn by_name(name: &str) -> Option<&'static RuntimeProfile> {
        PROFILES.iter().find(|p| p.name == name)
    }

    pub fn default_profile() -> &'static RuntimeProfile {
        &PROFILES[0]
    }

    pub const fn suspension(&self) -> Suspension {
        if self.uses_native_coroutine {
            Suspension::Await
        } else if self.uses_generator_coroutine {
            Suspension::Yield
        } else {
            Suspension::Direct
        }
    }

    /// False for the fiber profile, whose coroutines are plain functions.
    pub const fn has_coroutine_syntax(&self) -> bool {
        self.uses_native_coroutine || self.uses_generator_coroutine
    }

    pub const fn is_fibers(&self) -> bool {
        !self.has_coroutine_syntax()
    }
}

/// Resolve the configured runtime name.
///
/// A missing value selects [`DEFAULT_RUNTIME`] and yields a warning; an
/// unknown value is an error.
pub fn select_runtime(
    value: Option<&str>,
    file: &str,
) -> TransformResult<(&'static RuntimeProfile, Option<Diagnostic>)> {
    let Some(name) = value else {
        let warning = Diagnostic::from_code(
            diagnostic_codes::RUNTIME_DEFAULTED,
            file,
            SourceLocation::default(),
            &[DEFAULT_RUNTIME],
        );
        return Ok((RuntimeProfile::default_profile(), Some(warning)));
    };

    RuntimeProfile::by_name(name)
        .map(|profile| (profile, None))
        .ok_or_else(|| TransformError::InvalidRuntimeConfiguration {
            file: file.to_string(),
            value: name.to_string(),
            expected: PROFILES
                .iter()
                .map(|p| format!("'{}'", p.name))
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
#[path = "../tests/runtime.rs"]
mod tests;
