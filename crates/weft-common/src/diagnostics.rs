//! Diagnostic types and message lookup for the weft transform.
//!
//! Every error and warning the transform can produce has a stable code and a
//! message template in [`DIAGNOSTIC_MESSAGES`]. Templates use `{0}`, `{1}`,
//! ... placeholders filled by [`format_message`].

use crate::position::SourceLocation;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A diagnostic attached to a location in one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub location: SourceLocation,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        location: SourceLocation,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            location,
            message_text: message.into(),
            category: DiagnosticCategory::Error,
            code,
        }
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        file: impl Into<String>,
        location: SourceLocation,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            file: file.into(),
            location,
            message_text: message.into(),
            category: DiagnosticCategory::Warning,
            code,
        }
    }

    /// Build a diagnostic from the message table.
    ///
    /// Unknown codes fall back to the raw arguments joined by spaces.
    #[must_use]
    pub fn from_code(
        code: u32,
        file: impl Into<String>,
        location: SourceLocation,
        args: &[&str],
    ) -> Self {
        match get_diagnostic_message(code) {
            Some(def) => Self {
                file: file.into(),
                location,
                message_text: format_message(def.message, args),
                category: def.category,
                code,
            },
            None => Self::error(file, location, args.join(" "), code),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
        };
        if self.location.is_known() {
            write!(
                f,
                "{}:{}: {category} WEFT{}: {}",
                self.file, self.location, self.code, self.message_text
            )
        } else {
            write!(
                f,
                "{}: {category} WEFT{}: {}",
                self.file, self.code, self.message_text
            )
        }
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

// =============================================================================
// Message Table
// =============================================================================

pub mod diagnostic_codes {
    pub const UNEXPECTED_MARKER: u32 = 9001;
    pub const SCOPE_ERROR: u32 = 9002;
    pub const TOO_MANY_MARKERS: u32 = 9003;
    pub const INCOMPATIBLE_MODIFIERS: u32 = 9004;
    pub const NESTED_DECLARATION: u32 = 9005;
    pub const INVALID_RUNTIME_CONFIGURATION: u32 = 9006;
    pub const NESTING_TOO_DEEP: u32 = 9007;

    pub const RUNTIME_DEFAULTED: u32 = 9101;
    pub const DEPRECATED_MARKER_SYNTAX: u32 = 9102;
    pub const ASYNC_CALL_AT_TOP_LEVEL: u32 = 9103;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNEXPECTED_MARKER,
        category: DiagnosticCategory::Error,
        message: "unexpected '{0}'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::SCOPE_ERROR,
        category: DiagnosticCategory::Error,
        message: "'{0}' used in a function that does not declare a '{0}' parameter",
    },
    DiagnosticMessage {
        code: diagnostic_codes::TOO_MANY_MARKERS,
        category: DiagnosticCategory::Error,
        message: "too many '{0}' arguments: at most {1} are allowed in one call",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INCOMPATIBLE_MODIFIERS,
        category: DiagnosticCategory::Error,
        message: "parameter '{0}' not allowed: function already marked '{1}'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NESTED_DECLARATION,
        category: DiagnosticCategory::Error,
        message: "cannot transform nested function declaration '{0}': use a function expression instead",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INVALID_RUNTIME_CONFIGURATION,
        category: DiagnosticCategory::Error,
        message: "invalid runtime '{0}': expected one of {1}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NESTING_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "syntax tree nesting exceeds {0} levels",
    },
    DiagnosticMessage {
        code: diagnostic_codes::RUNTIME_DEFAULTED,
        category: DiagnosticCategory::Warning,
        message: "no runtime configured, defaulting to '{0}'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DEPRECATED_MARKER_SYNTAX,
        category: DiagnosticCategory::Warning,
        message: "deprecated marker syntax used {0} time(s), at line(s) {1}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::ASYNC_CALL_AT_TOP_LEVEL,
        category: DiagnosticCategory::Warning,
        message: "async call at top level",
    },
];

#[cfg(test)]
#[path = "../tests/diagnostics.rs"]
mod tests;
