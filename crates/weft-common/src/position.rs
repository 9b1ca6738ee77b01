//! Source position types.
//!
//! Positions are supplied by the external parser. Lines are 1-based and
//! columns are 0-based, matching the ESTree `loc` convention. Nodes built by
//! the transform itself carry [`Span::SYNTHETIC`] unless they inherit the
//! span of the node they replace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Line 0 never occurs in parser output.
    pub const fn is_known(self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range plus the line/column of its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub loc: SourceLocation,
}

impl Span {
    /// Span of nodes that have no source counterpart.
    pub const SYNTHETIC: Span = Span {
        start: 0,
        end: 0,
        loc: SourceLocation { line: 0, column: 0 },
    };

    pub const fn new(start: u32, end: u32, loc: SourceLocation) -> Self {
        Self { start, end, loc }
    }

    /// Span covering a single line/column with no byte range.
    pub const fn at(line: u32, column: u32) -> Self {
        Self {
            start: 0,
            end: 0,
            loc: SourceLocation { line, column },
        }
    }

    pub const fn is_synthetic(&self) -> bool {
        !self.loc.is_known() && self.start == 0 && self.end == 0
    }

    pub const fn line(&self) -> u32 {
        self.loc.line
    }
}
