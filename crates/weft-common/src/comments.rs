//! Comments
//!
//! Comments are not part of the syntax tree. The external parser hands them
//! over as a flat list on the program node; the transform only reads the ones
//! that precede the first statement.

use serde::{Deserialize, Serialize};

/// A single comment with its text (without delimiters) and byte range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// `/* */` rather than `//`
    pub is_block: bool,
    pub start: u32,
    pub end: u32,
}

impl Comment {
    pub fn line(text: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            text: text.into(),
            is_block: false,
            start,
            end,
        }
    }

    pub fn block(text: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            text: text.into(),
            is_block: true,
            start,
            end,
        }
    }
}

/// Comments that end at or before `first_statement_start`.
///
/// When the unit has no statements every comment counts as leading.
pub fn leading_comments(
    comments: &[Comment],
    first_statement_start: Option<u32>,
) -> impl Iterator<Item = &Comment> {
    comments
        .iter()
        .filter(move |c| first_statement_start.is_none_or(|start| c.end <= start))
}

#[cfg(test)]
#[path = "../tests/comments.rs"]
mod tests;
