//! Marker recognition.
//!
//! The marker is the bare identifier `_` in a parameter or argument position.
//! Dialects wrap it in a unary operator, a one-element array literal or the
//! left side of `>>`. Recognition is pure: it reads the arena and the
//! annotation table and never mutates either.

use crate::state::{Annotation, NodeAnnotations};
use smallvec::SmallVec;
use weft_ast::{NodeArena, NodeData, NodeIndex};

/// Reserved marker spelling.
pub const MARKER: &str = "_";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `_`
    Plain,
    /// `~_`
    Tilde,
    /// `!_`
    Bang,
    /// `void _`
    Void,
    /// `[_]`
    Array,
    /// `_ >> expr`
    Shift,
    NotAMarker,
}

impl MarkerKind {
    /// Forms that suspend the caller and therefore need a transformed scope.
    pub const fn suspends(self) -> bool {
        matches!(self, Self::Plain | Self::Tilde | Self::Array)
    }

    pub const fn is_marker(self) -> bool {
        !matches!(self, Self::NotAMarker)
    }
}

/// True for an unconsumed `_` identifier.
pub fn is_marker(arena: &NodeArena, annotations: &NodeAnnotations, idx: NodeIndex) -> bool {
    arena.is_identifier_named(idx, MARKER) && !annotations.has(idx, Annotation::CONSUMED_MARKER)
}

pub fn classify(arena: &NodeArena, annotations: &NodeAnnotations, idx: NodeIndex) -> MarkerKind {
    if is_marker(arena, annotations, idx) {
        return MarkerKind::Plain;
    }
    match arena.data(idx) {
        Some(NodeData::Unary { operator, argument }) if is_marker(arena, annotations, *argument) => {
            match operator.as_str() {
                "~" => MarkerKind::Tilde,
                "!" => MarkerKind::Bang,
                "void" => MarkerKind::Void,
                _ => MarkerKind::NotAMarker,
            }
        }
        Some(NodeData::Array { elements })
            if elements.len() == 1
                && elements
                    .get(0)
                    .is_some_and(|el| is_marker(arena, annotations, el)) =>
        {
            MarkerKind::Array
        }
        Some(NodeData::Binary { operator, left, .. })
            if operator == ">>" && is_marker(arena, annotations, *left) =>
        {
            MarkerKind::Shift
        }
        _ => MarkerKind::NotAMarker,
    }
}

/// The `_` identifier inside a marker form, for annotation and locations.
pub fn marker_identifier(arena: &NodeArena, idx: NodeIndex, kind: MarkerKind) -> NodeIndex {
    match (kind, arena.data(idx)) {
        (MarkerKind::Plain, _) => idx,
        (
            MarkerKind::Tilde | MarkerKind::Bang | MarkerKind::Void,
            Some(NodeData::Unary { argument, .. }),
        ) => *argument,
        (MarkerKind::Array, Some(NodeData::Array { elements })) => {
            elements.get(0).unwrap_or(NodeIndex::NONE)
        }
        (MarkerKind::Shift, Some(NodeData::Binary { left, .. })) => *left,
        _ => NodeIndex::NONE,
    }
}

/// Positions of unconsumed marker parameters of a function.
pub fn marker_params(
    arena: &NodeArena,
    annotations: &NodeAnnotations,
    func: NodeIndex,
) -> SmallVec<[usize; 2]> {
    arena
        .get_function(func)
        .map(|f| {
            f.params
                .iter()
                .enumerate()
                .filter(|&(_, param)| is_marker(arena, annotations, param))
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../tests/marker.rs"]
mod tests;
