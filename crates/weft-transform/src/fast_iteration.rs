//! Native iteration fast path for the fiber profile.
//!
//! Under fibers a suspending call blocks the current fiber, so an iteration
//! helper whose callback takes a marker can run as the plain array method:
//!
//! ```text
//! items.forEach_(_, function (_, x) { ... }, self)
//!     =>
//! items.forEach(function (x) { ... }, self)
//! ```
//!
//! The callback still counts as a transformed scope, so marker calls in its
//! body are rewritten exactly as they would be inside the wrapped coroutine.

use crate::marker::{MarkerKind, classify, marker_params};
use crate::state::{Annotation, NodeAnnotations};
use weft_ast::{NodeArena, NodeData, NodeIndex, NodeList};

/// Marker-taking iteration helpers and their native counterparts.
pub const FAST_METHODS: &[(&str, &str)] = &[
    ("forEach_", "forEach"),
    ("map_", "map"),
    ("filter_", "filter"),
    ("every_", "every"),
    ("some_", "some"),
];

/// A call eligible for the fast path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FastCall {
    pub property: NodeIndex,
    pub native: &'static str,
    /// The `_` argument
    pub marker: NodeIndex,
    pub callback: NodeIndex,
}

fn native_method(name: &str) -> Option<&'static str> {
    FAST_METHODS
        .iter()
        .find(|(helper, _)| *helper == name)
        .map(|&(_, native)| native)
}

/// Match `recv.<helper>(_, function (_, ...) {...} [, thisArg])`.
///
/// The callback must take the marker as its only marker parameter, first in
/// the list, and must not be `async` or a generator. Anything else falls back
/// to the regular call-site rewrite.
pub fn match_call(
    arena: &NodeArena,
    annotations: &NodeAnnotations,
    idx: NodeIndex,
) -> Option<FastCall> {
    let NodeData::Call {
        callee, arguments, ..
    } = arena.data(idx)?
    else {
        return None;
    };
    let NodeData::Member {
        property,
        computed: false,
        ..
    } = arena.data(*callee)?
    else {
        return None;
    };
    let native = native_method(arena.identifier_name(*property)?)?;
    if !(2..=3).contains(&arguments.len()) {
        return None;
    }

    let marker = arguments.get(0)?;
    let callback = arguments.get(1)?;
    if classify(arena, annotations, marker) != MarkerKind::Plain {
        return None;
    }
    if let Some(this_arg) = arguments.get(2) {
        if classify(arena, annotations, this_arg).is_marker() {
            return None;
        }
    }

    let func = arena.get_function(callback)?;
    if func.is_async || func.is_generator {
        return None;
    }
    if marker_params(arena, annotations, callback).as_slice() != [0] {
        return None;
    }

    Some(FastCall {
        property: *property,
        native,
        marker,
        callback,
    })
}

/// Rewrite a matched call in place.
pub fn rewrite(
    arena: &mut NodeArena,
    annotations: &mut NodeAnnotations,
    idx: NodeIndex,
    call: FastCall,
) {
    arena.set_data(
        call.property,
        NodeData::Identifier {
            name: call.native.to_string(),
        },
    );

    let callback_marker = arena
        .get_function(call.callback)
        .and_then(|f| f.params.get(0))
        .unwrap_or(NodeIndex::NONE);
    if let Some(func) = arena.get_function_mut(call.callback) {
        func.params = func.params.iter().skip(1).collect::<NodeList>();
    }
    if let Some(NodeData::Call { arguments, .. }) = arena.data_mut(idx) {
        arguments.nodes.remove(0);
    }

    annotations.insert(call.marker, Annotation::CONSUMED_MARKER);
    annotations.insert(callback_marker, Annotation::CONSUMED_MARKER);
    annotations.insert(call.callback, Annotation::TRANSFORMED);
    tracing::debug!(call = idx.0, method = call.native, "rewrote iteration fast path");
}

#[cfg(test)]
#[path = "../tests/fast_iteration.rs"]
mod tests;
