//! Call-site rewriting.
//!
//! Planning is pure: [`plan_call`] inspects a call or `new` expression and
//! picks the first rule that applies. The pass then consumes the markers,
//! visits the arguments and finally emits the dispatch call in place of the
//! original node, so parents keep pointing at the same index.
//!
//! Dispatch shape:
//!
//! ```text
//! <rt>.await(<filename>, <line>, <receiver|null>, <member|function>,
//!            <index1>, <index2|null>, <batched>, [<args>])
//! ```

use crate::function_wrapper::arrow_to_function;
use crate::marker::{MarkerKind, classify, is_marker, marker_identifier, marker_params};
use crate::runtime::Suspension;
use crate::state::{Annotation, NodeAnnotations, TransformState};
use smallvec::SmallVec;
use weft_ast::{FunctionKind, LiteralValue, NodeArena, NodeData, NodeIndex, NodeList};
use weft_common::limits::MAX_MARKERS_PER_CALL;

/// Rewrite selected for one call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallPlan {
    /// Plain, tilde or array markers at these argument positions.
    Suspend {
        positions: SmallVec<[usize; 2]>,
        batched: bool,
    },
    /// More suspending markers than allowed; `position` is the first extra.
    TooManyMarkers { position: usize },
    /// `!_` (or `void _` when `promise` is set).
    Future { position: usize, promise: bool },
    /// `_ >> expr`
    Shift { position: usize },
    /// `_(a, b)`
    BareCallee { first: NodeIndex },
    /// Immediately invoked closure inside a transformed scope.
    Iife { function: NodeIndex },
    /// A dialect the construct does not support at this position.
    Unexpected { position: usize },
    Untouched,
}

/// Runtime operation a dispatch call targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Await,
    New,
    Future,
    /// `future(...).promise`
    Promise,
}

impl Dispatch {
    const fn method(self) -> &'static str {
        match self {
            Self::Await => "await",
            Self::New => "new",
            Self::Future | Self::Promise => "future",
        }
    }

    const fn suspends(self) -> bool {
        matches!(self, Self::Await | Self::New)
    }
}

fn call_parts(arena: &NodeArena, idx: NodeIndex) -> Option<(NodeIndex, &NodeList)> {
    match arena.data(idx)? {
        NodeData::Call {
            callee, arguments, ..
        }
        | NodeData::New { callee, arguments } => Some((*callee, arguments)),
        _ => None,
    }
}

/// Closure invoked by `callee`: `(function(){})`, `(() => {})` or
/// `(function(){}).call/apply`.
fn invoked_closure(arena: &NodeArena, callee: NodeIndex) -> Option<NodeIndex> {
    match arena.data(callee)? {
        NodeData::Function(func) if func.kind != FunctionKind::Declaration => Some(callee),
        NodeData::Member {
            object,
            property,
            computed: false,
            ..
        } if arena
            .get_function(*object)
            .is_some_and(|f| f.kind == FunctionKind::Expression)
            && matches!(arena.identifier_name(*property), Some("call" | "apply")) =>
        {
            Some(*object)
        }
        _ => None,
    }
}

/// Pick the rewrite for a call (`construct == false`) or `new` expression.
pub fn plan_call(
    arena: &NodeArena,
    annotations: &NodeAnnotations,
    idx: NodeIndex,
    construct: bool,
    in_transformed_scope: bool,
) -> CallPlan {
    let Some((callee, arguments)) = call_parts(arena, idx) else {
        return CallPlan::Untouched;
    };
    let kinds: SmallVec<[MarkerKind; 4]> = arguments
        .iter()
        .map(|arg| classify(arena, annotations, arg))
        .collect();
    let first = |wanted: MarkerKind| kinds.iter().position(|&k| k == wanted);

    let suspending: SmallVec<[usize; 4]> = kinds
        .iter()
        .enumerate()
        .filter(|(_, k)| k.suspends())
        .map(|(i, _)| i)
        .collect();
    if let Some(&position) = suspending.get(MAX_MARKERS_PER_CALL) {
        return CallPlan::TooManyMarkers { position };
    }
    if !suspending.is_empty() {
        return CallPlan::Suspend {
            batched: suspending.iter().any(|&i| kinds[i] == MarkerKind::Array),
            positions: suspending.into_iter().collect(),
        };
    }

    if let Some(position) = first(MarkerKind::Bang) {
        return if construct {
            CallPlan::Unexpected { position }
        } else {
            CallPlan::Future {
                position,
                promise: false,
            }
        };
    }
    if let Some(position) = first(MarkerKind::Void) {
        return if construct {
            CallPlan::Unexpected { position }
        } else {
            CallPlan::Future {
                position,
                promise: true,
            }
        };
    }
    if let Some(position) = first(MarkerKind::Shift) {
        return CallPlan::Shift { position };
    }
    if construct {
        return CallPlan::Untouched;
    }

    if is_marker(arena, annotations, callee) && arguments.len() == 2 {
        if let Some(first_arg) = arguments.get(0) {
            return CallPlan::BareCallee { first: first_arg };
        }
    }

    if in_transformed_scope {
        if let Some(function) = invoked_closure(arena, callee) {
            let eligible = arena
                .get_function(function)
                .is_some_and(|f| !f.is_async && !f.is_generator)
                && marker_params(arena, annotations, function).is_empty();
            if eligible {
                return CallPlan::Iife { function };
            }
        }
    }

    CallPlan::Untouched
}

/// Argument node at `position`.
pub fn argument(arena: &NodeArena, idx: NodeIndex, position: usize) -> NodeIndex {
    call_parts(arena, idx)
        .and_then(|(_, args)| args.get(position))
        .unwrap_or(NodeIndex::NONE)
}

fn set_argument(arena: &mut NodeArena, idx: NodeIndex, position: usize, value: NodeIndex) {
    match arena.data_mut(idx) {
        Some(NodeData::Call { arguments, .. } | NodeData::New { arguments, .. }) => {
            if let Some(slot) = arguments.nodes.get_mut(position) {
                *slot = value;
            }
        }
        _ => {}
    }
}

/// The `_` identifier of the marker form at `position`.
pub fn marker_at(
    arena: &NodeArena,
    annotations: &NodeAnnotations,
    idx: NodeIndex,
    position: usize,
) -> NodeIndex {
    let arg = argument(arena, idx, position);
    marker_identifier(arena, arg, classify(arena, annotations, arg))
}

/// Replace each marker argument with the literal `value`, annotating the
/// marker identifiers as consumed.
pub fn consume_markers(
    arena: &mut NodeArena,
    annotations: &mut NodeAnnotations,
    idx: NodeIndex,
    positions: &[usize],
    value: bool,
) {
    for &position in positions {
        let marker = marker_at(arena, annotations, idx, position);
        annotations.insert(marker, Annotation::CONSUMED_MARKER);
        let span = arena.span(argument(arena, idx, position));
        let literal = arena.add(NodeData::Literal(LiteralValue::Boolean(value)), span);
        set_argument(arena, idx, position, literal);
    }
}

/// `f(_ >> expr)` becomes `f(expr)`.
pub fn unshift(arena: &mut NodeArena, idx: NodeIndex, position: usize) {
    let arg = argument(arena, idx, position);
    if let Some(NodeData::Binary { right, .. }) = arena.data(arg) {
        let right = *right;
        set_argument(arena, idx, position, right);
    }
}

/// Receiver and member operands of the dispatch call.
fn receiver_and_member(arena: &mut NodeArena, callee: NodeIndex) -> (NodeIndex, NodeIndex) {
    let member = match arena.data(callee) {
        Some(NodeData::Member {
            object,
            property,
            computed,
            ..
        }) => Some((*object, *property, *computed)),
        _ => None,
    };
    match member {
        Some((object, _, _)) if matches!(arena.data(object), Some(NodeData::Super)) => {
            (arena.this(), callee)
        }
        Some((object, property, false)) => {
            let name = arena.identifier_name(property).unwrap_or_default().to_string();
            let span = arena.span(property);
            (object, arena.add(NodeData::Literal(LiteralValue::String(name)), span))
        }
        Some((object, property, true)) => (object, property),
        None => (arena.null(), callee),
    }
}

/// Replace the call at `idx` with its dispatch call, wrapped in the
/// profile's suspension form for suspending dispatches.
pub fn emit_dispatch(
    arena: &mut NodeArena,
    state: &mut TransformState,
    idx: NodeIndex,
    dispatch: Dispatch,
    positions: &[usize],
    batched: bool,
) {
    let Some((callee, arguments)) = call_parts(arena, idx).map(|(c, a)| (c, a.clone())) else {
        return;
    };
    let span = arena.span(idx);

    let (receiver, member) = if dispatch == Dispatch::New {
        (arena.null(), callee)
    } else {
        receiver_and_member(arena, callee)
    };
    let rt = arena.identifier(state.runtime_binding.clone());
    let method = arena.member(rt, dispatch.method());
    let filename = arena.identifier(state.filename_binding.clone());
    let line = arena.number(f64::from(span.line()));
    let first_index = arena.number(positions.first().copied().unwrap_or_default() as f64);
    let second_index = match positions.get(1) {
        Some(&i) => arena.number(i as f64),
        None => arena.null(),
    };
    let batched = arena.boolean(batched);
    let args = arena.add(
        NodeData::Array {
            elements: arguments,
        },
        span,
    );
    let dispatch_call = NodeData::Call {
        callee: method,
        arguments: NodeList::from(vec![
            filename,
            line,
            receiver,
            member,
            first_index,
            second_index,
            batched,
            args,
        ]),
        optional: false,
    };

    let replacement = match (dispatch, state.profile.suspension()) {
        (Dispatch::Promise, _) => {
            let call = arena.add(dispatch_call, span);
            let property = arena.identifier("promise");
            NodeData::Member {
                object: call,
                property,
                computed: false,
                optional: false,
            }
        }
        (Dispatch::Future, _) | (_, Suspension::Direct) => dispatch_call,
        (_, Suspension::Await) => NodeData::Await {
            argument: arena.add(dispatch_call, span),
        },
        (_, Suspension::Yield) => NodeData::Yield {
            argument: arena.add(dispatch_call, span),
            delegate: false,
        },
    };
    arena.set_data(idx, replacement);
    if dispatch.suspends() {
        state.annotations.insert(idx, Annotation::ENTRY_WRAPPED);
    }
    tracing::debug!(call = idx.0, line = span.line(), ?dispatch, "rewrote marker call");
}

/// Tag an immediately invoked closure as a transformed coroutine. Arrows
/// become function expressions called with `.call(this, ...)` when the
/// profile needs generators.
pub fn prepare_iife(
    arena: &mut NodeArena,
    state: &mut TransformState,
    idx: NodeIndex,
    function: NodeIndex,
) {
    let is_arrow = arena
        .get_function(function)
        .is_some_and(|f| f.kind == FunctionKind::Arrow);
    if is_arrow && state.profile.uses_generator_coroutine {
        arrow_to_function(arena, function);
        let callee = arena.member(function, "call");
        let this = arena.this();
        if let Some(NodeData::Call {
            callee: slot,
            arguments,
            ..
        }) = arena.data_mut(idx)
        {
            *slot = callee;
            arguments.nodes.insert(0, this);
        }
    }
    state.annotations.insert(function, Annotation::TRANSFORMED);
    if state.profile.has_coroutine_syntax() {
        state.annotations.insert(function, Annotation::COROUTINE);
    }
}

/// Wrap the expression at `idx` in the profile's suspension form.
pub fn wrap_suspension(arena: &mut NodeArena, state: &mut TransformState, idx: NodeIndex) {
    let Some(node) = arena.get(idx).cloned() else {
        return;
    };
    let wrapped = match state.profile.suspension() {
        Suspension::Direct => None,
        Suspension::Await => Some(NodeData::Await {
            argument: arena.add(node.data, node.span),
        }),
        Suspension::Yield => Some(NodeData::Yield {
            argument: arena.add(node.data, node.span),
            delegate: false,
        }),
    };
    if let Some(wrapped) = wrapped {
        arena.set_data(idx, wrapped);
    }
    state.annotations.insert(idx, Annotation::ENTRY_WRAPPED);
}

#[cfg(test)]
#[path = "../tests/call_site.rs"]
mod tests;
