use super::*;
use crate::options::{FileDirectives, TransformOptions};
use crate::runtime::RuntimeProfile;
use weft_ast::printer::render;
use weft_common::Span;

fn state_for(arena: &NodeArena, runtime: &str) -> TransformState {
    let profile = RuntimeProfile::by_name(runtime).unwrap();
    TransformState::new(
        arena,
        profile,
        &TransformOptions::default(),
        FileDirectives::default(),
    )
}

fn marker(arena: &mut NodeArena) -> NodeIndex {
    arena.identifier("_")
}

fn call_named(arena: &mut NodeArena, name: &str, args: Vec<NodeIndex>) -> NodeIndex {
    let callee = arena.identifier(name);
    arena.call(callee, args)
}

fn plan(arena: &NodeArena, idx: NodeIndex, construct: bool, transformed: bool) -> CallPlan {
    plan_call(arena, &NodeAnnotations::new(), idx, construct, transformed)
}

#[test]
fn plain_and_tilde_markers_suspend() {
    let mut arena = NodeArena::new();
    let x = arena.identifier("x");
    let m = marker(&mut arena);
    let single = call_named(&mut arena, "g", vec![x, m]);

    let first = marker(&mut arena);
    let m = marker(&mut arena);
    let tilde = arena.unary("~", m);
    let pair = call_named(&mut arena, "g", vec![first, tilde]);

    assert_eq!(
        plan(&arena, single, false, true),
        CallPlan::Suspend {
            positions: SmallVec::from_slice(&[1]),
            batched: false,
        }
    );
    assert_eq!(
        plan(&arena, pair, false, false),
        CallPlan::Suspend {
            positions: SmallVec::from_slice(&[0, 1]),
            batched: false,
        }
    );
}

#[test]
fn third_marker_is_too_many() {
    let mut arena = NodeArena::new();
    let args = (0..3).map(|_| marker(&mut arena)).collect();
    let call = call_named(&mut arena, "g", args);
    assert_eq!(
        plan(&arena, call, false, true),
        CallPlan::TooManyMarkers { position: 2 }
    );
}

#[test]
fn array_marker_sets_batched_flag() {
    let mut arena = NodeArena::new();
    let m = marker(&mut arena);
    let array = arena.array(vec![m]);
    let x = arena.identifier("x");
    let call = call_named(&mut arena, "g", vec![array, x]);
    assert_eq!(
        plan(&arena, call, false, true),
        CallPlan::Suspend {
            positions: SmallVec::from_slice(&[0]),
            batched: true,
        }
    );
}

#[test]
fn future_dialects() {
    let mut arena = NodeArena::new();
    let m = marker(&mut arena);
    let bang = arena.unary("!", m);
    let future = call_named(&mut arena, "g", vec![bang]);
    let m = marker(&mut arena);
    let void = arena.unary("void", m);
    let promise = call_named(&mut arena, "g", vec![void]);
    let m = marker(&mut arena);
    let bang = arena.unary("!", m);
    let callee = arena.identifier("C");
    let constructed = arena.new_expr(callee, vec![bang]);

    assert_eq!(
        plan(&arena, future, false, false),
        CallPlan::Future {
            position: 0,
            promise: false,
        }
    );
    assert_eq!(
        plan(&arena, promise, false, false),
        CallPlan::Future {
            position: 0,
            promise: true,
        }
    );
    assert_eq!(
        plan(&arena, constructed, true, true),
        CallPlan::Unexpected { position: 0 }
    );
}

#[test]
fn legacy_forms() {
    let mut arena = NodeArena::new();
    let m = marker(&mut arena);
    let cb = arena.identifier("cb");
    let shift = arena.binary(m, ">>", cb);
    let shifted = call_named(&mut arena, "g", vec![shift]);

    let a = arena.identifier("a");
    let b = arena.identifier("b");
    let bare = call_named(&mut arena, "_", vec![a, b]);

    assert_eq!(
        plan(&arena, shifted, false, true),
        CallPlan::Shift { position: 0 }
    );
    assert_eq!(
        plan(&arena, bare, false, true),
        CallPlan::BareCallee { first: a }
    );

    unshift(&mut arena, shifted, 0);
    assert_eq!(render(&arena, shifted), "g(cb)");
}

#[test]
fn closures_are_iife_only_inside_transformed_scopes() {
    let mut arena = NodeArena::new();
    let func = arena.function_expr(None, Vec::new(), Vec::new());
    let call = arena.call(func, Vec::new());

    assert_eq!(
        plan(&arena, call, false, true),
        CallPlan::Iife { function: func }
    );
    assert_eq!(plan(&arena, call, false, false), CallPlan::Untouched);

    let generator = arena.function_expr(None, Vec::new(), Vec::new());
    if let Some(f) = arena.get_function_mut(generator) {
        f.is_generator = true;
    }
    let call = arena.call(generator, Vec::new());
    assert_eq!(plan(&arena, call, false, true), CallPlan::Untouched);
}

#[test]
fn call_and_apply_closures_are_iife() {
    let mut arena = NodeArena::new();
    let func = arena.function_expr(None, Vec::new(), Vec::new());
    let callee = arena.member(func, "call");
    let this = arena.this();
    let call = arena.call(callee, vec![this]);
    assert_eq!(
        plan(&arena, call, false, true),
        CallPlan::Iife { function: func }
    );
}

#[test]
fn emits_member_dispatch_under_await() {
    let mut arena = NodeArena::new();
    let obj = arena.identifier("obj");
    let callee = arena.member(obj, "read");
    let x = arena.identifier("x");
    let m = marker(&mut arena);
    let call = arena.add(
        NodeData::Call {
            callee,
            arguments: vec![x, m].into(),
            optional: false,
        },
        Span::at(7, 2),
    );
    let mut state = state_for(&arena, "await");

    consume_markers(&mut arena, &mut state.annotations, call, &[1], true);
    assert!(state.annotations.has(m, Annotation::CONSUMED_MARKER));
    emit_dispatch(&mut arena, &mut state, call, Dispatch::Await, &[1], false);

    assert_eq!(
        render(&arena, call),
        "await _weft.await(_filename, 7, obj, \"read\", 1, null, false, [x, true])"
    );
    assert!(state.annotations.has(call, Annotation::ENTRY_WRAPPED));
}

#[test]
fn emits_constructor_dispatch_under_generators() {
    let mut arena = NodeArena::new();
    let callee = arena.identifier("Conn");
    let m = marker(&mut arena);
    let call = arena.new_expr(callee, vec![m]);
    let mut state = state_for(&arena, "generators");

    consume_markers(&mut arena, &mut state.annotations, call, &[0], true);
    emit_dispatch(&mut arena, &mut state, call, Dispatch::New, &[0], false);

    assert_eq!(
        render(&arena, call),
        "yield _weft.new(_filename, 0, null, Conn, 0, null, false, [true])"
    );
}

#[test]
fn promise_projection_is_not_suspended() {
    let mut arena = NodeArena::new();
    let object = arena.add_synthetic(NodeData::Super);
    let callee = arena.member(object, "load");
    let m = marker(&mut arena);
    let void = arena.unary("void", m);
    let call = arena.call(callee, vec![void]);
    let mut state = state_for(&arena, "await");

    consume_markers(&mut arena, &mut state.annotations, call, &[0], false);
    emit_dispatch(&mut arena, &mut state, call, Dispatch::Promise, &[0], false);

    assert_eq!(
        render(&arena, call),
        "_weft.future(_filename, 0, this, super.load, 0, null, false, [false]).promise"
    );
    assert!(!state.annotations.has(call, Annotation::ENTRY_WRAPPED));
}

#[test]
fn arrow_iife_becomes_call_under_generators() {
    let mut arena = NodeArena::new();
    let body = arena.number(1.0);
    let arrow = arena.add_synthetic(NodeData::Function(weft_ast::FunctionData {
        kind: FunctionKind::Arrow,
        id: NodeIndex::NONE,
        params: NodeList::new(),
        body,
        is_async: false,
        is_generator: false,
        expression_body: true,
    }));
    let call = arena.call(arrow, Vec::new());
    let mut state = state_for(&arena, "callbacks");

    prepare_iife(&mut arena, &mut state, call, arrow);
    wrap_suspension(&mut arena, &mut state, call);

    assert_eq!(
        render(&arena, call),
        "yield (function () {\n    return 1;\n}).call(this)"
    );
    assert!(state.annotations.has(arrow, Annotation::TRANSFORMED | Annotation::COROUTINE));
}
