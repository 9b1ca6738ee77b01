use super::*;
use crate::options::{FileDirectives, TransformOptions};
use weft_ast::printer::render;

fn state_for(arena: &NodeArena, runtime: &str) -> TransformState {
    let profile = RuntimeProfile::by_name(runtime).unwrap();
    TransformState::new(
        arena,
        profile,
        &TransformOptions::default(),
        FileDirectives::default(),
    )
}

#[test]
fn inner_names_wrap_base_in_dollars() {
    assert_eq!(inner_name("f"), "_$$f$$");
    assert_eq!(inner_name(""), "_$$$$");
}

#[test]
fn wraps_function_into_native_coroutine() {
    let mut arena = NodeArena::new();
    let x = arena.identifier("x");
    let marker = arena.identifier(MARKER);
    let value = arena.identifier("x");
    let ret = arena.ret(Some(value));
    let func = arena.function_expr(Some("f"), vec![x, marker], vec![ret]);
    let mut state = state_for(&arena, "await");

    wrap_function(&mut arena, &mut state, func, 1, None);

    assert_eq!(
        render(&arena, func),
        "function f(x, _1) {\n    \
         return _weft.async(async function _$$f$$(x, _) {\n        \
         return x;\n    \
         }, 1, 2).apply(this, arguments);\n\
         }"
    );
    let outer = arena.get_function(func).unwrap();
    assert_eq!(outer.params.len(), 2);
    assert!(!outer.is_async && !outer.is_generator);
}

#[test]
fn arrows_forward_parameters_explicitly() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let marker = arena.identifier(MARKER);
    let body = arena.identifier("a");
    let arrow = arena.add_synthetic(NodeData::Function(FunctionData {
        kind: FunctionKind::Arrow,
        id: NodeIndex::NONE,
        params: vec![a, marker].into(),
        body,
        is_async: false,
        is_generator: false,
        expression_body: true,
    }));
    let mut state = state_for(&arena, "generators");

    wrap_function(&mut arena, &mut state, arrow, 1, Some("g"));

    assert_eq!(
        render(&arena, arrow),
        "(a, _1) => {\n    \
         return _weft.async(function* _$$g$$(a, _) {\n        \
         return a;\n    \
         }, 1, 2).call(this, a, _1);\n\
         }"
    );
}

#[test]
fn outer_parameters_keep_declared_length() {
    // function (a = 1, _) has length 0; the outer function must too
    let mut arena = NodeArena::new();
    let left = arena.identifier("a");
    let one = arena.number(1.0);
    let defaulted = arena.add_synthetic(NodeData::AssignmentPattern { left, right: one });
    let marker = arena.identifier(MARKER);
    let func = arena.function_expr(None, vec![defaulted, marker], Vec::new());
    let mut state = state_for(&arena, "fibers");

    wrap_function(&mut arena, &mut state, func, 1, Some("load"));

    let text = render(&arena, func);
    assert!(text.starts_with("function (a = undefined, _1) {"), "{text}");
    assert!(text.contains("function _$$load$$(a = 1, _) {}, 1, 2)"), "{text}");
}

#[test]
fn super_lookups_go_through_outer_accessor() {
    // m(_) { super.log(1); super.count = 2; return super.name; }
    let mut arena = NodeArena::new();
    let marker = arena.identifier(MARKER);
    let sup = arena.add_synthetic(NodeData::Super);
    let log = arena.member(sup, "log");
    let one = arena.number(1.0);
    let call = arena.call(log, vec![one]);
    let first = arena.expr_stmt(call);
    let sup = arena.add_synthetic(NodeData::Super);
    let count = arena.member(sup, "count");
    let two = arena.number(2.0);
    let store = arena.add_synthetic(NodeData::Assignment {
        operator: "=".to_string(),
        left: count,
        right: two,
    });
    let second = arena.expr_stmt(store);
    let sup = arena.add_synthetic(NodeData::Super);
    let name = arena.member(sup, "name");
    let third = arena.ret(Some(name));
    let func = arena.function_expr(None, vec![marker], vec![first, second, third]);
    let mut state = state_for(&arena, "await");

    wrap_function(&mut arena, &mut state, func, 0, Some("m"));

    assert_eq!(
        render(&arena, func),
        "function (_1) {\n    \
         var _super = (name) => super[name];\n    \
         return _weft.async(async function _$$m$$(_) {\n        \
         _super(\"log\").call(this, 1);\n        \
         this.count = 2;\n        \
         return _super(\"name\");\n    \
         }, 0, 1).apply(this, arguments);\n\
         }"
    );
}

#[test]
fn nested_functions_keep_their_own_super() {
    // m(_) { return { f() { return super.x; } }; } leaves the inner method alone
    let mut arena = NodeArena::new();
    let marker = arena.identifier(MARKER);
    let sup = arena.add_synthetic(NodeData::Super);
    let x = arena.member(sup, "x");
    let ret = arena.ret(Some(x));
    let nested = arena.function_expr(Some("f"), Vec::new(), vec![ret]);
    let stmt = arena.expr_stmt(nested);
    let func = arena.function_expr(None, vec![marker], vec![stmt]);
    let mut state = state_for(&arena, "await");

    wrap_function(&mut arena, &mut state, func, 0, Some("m"));

    let text = render(&arena, func);
    assert!(!text.contains("_super"), "{text}");
    assert!(text.contains("return super.x;"), "{text}");
}

#[test]
fn wrapped_inner_function_is_annotated() {
    let mut arena = NodeArena::new();
    let marker = arena.identifier(MARKER);
    let func = arena.function_expr(Some("f"), vec![marker], Vec::new());
    let mut state = state_for(&arena, "callbacks");
    let before = arena.len();

    wrap_function(&mut arena, &mut state, func, 0, None);

    let inner = (before..arena.len())
        .map(|i| NodeIndex(i as u32))
        .find(|&idx| arena.function_name(idx) == Some("_$$f$$"))
        .unwrap();
    assert!(state.annotations.has(inner, Annotation::TRANSFORMED | Annotation::COROUTINE));
    assert!(arena.get_function(inner).unwrap().is_generator);
}

#[test]
fn coroutine_and_arrow_conversion() {
    let mut arena = NodeArena::new();
    let body = arena.number(1.0);
    let arrow = arena.add_synthetic(NodeData::Function(FunctionData {
        kind: FunctionKind::Arrow,
        id: NodeIndex::NONE,
        params: NodeList::new(),
        body,
        is_async: false,
        is_generator: false,
        expression_body: true,
    }));

    arrow_to_function(&mut arena, arrow);
    make_coroutine(&mut arena, RuntimeProfile::default_profile(), arrow);
    assert_eq!(render(&arena, arrow), "function* () {\n    return 1;\n}");
}
