use super::*;
use crate::node::VariableKind;

#[test]
fn renders_member_call_with_arguments() {
    let mut arena = NodeArena::new();
    let obj = arena.identifier("a");
    let callee = arena.member(obj, "b");
    let one = arena.number(1.0);
    let text = arena.string("x");
    let call = arena.call(callee, vec![one, text]);
    assert_eq!(render(&arena, call), "a.b(1, \"x\")");
}

#[test]
fn parenthesizes_function_callee() {
    let mut arena = NodeArena::new();
    let func = arena.function_expr(Some("f"), Vec::new(), Vec::new());
    let call = arena.call(func, Vec::new());
    assert_eq!(render(&arena, call), "(function f() {})()");
}

#[test]
fn parenthesizes_yield_inside_binary() {
    let mut arena = NodeArena::new();
    let x = arena.identifier("x");
    let suspended = arena.yield_expr(x);
    let one = arena.number(1.0);
    let sum = arena.binary(suspended, "+", one);
    assert_eq!(render(&arena, sum), "(yield x) + 1");
}

#[test]
fn renders_program_with_indented_blocks() {
    let mut arena = NodeArena::new();
    let one = arena.number(1.0);
    let decl = arena.var_decl(VariableKind::Var, "x", Some(one));
    let param = arena.identifier("a");
    let value = arena.identifier("a");
    let ret = arena.ret(Some(value));
    let func = arena.function_decl("f", vec![param], vec![ret]);
    let program = arena.program(vec![decl, func]);

    assert_eq!(
        render(&arena, program),
        "var x = 1;\nfunction f(a) {\n    return a;\n}"
    );
}

#[test]
fn anonymous_function_keeps_space_before_params() {
    let mut arena = NodeArena::new();
    let func = arena.function_expr(None, Vec::new(), Vec::new());
    assert_eq!(render(&arena, func), "function () {}");
}

#[test]
fn quotes_and_escapes_strings() {
    let mut arena = NodeArena::new();
    let s = arena.string("a\"b\n");
    assert_eq!(render(&arena, s), "\"a\\\"b\\n\"");
}
