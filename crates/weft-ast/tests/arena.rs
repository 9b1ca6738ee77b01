use super::*;
use crate::node::SyntaxKind;
use weft_common::SourceLocation;

#[test]
fn add_returns_sequential_indices() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let b = arena.identifier("b");
    assert_eq!(a, NodeIndex(0));
    assert_eq!(b, NodeIndex(1));
    assert_eq!(arena.len(), 2);
}

#[test]
fn none_index_resolves_to_nothing() {
    let arena = NodeArena::new();
    assert!(arena.get(NodeIndex::NONE).is_none());
    assert!(arena.span(NodeIndex::NONE).is_synthetic());
}

#[test]
fn set_data_keeps_span() {
    let mut arena = NodeArena::new();
    let span = Span::new(4, 5, SourceLocation::new(2, 3));
    let idx = arena.add(NodeData::Identifier { name: "_".into() }, span);
    arena.set_data(idx, NodeData::Literal(LiteralValue::Boolean(true)));

    let node = arena.get(idx).expect("node exists");
    assert_eq!(node.kind(), SyntaxKind::Literal);
    assert_eq!(node.span, span);
}

#[test]
fn function_decl_builder_sets_declaration_kind() {
    let mut arena = NodeArena::new();
    let f = arena.function_decl("f", Vec::new(), Vec::new());
    assert_eq!(
        arena.get(f).map(|n| n.kind()),
        Some(SyntaxKind::FunctionDeclaration)
    );
}

#[test]
fn var_decl_builder_creates_single_declarator() {
    let mut arena = NodeArena::new();
    let init = arena.number(1.0);
    let decl = arena.var_decl(VariableKind::Var, "x", Some(init));
    let Some(NodeData::VariableDeclaration { declarations, kind }) =
        arena.get(decl).map(|n| &n.data)
    else {
        panic!("expected variable declaration");
    };
    assert_eq!(*kind, VariableKind::Var);
    assert_eq!(declarations.len(), 1);
}
