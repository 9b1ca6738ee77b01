use super::*;
use crate::node::SyntaxKind;
use crate::printer::render;
use serde_json::json;

fn call_program() -> Value {
    json!({
        "type": "Program",
        "sourceType": "script",
        "start": 0,
        "end": 20,
        "body": [{
            "type": "ExpressionStatement",
            "start": 0,
            "end": 10,
            "loc": { "start": { "line": 2, "column": 4 } },
            "expression": {
                "type": "CallExpression",
                "callee": { "type": "Identifier", "name": "foo" },
                "arguments": [
                    { "type": "Identifier", "name": "_", "loc": { "start": { "line": 2, "column": 8 } } },
                    { "type": "Literal", "value": 1 }
                ]
            }
        }],
        "comments": [{ "type": "Line", "value": " @weft-force", "start": 0, "end": 14 }]
    })
}

#[test]
fn imports_program_statements_and_positions() {
    let (arena, root) = import_program(&call_program()).expect("valid program");
    let body = arena.statements(root).expect("program body");
    assert_eq!(body.len(), 1);

    let stmt = body.get(0).expect("statement");
    assert_eq!(arena.span(stmt).line(), 2);
    assert_eq!(render(&arena, root), "foo(_, 1);");
}

#[test]
fn imports_program_comments() {
    let (arena, root) = import_program(&call_program()).expect("valid program");
    let Some(NodeData::Program { comments, .. }) = arena.data(root) else {
        panic!("expected program");
    };
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, " @weft-force");
    assert!(!comments[0].is_block);
}

#[test]
fn accepts_babel_file_wrapper_and_literals() {
    let value = json!({
        "type": "File",
        "program": {
            "type": "Program",
            "sourceType": "module",
            "body": [{
                "type": "ExpressionStatement",
                "expression": {
                    "type": "CallExpression",
                    "callee": { "type": "Identifier", "name": "f" },
                    "arguments": [
                        { "type": "StringLiteral", "value": "a" },
                        { "type": "NumericLiteral", "value": 2 },
                        { "type": "BooleanLiteral", "value": true },
                        { "type": "NullLiteral" }
                    ]
                }
            }]
        },
        "comments": [{ "type": "CommentBlock", "value": " note " }]
    });
    let (arena, root) = import_program(&value).expect("valid file");
    assert_eq!(render(&arena, root), "f(\"a\", 2, true, null);");
    let Some(NodeData::Program {
        comments,
        source_type,
        ..
    }) = arena.data(root)
    else {
        panic!("expected program");
    };
    assert_eq!(*source_type, SourceType::Module);
    assert!(comments[0].is_block);
}

#[test]
fn unknown_node_types_round_trip_as_opaque() {
    let raw = json!({ "type": "JSXElement", "children": [] });
    let value = json!({
        "type": "Program",
        "body": [{ "type": "ExpressionStatement", "expression": raw.clone() }]
    });
    let (arena, root) = import_program(&value).expect("valid program");
    let stmt = arena.statements(root).and_then(|b| b.get(0)).expect("statement");
    let Some(NodeData::ExpressionStatement { expression }) = arena.data(stmt) else {
        panic!("expected expression statement");
    };
    assert_eq!(arena.get(*expression).map(|n| n.kind()), Some(SyntaxKind::Opaque));
    assert_eq!(export_node(&arena, *expression), raw);
}

#[test]
fn export_then_import_preserves_structure() {
    let (arena, root) = import_program(&call_program()).expect("valid program");
    let exported = export_node(&arena, root);
    assert_eq!(exported["body"][0]["expression"]["callee"]["name"], "foo");
    assert_eq!(exported["body"][0]["loc"]["start"]["line"], 2);

    let (again, again_root) = import_program(&exported).expect("re-import");
    assert_eq!(render(&again, again_root), render(&arena, root));
}

#[test]
fn rejects_non_program_root() {
    let err = import_program(&json!({ "type": "Identifier", "name": "x" })).unwrap_err();
    assert!(matches!(err, EstreeError::UnexpectedRoot(ty) if ty == "Identifier"));
}

#[test]
fn reports_missing_required_fields() {
    let value = json!({
        "type": "Program",
        "body": [{ "type": "ExpressionStatement" }]
    });
    let err = import_program(&value).unwrap_err();
    assert!(matches!(
        err,
        EstreeError::MissingField { field: "expression", .. }
    ));
}

#[test]
fn arrow_with_expression_body_is_flagged() {
    let value = json!({
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "ArrowFunctionExpression",
                "params": [{ "type": "Identifier", "name": "x" }],
                "body": { "type": "Identifier", "name": "x" }
            }
        }]
    });
    let (arena, root) = import_program(&value).expect("valid program");
    assert_eq!(render(&arena, root), "(x) => x;");
}
