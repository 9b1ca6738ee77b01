use super::*;
use serde_json::json;

fn marker_call_in(params: Vec<Value>) -> Value {
    json!({
        "type": "Program",
        "sourceType": "script",
        "body": [{
            "type": "FunctionDeclaration",
            "id": { "type": "Identifier", "name": "f" },
            "params": params,
            "body": {
                "type": "BlockStatement",
                "body": [{
                    "type": "ExpressionStatement",
                    "expression": {
                        "type": "CallExpression",
                        "callee": { "type": "Identifier", "name": "g" },
                        "arguments": [{
                            "type": "Identifier",
                            "name": "_",
                            "loc": { "start": { "line": 2, "column": 6 } }
                        }],
                        "loc": { "start": { "line": 2, "column": 4 } }
                    }
                }]
            },
            "loc": { "start": { "line": 1, "column": 0 } }
        }]
    })
}

fn options() -> TransformOptions {
    TransformOptions::default()
        .with_filename("lib/a._js")
        .with_runtime("await")
}

#[test]
fn transforms_estree_round_trip() {
    let source = marker_call_in(vec![json!({ "type": "Identifier", "name": "_" })]);
    let output = transform_estree(&source, &options()).expect("transform succeeds");

    assert!(output.transformed);
    assert!(!output.program_async);
    assert!(output.warnings.is_empty());

    let body = output.program["body"].as_array().expect("program body");
    assert_eq!(body.len(), 3);
    assert_eq!(body[0]["type"], "VariableDeclaration");
    assert_eq!(body[0]["declarations"][0]["id"]["name"], "_weft");
    assert_eq!(body[1]["declarations"][0]["init"]["value"], "lib/a._js");
    assert_eq!(body[2]["type"], "FunctionDeclaration");
    assert_eq!(body[2]["id"]["name"], "f");
}

#[test]
fn transform_errors_are_reported() {
    let source = marker_call_in(Vec::new());
    let err = transform_estree(&source, &options()).expect_err("marker outside scope");
    match err {
        WeftError::Transform(TransformError::ScopeError { location, .. }) => {
            assert_eq!(location, SourceLocation::new(2, 6));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_json_is_an_import_error() {
    let err = transform_estree_str("{ not json", &options()).expect_err("bad input");
    assert!(matches!(err, WeftError::Estree(EstreeError::Json(_))));
}

#[test]
fn ineligible_text_passes_through() {
    let source = marker_call_in(Vec::new()).to_string();
    let options = TransformOptions::default().with_filename("a.js");
    let (text, warnings) = transform_estree_str(&source, &options).expect("untouched");
    assert!(warnings.is_empty());
    let value: Value = serde_json::from_str(&text).expect("valid JSON output");
    assert_eq!(value["body"][0]["type"], "FunctionDeclaration");
}
