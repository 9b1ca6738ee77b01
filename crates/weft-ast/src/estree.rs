//! ESTree interop.
//!
//! The external parser hands its tree over as ESTree JSON (acorn output, or
//! Babel output with its literal/property/method variants). [`import_program`]
//! loads it into a [`NodeArena`]; [`export_node`] writes the arena back out in
//! plain ESTree form for the external printer.
//!
//! Node types the transform does not model are kept as [`NodeData::Opaque`]
//! and round-trip untouched.

use crate::arena::NodeArena;
use crate::node::{
    ClassKind, ExportSpecifier, FunctionData, FunctionKind, ImportKind, LiteralValue, MethodKind,
    NodeData, NodeIndex, NodeList, PropertyKind, SourceType, VariableKind,
};
use serde_json::{Map, Value, json};
use thiserror::Error;
use weft_common::limits::MAX_AST_DEPTH;
use weft_common::{Comment, SourceLocation, Span};

#[derive(Debug, Error)]
pub enum EstreeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a Program or File node, found {0}")]
    UnexpectedRoot(String),

    #[error("expected a node object, found {0}")]
    NotANode(String),

    #[error("{node_type} is missing required field '{field}'")]
    MissingField {
        node_type: String,
        field: &'static str,
    },

    #[error("{node_type} has an unsupported value")]
    InvalidValue { node_type: String },

    #[error("tree nesting exceeds {MAX_AST_DEPTH} levels")]
    TooDeep,
}

pub type EstreeResult<T> = Result<T, EstreeError>;

/// Parse ESTree JSON text into a fresh arena.
pub fn import_program_str(json: &str) -> EstreeResult<(NodeArena, NodeIndex)> {
    let value: Value = serde_json::from_str(json)?;
    import_program(&value)
}

/// Load a `Program` (or Babel `File`) node into a fresh arena.
pub fn import_program(value: &Value) -> EstreeResult<(NodeArena, NodeIndex)> {
    let mut importer = Importer {
        arena: NodeArena::with_capacity(256),
        depth: 0,
    };

    let (program, comments) = match node_type(value) {
        Some("File") => {
            let program = value.get("program").ok_or_else(|| EstreeError::MissingField {
                node_type: "File".into(),
                field: "program",
            })?;
            (program, value.get("comments").or_else(|| program.get("comments")))
        }
        Some("Program") => (value, value.get("comments")),
        other => {
            return Err(EstreeError::UnexpectedRoot(
                other.unwrap_or("non-object").to_string(),
            ));
        }
    };

    let body = importer.list(program, "body")?;
    let source_type = match program.get("sourceType").and_then(Value::as_str) {
        Some("module") => SourceType::Module,
        _ => SourceType::Script,
    };
    let comments = comments
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(import_comment).collect())
        .unwrap_or_default();

    let root = importer.arena.add(
        NodeData::Program {
            body,
            comments,
            source_type,
        },
        span_of(program),
    );
    tracing::debug!(nodes = importer.arena.len(), "imported ESTree program");
    Ok((importer.arena, root))
}

fn node_type(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn span_of(value: &Value) -> Span {
    let offset = |key| {
        value
            .get(key)
            .and_then(Value::as_u64)
            .map_or(0, |v| v as u32)
    };
    let start = value.get("loc").and_then(|loc| loc.get("start"));
    let coord = |key| {
        start
            .and_then(|s| s.get(key))
            .and_then(Value::as_u64)
            .map_or(0, |v| v as u32)
    };
    Span::new(
        offset("start"),
        offset("end"),
        SourceLocation::new(coord("line"), coord("column")),
    )
}

fn import_comment(value: &Value) -> Option<Comment> {
    let is_block = matches!(node_type(value)?, "Block" | "CommentBlock");
    let text = value.get("value")?.as_str()?.to_string();
    let span = span_of(value);
    Some(Comment {
        text,
        is_block,
        start: span.start,
        end: span.end,
    })
}

/// Identifier name or string-literal value, for specifier and label fields.
fn name_of(value: &Value) -> Option<String> {
    value
        .get("name")
        .or_else(|| value.get("value"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

struct Importer {
    arena: NodeArena,
    depth: u32,
}

impl Importer {
    fn field<'v>(&self, value: &'v Value, field: &'static str) -> EstreeResult<&'v Value> {
        match value.get(field) {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(EstreeError::MissingField {
                node_type: node_type(value).unwrap_or("?").to_string(),
                field,
            }),
        }
    }

    fn required(&mut self, value: &Value, field: &'static str) -> EstreeResult<NodeIndex> {
        let child = self.field(value, field)?;
        self.node(child)
    }

    fn optional(&mut self, value: &Value, field: &str) -> EstreeResult<NodeIndex> {
        match value.get(field) {
            Some(v) if !v.is_null() => self.node(v),
            _ => Ok(NodeIndex::NONE),
        }
    }

    fn list(&mut self, value: &Value, field: &'static str) -> EstreeResult<NodeList> {
        let Some(items) = value.get(field).and_then(Value::as_array) else {
            return Ok(NodeList::new());
        };
        items
            .iter()
            .map(|item| {
                if item.is_null() {
                    Ok(NodeIndex::NONE)
                } else {
                    self.node(item)
                }
            })
            .collect()
    }

    fn node(&mut self, value: &Value) -> EstreeResult<NodeIndex> {
        if self.depth >= MAX_AST_DEPTH {
            return Err(EstreeError::TooDeep);
        }
        self.depth += 1;
        let result = self.node_inner(value);
        self.depth -= 1;
        result
    }

    fn node_inner(&mut self, value: &Value) -> EstreeResult<NodeIndex> {
        let Some(ty) = node_type(value) else {
            return Err(EstreeError::NotANode(value.to_string()));
        };
        let span = span_of(value);
        let flag = |name: &str| value.get(name).and_then(Value::as_bool).unwrap_or(false);
        let operator = || {
            value
                .get("operator")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let data = match ty {
            // Wrappers that carry no semantics of their own
            "ParenthesizedExpression" | "ChainExpression" => {
                return self.required(value, "expression");
            }
            "Identifier" => NodeData::Identifier {
                name: name_of(value).unwrap_or_default(),
            },
            "Literal" => NodeData::Literal(self.literal(value)?),
            "StringLiteral" | "DirectiveLiteral" => NodeData::Literal(LiteralValue::String(
                value
                    .get("value")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            )),
            "NumericLiteral" => NodeData::Literal(LiteralValue::Number(
                value.get("value").and_then(Value::as_f64).unwrap_or(0.0),
            )),
            "BooleanLiteral" => NodeData::Literal(LiteralValue::Boolean(flag("value"))),
            "NullLiteral" => NodeData::Literal(LiteralValue::Null),
            "RegExpLiteral" => NodeData::Literal(LiteralValue::RegExp {
                pattern: str_of(value, "pattern"),
                flags: str_of(value, "flags"),
            }),
            "TemplateLiteral" => {
                let quasis = value
                    .get("quasis")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .map(|q| {
                                let v = q.get("value");
                                v.and_then(|v| v.get("cooked"))
                                    .or_else(|| v.and_then(|v| v.get("raw")))
                                    .and_then(Value::as_str)
                                    .unwrap_or_default()
                                    .to_string()
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                NodeData::TemplateLiteral {
                    quasis,
                    expressions: self.list(value, "expressions")?,
                }
            }
            "ThisExpression" => NodeData::This,
            "Super" => NodeData::Super,
            "ArrayExpression" => NodeData::Array {
                elements: self.list(value, "elements")?,
            },
            "ArrayPattern" => NodeData::ArrayPattern {
                elements: self.list(value, "elements")?,
            },
            "ObjectExpression" => NodeData::Object {
                properties: self.list(value, "properties")?,
            },
            "ObjectPattern" => NodeData::ObjectPattern {
                properties: self.list(value, "properties")?,
            },
            "Property" | "ObjectProperty" => NodeData::Property {
                key: self.required(value, "key")?,
                value: self.required(value, "value")?,
                kind: match value.get("kind").and_then(Value::as_str) {
                    Some("get") => PropertyKind::Get,
                    Some("set") => PropertyKind::Set,
                    _ => PropertyKind::Init,
                },
                computed: flag("computed"),
                shorthand: flag("shorthand"),
                method: flag("method"),
            },
            "ObjectMethod" => {
                let key = self.required(value, "key")?;
                let func = self.function(value, FunctionKind::Expression, false)?;
                let func = self.arena.add(NodeData::Function(func), span);
                NodeData::Property {
                    key,
                    value: func,
                    kind: match value.get("kind").and_then(Value::as_str) {
                        Some("get") => PropertyKind::Get,
                        Some("set") => PropertyKind::Set,
                        _ => PropertyKind::Init,
                    },
                    computed: flag("computed"),
                    shorthand: false,
                    method: value.get("kind").and_then(Value::as_str) == Some("method"),
                }
            }
            "FunctionDeclaration" => {
                NodeData::Function(self.function(value, FunctionKind::Declaration, true)?)
            }
            "FunctionExpression" => {
                NodeData::Function(self.function(value, FunctionKind::Expression, true)?)
            }
            "ArrowFunctionExpression" => {
                NodeData::Function(self.function(value, FunctionKind::Arrow, true)?)
            }
            "ClassDeclaration" | "ClassExpression" => {
                let body = self.field(value, "body")?;
                NodeData::Class {
                    kind: if ty == "ClassDeclaration" {
                        ClassKind::Declaration
                    } else {
                        ClassKind::Expression
                    },
                    id: self.optional(value, "id")?,
                    super_class: self.optional(value, "superClass")?,
                    body: self.list(body, "body")?,
                }
            }
            "MethodDefinition" => NodeData::MethodDefinition {
                key: self.required(value, "key")?,
                value: self.required(value, "value")?,
                kind: method_kind(value),
                computed: flag("computed"),
                is_static: flag("static"),
            },
            "ClassMethod" => {
                let key = self.required(value, "key")?;
                let func = self.function(value, FunctionKind::Expression, false)?;
                let func = self.arena.add(NodeData::Function(func), span);
                NodeData::MethodDefinition {
                    key,
                    value: func,
                    kind: method_kind(value),
                    computed: flag("computed"),
                    is_static: flag("static"),
                }
            }
            "UnaryExpression" => NodeData::Unary {
                operator: operator(),
                argument: self.required(value, "argument")?,
            },
            "UpdateExpression" => NodeData::Update {
                operator: operator(),
                prefix: flag("prefix"),
                argument: self.required(value, "argument")?,
            },
            "BinaryExpression" => NodeData::Binary {
                operator: operator(),
                left: self.required(value, "left")?,
                right: self.required(value, "right")?,
            },
            "LogicalExpression" => NodeData::Logical {
                operator: operator(),
                left: self.required(value, "left")?,
                right: self.required(value, "right")?,
            },
            "AssignmentExpression" => NodeData::Assignment {
                operator: operator(),
                left: self.required(value, "left")?,
                right: self.required(value, "right")?,
            },
            "MemberExpression" | "OptionalMemberExpression" => NodeData::Member {
                object: self.required(value, "object")?,
                property: self.required(value, "property")?,
                computed: flag("computed"),
                optional: flag("optional"),
            },
            "CallExpression" | "OptionalCallExpression" => NodeData::Call {
                callee: self.required(value, "callee")?,
                arguments: self.list(value, "arguments")?,
                optional: flag("optional"),
            },
            "NewExpression" => NodeData::New {
                callee: self.required(value, "callee")?,
                arguments: self.list(value, "arguments")?,
            },
            "ConditionalExpression" => NodeData::Conditional {
                test: self.required(value, "test")?,
                consequent: self.required(value, "consequent")?,
                alternate: self.required(value, "alternate")?,
            },
            "SequenceExpression" => NodeData::Sequence {
                expressions: self.list(value, "expressions")?,
            },
            "AwaitExpression" => NodeData::Await {
                argument: self.required(value, "argument")?,
            },
            "YieldExpression" => NodeData::Yield {
                argument: self.optional(value, "argument")?,
                delegate: flag("delegate"),
            },
            "SpreadElement" => NodeData::Spread {
                argument: self.required(value, "argument")?,
            },
            "RestElement" => NodeData::RestElement {
                argument: self.required(value, "argument")?,
            },
            "AssignmentPattern" => NodeData::AssignmentPattern {
                left: self.required(value, "left")?,
                right: self.required(value, "right")?,
            },
            "ExpressionStatement" => NodeData::ExpressionStatement {
                expression: self.required(value, "expression")?,
            },
            "BlockStatement" => NodeData::Block {
                body: self.list(value, "body")?,
            },
            "EmptyStatement" => NodeData::Empty,
            "ReturnStatement" => NodeData::Return {
                argument: self.optional(value, "argument")?,
            },
            "IfStatement" => NodeData::If {
                test: self.required(value, "test")?,
                consequent: self.required(value, "consequent")?,
                alternate: self.optional(value, "alternate")?,
            },
            "ForStatement" => NodeData::For {
                init: self.optional(value, "init")?,
                test: self.optional(value, "test")?,
                update: self.optional(value, "update")?,
                body: self.required(value, "body")?,
            },
            "ForInStatement" => NodeData::ForIn {
                left: self.required(value, "left")?,
                right: self.required(value, "right")?,
                body: self.required(value, "body")?,
            },
            "ForOfStatement" => NodeData::ForOf {
                left: self.required(value, "left")?,
                right: self.required(value, "right")?,
                body: self.required(value, "body")?,
                is_await: flag("await"),
            },
            "WhileStatement" => NodeData::While {
                test: self.required(value, "test")?,
                body: self.required(value, "body")?,
            },
            "DoWhileStatement" => NodeData::DoWhile {
                body: self.required(value, "body")?,
                test: self.required(value, "test")?,
            },
            "TryStatement" => NodeData::Try {
                block: self.required(value, "block")?,
                handler: self.optional(value, "handler")?,
                finalizer: self.optional(value, "finalizer")?,
            },
            "CatchClause" => NodeData::CatchClause {
                param: self.optional(value, "param")?,
                body: self.required(value, "body")?,
            },
            "ThrowStatement" => NodeData::Throw {
                argument: self.required(value, "argument")?,
            },
            "BreakStatement" => NodeData::Break {
                label: value.get("label").and_then(name_of),
            },
            "ContinueStatement" => NodeData::Continue {
                label: value.get("label").and_then(name_of),
            },
            "LabeledStatement" => NodeData::Labeled {
                label: self.field(value, "label").map(|l| name_of(l).unwrap_or_default())?,
                body: self.required(value, "body")?,
            },
            "SwitchStatement" => NodeData::Switch {
                discriminant: self.required(value, "discriminant")?,
                cases: self.list(value, "cases")?,
            },
            "SwitchCase" => NodeData::SwitchCase {
                test: self.optional(value, "test")?,
                consequent: self.list(value, "consequent")?,
            },
            "VariableDeclaration" => NodeData::VariableDeclaration {
                kind: match value.get("kind").and_then(Value::as_str) {
                    Some("let") => VariableKind::Let,
                    Some("const") => VariableKind::Const,
                    _ => VariableKind::Var,
                },
                declarations: self.list(value, "declarations")?,
            },
            "VariableDeclarator" => NodeData::VariableDeclarator {
                id: self.required(value, "id")?,
                init: self.optional(value, "init")?,
            },
            "ImportDeclaration" => NodeData::ImportDeclaration {
                specifiers: self.list(value, "specifiers")?,
                source: self
                    .field(value, "source")
                    .map(|s| name_of(s).unwrap_or_default())?,
            },
            "ImportSpecifier" | "ImportDefaultSpecifier" | "ImportNamespaceSpecifier" => {
                NodeData::ImportSpecifier {
                    kind: match ty {
                        "ImportDefaultSpecifier" => ImportKind::Default,
                        "ImportNamespaceSpecifier" => ImportKind::Namespace,
                        _ => ImportKind::Named,
                    },
                    local: value.get("local").and_then(name_of).unwrap_or_default(),
                    imported: value.get("imported").and_then(name_of),
                }
            }
            "ExportNamedDeclaration" => NodeData::ExportNamed {
                declaration: self.optional(value, "declaration")?,
                specifiers: value
                    .get("specifiers")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|s| {
                                let local = s.get("local").and_then(name_of)?;
                                let exported =
                                    s.get("exported").and_then(name_of).unwrap_or(local.clone());
                                Some(ExportSpecifier { local, exported })
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                source: value.get("source").and_then(name_of),
            },
            "ExportDefaultDeclaration" => NodeData::ExportDefault {
                declaration: self.required(value, "declaration")?,
            },
            _ => NodeData::Opaque {
                node_type: ty.to_string(),
                raw: value.clone(),
            },
        };

        Ok(self.arena.add(data, span))
    }

    fn literal(&self, value: &Value) -> EstreeResult<LiteralValue> {
        if let Some(regex) = value.get("regex") {
            return Ok(LiteralValue::RegExp {
                pattern: str_of(regex, "pattern"),
                flags: str_of(regex, "flags"),
            });
        }
        match value.get("value") {
            None | Some(Value::Null) => Ok(LiteralValue::Null),
            Some(Value::Bool(b)) => Ok(LiteralValue::Boolean(*b)),
            Some(Value::Number(n)) => n.as_f64().map(LiteralValue::Number).ok_or_else(|| {
                EstreeError::InvalidValue {
                    node_type: "Literal".into(),
                }
            }),
            Some(Value::String(s)) => Ok(LiteralValue::String(s.clone())),
            Some(_) => Err(EstreeError::InvalidValue {
                node_type: "Literal".into(),
            }),
        }
    }

    /// Function payload. Babel methods carry params/body on the method node
    /// itself, so `has_id` is false for them.
    fn function(
        &mut self,
        value: &Value,
        kind: FunctionKind,
        has_id: bool,
    ) -> EstreeResult<FunctionData> {
        let flag = |name: &str| value.get(name).and_then(Value::as_bool).unwrap_or(false);
        let id = if has_id {
            self.optional(value, "id")?
        } else {
            NodeIndex::NONE
        };
        let params = self.list(value, "params")?;
        let body = self.required(value, "body")?;
        let expression_body = kind == FunctionKind::Arrow
            && self
                .arena
                .get(body)
                .is_some_and(|n| !matches!(n.data, NodeData::Block { .. }));
        Ok(FunctionData {
            kind,
            id,
            params,
            body,
            is_async: flag("async"),
            is_generator: flag("generator"),
            expression_body,
        })
    }
}

fn str_of(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn method_kind(value: &Value) -> MethodKind {
    match value.get("kind").and_then(Value::as_str) {
        Some("constructor") => MethodKind::Constructor,
        Some("get") => MethodKind::Get,
        Some("set") => MethodKind::Set,
        _ => MethodKind::Method,
    }
}

// =============================================================================
// Export
// =============================================================================

/// Write the subtree rooted at `idx` as ESTree JSON.
pub fn export_node(arena: &NodeArena, idx: NodeIndex) -> Value {
    let Some(node) = arena.get(idx) else {
        return Value::Null;
    };
    let n = |child: NodeIndex| export_node(arena, child);
    let list = |items: &NodeList| Value::Array(items.iter().map(n).collect());
    let ident = |name: &str| json!({ "type": "Identifier", "name": name });

    let mut out = match &node.data {
        NodeData::Program {
            body,
            comments,
            source_type,
        } => json!({
            "type": "Program",
            "sourceType": if *source_type == SourceType::Module { "module" } else { "script" },
            "body": list(body),
            "comments": comments.iter().map(|c| json!({
                "type": if c.is_block { "Block" } else { "Line" },
                "value": c.text,
                "start": c.start,
                "end": c.end,
            })).collect::<Vec<_>>(),
        }),
        NodeData::Identifier { name } => ident(name),
        NodeData::Literal(lit) => match lit {
            LiteralValue::Null => json!({ "type": "Literal", "value": null }),
            LiteralValue::Boolean(b) => json!({ "type": "Literal", "value": b }),
            LiteralValue::Number(num) => json!({ "type": "Literal", "value": num }),
            LiteralValue::String(s) => json!({ "type": "Literal", "value": s }),
            LiteralValue::RegExp { pattern, flags } => json!({
                "type": "Literal",
                "value": null,
                "regex": { "pattern": pattern, "flags": flags },
            }),
        },
        NodeData::TemplateLiteral {
            quasis,
            expressions,
        } => json!({
            "type": "TemplateLiteral",
            "quasis": quasis.iter().enumerate().map(|(i, q)| json!({
                "type": "TemplateElement",
                "value": { "raw": q, "cooked": q },
                "tail": i + 1 == quasis.len(),
            })).collect::<Vec<_>>(),
            "expressions": list(expressions),
        }),
        NodeData::This => json!({ "type": "ThisExpression" }),
        NodeData::Super => json!({ "type": "Super" }),
        NodeData::Array { elements } => {
            json!({ "type": "ArrayExpression", "elements": list(elements) })
        }
        NodeData::ArrayPattern { elements } => {
            json!({ "type": "ArrayPattern", "elements": list(elements) })
        }
        NodeData::Object { properties } => {
            json!({ "type": "ObjectExpression", "properties": list(properties) })
        }
        NodeData::ObjectPattern { properties } => {
            json!({ "type": "ObjectPattern", "properties": list(properties) })
        }
        NodeData::Property {
            key,
            value,
            kind,
            computed,
            shorthand,
            method,
        } => json!({
            "type": "Property",
            "key": n(*key),
            "value": n(*value),
            "kind": match kind {
                PropertyKind::Init => "init",
                PropertyKind::Get => "get",
                PropertyKind::Set => "set",
            },
            "computed": computed,
            "shorthand": shorthand,
            "method": method,
        }),
        NodeData::Function(func) => json!({
            "type": match func.kind {
                FunctionKind::Declaration => "FunctionDeclaration",
                FunctionKind::Expression => "FunctionExpression",
                FunctionKind::Arrow => "ArrowFunctionExpression",
            },
            "id": n(func.id),
            "params": list(&func.params),
            "body": n(func.body),
            "async": func.is_async,
            "generator": func.is_generator,
            "expression": func.expression_body,
        }),
        NodeData::Class {
            kind,
            id,
            super_class,
            body,
        } => json!({
            "type": if *kind == ClassKind::Declaration { "ClassDeclaration" } else { "ClassExpression" },
            "id": n(*id),
            "superClass": n(*super_class),
            "body": { "type": "ClassBody", "body": list(body) },
        }),
        NodeData::MethodDefinition {
            key,
            value,
            kind,
            computed,
            is_static,
        } => json!({
            "type": "MethodDefinition",
            "key": n(*key),
            "value": n(*value),
            "kind": match kind {
                MethodKind::Constructor => "constructor",
                MethodKind::Method => "method",
                MethodKind::Get => "get",
                MethodKind::Set => "set",
            },
            "computed": computed,
            "static": is_static,
        }),
        NodeData::Unary { operator, argument } => json!({
            "type": "UnaryExpression",
            "operator": operator,
            "prefix": true,
            "argument": n(*argument),
        }),
        NodeData::Update {
            operator,
            prefix,
            argument,
        } => json!({
            "type": "UpdateExpression",
            "operator": operator,
            "prefix": prefix,
            "argument": n(*argument),
        }),
        NodeData::Binary {
            operator,
            left,
            right,
        } => json!({ "type": "BinaryExpression", "operator": operator, "left": n(*left), "right": n(*right) }),
        NodeData::Logical {
            operator,
            left,
            right,
        } => json!({ "type": "LogicalExpression", "operator": operator, "left": n(*left), "right": n(*right) }),
        NodeData::Assignment {
            operator,
            left,
            right,
        } => json!({ "type": "AssignmentExpression", "operator": operator, "left": n(*left), "right": n(*right) }),
        NodeData::Member {
            object,
            property,
            computed,
            optional,
        } => json!({
            "type": "MemberExpression",
            "object": n(*object),
            "property": n(*property),
            "computed": computed,
            "optional": optional,
        }),
        NodeData::Call {
            callee,
            arguments,
            optional,
        } => json!({
            "type": "CallExpression",
            "callee": n(*callee),
            "arguments": list(arguments),
            "optional": optional,
        }),
        NodeData::New { callee, arguments } => json!({
            "type": "NewExpression",
            "callee": n(*callee),
            "arguments": list(arguments),
        }),
        NodeData::Conditional {
            test,
            consequent,
            alternate,
        } => json!({
            "type": "ConditionalExpression",
            "test": n(*test),
            "consequent": n(*consequent),
            "alternate": n(*alternate),
        }),
        NodeData::Sequence { expressions } => {
            json!({ "type": "SequenceExpression", "expressions": list(expressions) })
        }
        NodeData::Await { argument } => json!({ "type": "AwaitExpression", "argument": n(*argument) }),
        NodeData::Yield { argument, delegate } => json!({
            "type": "YieldExpression",
            "argument": n(*argument),
            "delegate": delegate,
        }),
        NodeData::Spread { argument } => json!({ "type": "SpreadElement", "argument": n(*argument) }),
        NodeData::RestElement { argument } => {
            json!({ "type": "RestElement", "argument": n(*argument) })
        }
        NodeData::AssignmentPattern { left, right } => {
            json!({ "type": "AssignmentPattern", "left": n(*left), "right": n(*right) })
        }
        NodeData::ExpressionStatement { expression } => {
            json!({ "type": "ExpressionStatement", "expression": n(*expression) })
        }
        NodeData::Block { body } => json!({ "type": "BlockStatement", "body": list(body) }),
        NodeData::Empty => json!({ "type": "EmptyStatement" }),
        NodeData::Return { argument } => json!({ "type": "ReturnStatement", "argument": n(*argument) }),
        NodeData::If {
            test,
            consequent,
            alternate,
        } => json!({
            "type": "IfStatement",
            "test": n(*test),
            "consequent": n(*consequent),
            "alternate": n(*alternate),
        }),
        NodeData::For {
            init,
            test,
            update,
            body,
        } => json!({
            "type": "ForStatement",
            "init": n(*init),
            "test": n(*test),
            "update": n(*update),
            "body": n(*body),
        }),
        NodeData::ForIn { left, right, body } => json!({
            "type": "ForInStatement",
            "left": n(*left),
            "right": n(*right),
            "body": n(*body),
        }),
        NodeData::ForOf {
            left,
            right,
            body,
            is_await,
        } => json!({
            "type": "ForOfStatement",
            "left": n(*left),
            "right": n(*right),
            "body": n(*body),
            "await": is_await,
        }),
        NodeData::While { test, body } => {
            json!({ "type": "WhileStatement", "test": n(*test), "body": n(*body) })
        }
        NodeData::DoWhile { body, test } => {
            json!({ "type": "DoWhileStatement", "body": n(*body), "test": n(*test) })
        }
        NodeData::Try {
            block,
            handler,
            finalizer,
        } => json!({
            "type": "TryStatement",
            "block": n(*block),
            "handler": n(*handler),
            "finalizer": n(*finalizer),
        }),
        NodeData::CatchClause { param, body } => {
            json!({ "type": "CatchClause", "param": n(*param), "body": n(*body) })
        }
        NodeData::Throw { argument } => json!({ "type": "ThrowStatement", "argument": n(*argument) }),
        NodeData::Break { label } => json!({
            "type": "BreakStatement",
            "label": label.as_deref().map(ident),
        }),
        NodeData::Continue { label } => json!({
            "type": "ContinueStatement",
            "label": label.as_deref().map(ident),
        }),
        NodeData::Labeled { label, body } => json!({
            "type": "LabeledStatement",
            "label": ident(label),
            "body": n(*body),
        }),
        NodeData::Switch {
            discriminant,
            cases,
        } => json!({
            "type": "SwitchStatement",
            "discriminant": n(*discriminant),
            "cases": list(cases),
        }),
        NodeData::SwitchCase { test, consequent } => json!({
            "type": "SwitchCase",
            "test": n(*test),
            "consequent": list(consequent),
        }),
        NodeData::VariableDeclaration { kind, declarations } => json!({
            "type": "VariableDeclaration",
            "kind": kind.as_str(),
            "declarations": list(declarations),
        }),
        NodeData::VariableDeclarator { id, init } => {
            json!({ "type": "VariableDeclarator", "id": n(*id), "init": n(*init) })
        }
        NodeData::ImportDeclaration { specifiers, source } => json!({
            "type": "ImportDeclaration",
            "specifiers": list(specifiers),
            "source": { "type": "Literal", "value": source },
        }),
        NodeData::ImportSpecifier {
            kind,
            local,
            imported,
        } => match kind {
            ImportKind::Default => json!({ "type": "ImportDefaultSpecifier", "local": ident(local) }),
            ImportKind::Namespace => {
                json!({ "type": "ImportNamespaceSpecifier", "local": ident(local) })
            }
            ImportKind::Named => json!({
                "type": "ImportSpecifier",
                "local": ident(local),
                "imported": ident(imported.as_deref().unwrap_or(local)),
            }),
        },
        NodeData::ExportNamed {
            declaration,
            specifiers,
            source,
        } => json!({
            "type": "ExportNamedDeclaration",
            "declaration": n(*declaration),
            "specifiers": specifiers.iter().map(|s| json!({
                "type": "ExportSpecifier",
                "local": ident(&s.local),
                "exported": ident(&s.exported),
            })).collect::<Vec<_>>(),
            "source": source.as_ref().map(|s| json!({ "type": "Literal", "value": s })),
        }),
        NodeData::ExportDefault { declaration } => json!({
            "type": "ExportDefaultDeclaration",
            "declaration": n(*declaration),
        }),
        NodeData::Opaque { raw, .. } => return raw.clone(),
    };

    if !node.span.is_synthetic() {
        if let Value::Object(map) = &mut out {
            insert_span(map, node.span);
        }
    }
    out
}

fn insert_span(map: &mut Map<String, Value>, span: Span) {
    map.insert("start".into(), json!(span.start));
    map.insert("end".into(), json!(span.end));
    map.insert(
        "loc".into(),
        json!({ "start": { "line": span.loc.line, "column": span.loc.column } }),
    );
}

#[cfg(test)]
#[path = "../tests/estree.rs"]
mod tests;
