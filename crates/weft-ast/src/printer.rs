//! Debug source printer.
//!
//! Renders an arena subtree as JavaScript-like text with four-space
//! indentation. Output is deterministic and only as faithful as tests and
//! trace logging need; the production printer lives outside this crate and
//! consumes [`crate::estree::export_node`] instead.

use crate::arena::NodeArena;
use crate::node::{
    FunctionData, FunctionKind, ImportKind, LiteralValue, MethodKind, NodeData, NodeIndex,
    NodeList, PropertyKind, SyntaxKind,
};
use crate::node_access::format_number;

/// Render `idx` as source text. Programs and statements render as statement
/// lists, everything else as an expression.
pub fn render(arena: &NodeArena, idx: NodeIndex) -> String {
    let mut printer = Printer { arena, indent: 0 };
    let Some(node) = arena.get(idx) else {
        return String::new();
    };
    match node.kind() {
        SyntaxKind::Program => match arena.statements(idx) {
            Some(body) => printer.statement_list(body.iter()),
            None => String::new(),
        },
        kind if is_statement(kind) => printer.statement(idx),
        _ => printer.expr(idx, 0),
    }
}

const fn is_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ExpressionStatement
            | SyntaxKind::BlockStatement
            | SyntaxKind::EmptyStatement
            | SyntaxKind::ReturnStatement
            | SyntaxKind::IfStatement
            | SyntaxKind::ForStatement
            | SyntaxKind::ForInStatement
            | SyntaxKind::ForOfStatement
            | SyntaxKind::WhileStatement
            | SyntaxKind::DoWhileStatement
            | SyntaxKind::TryStatement
            | SyntaxKind::ThrowStatement
            | SyntaxKind::BreakStatement
            | SyntaxKind::ContinueStatement
            | SyntaxKind::LabeledStatement
            | SyntaxKind::SwitchStatement
            | SyntaxKind::VariableDeclaration
            | SyntaxKind::ImportDeclaration
            | SyntaxKind::ExportNamedDeclaration
            | SyntaxKind::ExportDefaultDeclaration
            | SyntaxKind::ClassDeclaration
            | SyntaxKind::FunctionDeclaration
    )
}

// Precedence levels, loosest first.
const SEQUENCE: u8 = 1;
const ASSIGN: u8 = 2;
const CONDITIONAL: u8 = 3;
const UNARY: u8 = 15;
const POSTFIX: u8 = 16;
const CALL: u8 = 18;
const PRIMARY: u8 = 20;

fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "||" | "??" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => 10,
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

struct Printer<'a> {
    arena: &'a NodeArena,
    indent: usize,
}

impl Printer<'_> {
    fn pad(&self) -> String {
        "    ".repeat(self.indent)
    }

    fn data(&self, idx: NodeIndex) -> Option<&NodeData> {
        self.arena.data(idx)
    }

    fn precedence(&self, idx: NodeIndex) -> u8 {
        match self.data(idx) {
            Some(NodeData::Sequence { .. }) => SEQUENCE,
            Some(NodeData::Assignment { .. } | NodeData::Yield { .. }) => ASSIGN,
            Some(NodeData::Function(func)) if func.kind == FunctionKind::Arrow => ASSIGN,
            Some(NodeData::Conditional { .. }) => CONDITIONAL,
            Some(NodeData::Binary { operator, .. } | NodeData::Logical { operator, .. }) => {
                binary_precedence(operator)
            }
            Some(NodeData::Unary { .. } | NodeData::Await { .. }) => UNARY,
            Some(NodeData::Update { .. }) => POSTFIX,
            Some(NodeData::New { .. } | NodeData::Call { .. } | NodeData::Member { .. }) => CALL,
            _ => PRIMARY,
        }
    }

    /// True for expressions that cannot start a statement or a call target
    /// without parentheses.
    fn needs_head_parens(&self, idx: NodeIndex) -> bool {
        match self.data(idx) {
            Some(NodeData::Function(func)) => func.kind != FunctionKind::Arrow,
            Some(NodeData::Object { .. } | NodeData::Class { .. }) => true,
            _ => false,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn statement_list(&mut self, items: impl Iterator<Item = NodeIndex>) -> String {
        let pad = self.pad();
        items
            .map(|stmt| format!("{pad}{}", self.statement(stmt)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block(&mut self, body: &NodeList) -> String {
        if body.is_empty() {
            return "{}".to_string();
        }
        self.indent += 1;
        let inner = self.statement_list(body.iter());
        self.indent -= 1;
        format!("{{\n{inner}\n{}}}", self.pad())
    }

    /// A statement in a nested position (loop or `if` body).
    fn body(&mut self, idx: NodeIndex) -> String {
        self.statement(idx)
    }

    fn statement(&mut self, idx: NodeIndex) -> String {
        let arena = self.arena;
        let Some(data) = arena.data(idx) else {
            return String::new();
        };
        match data {
            NodeData::ExpressionStatement { expression } => {
                let text = self.expr(*expression, 0);
                if self.needs_head_parens(*expression) {
                    format!("({text});")
                } else {
                    format!("{text};")
                }
            }
            NodeData::Block { body } => self.block(body),
            NodeData::Empty => ";".to_string(),
            NodeData::Return { argument } if argument.is_none() => "return;".to_string(),
            NodeData::Return { argument } => format!("return {};", self.expr(*argument, 0)),
            NodeData::Throw { argument } => format!("throw {};", self.expr(*argument, 0)),
            NodeData::If {
                test,
                consequent,
                alternate,
            } => {
                let mut out = format!("if ({}) {}", self.expr(*test, 0), self.body(*consequent));
                if alternate.is_some() {
                    out.push_str(" else ");
                    out.push_str(&self.body(*alternate));
                }
                out
            }
            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                let init = self.for_head(*init);
                let test = if test.is_some() {
                    format!(" {}", self.expr(*test, 0))
                } else {
                    String::new()
                };
                let update = if update.is_some() {
                    format!(" {}", self.expr(*update, 0))
                } else {
                    String::new()
                };
                format!("for ({init};{test};{update}) {}", self.body(*body))
            }
            NodeData::ForIn { left, right, body } => format!(
                "for ({} in {}) {}",
                self.for_head(*left),
                self.expr(*right, 0),
                self.body(*body)
            ),
            NodeData::ForOf {
                left,
                right,
                body,
                is_await,
            } => format!(
                "for{} ({} of {}) {}",
                if *is_await { " await" } else { "" },
                self.for_head(*left),
                self.expr(*right, ASSIGN),
                self.body(*body)
            ),
            NodeData::While { test, body } => {
                format!("while ({}) {}", self.expr(*test, 0), self.body(*body))
            }
            NodeData::DoWhile { body, test } => {
                format!("do {} while ({});", self.body(*body), self.expr(*test, 0))
            }
            NodeData::Try {
                block,
                handler,
                finalizer,
            } => {
                let mut out = format!("try {}", self.statement(*block));
                if let Some(NodeData::CatchClause { param, body }) = arena.data(*handler) {
                    if param.is_some() {
                        out.push_str(&format!(" catch ({})", self.expr(*param, 0)));
                    } else {
                        out.push_str(" catch");
                    }
                    out.push(' ');
                    out.push_str(&self.statement(*body));
                }
                if finalizer.is_some() {
                    out.push_str(" finally ");
                    out.push_str(&self.statement(*finalizer));
                }
                out
            }
            NodeData::Break { label } => match label {
                Some(label) => format!("break {label};"),
                None => "break;".to_string(),
            },
            NodeData::Continue { label } => match label {
                Some(label) => format!("continue {label};"),
                None => "continue;".to_string(),
            },
            NodeData::Labeled { label, body } => format!("{label}: {}", self.body(*body)),
            NodeData::Switch {
                discriminant,
                cases,
            } => {
                let head = format!("switch ({}) {{", self.expr(*discriminant, 0));
                self.indent += 1;
                let mut lines = vec![head];
                for case in cases.iter() {
                    let Some(NodeData::SwitchCase { test, consequent }) = arena.data(case) else {
                        continue;
                    };
                    let label = if test.is_some() {
                        format!("case {}:", self.expr(*test, 0))
                    } else {
                        "default:".to_string()
                    };
                    lines.push(format!("{}{label}", self.pad()));
                    self.indent += 1;
                    if !consequent.is_empty() {
                        lines.push(self.statement_list(consequent.iter()));
                    }
                    self.indent -= 1;
                }
                self.indent -= 1;
                lines.push(format!("{}}}", self.pad()));
                lines.join("\n")
            }
            NodeData::VariableDeclaration { .. } => format!("{};", self.declaration(idx)),
            NodeData::ImportDeclaration { specifiers, source } => {
                self.import(specifiers, source)
            }
            NodeData::ExportNamed {
                declaration,
                specifiers,
                source,
            } => {
                if declaration.is_some() {
                    return format!("export {}", self.statement(*declaration));
                }
                let names = specifiers
                    .iter()
                    .map(|s| {
                        if s.local == s.exported {
                            s.local.clone()
                        } else {
                            format!("{} as {}", s.local, s.exported)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                match source {
                    Some(source) => format!("export {{ {names} }} from {};", quote(source)),
                    None => format!("export {{ {names} }};"),
                }
            }
            NodeData::ExportDefault { declaration } => {
                let is_decl = arena.get(*declaration).is_some_and(|n| {
                    matches!(
                        n.kind(),
                        SyntaxKind::FunctionDeclaration | SyntaxKind::ClassDeclaration
                    )
                });
                if is_decl {
                    format!("export default {}", self.statement(*declaration))
                } else {
                    format!("export default {};", self.expr(*declaration, ASSIGN))
                }
            }
            _ => self.expr(idx, 0),
        }
    }

    fn for_head(&mut self, idx: NodeIndex) -> String {
        match self.data(idx) {
            None => String::new(),
            Some(NodeData::VariableDeclaration { .. }) => self.declaration(idx),
            Some(_) => self.expr(idx, 0),
        }
    }

    /// Variable declaration without the trailing semicolon.
    fn declaration(&mut self, idx: NodeIndex) -> String {
        let arena = self.arena;
        let Some(NodeData::VariableDeclaration { kind, declarations }) = arena.data(idx) else {
            return String::new();
        };
        let items = declarations
            .iter()
            .map(|decl| match arena.data(decl) {
                Some(NodeData::VariableDeclarator { id, init }) if init.is_some() => {
                    format!("{} = {}", self.expr(*id, 0), self.expr(*init, ASSIGN))
                }
                Some(NodeData::VariableDeclarator { id, .. }) => self.expr(*id, 0),
                _ => String::new(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {items}", kind.as_str())
    }

    fn import(&mut self, specifiers: &NodeList, source: &str) -> String {
        let mut parts = Vec::new();
        let mut named = Vec::new();
        for spec in specifiers.iter() {
            let Some(NodeData::ImportSpecifier {
                kind,
                local,
                imported,
            }) = self.data(spec)
            else {
                continue;
            };
            match kind {
                ImportKind::Default => parts.push(local.clone()),
                ImportKind::Namespace => parts.push(format!("* as {local}")),
                ImportKind::Named => match imported {
                    Some(imported) if imported != local => {
                        named.push(format!("{imported} as {local}"));
                    }
                    _ => named.push(local.clone()),
                },
            }
        }
        if !named.is_empty() {
            parts.push(format!("{{ {} }}", named.join(", ")));
        }
        if parts.is_empty() {
            format!("import {};", quote(source))
        } else {
            format!("import {} from {};", parts.join(", "), quote(source))
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn list(&mut self, items: &NodeList) -> String {
        items
            .iter()
            .map(|item| {
                if item.is_none() {
                    String::new()
                } else {
                    self.expr(item, ASSIGN)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render an expression, parenthesized when looser than `min`.
    fn expr(&mut self, idx: NodeIndex, min: u8) -> String {
        let text = self.expr_inner(idx);
        if self.precedence(idx) < min {
            format!("({text})")
        } else {
            text
        }
    }

    /// Callee or member object: call-level precedence plus head parens.
    fn head(&mut self, idx: NodeIndex) -> String {
        if self.needs_head_parens(idx) {
            format!("({})", self.expr_inner(idx))
        } else {
            self.expr(idx, CALL)
        }
    }

    fn expr_inner(&mut self, idx: NodeIndex) -> String {
        let arena = self.arena;
        let Some(data) = arena.data(idx) else {
            return String::new();
        };
        match data {
            NodeData::Identifier { name } => name.clone(),
            NodeData::Literal(lit) => match lit {
                LiteralValue::Null => "null".to_string(),
                LiteralValue::Boolean(b) => b.to_string(),
                LiteralValue::Number(n) => format_number(*n),
                LiteralValue::String(s) => quote(s),
                LiteralValue::RegExp { pattern, flags } => format!("/{pattern}/{flags}"),
            },
            NodeData::TemplateLiteral {
                quasis,
                expressions,
            } => {
                let mut out = String::from("`");
                for (i, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = expressions.get(i) {
                        out.push_str(&format!("${{{}}}", self.expr(expr, 0)));
                    }
                }
                out.push('`');
                out
            }
            NodeData::This => "this".to_string(),
            NodeData::Super => "super".to_string(),
            NodeData::Array { elements } | NodeData::ArrayPattern { elements } => {
                let mut text = self.list(elements);
                if elements.iter().last().is_some_and(NodeIndex::is_none) {
                    text.push(',');
                }
                format!("[{text}]")
            }
            NodeData::Object { properties } | NodeData::ObjectPattern { properties } => {
                if properties.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", self.list(properties))
                }
            }
            NodeData::Property {
                key,
                value,
                kind,
                computed,
                shorthand,
                method,
            } => {
                let key_text = self.key(*key, *computed);
                match kind {
                    PropertyKind::Get => format!("get {key_text}{}", self.method_tail(*value)),
                    PropertyKind::Set => format!("set {key_text}{}", self.method_tail(*value)),
                    PropertyKind::Init if *method => {
                        format!("{}{key_text}{}", self.method_prefix(*value), self.method_tail(*value))
                    }
                    PropertyKind::Init if *shorthand => self.expr(*value, ASSIGN),
                    PropertyKind::Init => format!("{key_text}: {}", self.expr(*value, ASSIGN)),
                }
            }
            NodeData::Function(func) => self.function(func),
            NodeData::Class {
                id,
                super_class,
                body,
                ..
            } => {
                let mut out = String::from("class");
                if id.is_some() {
                    out.push(' ');
                    out.push_str(&self.expr(*id, 0));
                }
                if super_class.is_some() {
                    out.push_str(" extends ");
                    out.push_str(&self.head(*super_class));
                }
                out.push(' ');
                out.push_str(&self.block(body));
                out
            }
            NodeData::MethodDefinition {
                key,
                value,
                kind,
                computed,
                is_static,
            } => {
                let prefix = match kind {
                    MethodKind::Get => "get ",
                    MethodKind::Set => "set ",
                    MethodKind::Constructor | MethodKind::Method => "",
                };
                format!(
                    "{}{}{prefix}{}{}",
                    if *is_static { "static " } else { "" },
                    self.method_prefix(*value),
                    self.key(*key, *computed),
                    self.method_tail(*value)
                )
            }
            NodeData::Unary { operator, argument } => {
                let arg = self.expr(*argument, UNARY);
                if operator.chars().all(char::is_alphabetic) {
                    format!("{operator} {arg}")
                } else {
                    format!("{operator}{arg}")
                }
            }
            NodeData::Update {
                operator,
                prefix,
                argument,
            } => {
                let arg = self.expr(*argument, POSTFIX);
                if *prefix {
                    format!("{operator}{arg}")
                } else {
                    format!("{arg}{operator}")
                }
            }
            NodeData::Binary {
                operator,
                left,
                right,
            }
            | NodeData::Logical {
                operator,
                left,
                right,
            } => {
                let prec = binary_precedence(operator);
                format!(
                    "{} {operator} {}",
                    self.expr(*left, prec),
                    self.expr(*right, prec + 1)
                )
            }
            NodeData::Assignment {
                operator,
                left,
                right,
            } => format!(
                "{} {operator} {}",
                self.expr(*left, CONDITIONAL),
                self.expr(*right, ASSIGN)
            ),
            NodeData::Member {
                object,
                property,
                computed,
                optional,
            } => {
                let object = self.head(*object);
                let dot = if *optional { "?." } else { "." };
                if *computed {
                    let open = if *optional { "?.[" } else { "[" };
                    format!("{object}{open}{}]", self.expr(*property, 0))
                } else {
                    format!("{object}{dot}{}", self.expr(*property, 0))
                }
            }
            NodeData::Call {
                callee,
                arguments,
                optional,
            } => {
                let callee = self.head(*callee);
                let open = if *optional { "?.(" } else { "(" };
                format!("{callee}{open}{})", self.list(arguments))
            }
            NodeData::New { callee, arguments } => {
                let callee = if matches!(arena.data(*callee), Some(NodeData::Call { .. })) {
                    format!("({})", self.expr(*callee, 0))
                } else {
                    self.head(*callee)
                };
                format!("new {callee}({})", self.list(arguments))
            }
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            } => format!(
                "{} ? {} : {}",
                self.expr(*test, CONDITIONAL + 1),
                self.expr(*consequent, ASSIGN),
                self.expr(*alternate, ASSIGN)
            ),
            NodeData::Sequence { expressions } => expressions
                .iter()
                .map(|e| self.expr(e, ASSIGN))
                .collect::<Vec<_>>()
                .join(", "),
            NodeData::Await { argument } => format!("await {}", self.expr(*argument, UNARY)),
            NodeData::Yield { argument, delegate } => {
                let star = if *delegate { "*" } else { "" };
                if argument.is_some() {
                    format!("yield{star} {}", self.expr(*argument, ASSIGN))
                } else {
                    format!("yield{star}")
                }
            }
            NodeData::Spread { argument } | NodeData::RestElement { argument } => {
                format!("...{}", self.expr(*argument, ASSIGN))
            }
            NodeData::AssignmentPattern { left, right } => {
                format!("{} = {}", self.expr(*left, 0), self.expr(*right, ASSIGN))
            }
            NodeData::Opaque { node_type, .. } => format!("/* {node_type} */"),
            // Statements reached through expression slots (function bodies
            // handled separately)
            _ => self.statement(idx),
        }
    }

    fn key(&mut self, key: NodeIndex, computed: bool) -> String {
        if computed {
            format!("[{}]", self.expr(key, ASSIGN))
        } else {
            self.expr(key, 0)
        }
    }

    fn params(&mut self, params: &NodeList) -> String {
        self.list(params)
    }

    fn function_body(&mut self, func: &FunctionData) -> String {
        match self.arena.data(func.body) {
            Some(NodeData::Block { body }) => self.block(body),
            _ => String::new(),
        }
    }

    fn method_prefix(&self, value: NodeIndex) -> &'static str {
        match self.arena.get_function(value) {
            Some(func) if func.is_async && func.is_generator => "async *",
            Some(func) if func.is_async => "async ",
            Some(func) if func.is_generator => "*",
            _ => "",
        }
    }

    /// `(params) { body }` of a method's function value.
    fn method_tail(&mut self, value: NodeIndex) -> String {
        let arena = self.arena;
        let Some(func) = arena.get_function(value) else {
            return String::new();
        };
        format!("({}) {}", self.params(&func.params), self.function_body(func))
    }

    fn function(&mut self, func: &FunctionData) -> String {
        let params = self.params(&func.params);
        let asyncness = if func.is_async { "async " } else { "" };

        if func.kind == FunctionKind::Arrow {
            let body = if func.expression_body {
                let text = self.expr(func.body, ASSIGN);
                if matches!(self.data(func.body), Some(NodeData::Object { .. })) {
                    format!("({text})")
                } else {
                    text
                }
            } else {
                self.function_body(func)
            };
            return format!("{asyncness}({params}) => {body}");
        }

        let star = if func.is_generator { "*" } else { "" };
        let name = self.arena.identifier_name(func.id).unwrap_or_default();
        format!(
            "{asyncness}function{star} {name}({params}) {}",
            self.function_body(func)
        )
    }
}

#[cfg(test)]
#[path = "../tests/printer.rs"]
mod tests;
