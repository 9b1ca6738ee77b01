//! Typed accessors and child enumeration for [`NodeArena`].

use crate::arena::NodeArena;
use crate::node::{FunctionData, LiteralValue, NodeData, NodeIndex, NodeList};

impl NodeArena {
    #[inline]
    pub fn data(&self, idx: NodeIndex) -> Option<&NodeData> {
        self.get(idx).map(|n| &n.data)
    }

    #[inline]
    pub fn data_mut(&mut self, idx: NodeIndex) -> Option<&mut NodeData> {
        self.get_mut(idx).map(|n| &mut n.data)
    }

    /// Name of an identifier node.
    pub fn identifier_name(&self, idx: NodeIndex) -> Option<&str> {
        match self.data(idx)? {
            NodeData::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_identifier_named(&self, idx: NodeIndex, expected: &str) -> bool {
        self.identifier_name(idx) == Some(expected)
    }

    pub fn string_literal(&self, idx: NodeIndex) -> Option<&str> {
        match self.data(idx)? {
            NodeData::Literal(LiteralValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_function(&self, idx: NodeIndex) -> Option<&FunctionData> {
        match self.data(idx)? {
            NodeData::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn get_function_mut(&mut self, idx: NodeIndex) -> Option<&mut FunctionData> {
        match self.data_mut(idx)? {
            NodeData::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Name of a function node's own identifier.
    pub fn function_name(&self, idx: NodeIndex) -> Option<&str> {
        self.identifier_name(self.get_function(idx)?.id)
    }

    /// Statement list of a program or block.
    pub fn statements(&self, idx: NodeIndex) -> Option<&NodeList> {
        match self.data(idx)? {
            NodeData::Program { body, .. } | NodeData::Block { body } => Some(body),
            _ => None,
        }
    }

    pub fn set_statements(&mut self, idx: NodeIndex, statements: NodeList) {
        match self.data_mut(idx) {
            Some(NodeData::Program { body, .. } | NodeData::Block { body }) => *body = statements,
            _ => {}
        }
    }

    /// Static name of a property key: identifier, string or number literal.
    pub fn property_key_name(&self, key: NodeIndex, computed: bool) -> Option<String> {
        match self.data(key)? {
            NodeData::Identifier { name } if !computed => Some(name.clone()),
            NodeData::Literal(LiteralValue::String(s)) => Some(s.clone()),
            NodeData::Literal(LiteralValue::Number(n)) => Some(format_number(*n)),
            _ => None,
        }
    }

    /// Direct children of `idx` in source evaluation order.
    ///
    /// Non-computed member properties and property keys are included; callers
    /// that treat identifiers as references must skip them themselves.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let Some(data) = self.data(idx) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut push = |child: NodeIndex| {
            if child.is_some() {
                out.push(child);
            }
        };

        match data {
            NodeData::Program { body, .. } | NodeData::Block { body } => body.iter().for_each(push),
            NodeData::TemplateLiteral { expressions, .. } => expressions.iter().for_each(push),
            NodeData::Array { elements } | NodeData::ArrayPattern { elements } => {
                elements.iter().for_each(push);
            }
            NodeData::Object { properties } | NodeData::ObjectPattern { properties } => {
                properties.iter().for_each(push);
            }
            NodeData::Property { key, value, .. } => {
                push(*key);
                push(*value);
            }
            NodeData::Function(func) => {
                push(func.id);
                func.params.iter().for_each(&mut push);
                push(func.body);
            }
            NodeData::Class {
                id,
                super_class,
                body,
                ..
            } => {
                push(*id);
                push(*super_class);
                body.iter().for_each(push);
            }
            NodeData::MethodDefinition { key, value, .. } => {
                push(*key);
                push(*value);
            }
            NodeData::Unary { argument, .. }
            | NodeData::Update { argument, .. }
            | NodeData::Await { argument }
            | NodeData::Yield { argument, .. }
            | NodeData::Spread { argument }
            | NodeData::Return { argument }
            | NodeData::Throw { argument }
            | NodeData::RestElement { argument } => push(*argument),
            NodeData::Binary { left, right, .. }
            | NodeData::Logical { left, right, .. }
            | NodeData::Assignment { left, right, .. }
            | NodeData::AssignmentPattern { left, right } => {
                push(*left);
                push(*right);
            }
            NodeData::Member {
                object, property, ..
            } => {
                push(*object);
                push(*property);
            }
            NodeData::Call {
                callee, arguments, ..
            }
            | NodeData::New { callee, arguments } => {
                push(*callee);
                arguments.iter().for_each(push);
            }
            NodeData::Conditional {
                test,
                consequent,
                alternate,
            }
            | NodeData::If {
                test,
                consequent,
                alternate,
            } => {
                push(*test);
                push(*consequent);
                push(*alternate);
            }
            NodeData::Sequence { expressions } => expressions.iter().for_each(push),
            NodeData::ExpressionStatement { expression } => push(*expression),
            NodeData::For {
                init,
                test,
                update,
                body,
            } => {
                push(*init);
                push(*test);
                push(*update);
                push(*body);
            }
            NodeData::ForIn { left, right, body } | NodeData::ForOf { left, right, body, .. } => {
                push(*left);
                push(*right);
                push(*body);
            }
            NodeData::While { test, body } => {
                push(*test);
                push(*body);
            }
            NodeData::DoWhile { body, test } => {
                push(*body);
                push(*test);
            }
            NodeData::Try {
                block,
                handler,
                finalizer,
            } => {
                push(*block);
                push(*handler);
                push(*finalizer);
            }
            NodeData::CatchClause { param, body } => {
                push(*param);
                push(*body);
            }
            NodeData::Labeled { body, .. } => push(*body),
            NodeData::Switch {
                discriminant,
                cases,
            } => {
                push(*discriminant);
                cases.iter().for_each(push);
            }
            NodeData::SwitchCase { test, consequent } => {
                push(*test);
                consequent.iter().for_each(push);
            }
            NodeData::VariableDeclaration { declarations, .. } => {
                declarations.iter().for_each(push);
            }
            NodeData::VariableDeclarator { id, init } => {
                push(*id);
                push(*init);
            }
            NodeData::ImportDeclaration { specifiers, .. } => specifiers.iter().for_each(push),
            NodeData::ExportNamed { declaration, .. }
            | NodeData::ExportDefault { declaration } => push(*declaration),
            NodeData::Identifier { .. }
            | NodeData::Literal(_)
            | NodeData::This
            | NodeData::Super
            | NodeData::Empty
            | NodeData::Break { .. }
            | NodeData::Continue { .. }
            | NodeData::ImportSpecifier { .. }
            | NodeData::Opaque { .. } => {}
        }

        out
    }
}

/// Render a number the way JavaScript's `String(n)` does for common values.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
