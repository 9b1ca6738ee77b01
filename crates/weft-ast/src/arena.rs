//! NodeArena storage and builder methods.
//!
//! The arena is append-only: rewriting a node either replaces its payload in
//! place ([`NodeArena::set_data`]) or allocates a new node and re-points the
//! parent at it. Replaced nodes simply become unreachable.

use crate::node::{
    FunctionData, FunctionKind, LiteralValue, Node, NodeData, NodeIndex, NodeList, VariableKind,
};
use weft_common::Span;

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity.min(Self::MAX_NODE_PREALLOC)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node and return its index.
    pub fn add(&mut self, data: NodeData, span: Span) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node::new(data, span));
        idx
    }

    /// Allocate a node with no source position.
    pub fn add_synthetic(&mut self, data: NodeData) -> NodeIndex {
        self.add(data, Span::SYNTHETIC)
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get_mut(idx.0 as usize)
    }

    /// Replace the payload of `idx`, keeping its span.
    pub fn set_data(&mut self, idx: NodeIndex, data: NodeData) {
        if let Some(node) = self.get_mut(idx) {
            node.data = data;
        }
    }

    pub fn set_span(&mut self, idx: NodeIndex, span: Span) {
        if let Some(node) = self.get_mut(idx) {
            node.span = span;
        }
    }

    /// Span of `idx`, or [`Span::SYNTHETIC`] for missing nodes.
    pub fn span(&self, idx: NodeIndex) -> Span {
        self.get(idx).map_or(Span::SYNTHETIC, |n| n.span)
    }

    // =========================================================================
    // Builders (synthetic span)
    // =========================================================================

    pub fn identifier(&mut self, name: impl Into<String>) -> NodeIndex {
        self.add_synthetic(NodeData::Identifier { name: name.into() })
    }

    pub fn string(&mut self, value: impl Into<String>) -> NodeIndex {
        self.add_synthetic(NodeData::Literal(LiteralValue::String(value.into())))
    }

    pub fn number(&mut self, value: f64) -> NodeIndex {
        self.add_synthetic(NodeData::Literal(LiteralValue::Number(value)))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.add_synthetic(NodeData::Literal(LiteralValue::Boolean(value)))
    }

    pub fn null(&mut self) -> NodeIndex {
        self.add_synthetic(NodeData::Literal(LiteralValue::Null))
    }

    pub fn this(&mut self) -> NodeIndex {
        self.add_synthetic(NodeData::This)
    }

    pub fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Call {
            callee,
            arguments: arguments.into(),
            optional: false,
        })
    }

    pub fn new_expr(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::New {
            callee,
            arguments: arguments.into(),
        })
    }

    /// `object.name`
    pub fn member(&mut self, object: NodeIndex, name: impl Into<String>) -> NodeIndex {
        let property = self.identifier(name);
        self.add_synthetic(NodeData::Member {
            object,
            property,
            computed: false,
            optional: false,
        })
    }

    /// `object[property]`
    pub fn computed_member(&mut self, object: NodeIndex, property: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Member {
            object,
            property,
            computed: true,
            optional: false,
        })
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Array {
            elements: elements.into(),
        })
    }

    pub fn unary(&mut self, operator: impl Into<String>, argument: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Unary {
            operator: operator.into(),
            argument,
        })
    }

    pub fn binary(
        &mut self,
        left: NodeIndex,
        operator: impl Into<String>,
        right: NodeIndex,
    ) -> NodeIndex {
        self.add_synthetic(NodeData::Binary {
            operator: operator.into(),
            left,
            right,
        })
    }

    pub fn await_expr(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Await { argument })
    }

    pub fn yield_expr(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Yield {
            argument,
            delegate: false,
        })
    }

    pub fn spread(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Spread { argument })
    }

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::ExpressionStatement { expression })
    }

    pub fn block(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Block { body: body.into() })
    }

    pub fn ret(&mut self, argument: Option<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Return {
            argument: argument.unwrap_or(NodeIndex::NONE),
        })
    }

    pub fn throw(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Throw { argument })
    }

    pub fn if_stmt(
        &mut self,
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: Option<NodeIndex>,
    ) -> NodeIndex {
        self.add_synthetic(NodeData::If {
            test,
            consequent,
            alternate: alternate.unwrap_or(NodeIndex::NONE),
        })
    }

    /// `<kind> name = init;` with a single declarator
    pub fn var_decl(
        &mut self,
        kind: VariableKind,
        name: impl Into<String>,
        init: Option<NodeIndex>,
    ) -> NodeIndex {
        let id = self.identifier(name);
        let declarator = self.add_synthetic(NodeData::VariableDeclarator {
            id,
            init: init.unwrap_or(NodeIndex::NONE),
        });
        self.add_synthetic(NodeData::VariableDeclaration {
            kind,
            declarations: NodeList::from(vec![declarator]),
        })
    }

    /// `function name(params) { body }`
    pub fn function_expr(
        &mut self,
        name: Option<&str>,
        params: Vec<NodeIndex>,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let id = name.map_or(NodeIndex::NONE, |n| self.identifier(n));
        let body = self.block(body);
        self.add_synthetic(NodeData::Function(FunctionData {
            kind: FunctionKind::Expression,
            id,
            params: params.into(),
            body,
            is_async: false,
            is_generator: false,
            expression_body: false,
        }))
    }

    /// `function name(params) { body }` as a statement
    pub fn function_decl(
        &mut self,
        name: &str,
        params: Vec<NodeIndex>,
        body: Vec<NodeIndex>,
    ) -> NodeIndex {
        let idx = self.function_expr(Some(name), params, body);
        if let Some(NodeData::Function(func)) = self.get_mut(idx).map(|n| &mut n.data) {
            func.kind = FunctionKind::Declaration;
        }
        idx
    }

    pub fn program(&mut self, body: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Program {
            body: body.into(),
            comments: Vec::new(),
            source_type: Default::default(),
        })
    }
}

#[cfg(test)]
#[path = "../tests/arena.rs"]
mod tests;
