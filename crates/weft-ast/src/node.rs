//! Node payloads.
//!
//! One [`NodeData`] variant per ESTree construct the transform understands.
//! Children are referenced by [`NodeIndex`] into the owning arena; optional
//! children use [`NodeIndex::NONE`]. Anything else the parser produces is kept
//! verbatim as [`NodeData::Opaque`] and never traversed.

use weft_common::{Comment, Span};

/// Index of a node in a [`crate::NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// Ordered list of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }

    pub fn push(&mut self, idx: NodeIndex) {
        self.nodes.push(idx);
    }

    pub fn get(&self, i: usize) -> Option<NodeIndex> {
        self.nodes.get(i).copied()
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<NodeIndex> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    RegExp { pattern: String, flags: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Declaration,
    Expression,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Default,
    Namespace,
    Named,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceType {
    #[default]
    Script,
    Module,
}

/// Function-like payload shared by declarations, expressions and arrows.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionData {
    pub kind: FunctionKind,
    /// Name identifier, `NONE` for anonymous functions and arrows
    pub id: NodeIndex,
    pub params: NodeList,
    /// Block statement, or an expression when `expression_body` is set
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
    pub expression_body: bool,
}

/// `export { local as exported }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    // =========================================================================
    // Program
    // =========================================================================
    Program {
        body: NodeList,
        comments: Vec<Comment>,
        source_type: SourceType,
    },

    // =========================================================================
    // Expressions
    // =========================================================================
    Identifier {
        name: String,
    },
    Literal(LiteralValue),
    /// `quasis` holds the cooked text of each template chunk
    TemplateLiteral {
        quasis: Vec<String>,
        expressions: NodeList,
    },
    This,
    Super,
    /// `NONE` entries are holes: `[a, , b]`
    Array {
        elements: NodeList,
    },
    Object {
        properties: NodeList,
    },
    Property {
        key: NodeIndex,
        value: NodeIndex,
        kind: PropertyKind,
        computed: bool,
        shorthand: bool,
        method: bool,
    },
    Function(FunctionData),
    Class {
        kind: ClassKind,
        id: NodeIndex,
        super_class: NodeIndex,
        body: NodeList,
    },
    MethodDefinition {
        key: NodeIndex,
        /// Always a function expression
        value: NodeIndex,
        kind: MethodKind,
        computed: bool,
        is_static: bool,
    },
    Unary {
        operator: String,
        argument: NodeIndex,
    },
    Update {
        operator: String,
        prefix: bool,
        argument: NodeIndex,
    },
    Binary {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    Logical {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    Assignment {
        operator: String,
        left: NodeIndex,
        right: NodeIndex,
    },
    Member {
        object: NodeIndex,
        property: NodeIndex,
        computed: bool,
        optional: bool,
    },
    Call {
        callee: NodeIndex,
        arguments: NodeList,
        optional: bool,
    },
    New {
        callee: NodeIndex,
        arguments: NodeList,
    },
    Conditional {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    Sequence {
        expressions: NodeList,
    },
    Await {
        argument: NodeIndex,
    },
    Yield {
        argument: NodeIndex,
        delegate: bool,
    },
    Spread {
        argument: NodeIndex,
    },

    // =========================================================================
    // Statements
    // =========================================================================
    ExpressionStatement {
        expression: NodeIndex,
    },
    Block {
        body: NodeList,
    },
    Empty,
    Return {
        argument: NodeIndex,
    },
    If {
        test: NodeIndex,
        consequent: NodeIndex,
        alternate: NodeIndex,
    },
    For {
        init: NodeIndex,
        test: NodeIndex,
        update: NodeIndex,
        body: NodeIndex,
    },
    ForIn {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
    },
    ForOf {
        left: NodeIndex,
        right: NodeIndex,
        body: NodeIndex,
        is_await: bool,
    },
    While {
        test: NodeIndex,
        body: NodeIndex,
    },
    DoWhile {
        body: NodeIndex,
        test: NodeIndex,
    },
    Try {
        block: NodeIndex,
        handler: NodeIndex,
        finalizer: NodeIndex,
    },
    CatchClause {
        param: NodeIndex,
        body: NodeIndex,
    },
    Throw {
        argument: NodeIndex,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Labeled {
        label: String,
        body: NodeIndex,
    },
    Switch {
        discriminant: NodeIndex,
        cases: NodeList,
    },
    /// `test` is `NONE` for `default:`
    SwitchCase {
        test: NodeIndex,
        consequent: NodeList,
    },

    // =========================================================================
    // Declarations
    // =========================================================================
    VariableDeclaration {
        kind: VariableKind,
        declarations: NodeList,
    },
    VariableDeclarator {
        id: NodeIndex,
        init: NodeIndex,
    },
    ImportDeclaration {
        specifiers: NodeList,
        source: String,
    },
    ImportSpecifier {
        kind: ImportKind,
        local: String,
        /// Only set for named imports
        imported: Option<String>,
    },
    ExportNamed {
        declaration: NodeIndex,
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },
    ExportDefault {
        declaration: NodeIndex,
    },

    // =========================================================================
    // Patterns
    // =========================================================================
    ObjectPattern {
        properties: NodeList,
    },
    ArrayPattern {
        elements: NodeList,
    },
    AssignmentPattern {
        left: NodeIndex,
        right: NodeIndex,
    },
    RestElement {
        argument: NodeIndex,
    },

    // =========================================================================
    // Special
    // =========================================================================
    /// Parser output the transform does not model, kept verbatim
    Opaque {
        node_type: String,
        raw: serde_json::Value,
    },
}

/// Fieldless node kind, used to dispatch traversal handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Program,
    Identifier,
    Literal,
    TemplateLiteral,
    ThisExpression,
    Super,
    ArrayExpression,
    ObjectExpression,
    Property,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
    ClassDeclaration,
    ClassExpression,
    MethodDefinition,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    MemberExpression,
    CallExpression,
    NewExpression,
    ConditionalExpression,
    SequenceExpression,
    AwaitExpression,
    YieldExpression,
    SpreadElement,
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    ReturnStatement,
    IfStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    TryStatement,
    CatchClause,
    ThrowStatement,
    BreakStatement,
    ContinueStatement,
    LabeledStatement,
    SwitchStatement,
    SwitchCase,
    VariableDeclaration,
    VariableDeclarator,
    ImportDeclaration,
    ImportSpecifier,
    ExportNamedDeclaration,
    ExportDefaultDeclaration,
    ObjectPattern,
    ArrayPattern,
    AssignmentPattern,
    RestElement,
    Opaque,
}

impl SyntaxKind {
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration | Self::FunctionExpression | Self::ArrowFunctionExpression
        )
    }
}

/// A node: payload plus source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub data: NodeData,
    pub span: Span,
}

impl Node {
    pub const fn new(data: NodeData, span: Span) -> Self {
        Self { data, span }
    }

    pub const fn kind(&self) -> SyntaxKind {
        match &self.data {
            NodeData::Program { .. } => SyntaxKind::Program,
            NodeData::Identifier { .. } => SyntaxKind::Identifier,
            NodeData::Literal(_) => SyntaxKind::Literal,
            NodeData::TemplateLiteral { .. } => SyntaxKind::TemplateLiteral,
            NodeData::This => SyntaxKind::ThisExpression,
            NodeData::Super => SyntaxKind::Super,
            NodeData::Array { .. } => SyntaxKind::ArrayExpression,
            NodeData::Object { .. } => SyntaxKind::ObjectExpression,
            NodeData::Property { .. } => SyntaxKind::Property,
            NodeData::Function(func) => match func.kind {
                FunctionKind::Declaration => SyntaxKind::FunctionDeclaration,
                FunctionKind::Expression => SyntaxKind::FunctionExpression,
                FunctionKind::Arrow => SyntaxKind::ArrowFunctionExpression,
            },
            NodeData::Class { kind, .. } => match kind {
                ClassKind::Declaration => SyntaxKind::ClassDeclaration,
                ClassKind::Expression => SyntaxKind::ClassExpression,
            },
            NodeData::MethodDefinition { .. } => SyntaxKind::MethodDefinition,
            NodeData::Unary { .. } => SyntaxKind::UnaryExpression,
            NodeData::Update { .. } => SyntaxKind::UpdateExpression,
            NodeData::Binary { .. } => SyntaxKind::BinaryExpression,
            NodeData::Logical { .. } => SyntaxKind::LogicalExpression,
            NodeData::Assignment { .. } => SyntaxKind::AssignmentExpression,
            NodeData::Member { .. } => SyntaxKind::MemberExpression,
            NodeData::Call { .. } => SyntaxKind::CallExpression,
            NodeData::New { .. } => SyntaxKind::NewExpression,
            NodeData::Conditional { .. } => SyntaxKind::ConditionalExpression,
            NodeData::Sequence { .. } => SyntaxKind::SequenceExpression,
            NodeData::Await { .. } => SyntaxKind::AwaitExpression,
            NodeData::Yield { .. } => SyntaxKind::YieldExpression,
            NodeData::Spread { .. } => SyntaxKind::SpreadElement,
            NodeData::ExpressionStatement { .. } => SyntaxKind::ExpressionStatement,
            NodeData::Block { .. } => SyntaxKind::BlockStatement,
            NodeData::Empty => SyntaxKind::EmptyStatement,
            NodeData::Return { .. } => SyntaxKind::ReturnStatement,
            NodeData::If { .. } => SyntaxKind::IfStatement,
            NodeData::For { .. } => SyntaxKind::ForStatement,
            NodeData::ForIn { .. } => SyntaxKind::ForInStatement,
            NodeData::ForOf { .. } => SyntaxKind::ForOfStatement,
            NodeData::While { .. } => SyntaxKind::WhileStatement,
            NodeData::DoWhile { .. } => SyntaxKind::DoWhileStatement,
            NodeData::Try { .. } => SyntaxKind::TryStatement,
            NodeData::CatchClause { .. } => SyntaxKind::CatchClause,
            NodeData::Throw { .. } => SyntaxKind::ThrowStatement,
            NodeData::Break { .. } => SyntaxKind::BreakStatement,
            NodeData::Continue { .. } => SyntaxKind::ContinueStatement,
            NodeData::Labeled { .. } => SyntaxKind::LabeledStatement,
            NodeData::Switch { .. } => SyntaxKind::SwitchStatement,
            NodeData::SwitchCase { .. } => SyntaxKind::SwitchCase,
            NodeData::VariableDeclaration { .. } => SyntaxKind::VariableDeclaration,
            NodeData::VariableDeclarator { .. } => SyntaxKind::VariableDeclarator,
            NodeData::ImportDeclaration { .. } => SyntaxKind::ImportDeclaration,
            NodeData::ImportSpecifier { .. } => SyntaxKind::ImportSpecifier,
            NodeData::ExportNamed { .. } => SyntaxKind::ExportNamedDeclaration,
            NodeData::ExportDefault { .. } => SyntaxKind::ExportDefaultDeclaration,
            NodeData::ObjectPattern { .. } => SyntaxKind::ObjectPattern,
            NodeData::ArrayPattern { .. } => SyntaxKind::ArrayPattern,
            NodeData::AssignmentPattern { .. } => SyntaxKind::AssignmentPattern,
            NodeData::RestElement { .. } => SyntaxKind::RestElement,
            NodeData::Opaque { .. } => SyntaxKind::Opaque,
        }
    }
}
