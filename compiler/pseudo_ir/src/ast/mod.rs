//! Syntax tree produced by the parser.
//!
//! Nodes are plain owned trees (`Box`/`Vec` children). They are built once,
//! never mutated, and only read by the lowering pass.

mod operators;

pub use operators::{BinaryOperator, UnaryOperator};

use crate::Position;

/// A syntax node with its source range.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub start: Position,
    pub end: Position,
}

impl Node {
    #[inline]
    pub fn new(kind: NodeKind, start: Position, end: Position) -> Self {
        Node { kind, start, end }
    }

    #[inline]
    pub fn boxed(self) -> Box<Node> {
        Box::new(self)
    }

    /// Placeholder used where an operand is missing.
    pub fn empty(start: Position, end: Position) -> Self {
        Node::new(NodeKind::EmptyExpression, start, end)
    }

    pub fn invalid(start: Position, end: Position) -> Self {
        Node::new(NodeKind::InvalidCodeExpression, start, end)
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.start.line
    }

    /// True for the literal node kinds (`null` included).
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }
}

/// Literal payloads, converted once by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
    Nil,
}

/// One branch of an `if` statement.
///
/// `condition` is `None` only for the trailing `else` branch.
#[derive(Clone, Debug, PartialEq)]
pub struct IfClause {
    pub kind: ClauseKind,
    pub condition: Option<Node>,
    pub body: Vec<Node>,
    pub start: Position,
    pub end: Position,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClauseKind {
    If,
    ElseIf,
    Else,
}

/// A function parameter: `name` or `name = default`.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Node>,
    pub start: Position,
    pub end: Position,
}

/// A `"key": value` entry of a map constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct MapField {
    pub key: String,
    pub value: Node,
    pub start: Position,
    pub end: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Top-level unit of one source text.
    ///
    /// `namespaces` lists every identifier referenced, in first-seen order.
    Chunk {
        body: Vec<Node>,
        namespaces: Vec<String>,
    },

    // Statements
    AssignmentStatement {
        variable: Box<Node>,
        init: Box<Node>,
    },
    CallStatement {
        expression: Box<Node>,
    },
    FunctionDeclaration {
        name: Option<String>,
        parameters: Vec<Parameter>,
        body: Vec<Node>,
    },
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    IfStatement {
        clauses: Vec<IfClause>,
    },
    WhileStatement {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    ForGenericStatement {
        variable: Box<Node>,
        iterator: Box<Node>,
        body: Vec<Node>,
    },
    BreakStatement,
    ContinueStatement,
    DebuggerStatement,
    ImportExpression {
        directory: String,
    },

    // Expressions
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        raw: String,
    },
    MemberExpression {
        origin: Box<Node>,
        identifier: Box<Node>,
    },
    IndexExpression {
        origin: Box<Node>,
        index: Box<Node>,
    },
    CallExpression {
        origin: Box<Node>,
        arguments: Vec<Node>,
    },
    /// `not x`
    NegationExpression {
        argument: Box<Node>,
    },
    /// `-x` / `+x`
    BinaryNegatedExpression {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    /// `new x`
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    MapConstructorExpression {
        fields: Vec<MapField>,
    },
    ListConstructorExpression {
        fields: Vec<Node>,
    },
    EmptyExpression,
    /// Stand-in for a statement that failed to parse in force mode.
    InvalidCodeExpression,
}

impl NodeKind {
    /// Node kind name as shown in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Chunk { .. } => "Chunk",
            NodeKind::AssignmentStatement { .. } => "AssignmentStatement",
            NodeKind::CallStatement { .. } => "CallStatement",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::ForGenericStatement { .. } => "ForGenericStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::DebuggerStatement => "DebuggerStatement",
            NodeKind::ImportExpression { .. } => "ImportExpression",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { value, .. } => match value {
                LiteralValue::Boolean(_) => "BooleanLiteral",
                LiteralValue::Number(_) => "NumericLiteral",
                LiteralValue::String(_) => "StringLiteral",
                LiteralValue::Nil => "NilLiteral",
            },
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::IndexExpression { .. } => "IndexExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NegationExpression { .. } => "NegationExpression",
            NodeKind::BinaryNegatedExpression { .. } => "BinaryNegatedExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::MapConstructorExpression { .. } => "MapConstructorExpression",
            NodeKind::ListConstructorExpression { .. } => "ListConstructorExpression",
            NodeKind::EmptyExpression => "EmptyExpression",
            NodeKind::InvalidCodeExpression => "InvalidCodeExpression",
        }
    }
}
