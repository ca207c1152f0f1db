//! Node kinds and per-kind payloads for the arena tree.

use evlint_common::Span;

/// Handle into a [`TreeArena`](crate::TreeArena).
///
/// `NONE` is the absent-child sentinel; accessors return `None` for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeIndex::NONE
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    IntLiteral,
    Ident,
    Member,
    Binary,
    Paren,
    Call,
    ExprStmt,
    IfStmt,
    Block,
    Attribute,
    ConstField,
    Method,
    Class,
    Unit,
}

/// One arena slot: kind, source span, and an index into the kind's data pool.
#[derive(Copy, Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub(crate) data: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LiteralData {
    pub value: i64,
}

#[derive(Clone, Debug)]
pub struct IdentData {
    pub name: String,
}

/// A two-segment member path such as `EventLevel.Error`.
#[derive(Clone, Debug)]
pub struct MemberData {
    pub object: String,
    pub member: String,
}

#[derive(Clone, Debug)]
pub struct BinaryData {
    pub op: BinaryOp,
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParenData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CallData {
    pub callee: String,
    pub args: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ExprStmtData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IfData {
    pub condition: NodeIndex,
    pub then_stmt: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BlockData {
    pub statements: Vec<NodeIndex>,
}

/// Attached metadata: `name(args, named = expr, ..)`.
#[derive(Clone, Debug)]
pub struct AttributeData {
    pub name: String,
    pub args: Vec<NodeIndex>,
    pub named_args: Vec<(String, NodeIndex)>,
}

#[derive(Clone, Debug)]
pub struct FieldData {
    pub name: String,
    pub type_name: String,
    pub is_const: bool,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub type_name: String,
}

pub mod method_flags {
    pub const PUBLIC: u32 = 1 << 0;
    pub const STATIC: u32 = 1 << 1;
}

#[derive(Clone, Debug)]
pub struct MethodData {
    pub name: String,
    pub flags: u32,
    pub attributes: Vec<NodeIndex>,
    pub params: Vec<Param>,
    /// `NONE` while the method is still being typed.
    pub body: NodeIndex,
    pub name_span: Span,
}

impl MethodData {
    pub fn is_public(&self) -> bool {
        self.flags & method_flags::PUBLIC != 0
    }

    pub fn is_static(&self) -> bool {
        self.flags & method_flags::STATIC != 0
    }
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: String,
    pub base: Option<String>,
    pub fields: Vec<NodeIndex>,
    pub methods: Vec<NodeIndex>,
    pub name_span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct UnitData {
    pub classes: Vec<NodeIndex>,
}
