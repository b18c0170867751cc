//! The desugared core IR (spec.md §6 "Input"): the fixed algebraic grammar
//! the surface parser/desugarer hands the checker. This is the JSON
//! interchange shape — names are plain strings, not interned `Atom`s, since
//! a tree built from `serde_json::from_reader` predates any arena.

use serde::{Deserialize, Serialize};
use typeforge_common::{NodeId, Span};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Program {
    pub decls: Vec<Decl>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Decl {
    Const(ConstDecl),
    Import(ImportDecl),
    Expr(ExprStmt),
}

impl Decl {
    pub fn id(&self) -> NodeId {
        match self {
            Decl::Const(d) => d.id,
            Decl::Import(d) => d.id,
            Decl::Expr(d) => d.id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub type_ann: Option<Expr>,
    pub init: Expr,
    pub comptime: bool,
    pub exported: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportDecl {
    pub id: NodeId,
    pub span: Span,
    pub specifier: String,
    pub clause: ImportClause,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ImportClause {
    Default(String),
    Named(Vec<ImportSpecifier>),
    Namespace(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExprStmt {
    pub id: NodeId,
    pub span: Span,
    pub expr: Expr,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: Box<ExprKind>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    Binary {
        op: BinOp,
        left: Expr,
        right: Expr,
    },
    Unary {
        op: UnOp,
        operand: Expr,
    },
    Call {
        callee: Expr,
        args: Vec<CallArg>,
    },
    Property {
        object: Expr,
        name: String,
    },
    Index {
        object: Expr,
        index: Expr,
    },
    Lambda(Lambda),
    Conditional {
        condition: Expr,
        then_branch: Expr,
        else_branch: Expr,
    },
    Record {
        fields: Vec<RecordField>,
    },
    Array {
        elements: Vec<ArrayElem>,
    },
    Match {
        scrutinee: Expr,
        arms: Vec<MatchArm>,
    },
    Throw {
        error: Expr,
    },
    Await {
        operand: Expr,
    },
    Template {
        parts: Vec<TemplatePart>,
    },
    Block(Block),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    Not,
    BitNot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub return_ann: Option<Expr>,
    pub body: Expr,
    pub is_async: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_ann: Option<Expr>,
    pub default: Option<Expr>,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CallArg {
    Normal(Expr),
    Spread(Expr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RecordField {
    Field { name: String, value: Expr },
    Spread(Expr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ArrayElem {
    Element(Expr),
    Spread(Expr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Pattern {
    Wildcard,
    Literal(Literal),
    Type(Expr),
    Binding {
        name: String,
        nested: Option<Box<Pattern>>,
    },
    Destructure {
        fields: Vec<DestructureField>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DestructureField {
    pub name: String,
    pub alias: Option<String>,
    pub nested: Option<Pattern>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TemplatePart {
    Str(String),
    Expr(Expr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub result: Option<Expr>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Stmt {
    Const(ConstDecl),
    Expr(ExprStmt),
}
