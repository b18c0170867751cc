//! The runtime IR (spec.md §3.4, §6 "Output (runtime IR)"): the typed IR
//! minus every construct that exists only for compile-time purposes — no
//! `type` fields, no `comptime` declarations, no type parameters, no
//! expression whose type is `Type`. Produced by `typeforge-lower`'s
//! erasure pass (C7); this crate only defines the shape.

use serde::{Deserialize, Serialize};
use typeforge_common::{NodeId, Span};

pub use crate::core::{BinOp, Literal, UnOp};

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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConstDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub init: Expr,
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
pub struct Lambda {
    pub params: Vec<Param>,
    pub body: Expr,
    pub is_async: bool,
}

/// No `type_ann`: erasure strips parameter and return annotations (spec.md
/// §4.6 "Lambdas"). Type parameters (recognized at erasure time by the
/// `typeOf` default-value marker) never reach this shape at all.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
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

/// No `Type` pattern variant: a type pattern is meaningless once there is
/// no runtime type representation to discriminate against. Erasure lowers
/// it to a `Destructure` that structurally probes the shape the type
/// pattern named (spec.md §4.6 "Pattern match... type patterns lower to
/// runtime discriminant checks on the corresponding record shape").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Pattern {
    Wildcard,
    Literal(Literal),
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
