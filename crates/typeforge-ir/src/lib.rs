//! The three IR shapes the compiler core passes between stages (spec.md
//! §3.4, §6): the desugared `core` IR the checker consumes, the `typed`
//! side tables the checker produces, and the `runtime` IR the erasure
//! pass (C7) produces.

pub mod core;
pub mod runtime;
pub mod typed;

pub use typed::{DeclInfo, ExprInfo, TypedProgram};
