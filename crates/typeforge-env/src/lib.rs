//! Two-level compile-time environments (spec.md §3.3, §4.2, C3): a *type
//! environment* (declared types + comptime status) and a *comptime
//! environment* (values + lazy evaluation state), sharing one lexical
//! scope chain so a name resolves to the same scope depth in both.
//!
//! Scopes are a flat arena of frames addressed by `EnvId`, each frame
//! holding a non-owning `parent: Option<EnvId>` link — the "stack of
//! frames keyed by depth" shape spec.md §9 calls out as the ownership-safe
//! alternative to back-pointer cycles.

mod scope;

pub use scope::{ComptimeState, ComptimeStatus, EnvError, ScopeArena, TypeBinding};

#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod scope_tests;
