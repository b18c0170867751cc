//! Opaque cross-crate handles.
//!
//! `NodeId` names a node in whichever IR tree is in scope (core, typed, or
//! runtime) without any crate owning a dependency on another crate's tree
//! type; closures capture a `NodeId` for their body and an `EnvId` for
//! their lexical environment, and the evaluator (which does depend on both
//! the IR and the environment crates) resolves each through a side table,
//! the same way `tsz-checker` resolves `NodeIndex` through `self.ctx.arena`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Default)]
pub struct NodeIdGen(u32);

impl NodeIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts minting ids after `highest_seen` — for a pass (like erasure)
    /// that synthesizes new nodes alongside an existing tree and must not
    /// collide with ids that tree already assigned.
    pub fn starting_after(highest_seen: NodeId) -> Self {
        NodeIdGen(highest_seen.0 + 1)
    }

    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }
}

/// A handle to a lexical scope (pair of type-environment and
/// comptime-environment frames) owned by `typeforge-env`'s scope arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvId(pub u32);
