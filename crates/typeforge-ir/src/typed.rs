//! Typed IR (spec.md §3.4, §6 "Output (typed IR)"): rather than cloning
//! the core tree into a second type-annotated tree, the checker attaches a
//! `type`/`comptimeOnly`/`comptimeValue` triple to each expression node and
//! a `declType`/`comptimeOnly` pair to each declaration, keyed by the
//! node's stable `NodeId` — the arena-plus-side-table shape the teacher's
//! checker state uses for its own node annotations.

use rustc_hash::FxHashMap;
use typeforge_common::NodeId;
use typeforge_types::{TypeId, Value};

use crate::core::Program;

#[derive(Clone, Debug)]
pub struct ExprInfo {
    pub ty: TypeId,
    pub comptime_only: bool,
    pub comptime_value: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct DeclInfo {
    pub decl_type: TypeId,
    pub comptime_only: bool,
}

/// The core IR plus the side tables the checker fills in. `core` is kept
/// around (not consumed) because erasure (C7) reads both the tree shape
/// and the per-node type information to decide what to drop.
#[derive(Debug)]
pub struct TypedProgram {
    pub core: Program,
    expr_info: FxHashMap<NodeId, ExprInfo>,
    decl_info: FxHashMap<NodeId, DeclInfo>,
}

impl TypedProgram {
    pub fn new(core: Program) -> Self {
        TypedProgram {
            core,
            expr_info: FxHashMap::default(),
            decl_info: FxHashMap::default(),
        }
    }

    pub fn record_expr(&mut self, id: NodeId, info: ExprInfo) {
        self.expr_info.insert(id, info);
    }

    pub fn record_decl(&mut self, id: NodeId, info: DeclInfo) {
        self.decl_info.insert(id, info);
    }

    pub fn expr_info(&self, id: NodeId) -> Option<&ExprInfo> {
        self.expr_info.get(&id)
    }

    pub fn decl_info(&self, id: NodeId) -> Option<&DeclInfo> {
        self.decl_info.get(&id)
    }
}
