//! The scope arena: `EnvId`-addressed frames forming a lexical tree
//! (spec.md §9 "children borrow from parents and do not outlive them").

use rustc_hash::FxHashMap;
use typeforge_common::{Atom, EnvId};
use typeforge_ir::core::Expr;
use typeforge_types::TypeId;

/// spec.md §3.3: every type binding carries a comptime status alongside
/// its type. `Mutable` is never produced (Non-goals: no mutable
/// variables) but the field exists so a binding's shape matches the spec
/// literally rather than hard-coding the omission into every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComptimeStatus {
    Runtime,
    Comptime,
    ComptimeOnly,
}

#[derive(Clone, Copy, Debug)]
pub struct TypeBinding {
    pub ty: TypeId,
    pub comptime_status: ComptimeStatus,
}

/// The comptime binding's four states (spec.md §3.3, §9): the only
/// mutable data point in the core. `Unevaluated` captures the expression
/// to force and the scope it closed over when defined (which may differ
/// from the scope it's looked up through).
#[derive(Clone, Debug)]
pub enum ComptimeState {
    Unevaluated { expr: Expr, captured_env: EnvId },
    Evaluating,
    Evaluated(typeforge_types::Value),
    Unavailable,
}

#[derive(Debug)]
pub enum EnvError {
    /// `update()` called on a name that was never `define()`d first
    /// (spec.md §9: "forbid `update` on anything not previously
    /// pre-registered").
    UpdateWithoutDefine,
    UnknownBinding,
    /// `evaluate()` re-entered a binding already in the `Evaluating`
    /// state: the *CycleInComptime* diagnostic (spec.md §7).
    Cycle,
}

#[derive(Default)]
struct ScopeFrame {
    parent: Option<EnvId>,
    types: FxHashMap<Atom, TypeBinding>,
    comptime: FxHashMap<Atom, ComptimeState>,
}

pub struct ScopeArena {
    frames: Vec<ScopeFrame>,
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena {
            frames: vec![ScopeFrame::default()],
        }
    }

    pub fn root(&self) -> EnvId {
        EnvId(0)
    }

    /// `extend()`: a new child scope of `parent` (spec.md §5 "every new
    /// lexical scope is created by `extend()`").
    pub fn extend(&mut self, parent: EnvId) -> EnvId {
        let id = EnvId(self.frames.len() as u32);
        self.frames.push(ScopeFrame {
            parent: Some(parent),
            ..ScopeFrame::default()
        });
        id
    }

    fn frame(&self, env: EnvId) -> &ScopeFrame {
        &self.frames[env.0 as usize]
    }

    fn frame_mut(&mut self, env: EnvId) -> &mut ScopeFrame {
        &mut self.frames[env.0 as usize]
    }

    // ---- type environment ----

    /// Pre-register or define a fresh binding in `env` (not a parent
    /// scope it shadows).
    pub fn define_type(&mut self, env: EnvId, name: Atom, binding: TypeBinding) {
        self.frame_mut(env).types.insert(name, binding);
    }

    /// Update a binding previously `define_type`d in *this exact* scope
    /// (spec.md §4.5.1 "Pre-registration entries are updated in-place,
    /// not redefined"; spec.md §9 "expose `define` and `update` as
    /// distinct operations").
    pub fn update_type(&mut self, env: EnvId, name: Atom, binding: TypeBinding) -> Result<(), EnvError> {
        let frame = self.frame_mut(env);
        if !frame.types.contains_key(&name) {
            return Err(EnvError::UpdateWithoutDefine);
        }
        frame.types.insert(name, binding);
        Ok(())
    }

    /// `lookup(name)`: walks the scope chain starting at `env`.
    pub fn lookup_type(&self, env: EnvId, name: Atom) -> Option<TypeBinding> {
        let mut cur = Some(env);
        while let Some(id) = cur {
            let frame = self.frame(id);
            if let Some(binding) = frame.types.get(&name) {
                return Some(*binding);
            }
            cur = frame.parent;
        }
        None
    }

    // ---- comptime environment ----

    pub fn define_comptime(&mut self, env: EnvId, name: Atom, state: ComptimeState) {
        self.frame_mut(env).comptime.insert(name, state);
    }

    /// Finds the scope that actually owns `name`'s comptime entry,
    /// walking up from `env`. Mutations from `evaluate()` must land on
    /// this scope, not on whichever child scope merely looked the name
    /// up (spec.md §4.2).
    pub fn lookup_comptime_owner(&self, env: EnvId, name: Atom) -> Option<EnvId> {
        let mut cur = Some(env);
        while let Some(id) = cur {
            let frame = self.frame(id);
            if frame.comptime.contains_key(&name) {
                return Some(id);
            }
            cur = frame.parent;
        }
        None
    }

    pub fn comptime_state(&self, owner: EnvId, name: Atom) -> Option<&ComptimeState> {
        self.frame(owner).comptime.get(&name)
    }

    /// `unevaluated → evaluating`. Returns `Err(Cycle)` if the entry is
    /// already `Evaluating` (spec.md §4.2, §7 *CycleInComptime*).
    pub fn begin_evaluation(&mut self, owner: EnvId, name: Atom) -> Result<(), EnvError> {
        let entry = self
            .frame_mut(owner)
            .comptime
            .get_mut(&name)
            .ok_or(EnvError::UnknownBinding)?;
        match entry {
            ComptimeState::Evaluating => Err(EnvError::Cycle),
            _ => {
                *entry = ComptimeState::Evaluating;
                Ok(())
            }
        }
    }

    /// `evaluating → evaluated(value)`.
    pub fn complete_evaluation(&mut self, owner: EnvId, name: Atom, value: typeforge_types::Value) {
        self.frame_mut(owner).comptime.insert(name, ComptimeState::Evaluated(value));
    }

    /// `evaluating → unavailable`: the sticky fourth state that
    /// short-circuits repeat failures (spec.md §9).
    pub fn mark_unavailable(&mut self, owner: EnvId, name: Atom) {
        self.frame_mut(owner).comptime.insert(name, ComptimeState::Unavailable);
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}
