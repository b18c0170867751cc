//! Checker state and the module-resolver collaborator contract (spec.md §6:
//! "returns, for a module specifier, a map of exported names to Types").
//! Grounded on `tsz-checker::context`'s `CheckerContext`/`CheckerOptions`
//! split between engine-wide options and per-run mutable state.

use rustc_hash::FxHashMap;
use typeforge_common::{Atom, EngineOptions};
use typeforge_eval::Evaluator;
use typeforge_types::TypeId;

/// A resolved import: each exported name of a module specifier maps to an
/// opaque Type, treated as a black box by the checker (spec.md §6).
pub trait ModuleResolver {
    fn resolve(&self, specifier: &str) -> Option<FxHashMap<Atom, TypeId>>;
}

/// The collaborator is absent in this core: every import resolves to
/// nothing, which surfaces as an `UndefinedBinding` on first use of an
/// imported name. A real driver plugs in its own resolver.
pub struct NullModuleResolver;

impl ModuleResolver for NullModuleResolver {
    fn resolve(&self, _specifier: &str) -> Option<FxHashMap<Atom, TypeId>> {
        None
    }
}

/// Bidirectional-checking result for one expression: the three columns of
/// `typeforge_ir::typed::ExprInfo`, produced together since `comptimeValue`
/// is only ever attempted once `comptimeOnly` is known (spec.md §4.5.4,
/// §4.6).
#[derive(Clone, Debug)]
pub struct Checked {
    pub ty: TypeId,
    pub comptime_only: bool,
    pub comptime_value: Option<typeforge_types::Value>,
}

impl Checked {
    pub fn runtime(ty: TypeId) -> Self {
        Checked {
            ty,
            comptime_only: false,
            comptime_value: None,
        }
    }
}

/// One `Checker` per compilation, mirroring `Evaluator`'s lifetime (spec.md
/// §5: "the checker creates one evaluator per compilation"). Holds only the
/// fuel-limited evaluator used for speculative comptime evaluation
/// (§4.5.4); the `TypedProgram` side table is threaded through check calls
/// explicitly, the same way `arena`/`scopes` are.
pub struct Checker<'r> {
    pub(crate) evaluator: Evaluator,
    pub(crate) options: EngineOptions,
    pub(crate) resolver: &'r dyn ModuleResolver,
}

impl<'r> Checker<'r> {
    pub fn new(options: EngineOptions, resolver: &'r dyn ModuleResolver) -> Self {
        Checker {
            evaluator: Evaluator::new(options.fuel_limit),
            options,
            resolver,
        }
    }

    /// Restricts `comptime.readFile` to resolving relative paths against
    /// `root` (spec.md §6's builtin sandbox contract). Without this, every
    /// `comptime.readFile` call fails.
    pub fn with_sandbox_root(mut self, root: std::path::PathBuf) -> Self {
        self.evaluator = self.evaluator.with_sandbox_root(root);
        self
    }
}
