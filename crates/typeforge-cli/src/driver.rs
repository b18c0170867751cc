//! Wires the three passes together over one in-memory program: check
//! (C6, delegating to the evaluator for every comptime value it needs),
//! then erase (C7) on success. Grounded on `tsz-cli::driver`'s role as the
//! seam between argument parsing and the compiler passes, scaled down to
//! a single-file, non-incremental run since this core has no project
//! files, no file-system module graph, and no watch mode to drive.

use std::path::PathBuf;

use typeforge_checker::{check_program, Checker, NullModuleResolver};
use typeforge_common::diagnostics::Diagnostic;
use typeforge_common::EngineOptions;
use typeforge_env::ScopeArena;
use typeforge_ir::core;
use typeforge_ir::runtime;
use typeforge_ir::typed::TypedProgram;
use typeforge_types::TypeArena;

/// The outcome of one run: either a list of diagnostics (checking failed,
/// or succeeded with nothing to report beyond them) or the runtime IR
/// erasure produced from a clean check.
pub enum Outcome {
    Diagnostics(Vec<Diagnostic>),
    Program(runtime::Program),
}

/// Checks `program` and, if checking succeeds, erases it to runtime IR.
/// `sandbox_root`, when set, is the root `comptime.readFile` resolves
/// relative paths against (spec.md §6).
pub fn run(program: &core::Program, options: EngineOptions, sandbox_root: Option<PathBuf>) -> Outcome {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);

    let resolver = NullModuleResolver;
    let mut checker = Checker::new(options, &resolver);
    if let Some(root) = sandbox_root {
        checker = checker.with_sandbox_root(root);
    }

    let mut typed = TypedProgram::new(program.clone());
    match check_program(&mut checker, &mut arena, &mut scopes, env, &mut typed, program) {
        Err(diagnostics) => Outcome::Diagnostics(diagnostics),
        Ok(()) => {
            let runtime_program = typeforge_lower::erase_program(&typed, &arena);
            Outcome::Program(runtime_program)
        }
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
