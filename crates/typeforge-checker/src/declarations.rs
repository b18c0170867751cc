//! §4.5.1 declaration checking: const/import/expression declarations at
//! both the program top level (`Decl`) and inside a block (`Stmt`) — the
//! two share the exact same `ConstDecl` grammar, so `check_const_decl` is
//! the one routine both `checker::check_block` and `check_program` call.
//! Grounded on `tsz-checker::decl_checker`'s pre-registration pass enabling
//! forward/recursive reference to a fully-annotated function binding.

use typeforge_common::EnvId;
use typeforge_common::diagnostics::Diagnostic;
use typeforge_env::{ComptimeState, ComptimeStatus, ScopeArena, TypeBinding};
use typeforge_ir::core::{ConstDecl, Decl, ExprKind, ImportClause, ImportDecl, Program};
use typeforge_ir::typed::{DeclInfo, TypedProgram};
use typeforge_types::{judge, TypeArena};

use crate::checker::Checker;
use crate::error_reporter::type_mismatch;
use crate::generics;

/// Checks every top-level declaration, collecting a diagnostic per failing
/// declaration rather than aborting the whole program at the first error —
/// each declaration's failure is local to it (spec.md §4.5.1).
pub fn check_program(
    checker: &mut Checker<'_>,
    arena: &mut TypeArena,
    scopes: &mut ScopeArena,
    env: EnvId,
    typed: &mut TypedProgram,
    program: &Program,
) -> Result<(), Vec<Diagnostic>> {
    let mut errors = Vec::new();
    for decl in &program.decls {
        let result = match decl {
            Decl::Const(const_decl) => check_const_decl(checker, arena, scopes, env, typed, const_decl),
            Decl::Import(import_decl) => check_import_decl(checker, arena, scopes, env, typed, import_decl),
            Decl::Expr(stmt) => checker.check_expr(arena, scopes, env, typed, &stmt.expr, None).map(|checked| {
                typed.record_decl(stmt.id, DeclInfo { decl_type: checked.ty, comptime_only: checked.comptime_only });
            }),
        };
        if let Err(e) = result {
            errors.push(e);
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Shared by `Decl::Const` (top level) and `Stmt::Const` (inside a block) —
/// both carry the identical `ConstDecl` payload (spec.md §6), so a single
/// routine handles both without duplicating the pre-registration dance.
pub fn check_const_decl(
    checker: &mut Checker<'_>,
    arena: &mut TypeArena,
    scopes: &mut ScopeArena,
    env: EnvId,
    typed: &mut TypedProgram,
    decl: &ConstDecl,
) -> Result<(), Diagnostic> {
    let declared_ty = decl
        .type_ann
        .as_ref()
        .map(|ann| checker.eval_type_annotation(arena, scopes, env, typed, ann))
        .transpose()?;

    // Pre-registration (spec.md §4.5.1 point 4): a `const` whose initializer
    // is a lambda with every parameter and its return fully annotated gets
    // its `Function` type bound *before* the body is checked, so a
    // recursive call inside the body resolves to a real signature instead
    // of an `UndefinedBinding`.
    let pre_registered_ty = match (declared_ty, decl.init.kind.as_ref()) {
        (Some(t), _) => Some(t),
        (None, ExprKind::Lambda(lambda)) => {
            let type_params = generics::detect_type_params(lambda);
            let sig_env = scopes.extend(env);
            let params = checker.bind_lambda_params(arena, scopes, sig_env, typed, lambda, &type_params, None, true)?;
            match (params, &lambda.return_ann) {
                (Some(params), Some(return_ann)) => {
                    let return_ty = checker.eval_type_annotation(arena, scopes, sig_env, typed, return_ann)?;
                    Some(arena.make_function(params, return_ty, lambda.is_async))
                }
                _ => None,
            }
        }
        (None, _) => None,
    };

    let name_atom = arena.intern_string(&decl.name);
    let tentative_status = if decl.comptime { ComptimeStatus::Comptime } else { ComptimeStatus::Runtime };
    if let Some(ty) = pre_registered_ty {
        scopes.define_type(env, name_atom, TypeBinding { ty, comptime_status: tentative_status });
    }

    let init_checked = checker.check_expr(arena, scopes, env, typed, &decl.init, pre_registered_ty.or(declared_ty))?;

    let final_ty = match pre_registered_ty.or(declared_ty) {
        Some(contextual) => {
            if !judge::is_subtype(arena, init_checked.ty, contextual) {
                return Err(type_mismatch(arena, init_checked.ty, contextual, decl.init.span));
            }
            contextual
        }
        None => init_checked.ty,
    };

    let comptime_only = decl.comptime || init_checked.comptime_only || judge::contains_metatype(arena, final_ty);
    let status = if comptime_only {
        ComptimeStatus::ComptimeOnly
    } else if decl.comptime {
        ComptimeStatus::Comptime
    } else {
        ComptimeStatus::Runtime
    };

    let binding = TypeBinding { ty: final_ty, comptime_status: status };
    if pre_registered_ty.is_some() {
        scopes
            .update_type(env, name_atom, binding)
            .expect("pre-registered binding is always defined before this update");
    } else {
        scopes.define_type(env, name_atom, binding);
    }

    if !matches!(status, ComptimeStatus::Runtime) {
        if comptime_only {
            // Eagerly evaluated: a comptime-only binding has no runtime
            // representation to defer to (spec.md §4.2).
            let value = match init_checked.comptime_value.clone() {
                Some(v) => v,
                None => checker.speculative_eval(arena, scopes, env, &decl.init).ok_or_else(|| {
                    crate::error_reporter::comptime_unavailable(&decl.name, decl.init.span)
                })?,
            };
            scopes.define_comptime(env, name_atom, ComptimeState::Evaluated(value));
        } else {
            scopes.define_comptime(env, name_atom, ComptimeState::Unevaluated { expr: decl.init.clone(), captured_env: env });
        }
    }

    typed.record_decl(decl.id, DeclInfo { decl_type: final_ty, comptime_only });
    Ok(())
}

/// Imports resolve through the `ModuleResolver` collaborator (spec.md §6);
/// an unresolved specifier binds nothing, which surfaces later as an
/// `UndefinedBinding` on first use (matches `NullModuleResolver`'s
/// documented behavior in `context.rs`).
fn check_import_decl(
    checker: &mut Checker<'_>,
    arena: &mut TypeArena,
    scopes: &mut ScopeArena,
    env: EnvId,
    typed: &mut TypedProgram,
    decl: &ImportDecl,
) -> Result<(), Diagnostic> {
    let exported = checker.resolver.resolve(&decl.specifier);

    if let Some(exported) = &exported {
        match &decl.clause {
            ImportClause::Default(local) => {
                let default_atom = arena.intern_string("default");
                if let Some(&ty) = exported.get(&default_atom) {
                    bind_import(arena, scopes, env, local, ty);
                }
            }
            ImportClause::Named(specs) => {
                for spec in specs {
                    let imported_atom = arena.intern_string(&spec.imported);
                    if let Some(&ty) = exported.get(&imported_atom) {
                        bind_import(arena, scopes, env, &spec.local, ty);
                    }
                }
            }
            ImportClause::Namespace(local) => {
                let fields: Vec<typeforge_types::FieldInfo> = exported
                    .iter()
                    .map(|(&name, &ty)| typeforge_types::FieldInfo { name, ty, optional: false })
                    .collect();
                let namespace_ty = arena.make_record(fields, None, true);
                bind_import(arena, scopes, env, local, namespace_ty);
            }
        }
    }

    typed.record_decl(decl.id, DeclInfo { decl_type: arena.void(), comptime_only: false });
    Ok(())
}

fn bind_import(arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, name: &str, ty: typeforge_types::TypeId) {
    let atom = arena.intern_string(name);
    scopes.define_type(env, atom, TypeBinding { ty, comptime_status: ComptimeStatus::Runtime });
}
