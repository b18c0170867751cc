//! §4.5.4 call checking: overload resolution over an intersection of
//! function types, argument/parameter counting (optional, rest, spread),
//! the array/string builtin generic-return post-pass, and the speculative
//! comptime evaluation of comptime-only-argument calls. Grounded on
//! `tsz-checker::call_checker`'s signature-by-signature trial loop.

use typeforge_common::{diagnostics::Diagnostic, EnvId, Span};
use typeforge_env::ScopeArena;
use typeforge_ir::core::{CallArg, Expr, ExprKind};
use typeforge_ir::typed::TypedProgram;
use typeforge_types::{judge, ParamInfo, Type, TypeArena, TypeId, Value};

use crate::context::{Checked, Checker};
use crate::error_reporter::{arity_error, invalid_type_expression, no_matching_overload, non_callable, spread_must_be_array};

impl<'r> Checker<'r> {
    /// `call_expr` must be an `ExprKind::Call` node; threaded whole (rather
    /// than split into callee/args) so a successful static match can
    /// re-evaluate the very same node speculatively instead of rebuilding a
    /// synthetic one.
    pub(crate) fn check_call(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        call_expr: &Expr,
    ) -> Result<Checked, Diagnostic> {
        let ExprKind::Call { callee, args } = call_expr.kind.as_ref() else {
            unreachable!("check_call called with a non-Call node");
        };
        let call_span = call_expr.span;

        // `.extends(U)`/`.annotation(A)` (spec.md §4.4) are reflective
        // operators shaped like method calls but not part of C5's plain
        // property table (which only handles no-argument properties).
        if let ExprKind::Property { object, name } = callee.kind.as_ref() {
            if name == "extends" || name == "annotation" {
                return self.check_reflective_call(arena, scopes, env, typed, object, name, args, call_span);
            }
        }

        let callee_checked = self.check_expr(arena, scopes, env, typed, callee, None)?;

        let signatures: Vec<TypeId> = match arena.get(callee_checked.ty).clone() {
            Type::Intersection(members) if members.iter().all(|&m| matches!(arena.get(m), Type::Function { .. })) => members,
            Type::Function { .. } => vec![callee_checked.ty],
            _ => return Err(non_callable(arena, callee_checked.ty, call_span)),
        };

        // §4.5.2: contextual typing for arguments only applies cleanly when
        // there is a single candidate signature; with overloads each
        // candidate is tried with arguments checked contextually against
        // *that* candidate's parameter types, so re-check per signature.
        let mut attempted = Vec::new();
        let mut matched_returns = Vec::new();
        let mut any_arg_comptime_only = false;
        let mut last_arg_checks: Option<Vec<Checked>> = None;

        for &sig in &signatures {
            let Type::Function { params, return_type, .. } = arena.get(sig).clone() else {
                continue;
            };
            attempted.push(sig);

            let arg_checks = match self.check_call_args(arena, scopes, env, typed, args, &params, call_span) {
                Ok(checks) => checks,
                Err(_) if signatures.len() > 1 => continue,
                Err(e) => return Err(e),
            };

            if !args_match_params(arena, &arg_checks, &params) {
                last_arg_checks = Some(arg_checks);
                if signatures.len() > 1 {
                    continue;
                }
                return Err(no_matching_overload(arena, &attempted, call_span));
            }

            any_arg_comptime_only = any_arg_comptime_only || arg_checks.iter().any(|c| c.comptime_only);
            matched_returns.push(resolve_method_return(arena, callee, &arg_checks, return_type));
            last_arg_checks = Some(arg_checks);
        }

        // No single signature matched every argument at once — before
        // giving up, see whether a union-typed argument can be distributed
        // across the candidates, each variant picking its own match.
        if matched_returns.is_empty() && signatures.len() > 1 {
            if let Some(arg_checks) = &last_arg_checks {
                if let Some(returns) = distribute_union_argument(arena, &signatures, arg_checks) {
                    any_arg_comptime_only = any_arg_comptime_only || arg_checks.iter().any(|c| c.comptime_only);
                    matched_returns = returns;
                }
            }
        }

        if matched_returns.is_empty() {
            return Err(no_matching_overload(arena, &attempted, call_span));
        }

        let return_type = if matched_returns.len() == 1 {
            matched_returns[0]
        } else {
            arena.make_union(matched_returns)
        };

        let comptime_only = callee_checked.comptime_only || judge::contains_metatype(arena, return_type);

        let comptime_value = if any_arg_comptime_only || comptime_only {
            self.speculative_eval(arena, scopes, env, call_expr)
        } else {
            None
        };

        Ok(Checked {
            ty: return_type,
            comptime_only,
            comptime_value,
        })
    }

    /// Checks each argument against its corresponding parameter's type as
    /// contextual type (§4.5.2), honoring optional/rest/spread counting
    /// (§4.5.4). Fixed-tuple spreads are expanded at check time; a spread
    /// of a variadic array contributes one check against the rest
    /// parameter's element type.
    fn check_call_args(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        args: &[CallArg],
        params: &[ParamInfo],
        call_span: Span,
    ) -> Result<Vec<Checked>, Diagnostic> {
        let mut checks = Vec::new();
        let mut pos = 0usize;
        let rest = params.iter().find(|p| p.rest).cloned();
        let fixed: Vec<&ParamInfo> = params.iter().filter(|p| !p.rest).collect();

        for arg in args {
            match arg {
                CallArg::Normal(expr) => {
                    let expected = fixed.get(pos).map(|p| p.ty).or(rest.as_ref().map(|r| r.ty));
                    let checked = self.check_expr(arena, scopes, env, typed, expr, expected)?;
                    checks.push(checked);
                    pos += 1;
                }
                CallArg::Spread(expr) => {
                    let spread_checked = self.check_expr(arena, scopes, env, typed, expr, None)?;
                    match arena.get(spread_checked.ty).clone() {
                        Type::Array { elements } if !elements.iter().any(|e| e.spread) => {
                            for e in elements {
                                checks.push(Checked::runtime(e.ty));
                                pos += 1;
                            }
                        }
                        Type::Array { elements } => {
                            let elem_ty = elements.iter().find(|e| e.spread).map(|e| e.ty).unwrap_or_else(|| arena.unknown());
                            checks.push(Checked::runtime(elem_ty));
                            pos += 1;
                        }
                        _ => return Err(spread_must_be_array(expr.span)),
                    }
                }
            }
        }

        let required = fixed.iter().filter(|p| !p.optional).count();
        if pos < required {
            return Err(arity_error(required, pos, call_span));
        }

        Ok(checks)
    }

    /// `.extends(U)`/`.annotation(A)` (spec.md §4.4 table): both require
    /// the receiver's concrete Type to be statically known, same
    /// restriction as Case 1 of §4.5.6's property dispatch.
    fn check_reflective_call(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        object: &Expr,
        name: &str,
        args: &[CallArg],
        call_span: Span,
    ) -> Result<Checked, Diagnostic> {
        let object_checked = self.check_expr(arena, scopes, env, typed, object, None)?;
        let Some(Value::TypeValue(receiver)) = object_checked.comptime_value else {
            return Err(invalid_type_expression(&format!("{name} on an unresolved type parameter"), call_span));
        };

        let [CallArg::Normal(arg_expr)] = args else {
            return Err(arity_error(1, args.len(), call_span));
        };
        let type_meta = arena.type_meta();
        let arg_checked = self.check_expr(arena, scopes, env, typed, arg_expr, Some(type_meta))?;
        let Some(Value::TypeValue(argument)) = arg_checked.comptime_value else {
            return Err(invalid_type_expression(&format!("{name} argument"), arg_expr.span));
        };

        let property = match name {
            "extends" => typeforge_eval::reflect::extends(arena, receiver, argument),
            _ => typeforge_eval::reflect::annotation(arena, receiver, argument, call_span)?,
        };
        let ty = typeforge_eval::infer_value_type(arena, &property.value);
        Ok(Checked {
            ty,
            comptime_only: !property.runtime_usable,
            comptime_value: Some(property.value),
        })
    }

    /// Re-evaluates `expr` with the evaluator for a concrete
    /// `comptimeValue`, swallowing failures (an expression that only
    /// statically looks comptime-only may still fail to reduce, e.g. fuel
    /// exhaustion) — logged rather than surfaced per
    /// `EngineOptions::log_swallowed_comptime_errors`.
    pub(crate) fn speculative_eval(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, expr: &Expr) -> Option<Value> {
        match self.evaluator.eval_expr(arena, scopes, env, expr) {
            Ok(v) => Some(v),
            Err(diag) => {
                if self.options.log_swallowed_comptime_errors {
                    tracing::debug!(?diag, "swallowed speculative comptime evaluation error");
                }
                None
            }
        }
    }
}

/// Whether every checked argument subtypes its matched parameter position,
/// honoring optional/rest. Union arguments match a signature iff every
/// variant subtypes the parameter (§4.5.4).
fn args_match_params(arena: &TypeArena, arg_checks: &[Checked], params: &[ParamInfo]) -> bool {
    let fixed: Vec<&ParamInfo> = params.iter().filter(|p| !p.rest).collect();
    let rest = params.iter().find(|p| p.rest);

    for (i, checked) in arg_checks.iter().enumerate() {
        let param_ty = match fixed.get(i) {
            Some(p) => p.ty,
            None => match rest {
                Some(r) => r.ty,
                None => return false,
            },
        };
        if !union_variants_subtype(arena, checked.ty, param_ty) {
            return false;
        }
    }

    let required = fixed.iter().filter(|p| !p.optional).count();
    arg_checks.len() >= required
}

fn union_variants_subtype(arena: &TypeArena, arg_ty: TypeId, param_ty: TypeId) -> bool {
    match arena.get(arg_ty) {
        Type::Union(members) => members.clone().iter().all(|&m| judge::is_subtype(arena, m, param_ty)),
        _ => judge::is_subtype(arena, arg_ty, param_ty),
    }
}

/// §4.5.4's union-argument distribution: when no single signature accepts
/// a union-typed argument against every signature at once (e.g. `String |
/// Int` against `((String) => Int) & ((Int) => String)`), each variant may
/// separately pick whichever signature it alone satisfies; the call's
/// return type is then the union of each variant's chosen return. Only the
/// first union-typed argument position is distributed — good enough for
/// the one-union-argument overloads this core's builtins and user-defined
/// intersections actually produce.
fn distribute_union_argument(arena: &TypeArena, signatures: &[TypeId], arg_checks: &[Checked]) -> Option<Vec<TypeId>> {
    let union_pos = arg_checks.iter().position(|c| matches!(arena.get(c.ty), Type::Union(_)))?;
    let Type::Union(variants) = arena.get(arg_checks[union_pos].ty).clone() else {
        return None;
    };

    let mut substituted = arg_checks.to_vec();
    let mut returns = Vec::with_capacity(variants.len());
    for variant in variants {
        substituted[union_pos].ty = variant;
        let matched_return = signatures.iter().find_map(|&sig| match arena.get(sig).clone() {
            Type::Function { params, return_type, .. } if args_match_params(arena, &substituted, &params) => Some(return_type),
            _ => None,
        })?;
        returns.push(matched_return);
    }
    Some(returns)
}

/// §4.5.4's generic-return post-pass: when the callee is a builtin
/// array-callback method (`map`, `filter`, …), replace its placeholder
/// return type with the one actually inferred for the callback argument.
fn resolve_method_return(arena: &mut TypeArena, callee: &Expr, arg_checks: &[Checked], declared_return: TypeId) -> TypeId {
    let ExprKind::Property { name, .. } = callee.kind.as_ref() else {
        return declared_return;
    };
    // Only map/flatMap/reduce actually need a post-pass: their static
    // return type depends on the callback's inferred return type.
    // filter/find/some/every/findIndex/flat are already typed correctly
    // from the receiver's element type by `properties::array_method_type`.
    if !matches!(name.as_str(), "map" | "flatMap" | "reduce") {
        return declared_return;
    }
    let Some(callback) = arg_checks.first() else {
        return declared_return;
    };

    match name.as_str() {
        "reduce" => arg_checks.get(1).map(|c| c.ty).unwrap_or(declared_return),
        "map" => {
            let Type::Function { return_type, .. } = arena.get(callback.ty).clone() else {
                return declared_return;
            };
            let elements = vec![typeforge_types::ArrayElement { ty: return_type, label: None, spread: true }];
            arena.make_array(elements)
        }
        "flatMap" => {
            let Type::Function { return_type, .. } = arena.get(callback.ty).clone() else {
                return declared_return;
            };
            let inner = match arena.get(return_type).clone() {
                Type::Array { elements } => {
                    let tys: Vec<TypeId> = elements.iter().map(|e| e.ty).collect();
                    arena.make_union(tys)
                }
                _ => return_type,
            };
            let elements = vec![typeforge_types::ArrayElement { ty: inner, label: None, spread: true }];
            arena.make_array(elements)
        }
        _ => declared_return,
    }
}
