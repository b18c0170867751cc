//! §4.5.5 match-arm narrowing: binds each arm's pattern into its own child
//! scope, narrowing the bound name's static type (and, when the scrutinee's
//! concrete value is statically known, its `comptimeValue` too) before the
//! guard and body are checked. Mirrors `Evaluator`'s private `try_match`
//! (spec.md §4.3) at the type level instead of the value level — this is
//! why a destructured field's bound value is threaded through here when
//! available, the same way `try_match` threads concrete sub-values.

use typeforge_common::Span;
use typeforge_common::diagnostics::Diagnostic;
use typeforge_env::{ComptimeState, ComptimeStatus, ScopeArena, TypeBinding};
use typeforge_ir::core::{DestructureField, Literal, MatchArm, Pattern};
use typeforge_ir::typed::TypedProgram;
use typeforge_types::{judge, FieldInfo, LiteralValue, Type, TypeArena, TypeId, Value};

use crate::checker::Checker;
use crate::context::Checked;
use crate::error_reporter::{property_missing, type_mismatch};

pub fn check_match_arm(
    checker: &mut Checker<'_>,
    arena: &mut TypeArena,
    scopes: &mut ScopeArena,
    env: typeforge_common::EnvId,
    typed: &mut TypedProgram,
    scrutinee: &Checked,
    arm: &MatchArm,
    expected: Option<TypeId>,
) -> Result<Checked, Diagnostic> {
    let arm_env = scopes.extend(env);

    // `MatchArm`/`Pattern` carry no span of their own in the core grammar;
    // the arm's body is the nearest source location available for
    // diagnostics raised while binding the pattern.
    let fallback_span = arm.body.span;
    bind_pattern(checker, arena, scopes, arm_env, typed, &arm.pattern, scrutinee, fallback_span)?;

    if let Some(guard) = &arm.guard {
        let bool_ty = arena.boolean();
        let guard_checked = checker.check_expr(arena, scopes, arm_env, typed, guard, Some(bool_ty))?;
        if !judge::is_subtype(arena, guard_checked.ty, bool_ty) {
            return Err(type_mismatch(arena, guard_checked.ty, bool_ty, guard.span));
        }
    }

    checker.check_expr(arena, scopes, arm_env, typed, &arm.body, expected)
}

/// Binds `pattern` against `scrutinee` into `env`, returning the type the
/// pattern narrows its matched value to when it does (only a `Type`
/// pattern narrows; every other pattern returns `None` and leaves the
/// matched value's type as `scrutinee.ty`).
fn bind_pattern(
    checker: &mut Checker<'_>,
    arena: &mut TypeArena,
    scopes: &mut ScopeArena,
    env: typeforge_common::EnvId,
    typed: &mut TypedProgram,
    pattern: &Pattern,
    scrutinee: &Checked,
    fallback_span: Span,
) -> Result<Option<TypeId>, Diagnostic> {
    match pattern {
        Pattern::Wildcard => Ok(None),

        // A literal pattern matches structurally at evaluation time
        // (`try_match`); it introduces no binding and needs no static
        // compatibility check here (an always-false arm just never
        // matches at runtime, spec.md §4.3 pattern_exhaustion).
        Pattern::Literal(_) => Ok(None),

        Pattern::Type(ann_expr) => {
            let ty = checker.eval_type_annotation(arena, scopes, env, typed, ann_expr)?;
            Ok(Some(ty))
        }

        Pattern::Binding { name, nested } => {
            let narrowed_ty = match nested {
                Some(inner) => bind_pattern(checker, arena, scopes, env, typed, inner, scrutinee, fallback_span)?,
                None => None,
            };
            let bound = match narrowed_ty {
                Some(ty) => Checked {
                    ty,
                    comptime_only: scrutinee.comptime_only || judge::contains_metatype(arena, ty),
                    comptime_value: scrutinee.comptime_value.clone(),
                },
                None => scrutinee.clone(),
            };
            bind_name(arena, scopes, env, name, &bound);
            Ok(None)
        }

        Pattern::Destructure { fields } => {
            let structural = typeforge_types::unwrap_metadata(arena, scrutinee.ty);
            let record_fields = match arena.get(structural).clone() {
                Type::Record { fields: record_fields, .. } => record_fields,
                Type::Union(members) => {
                    union_destructure_fields(arena, &members, fields, fallback_span, scrutinee.ty)?
                }
                _ => return Err(property_missing("<destructure>", &typeforge_types::render_type(arena, scrutinee.ty), fallback_span)),
            };

            for field in fields {
                let field_ty = record_fields
                    .iter()
                    .find(|f| arena.resolve_atom(f.name) == field.name.as_str())
                    .map(|f| f.ty)
                    .ok_or_else(|| property_missing(&field.name, &typeforge_types::render_type(arena, scrutinee.ty), fallback_span))?;

                let field_checked = Checked {
                    ty: field_ty,
                    comptime_only: scrutinee.comptime_only,
                    comptime_value: extract_record_field_value(arena, &scrutinee.comptime_value, &field.name),
                };

                bind_destructure_field(checker, arena, scopes, env, typed, field, &field_checked, fallback_span)?;
            }
            Ok(None)
        }
    }
}

/// §4.5.5's union-destructure rule: filters `members` to the `Record`
/// variants whose field shapes are compatible with every requested
/// `field` (a literal-tag field like `kind: "ok"` must actually carry
/// that literal; any other field just needs to exist), then merges the
/// survivors' field lists so each requested field binds at the union of
/// the surviving variants' field types rather than the full union's.
fn union_destructure_fields(
    arena: &mut TypeArena,
    members: &[TypeId],
    fields: &[DestructureField],
    fallback_span: Span,
    scrutinee_ty: TypeId,
) -> Result<Vec<FieldInfo>, Diagnostic> {
    let surviving: Vec<Vec<FieldInfo>> = members
        .iter()
        .filter_map(|&member| {
            let member_structural = typeforge_types::unwrap_metadata(arena, member);
            match arena.get(member_structural).clone() {
                Type::Record { fields: record_fields, .. } if fields.iter().all(|f| field_shape_compatible(arena, &record_fields, f)) => {
                    Some(record_fields)
                }
                _ => None,
            }
        })
        .collect();

    if surviving.is_empty() {
        return Err(property_missing("<destructure>", &typeforge_types::render_type(arena, scrutinee_ty), fallback_span));
    }

    Ok(fields
        .iter()
        .map(|field| {
            let atom = arena.intern_string(&field.name);
            let member_tys: Vec<TypeId> = surviving
                .iter()
                .filter_map(|variant_fields| variant_fields.iter().find(|f| f.name == atom).map(|f| f.ty))
                .collect();
            let ty = if member_tys.len() == 1 { member_tys[0] } else { arena.make_union(member_tys) };
            let optional = surviving
                .iter()
                .any(|variant_fields| variant_fields.iter().find(|f| f.name == atom).is_some_and(|f| f.optional));
            FieldInfo { name: atom, ty, optional }
        })
        .collect())
}

/// Whether `record_fields` could plausibly match `field`: the field must
/// exist, and if `field`'s own nested pattern is a literal tag, the
/// variant's field type must actually admit that literal.
fn field_shape_compatible(arena: &TypeArena, record_fields: &[FieldInfo], field: &DestructureField) -> bool {
    let Some(field_ty) = record_fields.iter().find(|f| arena.resolve_atom(f.name) == field.name.as_str()).map(|f| f.ty) else {
        return false;
    };
    match &field.nested {
        Some(Pattern::Literal(lit)) => literal_compatible(arena, field_ty, lit),
        _ => true,
    }
}

fn literal_compatible(arena: &TypeArena, field_ty: TypeId, literal: &Literal) -> bool {
    match arena.get(field_ty) {
        Type::Literal { value, .. } => literal_value_matches(arena, value, literal),
        Type::Union(members) => members.iter().any(|&m| literal_compatible(arena, m, literal)),
        Type::Primitive(_) => true,
        _ => false,
    }
}

fn literal_value_matches(arena: &TypeArena, value: &LiteralValue, literal: &Literal) -> bool {
    match (value, literal) {
        (LiteralValue::Int(a), Literal::Int(b)) => a == b,
        (LiteralValue::Float(a), Literal::Float(b)) => a == b,
        (LiteralValue::Str(a), Literal::Str(b)) => arena.resolve_atom(*a) == b.as_str(),
        (LiteralValue::Bool(a), Literal::Bool(b)) => a == b,
        _ => false,
    }
}

fn bind_destructure_field(
    checker: &mut Checker<'_>,
    arena: &mut TypeArena,
    scopes: &mut ScopeArena,
    env: typeforge_common::EnvId,
    typed: &mut TypedProgram,
    field: &DestructureField,
    field_checked: &Checked,
    fallback_span: Span,
) -> Result<(), Diagnostic> {
    let bound_name = field.alias.as_deref().unwrap_or(&field.name);
    match &field.nested {
        Some(inner) => {
            let narrowed_ty = bind_pattern(checker, arena, scopes, env, typed, inner, field_checked, fallback_span)?;
            let bound = match narrowed_ty {
                Some(ty) => Checked {
                    ty,
                    comptime_only: field_checked.comptime_only || judge::contains_metatype(arena, ty),
                    comptime_value: field_checked.comptime_value.clone(),
                },
                None => field_checked.clone(),
            };
            bind_name(arena, scopes, env, bound_name, &bound);
        }
        None => bind_name(arena, scopes, env, bound_name, field_checked),
    }
    Ok(())
}

fn extract_record_field_value(arena: &TypeArena, parent: &Option<Value>, field_name: &str) -> Option<Value> {
    match parent {
        Some(Value::Record(fields)) => fields.iter().find(|(name, _)| arena.resolve_atom(*name) == field_name).map(|(_, v)| v.clone()),
        _ => None,
    }
}

fn bind_name(arena: &mut TypeArena, scopes: &mut ScopeArena, env: typeforge_common::EnvId, name: &str, checked: &Checked) {
    let atom = arena.intern_string(name);
    let comptime_only = checked.comptime_only || judge::contains_metatype(arena, checked.ty);

    match &checked.comptime_value {
        Some(value) => {
            let status = if comptime_only { ComptimeStatus::ComptimeOnly } else { ComptimeStatus::Comptime };
            scopes.define_type(env, atom, TypeBinding { ty: checked.ty, comptime_status: status });
            scopes.define_comptime(env, atom, ComptimeState::Evaluated(value.clone()));
        }
        None => {
            scopes.define_type(env, atom, TypeBinding { ty: checked.ty, comptime_status: ComptimeStatus::Runtime });
        }
    }
}
