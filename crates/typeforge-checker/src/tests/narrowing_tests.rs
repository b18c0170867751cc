use super::*;
use typeforge_common::{EngineOptions, NodeId, Span};
use typeforge_ir::core::{DestructureField, Expr, ExprKind, Literal, MatchArm, Pattern, RecordField};
use typeforge_ir::typed::TypedProgram;
use typeforge_types::TypeArena;

static RESOLVER: NullModuleResolver = NullModuleResolver;

fn new_checker() -> Checker<'static> {
    Checker::new(EngineOptions::default(), &RESOLVER)
}

fn e(id: u32, kind: ExprKind) -> Expr {
    Expr { id: NodeId(id), span: Span::new(id, id + 1), kind: Box::new(kind) }
}

fn ident(id: u32, name: &str) -> Expr {
    e(id, ExprKind::Identifier(name.to_string()))
}

fn int_lit(id: u32, v: i64) -> Expr {
    e(id, ExprKind::Literal(Literal::Int(v)))
}

#[test]
fn binding_pattern_makes_scrutinee_visible_in_body() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let scrutinee_expr = int_lit(0, 42);
    let scrutinee = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &scrutinee_expr, None).unwrap();

    let arm = MatchArm {
        pattern: Pattern::Binding { name: "x".to_string(), nested: None },
        guard: None,
        body: ident(1, "x"),
    };

    let result = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap();
    assert_eq!(result.ty, scrutinee.ty);
    assert_eq!(result.comptime_value, scrutinee.comptime_value);
}

#[test]
fn type_pattern_narrows_bound_name_to_the_annotation() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let scrutinee_expr = int_lit(0, 7);
    let scrutinee = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &scrutinee_expr, None).unwrap();

    let arm = MatchArm {
        pattern: Pattern::Binding {
            name: "n".to_string(),
            nested: Some(Box::new(Pattern::Type(ident(2, "Int")))),
        },
        guard: None,
        body: ident(1, "n"),
    };

    let result = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap();
    assert_eq!(result.ty, arena.int());
}

#[test]
fn destructure_pattern_over_a_union_filters_to_compatible_variants() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let ok_kind = arena.make_literal(typeforge_types::LiteralValue::Str(arena.intern_string("ok")));
    let err_kind = arena.make_literal(typeforge_types::LiteralValue::Str(arena.intern_string("err")));
    let int_ty = arena.int();
    let string_ty = arena.string();
    let ok_variant = arena.make_record(
        vec![
            typeforge_types::FieldInfo { name: arena.intern_string("kind"), ty: ok_kind, optional: false },
            typeforge_types::FieldInfo { name: arena.intern_string("value"), ty: int_ty, optional: false },
        ],
        None,
        true,
    );
    let err_variant = arena.make_record(
        vec![
            typeforge_types::FieldInfo { name: arena.intern_string("kind"), ty: err_kind, optional: false },
            typeforge_types::FieldInfo { name: arena.intern_string("message"), ty: string_ty, optional: false },
        ],
        None,
        true,
    );
    let scrutinee = Checked { ty: arena.make_union(vec![ok_variant, err_variant]), comptime_only: false, comptime_value: None };

    let arm = MatchArm {
        pattern: Pattern::Destructure {
            fields: vec![
                DestructureField { name: "kind".to_string(), alias: None, nested: Some(Pattern::Literal(Literal::Str("ok".to_string()))) },
                DestructureField { name: "value".to_string(), alias: None, nested: None },
            ],
        },
        guard: None,
        body: ident(2, "value"),
    };

    let result = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap();
    assert_eq!(result.ty, arena.int(), "the err variant is filtered out, so value narrows to plain Int, not Int | Undefined");
}

#[test]
fn literal_pattern_binds_nothing_and_just_checks_the_body() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let scrutinee_expr = int_lit(0, 1);
    let scrutinee = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &scrutinee_expr, None).unwrap();

    let arm = MatchArm {
        pattern: Pattern::Literal(Literal::Int(1)),
        guard: None,
        body: e(1, ExprKind::Literal(Literal::Bool(true))),
    };

    let result = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap();
    assert_eq!(result.ty, arena.make_literal(typeforge_types::LiteralValue::Bool(true)));
}

#[test]
fn destructure_pattern_binds_field_by_alias() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let scrutinee_expr = e(
        0,
        ExprKind::Record {
            fields: vec![RecordField::Field { name: "x".to_string(), value: int_lit(1, 10) }],
        },
    );
    let scrutinee = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &scrutinee_expr, None).unwrap();

    let arm = MatchArm {
        pattern: Pattern::Destructure {
            fields: vec![DestructureField { name: "x".to_string(), alias: Some("renamed".to_string()), nested: None }],
        },
        guard: None,
        body: ident(2, "renamed"),
    };

    let result = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap();
    assert_eq!(result.ty, arena.int());
}

#[test]
fn destructure_pattern_on_a_non_record_scrutinee_is_rejected() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let scrutinee_expr = int_lit(0, 10);
    let scrutinee = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &scrutinee_expr, None).unwrap();

    let arm = MatchArm {
        pattern: Pattern::Destructure {
            fields: vec![DestructureField { name: "x".to_string(), alias: None, nested: None }],
        },
        guard: None,
        body: int_lit(1, 0),
    };

    let err = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap_err();
    assert_eq!(err.code, typeforge_common::diagnostics::diagnostic_codes::PROPERTY_MISSING);
}

#[test]
fn guard_must_be_boolean() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let scrutinee_expr = int_lit(0, 1);
    let scrutinee = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &scrutinee_expr, None).unwrap();

    let arm = MatchArm {
        pattern: Pattern::Binding { name: "n".to_string(), nested: None },
        guard: Some(int_lit(2, 0)),
        body: int_lit(1, 0),
    };

    let err = crate::narrowing::check_match_arm(&mut checker, &mut arena, &mut scopes, env, &mut typed, &scrutinee, &arm, None).unwrap_err();
    assert_eq!(err.code, typeforge_common::diagnostics::diagnostic_codes::TYPE_MISMATCH);
}
