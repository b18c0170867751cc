use super::*;
use typeforge_common::{EngineOptions, NodeId, Span};
use typeforge_env::{ComptimeStatus, ScopeArena, TypeBinding};
use typeforge_ir::core::{CallArg, Expr, ExprKind, Lambda, Literal, Param};
use typeforge_ir::typed::TypedProgram;
use typeforge_types::{ParamInfo, Type, TypeArena};

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

fn int_ann(id: u32) -> Expr {
    ident(id, "Int")
}

fn string_ann(id: u32) -> Expr {
    ident(id, "String")
}

/// `(x: Int): Int => x`
fn identity_lambda() -> Expr {
    e(
        10,
        ExprKind::Lambda(Lambda {
            params: vec![Param { name: "x".to_string(), type_ann: Some(int_ann(11)), default: None, optional: false, rest: false }],
            return_ann: Some(int_ann(12)),
            body: ident(13, "x"),
            is_async: false,
        }),
    )
}

fn call(id: u32, callee: Expr, args: Vec<CallArg>) -> Expr {
    e(id, ExprKind::Call { callee, args })
}

#[test]
fn calling_a_matching_lambda_returns_its_declared_return_type() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let expr = call(20, identity_lambda(), vec![CallArg::Normal(int_lit(21, 5))]);
    let checked = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &expr, None).unwrap();

    assert_eq!(checked.ty, arena.int());
}

#[test]
fn too_few_arguments_is_an_arity_error() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let expr = call(20, identity_lambda(), vec![]);
    let err = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &expr, None).unwrap_err();

    assert_eq!(err.code, typeforge_common::diagnostics::diagnostic_codes::ARITY_ERROR);
}

#[test]
fn wrong_argument_type_is_no_matching_overload() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let bad_arg = e(22, ExprKind::Literal(Literal::Str("nope".to_string())));
    let expr = call(20, identity_lambda(), vec![CallArg::Normal(bad_arg)]);
    let err = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &expr, None).unwrap_err();

    assert_eq!(err.code, typeforge_common::diagnostics::diagnostic_codes::NO_MATCHING_OVERLOAD);
}

#[test]
fn calling_a_non_function_value_is_rejected() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let expr = call(20, int_lit(0, 1), vec![]);
    let err = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &expr, None).unwrap_err();

    assert_eq!(err.code, typeforge_common::diagnostics::diagnostic_codes::NON_CALLABLE);
}

#[test]
fn union_argument_distributes_across_overloaded_signatures() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let string_ty = arena.string();
    let int_ty = arena.int();
    let string_to_int = arena.make_function(vec![ParamInfo { name: arena.intern_string("s"), ty: string_ty, optional: false, rest: false }], int_ty, false);
    let int_to_string = arena.make_function(vec![ParamInfo { name: arena.intern_string("n"), ty: int_ty, optional: false, rest: false }], string_ty, false);
    let overloaded = arena.make_intersection(vec![string_to_int, int_to_string]);
    bind_runtime(&mut arena, &mut scopes, env, "p", overloaded);

    let union_ty = arena.make_union(vec![string_ty, int_ty]);
    bind_runtime(&mut arena, &mut scopes, env, "x", union_ty);

    let expr = call(20, ident(21, "p"), vec![CallArg::Normal(ident(22, "x"))]);
    let checked = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &expr, None).unwrap();

    match arena.get(checked.ty) {
        Type::Union(members) => {
            assert_eq!(members.len(), 2);
            assert!(members.contains(&int_ty), "the String variant picks the (String) => Int signature");
            assert!(members.contains(&string_ty), "the Int variant picks the (Int) => String signature");
        }
        other => panic!("expected Int | String, got {other:?}"),
    }
}

fn bind_runtime(arena: &mut TypeArena, scopes: &mut ScopeArena, env: typeforge_common::EnvId, name: &str, ty: typeforge_types::TypeId) {
    let atom = arena.intern_string(name);
    scopes.define_type(env, atom, TypeBinding { ty, comptime_status: ComptimeStatus::Runtime });
}

#[test]
fn array_map_return_type_follows_the_callbacks_inferred_return() {
    let mut checker = new_checker();
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);
    let mut typed = TypedProgram::new(typeforge_ir::core::Program { decls: vec![] });

    let array_expr = e(0, ExprKind::Array { elements: vec![typeforge_ir::core::ArrayElem::Element(int_lit(1, 1))] });

    // `(x: Int): String => "s"` — map's callback turns each Int into a String.
    let stringify = e(
        30,
        ExprKind::Lambda(Lambda {
            params: vec![Param { name: "x".to_string(), type_ann: Some(int_ann(31)), default: None, optional: false, rest: false }],
            return_ann: Some(string_ann(32)),
            body: e(33, ExprKind::Literal(Literal::Str("s".to_string()))),
            is_async: false,
        }),
    );

    let map_callee = e(2, ExprKind::Property { object: array_expr, name: "map".to_string() });
    let expr = call(3, map_callee, vec![CallArg::Normal(stringify)]);

    let checked = checker.check_expr(&mut arena, &mut scopes, env, &mut typed, &expr, None).unwrap();

    match arena.get(checked.ty) {
        Type::Array { elements } => assert!(elements.iter().all(|el| el.ty == arena.string())),
        other => panic!("expected an Array<String>, got {other:?}"),
    }
}
