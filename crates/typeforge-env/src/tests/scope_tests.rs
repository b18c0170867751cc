use super::*;
use typeforge_common::{Atom, NodeId, Span};
use typeforge_ir::core::{Expr, ExprKind, Literal};
use typeforge_types::{Raw, TypeArena, Value};

fn atom(arena: &mut TypeArena, s: &str) -> Atom {
    arena.intern_string(s)
}

fn dummy_expr() -> Expr {
    Expr {
        id: NodeId(0),
        span: Span::dummy(),
        kind: Box::new(ExprKind::Literal(Literal::Int(0))),
    }
}

#[test]
fn lookup_walks_up_to_parent_scope() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "x");
    scopes.define_type(
        root,
        name,
        TypeBinding {
            ty: arena.int(),
            comptime_status: ComptimeStatus::Runtime,
        },
    );
    let child = scopes.extend(root);
    let found = scopes.lookup_type(child, name).expect("inherited binding");
    assert_eq!(found.ty, arena.int());
}

#[test]
fn child_shadowing_does_not_affect_parent() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "x");
    scopes.define_type(
        root,
        name,
        TypeBinding {
            ty: arena.int(),
            comptime_status: ComptimeStatus::Runtime,
        },
    );
    let child = scopes.extend(root);
    scopes.define_type(
        child,
        name,
        TypeBinding {
            ty: arena.string(),
            comptime_status: ComptimeStatus::Runtime,
        },
    );
    assert_eq!(scopes.lookup_type(child, name).unwrap().ty, arena.string());
    assert_eq!(scopes.lookup_type(root, name).unwrap().ty, arena.int());
}

#[test]
fn update_without_prior_define_is_rejected() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "x");
    let err = scopes.update_type(
        root,
        name,
        TypeBinding {
            ty: arena.int(),
            comptime_status: ComptimeStatus::Runtime,
        },
    );
    assert!(matches!(err, Err(EnvError::UpdateWithoutDefine)));
}

#[test]
fn update_after_define_replaces_tentative_binding() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "fac");
    scopes.define_type(
        root,
        name,
        TypeBinding {
            ty: arena.unknown(),
            comptime_status: ComptimeStatus::Runtime,
        },
    );
    scopes
        .update_type(
            root,
            name,
            TypeBinding {
                ty: arena.int(),
                comptime_status: ComptimeStatus::Runtime,
            },
        )
        .expect("update of pre-registered binding");
    assert_eq!(scopes.lookup_type(root, name).unwrap().ty, arena.int());
}

#[test]
fn begin_evaluation_twice_signals_cycle() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "a");
    scopes.define_comptime(
        root,
        name,
        ComptimeState::Unevaluated {
            expr: dummy_expr(),
            captured_env: root,
        },
    );
    scopes.begin_evaluation(root, name).expect("first entry into evaluating");
    let err = scopes.begin_evaluation(root, name);
    assert!(matches!(err, Err(EnvError::Cycle)));
}

#[test]
fn evaluation_transitions_are_recorded_in_owning_scope() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "a");
    scopes.define_comptime(
        root,
        name,
        ComptimeState::Unevaluated {
            expr: dummy_expr(),
            captured_env: root,
        },
    );
    let child = scopes.extend(root);
    let owner = scopes.lookup_comptime_owner(child, name).expect("owner found via parent");
    assert_eq!(owner, root);

    scopes.begin_evaluation(owner, name).unwrap();
    scopes.complete_evaluation(owner, name, Value::Scalar(Raw::Int(120)));

    match scopes.comptime_state(root, name) {
        Some(ComptimeState::Evaluated(Value::Scalar(Raw::Int(120)))) => {}
        other => panic!("unexpected state: {other:?}"),
    }
}

#[test]
fn failed_evaluation_marks_unavailable_and_sticks() {
    let mut arena = TypeArena::new();
    let mut scopes = ScopeArena::new();
    let root = scopes.root();
    let name = atom(&mut arena, "param");
    scopes.define_comptime(
        root,
        name,
        ComptimeState::Unevaluated {
            expr: dummy_expr(),
            captured_env: root,
        },
    );
    scopes.begin_evaluation(root, name).unwrap();
    scopes.mark_unavailable(root, name);
    assert!(matches!(scopes.comptime_state(root, name), Some(ComptimeState::Unavailable)));
}
