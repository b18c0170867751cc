use super::*;
use typeforge_common::{NodeId, Span};
use typeforge_ir::{core, runtime};
use typeforge_ir::typed::{DeclInfo, ExprInfo, TypedProgram};
use typeforge_types::{FieldInfo, Raw, TypeArena, Value};

fn e(id: u32, kind: core::ExprKind) -> core::Expr {
    core::Expr { id: NodeId(id), span: Span::new(id, id + 1), kind: Box::new(kind) }
}

#[test]
fn comptime_only_const_decl_is_dropped() {
    let arena = TypeArena::new();
    let program = core::Program {
        decls: vec![core::Decl::Const(core::ConstDecl {
            id: NodeId(0),
            span: Span::new(0, 1),
            name: "T".to_string(),
            type_ann: None,
            init: e(1, core::ExprKind::Identifier("Int".to_string())),
            comptime: true,
            exported: false,
        })],
    };
    let mut typed = TypedProgram::new(program);
    typed.record_decl(NodeId(0), DeclInfo { decl_type: arena.type_meta(), comptime_only: true });

    let runtime_program = erase_program(&typed, &arena);

    assert!(runtime_program.decls.is_empty());
}

#[test]
fn runtime_const_with_known_value_is_inlined_to_a_literal() {
    let arena = TypeArena::new();
    let init = e(
        1,
        core::ExprKind::Binary {
            op: core::BinOp::Add,
            left: e(2, core::ExprKind::Literal(core::Literal::Int(1))),
            right: e(3, core::ExprKind::Literal(core::Literal::Int(2))),
        },
    );
    let program = core::Program {
        decls: vec![core::Decl::Const(core::ConstDecl {
            id: NodeId(0),
            span: Span::new(0, 1),
            name: "x".to_string(),
            type_ann: None,
            init,
            comptime: false,
            exported: false,
        })],
    };
    let mut typed = TypedProgram::new(program);
    typed.record_decl(NodeId(0), DeclInfo { decl_type: arena.int(), comptime_only: false });
    typed.record_expr(NodeId(1), ExprInfo { ty: arena.int(), comptime_only: false, comptime_value: Some(Value::Scalar(Raw::Int(3))) });

    let runtime_program = erase_program(&typed, &arena);

    match &runtime_program.decls[0] {
        runtime::Decl::Const(c) => match c.init.kind.as_ref() {
            runtime::ExprKind::Literal(runtime::Literal::Int(v)) => assert_eq!(*v, 3),
            other => panic!("expected an inlined Int literal, got {other:?}"),
        },
        other => panic!("expected a Const decl, got {other:?}"),
    }
}

#[test]
fn call_argument_whose_type_is_a_type_value_is_filtered_out() {
    let arena = TypeArena::new();
    let callee = e(0, core::ExprKind::Identifier("f".to_string()));
    let type_arg = e(1, core::ExprKind::Identifier("Int".to_string()));
    let value_arg = e(2, core::ExprKind::Literal(core::Literal::Int(5)));
    let call_expr = e(
        3,
        core::ExprKind::Call { callee, args: vec![core::CallArg::Normal(type_arg), core::CallArg::Normal(value_arg)] },
    );

    let program = core::Program { decls: vec![core::Decl::Expr(core::ExprStmt { id: NodeId(4), span: Span::new(4, 5), expr: call_expr })] };
    let mut typed = TypedProgram::new(program);
    typed.record_expr(NodeId(3), ExprInfo { ty: arena.unknown(), comptime_only: false, comptime_value: None });
    typed.record_expr(NodeId(1), ExprInfo { ty: arena.type_meta(), comptime_only: true, comptime_value: Some(Value::TypeValue(arena.int())) });
    typed.record_expr(NodeId(2), ExprInfo { ty: arena.int(), comptime_only: false, comptime_value: Some(Value::Scalar(Raw::Int(5))) });

    let runtime_program = erase_program(&typed, &arena);

    match &runtime_program.decls[0] {
        runtime::Decl::Expr(s) => match s.expr.kind.as_ref() {
            runtime::ExprKind::Call { args, .. } => {
                assert_eq!(args.len(), 1);
                match &args[0] {
                    runtime::CallArg::Normal(a) => match a.kind.as_ref() {
                        runtime::ExprKind::Literal(runtime::Literal::Int(v)) => assert_eq!(*v, 5),
                        other => panic!("expected the surviving argument inlined to 5, got {other:?}"),
                    },
                    other => panic!("expected a Normal arg, got {other:?}"),
                }
            }
            other => panic!("expected a Call, got {other:?}"),
        },
        other => panic!("expected an Expr decl, got {other:?}"),
    }
}

#[test]
fn conditional_with_known_true_condition_collapses_to_then_branch() {
    let arena = TypeArena::new();
    let cond = e(0, core::ExprKind::Literal(core::Literal::Bool(true)));
    let then_branch = e(1, core::ExprKind::Literal(core::Literal::Int(1)));
    let else_branch = e(2, core::ExprKind::Literal(core::Literal::Int(2)));
    let cond_expr = e(3, core::ExprKind::Conditional { condition: cond, then_branch, else_branch });

    let program = core::Program { decls: vec![core::Decl::Expr(core::ExprStmt { id: NodeId(4), span: Span::new(4, 5), expr: cond_expr })] };
    let mut typed = TypedProgram::new(program);
    typed.record_expr(NodeId(3), ExprInfo { ty: arena.int(), comptime_only: false, comptime_value: None });
    typed.record_expr(NodeId(0), ExprInfo { ty: arena.boolean(), comptime_only: false, comptime_value: Some(Value::Scalar(Raw::Bool(true))) });

    let runtime_program = erase_program(&typed, &arena);

    match &runtime_program.decls[0] {
        runtime::Decl::Expr(s) => match s.expr.kind.as_ref() {
            runtime::ExprKind::Literal(runtime::Literal::Int(v)) => assert_eq!(*v, 1),
            other => panic!("expected the collapsed then-branch literal, got {other:?}"),
        },
        other => panic!("expected an Expr decl, got {other:?}"),
    }
}

#[test]
fn lambda_type_parameter_is_filtered_out_of_erased_params() {
    let arena = TypeArena::new();
    let typeof_call = e(
        10,
        core::ExprKind::Call {
            callee: e(11, core::ExprKind::Identifier("typeOf".to_string())),
            args: vec![core::CallArg::Normal(e(12, core::ExprKind::Identifier("x".to_string())))],
        },
    );
    let lambda = core::Lambda {
        params: vec![
            core::Param {
                name: "T".to_string(),
                type_ann: Some(e(13, core::ExprKind::Identifier("Type".to_string()))),
                default: Some(typeof_call),
                optional: false,
                rest: false,
            },
            core::Param { name: "x".to_string(), type_ann: Some(e(14, core::ExprKind::Identifier("T".to_string()))), default: None, optional: false, rest: false },
        ],
        return_ann: None,
        body: e(15, core::ExprKind::Identifier("x".to_string())),
        is_async: false,
    };
    let lambda_expr = e(16, core::ExprKind::Lambda(lambda));

    let program = core::Program {
        decls: vec![core::Decl::Const(core::ConstDecl {
            id: NodeId(17),
            span: Span::new(17, 18),
            name: "identity".to_string(),
            type_ann: None,
            init: lambda_expr,
            comptime: false,
            exported: false,
        })],
    };
    let mut typed = TypedProgram::new(program);
    typed.record_decl(NodeId(17), DeclInfo { decl_type: arena.unknown(), comptime_only: false });
    typed.record_expr(NodeId(16), ExprInfo { ty: arena.unknown(), comptime_only: false, comptime_value: None });

    let runtime_program = erase_program(&typed, &arena);

    match &runtime_program.decls[0] {
        runtime::Decl::Const(c) => match c.init.kind.as_ref() {
            runtime::ExprKind::Lambda(l) => {
                assert_eq!(l.params.len(), 1);
                assert_eq!(l.params[0].name, "x");
            }
            other => panic!("expected a Lambda, got {other:?}"),
        },
        other => panic!("expected a Const decl, got {other:?}"),
    }
}

#[test]
fn type_pattern_over_a_record_lowers_to_a_destructure() {
    let mut arena = TypeArena::new();
    let field_name = arena.intern_string("a");
    let record_ty = arena.make_record(vec![FieldInfo { name: field_name, ty: arena.int(), optional: false }], None, true);

    let ann_expr = e(0, core::ExprKind::Identifier("Point".to_string()));
    let arm = core::MatchArm { pattern: core::Pattern::Type(ann_expr), guard: None, body: e(1, core::ExprKind::Literal(core::Literal::Int(0))) };
    let scrutinee = e(2, core::ExprKind::Identifier("p".to_string()));
    let match_expr = e(3, core::ExprKind::Match { scrutinee, arms: vec![arm] });

    let program = core::Program { decls: vec![core::Decl::Expr(core::ExprStmt { id: NodeId(4), span: Span::new(4, 5), expr: match_expr })] };
    let mut typed = TypedProgram::new(program);
    typed.record_expr(NodeId(3), ExprInfo { ty: arena.int(), comptime_only: false, comptime_value: None });
    typed.record_expr(NodeId(0), ExprInfo { ty: arena.type_meta(), comptime_only: true, comptime_value: Some(Value::TypeValue(record_ty)) });

    let runtime_program = erase_program(&typed, &arena);

    match &runtime_program.decls[0] {
        runtime::Decl::Expr(s) => match s.expr.kind.as_ref() {
            runtime::ExprKind::Match { arms, .. } => match &arms[0].pattern {
                runtime::Pattern::Destructure { fields } => {
                    assert_eq!(fields.len(), 1);
                    assert_eq!(fields[0].name, "a");
                }
                other => panic!("expected a Destructure pattern, got {other:?}"),
            },
            other => panic!("expected a Match, got {other:?}"),
        },
        other => panic!("expected an Expr decl, got {other:?}"),
    }
}
