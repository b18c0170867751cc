//! End-to-end generic-default-argument elision (spec.md §8 scenario 6):
//! `id(42)` where `id = <T>(x: T) => x` passes one runtime argument in the
//! runtime IR, with the trailing `T` parameter and argument dropped. The
//! unit tests in `src/tests/erase_tests.rs` exercise the lambda side and
//! the call side independently; this file runs both through
//! `erase_program` together, in one `Program`, the way a desugared source
//! file would actually present them.

use typeforge_common::{NodeId, Span};
use typeforge_ir::core::{CallArg, ConstDecl, Decl, Expr, ExprKind, ExprStmt, Lambda, Literal, Param, Program};
use typeforge_ir::runtime;
use typeforge_ir::typed::{DeclInfo, ExprInfo, TypedProgram};
use typeforge_types::{TypeArena, Value};

fn e(id: u32, kind: ExprKind) -> Expr {
    Expr { id: NodeId(id), span: Span::new(id, id + 1), kind: Box::new(kind) }
}

#[test]
fn a_generic_identity_lambda_and_its_call_both_lose_their_type_parameter() {
    let arena = TypeArena::new();

    let typeof_call = e(
        0,
        ExprKind::Call {
            callee: e(1, ExprKind::Identifier("typeOf".to_string())),
            args: vec![CallArg::Normal(e(2, ExprKind::Identifier("x".to_string())))],
        },
    );
    let lambda = Lambda {
        params: vec![
            Param { name: "T".to_string(), type_ann: Some(e(3, ExprKind::Identifier("Type".to_string()))), default: Some(typeof_call), optional: false, rest: false },
            Param { name: "x".to_string(), type_ann: Some(e(4, ExprKind::Identifier("T".to_string()))), default: None, optional: false, rest: false },
        ],
        return_ann: None,
        body: e(5, ExprKind::Identifier("x".to_string())),
        is_async: false,
    };
    let id_decl = Decl::Const(ConstDecl {
        id: NodeId(6),
        span: Span::new(6, 7),
        name: "id".to_string(),
        type_ann: None,
        init: e(7, ExprKind::Lambda(lambda)),
        comptime: false,
        exported: false,
    });

    let call_expr = e(
        8,
        ExprKind::Call {
            callee: e(9, ExprKind::Identifier("id".to_string())),
            args: vec![
                CallArg::Normal(e(10, ExprKind::Identifier("Int".to_string()))),
                CallArg::Normal(e(11, ExprKind::Literal(Literal::Int(42)))),
            ],
        },
    );
    let call_decl = Decl::Expr(ExprStmt { id: NodeId(12), span: Span::new(12, 13), expr: call_expr });

    let program = Program { decls: vec![id_decl, call_decl] };
    let mut typed = TypedProgram::new(program);
    typed.record_decl(NodeId(6), DeclInfo { decl_type: arena.unknown(), comptime_only: false });
    typed.record_expr(NodeId(7), ExprInfo { ty: arena.unknown(), comptime_only: false, comptime_value: None });
    typed.record_expr(NodeId(8), ExprInfo { ty: arena.int(), comptime_only: false, comptime_value: None });
    typed.record_expr(NodeId(10), ExprInfo { ty: arena.type_meta(), comptime_only: true, comptime_value: Some(Value::TypeValue(arena.int())) });
    typed.record_expr(NodeId(11), ExprInfo { ty: arena.int(), comptime_only: false, comptime_value: Some(Value::Scalar(typeforge_types::Raw::Int(42))) });

    let runtime_program = typeforge_lower::erase_program(&typed, &arena);

    assert_eq!(runtime_program.decls.len(), 2);
    match &runtime_program.decls[0] {
        runtime::Decl::Const(c) => match c.init.kind.as_ref() {
            runtime::ExprKind::Lambda(l) => {
                assert_eq!(l.params.len(), 1, "the T parameter is dropped");
                assert_eq!(l.params[0].name, "x");
            }
            other => panic!("expected the id lambda, got {other:?}"),
        },
        other => panic!("expected a Const decl, got {other:?}"),
    }
    match &runtime_program.decls[1] {
        runtime::Decl::Expr(s) => match s.expr.kind.as_ref() {
            runtime::ExprKind::Call { args, .. } => {
                assert_eq!(args.len(), 1, "the materialized Int type argument is dropped");
                match &args[0] {
                    runtime::CallArg::Normal(a) => match a.kind.as_ref() {
                        runtime::ExprKind::Literal(runtime::Literal::Int(v)) => assert_eq!(*v, 42),
                        other => panic!("expected the surviving argument inlined to 42, got {other:?}"),
                    },
                    other => panic!("expected a Normal arg, got {other:?}"),
                }
            }
            other => panic!("expected a Call, got {other:?}"),
        },
        other => panic!("expected an Expr decl, got {other:?}"),
    }
}
