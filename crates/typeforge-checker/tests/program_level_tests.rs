//! Whole-`Program` behavior of `check_program` (spec.md §4.5.1: "collecting
//! a diagnostic per failing declaration rather than aborting the whole
//! program at the first error") — each unit test elsewhere in this crate
//! exercises one declaration in isolation; this file exercises more than
//! one declaration going through `check_program` together.

use typeforge_checker::{check_program, Checker, NullModuleResolver};
use typeforge_common::{EngineOptions, NodeId, Span};
use typeforge_ir::core::{ConstDecl, Decl, Expr, ExprKind, Literal, Program};
use typeforge_ir::typed::TypedProgram;
use typeforge_types::TypeArena;

fn e(id: u32, kind: ExprKind) -> Expr {
    Expr { id: NodeId(id), span: Span::new(id, id + 1), kind: Box::new(kind) }
}

#[test]
fn a_failing_declaration_does_not_stop_its_siblings_from_being_checked() {
    static RESOLVER: NullModuleResolver = NullModuleResolver;
    let mut checker = Checker::new(EngineOptions::default(), &RESOLVER);
    let mut arena = TypeArena::new();
    let mut scopes = typeforge_env::ScopeArena::new();
    let env = scopes.root();
    typeforge_eval::install(&mut arena, &mut scopes, env);

    let program = Program {
        decls: vec![
            Decl::Const(ConstDecl {
                id: NodeId(0),
                span: Span::new(0, 1),
                name: "ok".to_string(),
                type_ann: None,
                init: e(1, ExprKind::Literal(Literal::Int(1))),
                comptime: false,
                exported: false,
            }),
            Decl::Const(ConstDecl {
                id: NodeId(2),
                span: Span::new(2, 3),
                name: "bad".to_string(),
                type_ann: Some(e(3, ExprKind::Identifier("String".to_string()))),
                init: e(4, ExprKind::Literal(Literal::Int(1))),
                comptime: false,
                exported: false,
            }),
        ],
    };

    let mut typed = TypedProgram::new(program.clone());
    let result = check_program(&mut checker, &mut arena, &mut scopes, env, &mut typed, &program);

    let errors = result.expect_err("the second decl is a type mismatch");
    assert_eq!(errors.len(), 1);
    assert!(typed.decl_info(NodeId(0)).is_some(), "the first, well-typed decl still gets recorded");
    assert!(typed.decl_info(NodeId(2)).is_none(), "the failing decl records nothing");
}
