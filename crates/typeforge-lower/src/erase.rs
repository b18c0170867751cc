//! §4.6 erasure: walks a checked program and produces the compile-time-free
//! runtime IR. Grounded on the checker's own `check_expr` dispatcher shape
//! (one arm per `ExprKind`, recursing into every child) — erasure is the
//! same traversal with a different question at each node: keep, inline, or
//! drop.

use rustc_hash::FxHashSet;
use typeforge_common::{NodeId, NodeIdGen, Span};
use typeforge_ir::core;
use typeforge_ir::runtime;
use typeforge_ir::typed::TypedProgram;
use typeforge_types::{runtime_usable, LiteralValue, Raw, Type, TypeArena, Value};

/// Lowers the whole program. `typed.core` is walked alongside `typed`'s
/// side tables (the per-node `comptimeOnly`/`comptimeValue` info the
/// checker recorded); fresh nodes synthesized along the way (inlined
/// literal trees) get ids past every id the source tree already used.
pub fn erase_program(typed: &TypedProgram, arena: &TypeArena) -> runtime::Program {
    let mut ids = NodeIdGen::starting_after(highest_id(&typed.core));
    let decls = typed.core.decls.iter().filter_map(|decl| erase_decl(typed, arena, &mut ids, decl)).collect();
    runtime::Program { decls }
}

fn erase_decl(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, decl: &core::Decl) -> Option<runtime::Decl> {
    match decl {
        core::Decl::Const(c) => erase_const_decl(typed, arena, ids, c).map(runtime::Decl::Const),
        core::Decl::Import(i) => Some(runtime::Decl::Import(erase_import(i))),
        core::Decl::Expr(s) => erase_expr_stmt(typed, arena, ids, s).map(runtime::Decl::Expr),
    }
}

/// Shared between `Decl::Const` and `Stmt::Const`, which carry the same
/// `ConstDecl` shape. Drops the declaration entirely when it is
/// comptime-only (spec.md §4.6 "Declaration").
fn erase_const_decl(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, decl: &core::ConstDecl) -> Option<runtime::ConstDecl> {
    let comptime_only = typed
        .decl_info(decl.id)
        .map(|info| info.comptime_only)
        .expect("every declaration in a checked program has recorded decl info");
    if comptime_only {
        return None;
    }
    Some(runtime::ConstDecl {
        id: decl.id,
        span: decl.span,
        name: decl.name.clone(),
        init: erase_expr(typed, arena, ids, &decl.init),
        exported: decl.exported,
    })
}

fn erase_expr_stmt(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, stmt: &core::ExprStmt) -> Option<runtime::ExprStmt> {
    let comptime_only = typed
        .expr_info(stmt.expr.id)
        .map(|info| info.comptime_only)
        .expect("every expression in a checked program has recorded expr info");
    if comptime_only {
        return None;
    }
    Some(runtime::ExprStmt { id: stmt.id, span: stmt.span, expr: erase_expr(typed, arena, ids, &stmt.expr) })
}

fn erase_import(decl: &core::ImportDecl) -> runtime::ImportDecl {
    runtime::ImportDecl {
        id: decl.id,
        span: decl.span,
        specifier: decl.specifier.clone(),
        clause: erase_import_clause(&decl.clause),
    }
}

fn erase_import_clause(clause: &core::ImportClause) -> runtime::ImportClause {
    match clause {
        core::ImportClause::Default(name) => runtime::ImportClause::Default(name.clone()),
        core::ImportClause::Named(specs) => runtime::ImportClause::Named(
            specs.iter().map(|s| runtime::ImportSpecifier { imported: s.imported.clone(), local: s.local.clone() }).collect(),
        ),
        core::ImportClause::Namespace(name) => runtime::ImportClause::Namespace(name.clone()),
    }
}

/// Erases one expression. An expression with a known `comptimeValue` whose
/// type is runtime-usable is replaced wholesale by an inlined literal tree
/// (spec.md §4.6 "Expression") — except closures and builtins, which have
/// no literal form even when their function type is structurally
/// runtime-usable. Everything else recurses structurally.
fn erase_expr(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, expr: &core::Expr) -> runtime::Expr {
    if let Some(info) = typed.expr_info(expr.id) {
        if let Some(value) = &info.comptime_value {
            if can_inline(value) && runtime_usable(arena, info.ty) {
                return inline_expr(ids, expr.id, expr.span, arena, value);
            }
        }
    }
    erase_expr_structurally(typed, arena, ids, expr)
}

fn can_inline(value: &Value) -> bool {
    matches!(value, Value::Scalar(_) | Value::Record(_) | Value::Array(_))
}

fn erase_expr_structurally(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, expr: &core::Expr) -> runtime::Expr {
    if let core::ExprKind::Conditional { condition, then_branch, else_branch } = expr.kind.as_ref() {
        return erase_conditional(typed, arena, ids, expr.id, expr.span, condition, then_branch, else_branch);
    }

    let kind = match expr.kind.as_ref() {
        core::ExprKind::Literal(lit) => runtime::ExprKind::Literal(lit.clone()),
        core::ExprKind::Identifier(name) => runtime::ExprKind::Identifier(name.clone()),
        core::ExprKind::Binary { op, left, right } => runtime::ExprKind::Binary {
            op: *op,
            left: erase_expr(typed, arena, ids, left),
            right: erase_expr(typed, arena, ids, right),
        },
        core::ExprKind::Unary { op, operand } => {
            runtime::ExprKind::Unary { op: *op, operand: erase_expr(typed, arena, ids, operand) }
        }
        core::ExprKind::Call { callee, args } => runtime::ExprKind::Call {
            callee: erase_expr(typed, arena, ids, callee),
            args: erase_call_args(typed, arena, ids, args),
        },
        core::ExprKind::Property { object, name } => {
            runtime::ExprKind::Property { object: erase_expr(typed, arena, ids, object), name: name.clone() }
        }
        core::ExprKind::Index { object, index } => runtime::ExprKind::Index {
            object: erase_expr(typed, arena, ids, object),
            index: erase_expr(typed, arena, ids, index),
        },
        core::ExprKind::Lambda(lambda) => runtime::ExprKind::Lambda(erase_lambda(typed, arena, ids, lambda)),
        core::ExprKind::Conditional { .. } => unreachable!("handled above"),
        core::ExprKind::Record { fields } => runtime::ExprKind::Record { fields: erase_record_fields(typed, arena, ids, fields) },
        core::ExprKind::Array { elements } => runtime::ExprKind::Array { elements: erase_array_elems(typed, arena, ids, elements) },
        core::ExprKind::Match { scrutinee, arms } => runtime::ExprKind::Match {
            scrutinee: erase_expr(typed, arena, ids, scrutinee),
            arms: arms.iter().map(|arm| erase_match_arm(typed, arena, ids, arm)).collect(),
        },
        core::ExprKind::Throw { error } => runtime::ExprKind::Throw { error: erase_expr(typed, arena, ids, error) },
        core::ExprKind::Await { operand } => runtime::ExprKind::Await { operand: erase_expr(typed, arena, ids, operand) },
        core::ExprKind::Template { parts } => {
            runtime::ExprKind::Template { parts: parts.iter().map(|p| erase_template_part(typed, arena, ids, p)).collect() }
        }
        core::ExprKind::Block(block) => runtime::ExprKind::Block(erase_block(typed, arena, ids, block)),
    };
    runtime::Expr { id: expr.id, span: expr.span, kind: Box::new(kind) }
}

/// Collapses to whichever branch a statically-known boolean condition
/// takes, discarding the `Conditional` node and the other branch entirely
/// (spec.md §4.6 "Conditionals").
fn erase_conditional(
    typed: &TypedProgram,
    arena: &TypeArena,
    ids: &mut NodeIdGen,
    id: NodeId,
    span: Span,
    condition: &core::Expr,
    then_branch: &core::Expr,
    else_branch: &core::Expr,
) -> runtime::Expr {
    if let Some(info) = typed.expr_info(condition.id) {
        if let Some(Value::Scalar(Raw::Bool(taken))) = &info.comptime_value {
            let branch = if *taken { then_branch } else { else_branch };
            return erase_expr(typed, arena, ids, branch);
        }
    }
    let kind = runtime::ExprKind::Conditional {
        condition: erase_expr(typed, arena, ids, condition),
        then_branch: erase_expr(typed, arena, ids, then_branch),
        else_branch: erase_expr(typed, arena, ids, else_branch),
    };
    runtime::Expr { id, span, kind: Box::new(kind) }
}

/// Filters out arguments whose own type is `Type` or a bounded metatype
/// (spec.md §4.6 "Calls"); a spread argument is kept only under the same
/// condition, since spreading a type value into a call makes no sense at
/// runtime either.
fn erase_call_args(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, args: &[core::CallArg]) -> Vec<runtime::CallArg> {
    args.iter()
        .filter_map(|arg| {
            let (inner, is_spread) = match arg {
                core::CallArg::Normal(e) => (e, false),
                core::CallArg::Spread(e) => (e, true),
            };
            let drop_arg = typed.expr_info(inner.id).is_some_and(|info| arena.get(info.ty).is_metatype_shaped());
            if drop_arg {
                return None;
            }
            let erased = erase_expr(typed, arena, ids, inner);
            Some(if is_spread { runtime::CallArg::Spread(erased) } else { runtime::CallArg::Normal(erased) })
        })
        .collect()
}

/// Drops type parameters (the `typeOf(x)`-default-marked leading
/// parameters, spec.md §4.5.3) along with every parameter's type
/// annotation; keeps `is_async` (spec.md §4.6 "Lambdas").
fn erase_lambda(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, lambda: &core::Lambda) -> runtime::Lambda {
    let type_params = detect_type_param_indices(&lambda.params);
    let params = lambda
        .params
        .iter()
        .enumerate()
        .filter(|(i, _)| !type_params.contains(i))
        .map(|(_, p)| erase_param(typed, arena, ids, p))
        .collect();
    runtime::Lambda { params, body: erase_expr(typed, arena, ids, &lambda.body), is_async: lambda.is_async }
}

fn erase_param(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, param: &core::Param) -> runtime::Param {
    runtime::Param {
        name: param.name.clone(),
        default: param.default.as_ref().map(|d| erase_expr(typed, arena, ids, d)),
        optional: param.optional,
        rest: param.rest,
    }
}

/// A local, minimal duplicate of `typeforge-checker::generics`'
/// `typeOf(x)`-marker scan — kept separate rather than adding a dependency
/// from the erasure crate on the checker crate for one structural check.
fn detect_type_param_indices(params: &[core::Param]) -> FxHashSet<usize> {
    params
        .iter()
        .enumerate()
        .filter_map(|(index, param)| if is_typeof_marker(param.default.as_ref()?) { Some(index) } else { None })
        .collect()
}

fn is_typeof_marker(expr: &core::Expr) -> bool {
    let core::ExprKind::Call { callee, args } = expr.kind.as_ref() else {
        return false;
    };
    let core::ExprKind::Identifier(name) = callee.kind.as_ref() else {
        return false;
    };
    name == "typeOf" && matches!(args.as_slice(), [core::CallArg::Normal(_)])
}

fn erase_record_fields(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, fields: &[core::RecordField]) -> Vec<runtime::RecordField> {
    fields
        .iter()
        .map(|f| match f {
            core::RecordField::Field { name, value } => {
                runtime::RecordField::Field { name: name.clone(), value: erase_expr(typed, arena, ids, value) }
            }
            core::RecordField::Spread(e) => runtime::RecordField::Spread(erase_expr(typed, arena, ids, e)),
        })
        .collect()
}

fn erase_array_elems(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, elems: &[core::ArrayElem]) -> Vec<runtime::ArrayElem> {
    elems
        .iter()
        .map(|el| match el {
            core::ArrayElem::Element(e) => runtime::ArrayElem::Element(erase_expr(typed, arena, ids, e)),
            core::ArrayElem::Spread(e) => runtime::ArrayElem::Spread(erase_expr(typed, arena, ids, e)),
        })
        .collect()
}

fn erase_match_arm(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, arm: &core::MatchArm) -> runtime::MatchArm {
    runtime::MatchArm {
        pattern: erase_pattern(typed, arena, &arm.pattern),
        guard: arm.guard.as_ref().map(|g| erase_expr(typed, arena, ids, g)),
        body: erase_expr(typed, arena, ids, &arm.body),
    }
}

/// Lowers every pattern except `Type`, which has no runtime counterpart to
/// discriminate against: it becomes a structural probe of the annotation's
/// shape instead (spec.md §4.6 "Pattern match").
fn erase_pattern(typed: &TypedProgram, arena: &TypeArena, pattern: &core::Pattern) -> runtime::Pattern {
    match pattern {
        core::Pattern::Wildcard => runtime::Pattern::Wildcard,
        core::Pattern::Literal(lit) => runtime::Pattern::Literal(lit.clone()),
        core::Pattern::Binding { name, nested } => runtime::Pattern::Binding {
            name: name.clone(),
            nested: nested.as_ref().map(|n| Box::new(erase_pattern(typed, arena, n))),
        },
        core::Pattern::Destructure { fields } => {
            runtime::Pattern::Destructure { fields: fields.iter().map(|f| erase_destructure_field(typed, arena, f)).collect() }
        }
        core::Pattern::Type(ann_expr) => lower_type_pattern(typed, arena, ann_expr),
    }
}

fn erase_destructure_field(typed: &TypedProgram, arena: &TypeArena, field: &core::DestructureField) -> runtime::DestructureField {
    runtime::DestructureField {
        name: field.name.clone(),
        alias: field.alias.clone(),
        nested: field.nested.as_ref().map(|n| erase_pattern(typed, arena, n)),
    }
}

/// A `Type` pattern over a record annotation becomes a `Destructure` over
/// its field names (probing the shape at runtime); over a literal
/// annotation it becomes that literal's own pattern; anything else has no
/// runtime discriminant to check at all, so it falls back to `Wildcard`.
fn lower_type_pattern(typed: &TypedProgram, arena: &TypeArena, ann_expr: &core::Expr) -> runtime::Pattern {
    let resolved = typed.expr_info(ann_expr.id).and_then(|info| match &info.comptime_value {
        Some(Value::TypeValue(t)) => Some(*t),
        _ => None,
    });
    match resolved.map(|t| arena.get(t)) {
        Some(Type::Record { fields, .. }) => runtime::Pattern::Destructure {
            fields: fields.iter().map(|f| runtime::DestructureField { name: arena.resolve_atom(f.name).to_string(), alias: None, nested: None }).collect(),
        },
        Some(Type::Literal { value, .. }) => runtime::Pattern::Literal(literal_value_to_literal(arena, value)),
        _ => runtime::Pattern::Wildcard,
    }
}

fn erase_template_part(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, part: &core::TemplatePart) -> runtime::TemplatePart {
    match part {
        core::TemplatePart::Str(s) => runtime::TemplatePart::Str(s.clone()),
        core::TemplatePart::Expr(e) => runtime::TemplatePart::Expr(erase_expr(typed, arena, ids, e)),
    }
}

fn erase_block(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, block: &core::Block) -> runtime::Block {
    let stmts = block.stmts.iter().filter_map(|s| erase_stmt(typed, arena, ids, s)).collect();
    runtime::Block { stmts, result: block.result.as_ref().map(|r| erase_expr(typed, arena, ids, r)) }
}

fn erase_stmt(typed: &TypedProgram, arena: &TypeArena, ids: &mut NodeIdGen, stmt: &core::Stmt) -> Option<runtime::Stmt> {
    match stmt {
        core::Stmt::Const(c) => erase_const_decl(typed, arena, ids, c).map(runtime::Stmt::Const),
        core::Stmt::Expr(s) => erase_expr_stmt(typed, arena, ids, s).map(runtime::Stmt::Expr),
    }
}

fn raw_to_literal(arena: &TypeArena, raw: &Raw) -> core::Literal {
    match raw {
        Raw::Int(v) => core::Literal::Int(*v),
        Raw::Float(v) => core::Literal::Float(*v),
        Raw::Str(a) => core::Literal::Str(arena.resolve_atom(*a).to_string()),
        Raw::Bool(v) => core::Literal::Bool(*v),
        Raw::Null => core::Literal::Null,
        Raw::Undefined => core::Literal::Undefined,
    }
}

fn literal_value_to_literal(arena: &TypeArena, value: &LiteralValue) -> core::Literal {
    match value {
        LiteralValue::Int(v) => core::Literal::Int(*v),
        LiteralValue::Float(v) => core::Literal::Float(*v),
        LiteralValue::Str(a) => core::Literal::Str(arena.resolve_atom(*a).to_string()),
        LiteralValue::Bool(v) => core::Literal::Bool(*v),
    }
}

/// Builds the top-level node of an inlined value at the erased expression's
/// own id and span (it occupies the same source location the original
/// expression did); every node synthesized underneath it is new and gets a
/// fresh id with `Span::dummy()`.
fn inline_expr(ids: &mut NodeIdGen, id: NodeId, span: Span, arena: &TypeArena, value: &Value) -> runtime::Expr {
    runtime::Expr { id, span, kind: Box::new(inline_kind(ids, arena, value)) }
}

fn inline_fresh(ids: &mut NodeIdGen, arena: &TypeArena, value: &Value) -> runtime::Expr {
    let id = ids.next();
    runtime::Expr { id, span: Span::dummy(), kind: Box::new(inline_kind(ids, arena, value)) }
}

fn inline_kind(ids: &mut NodeIdGen, arena: &TypeArena, value: &Value) -> runtime::ExprKind {
    match value {
        Value::Scalar(raw) => runtime::ExprKind::Literal(raw_to_literal(arena, raw)),
        Value::Record(fields) => runtime::ExprKind::Record {
            fields: fields
                .iter()
                .map(|(name, v)| runtime::RecordField::Field { name: arena.resolve_atom(*name).to_string(), value: inline_fresh(ids, arena, v) })
                .collect(),
        },
        Value::Array(elements) => {
            runtime::ExprKind::Array { elements: elements.iter().map(|v| runtime::ArrayElem::Element(inline_fresh(ids, arena, v))).collect() }
        }
        Value::TypeValue(_) | Value::Closure(_) | Value::Builtin(_) => {
            unreachable!("callers only inline Scalar/Record/Array values (can_inline)")
        }
    }
}

/// The id every fresh node minted during erasure must land past, so the
/// synthesized tree never collides with the checked source tree it grew
/// out of.
fn highest_id(program: &core::Program) -> NodeId {
    let mut max = 0u32;
    for decl in &program.decls {
        bump_decl(decl, &mut max);
    }
    NodeId(max)
}

fn bump(id: NodeId, max: &mut u32) {
    *max = (*max).max(id.0);
}

fn bump_decl(decl: &core::Decl, max: &mut u32) {
    match decl {
        core::Decl::Const(c) => bump_const_decl(c, max),
        core::Decl::Import(i) => bump(i.id, max),
        core::Decl::Expr(s) => {
            bump(s.id, max);
            bump_expr(&s.expr, max);
        }
    }
}

fn bump_const_decl(c: &core::ConstDecl, max: &mut u32) {
    bump(c.id, max);
    if let Some(ann) = &c.type_ann {
        bump_expr(ann, max);
    }
    bump_expr(&c.init, max);
}

fn bump_expr(e: &core::Expr, max: &mut u32) {
    bump(e.id, max);
    match e.kind.as_ref() {
        core::ExprKind::Literal(_) | core::ExprKind::Identifier(_) => {}
        core::ExprKind::Binary { left, right, .. } => {
            bump_expr(left, max);
            bump_expr(right, max);
        }
        core::ExprKind::Unary { operand, .. } => bump_expr(operand, max),
        core::ExprKind::Call { callee, args } => {
            bump_expr(callee, max);
            for a in args {
                bump_call_arg(a, max);
            }
        }
        core::ExprKind::Property { object, .. } => bump_expr(object, max),
        core::ExprKind::Index { object, index } => {
            bump_expr(object, max);
            bump_expr(index, max);
        }
        core::ExprKind::Lambda(l) => bump_lambda(l, max),
        core::ExprKind::Conditional { condition, then_branch, else_branch } => {
            bump_expr(condition, max);
            bump_expr(then_branch, max);
            bump_expr(else_branch, max);
        }
        core::ExprKind::Record { fields } => {
            for f in fields {
                bump_record_field(f, max);
            }
        }
        core::ExprKind::Array { elements } => {
            for el in elements {
                bump_array_elem(el, max);
            }
        }
        core::ExprKind::Match { scrutinee, arms } => {
            bump_expr(scrutinee, max);
            for arm in arms {
                bump_match_arm(arm, max);
            }
        }
        core::ExprKind::Throw { error } => bump_expr(error, max),
        core::ExprKind::Await { operand } => bump_expr(operand, max),
        core::ExprKind::Template { parts } => {
            for p in parts {
                if let core::TemplatePart::Expr(e) = p {
                    bump_expr(e, max);
                }
            }
        }
        core::ExprKind::Block(b) => bump_block(b, max),
    }
}

fn bump_call_arg(arg: &core::CallArg, max: &mut u32) {
    match arg {
        core::CallArg::Normal(e) | core::CallArg::Spread(e) => bump_expr(e, max),
    }
}

fn bump_record_field(f: &core::RecordField, max: &mut u32) {
    match f {
        core::RecordField::Field { value, .. } => bump_expr(value, max),
        core::RecordField::Spread(e) => bump_expr(e, max),
    }
}

fn bump_array_elem(el: &core::ArrayElem, max: &mut u32) {
    match el {
        core::ArrayElem::Element(e) | core::ArrayElem::Spread(e) => bump_expr(e, max),
    }
}

fn bump_lambda(l: &core::Lambda, max: &mut u32) {
    for p in &l.params {
        bump_param(p, max);
    }
    if let Some(r) = &l.return_ann {
        bump_expr(r, max);
    }
    bump_expr(&l.body, max);
}

fn bump_param(p: &core::Param, max: &mut u32) {
    if let Some(t) = &p.type_ann {
        bump_expr(t, max);
    }
    if let Some(d) = &p.default {
        bump_expr(d, max);
    }
}

fn bump_match_arm(arm: &core::MatchArm, max: &mut u32) {
    bump_pattern(&arm.pattern, max);
    if let Some(g) = &arm.guard {
        bump_expr(g, max);
    }
    bump_expr(&arm.body, max);
}

fn bump_pattern(p: &core::Pattern, max: &mut u32) {
    match p {
        core::Pattern::Wildcard | core::Pattern::Literal(_) => {}
        core::Pattern::Type(e) => bump_expr(e, max),
        core::Pattern::Binding { nested, .. } => {
            if let Some(n) = nested {
                bump_pattern(n, max);
            }
        }
        core::Pattern::Destructure { fields } => {
            for f in fields {
                if let Some(n) = &f.nested {
                    bump_pattern(n, max);
                }
            }
        }
    }
}

fn bump_block(b: &core::Block, max: &mut u32) {
    for s in &b.stmts {
        bump_stmt(s, max);
    }
    if let Some(r) = &b.result {
        bump_expr(r, max);
    }
}

fn bump_stmt(s: &core::Stmt, max: &mut u32) {
    match s {
        core::Stmt::Const(c) => bump_const_decl(c, max),
        core::Stmt::Expr(e) => {
            bump(e.id, max);
            bump_expr(&e.expr, max);
        }
    }
}
