//! C4 — the fuel-limited compile-time evaluator (spec.md §4.3). Given an
//! expression and the two environments, produces a `Value` or a
//! `Diagnostic`. Every recursive step charges `Fuel`.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use typeforge_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message, Diagnostic};
use typeforge_common::{EnvId, NodeId, Span};
use typeforge_env::{ComptimeState, ComptimeStatus, EnvError, ScopeArena, TypeBinding};
use typeforge_ir::core::{
    ArrayElem, BinOp, CallArg, Decl, Expr, ExprKind, Lambda, Literal, MatchArm, Pattern, Program,
    RecordField, Stmt, TemplatePart, UnOp,
};
use typeforge_types::{LiteralValue, Raw, TypeArena, TypeId, Value};

use crate::fuel::{Fuel, FuelExhausted};
use crate::reflect;

/// One evaluator per compilation (spec.md §5). Owns the fuel counter and a
/// registry of lambda bodies: `Closure.body` is an opaque `NodeId` (so
/// `typeforge-types` need not depend on `typeforge-ir`), so this registry
/// is how `apply` finds the params/body to re-enter on a call.
pub struct Evaluator {
    fuel: Fuel,
    lambdas: FxHashMap<NodeId, Lambda>,
    /// Root `comptime.readFile` is sandboxed to (SPEC_FULL.md §2). `None`
    /// means the built-in is bound but every call fails closed.
    sandbox_root: Option<PathBuf>,
}

impl Evaluator {
    pub fn new(fuel_limit: u32) -> Self {
        Evaluator {
            fuel: Fuel::new(fuel_limit),
            lambdas: FxHashMap::default(),
            sandbox_root: None,
        }
    }

    pub fn with_sandbox_root(mut self, root: PathBuf) -> Self {
        self.sandbox_root = Some(root);
        self
    }

    pub fn fuel_remaining(&self) -> u32 {
        self.fuel.remaining()
    }

    fn step(&mut self, site: Span) -> Result<(), Diagnostic> {
        self.fuel.step(site).map_err(fuel_exhausted)
    }

    /// Re-evaluates every top-level `const` of `program` that is never
    /// referenced lazily (used by the CLI driver and tests to force a
    /// whole program rather than a single expression).
    pub fn eval_program(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, program: &Program) -> Result<(), Diagnostic> {
        for decl in &program.decls {
            if let Decl::Expr(stmt) = decl {
                self.eval_expr(arena, scopes, env, &stmt.expr)?;
            }
        }
        Ok(())
    }

    pub fn eval_expr(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, expr: &Expr) -> Result<Value, Diagnostic> {
        self.step(expr.span)?;
        match expr.kind.as_ref() {
            ExprKind::Literal(lit) => Ok(literal_value(arena, lit)),

            ExprKind::Identifier(name) => self.force(arena, scopes, env, name, expr.span),

            ExprKind::Binary { op, left, right } => {
                let l = self.eval_expr(arena, scopes, env, left)?;
                let r = self.eval_expr(arena, scopes, env, right)?;
                eval_binary(arena, *op, l, r, expr.span)
            }

            ExprKind::Unary { op, operand } => {
                let v = self.eval_expr(arena, scopes, env, operand)?;
                eval_unary(*op, v, expr.span)
            }

            ExprKind::Call { callee, args } => {
                let callee_val = self.eval_expr(arena, scopes, env, callee)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        CallArg::Normal(e) => evaluated.push(self.eval_expr(arena, scopes, env, e)?),
                        CallArg::Spread(e) => {
                            let v = self.eval_expr(arena, scopes, env, e)?;
                            match v {
                                Value::Array(items) => evaluated.extend(items),
                                _ => return Err(spread_must_be_array(e.span)),
                            }
                        }
                    }
                }
                self.apply(arena, scopes, callee_val, evaluated, expr.span)
            }

            ExprKind::Property { object, name } => {
                let obj = self.eval_expr(arena, scopes, env, object)?;
                self.eval_property(arena, obj, name, expr.span)
            }

            ExprKind::Index { object, index } => {
                let obj = self.eval_expr(arena, scopes, env, object)?;
                let idx = self.eval_expr(arena, scopes, env, index)?;
                eval_index(arena, obj, idx, expr.span)
            }


            ExprKind::Lambda(lambda) => self.eval_lambda(arena, scopes, env, expr.id, lambda),

            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => match self.eval_expr(arena, scopes, env, condition)? {
                Value::Scalar(Raw::Bool(true)) => self.eval_expr(arena, scopes, env, then_branch),
                Value::Scalar(Raw::Bool(false)) => self.eval_expr(arena, scopes, env, else_branch),
                _ => Err(invalid_type_expression("condition", condition.span)),
            },

            ExprKind::Record { fields } => self.eval_record(arena, scopes, env, fields),

            ExprKind::Array { elements } => self.eval_array(arena, scopes, env, elements),

            ExprKind::Match { scrutinee, arms } => self.eval_match(arena, scopes, env, scrutinee, arms, expr.span),

            ExprKind::Throw { .. } => Err(comptime_unsupported("throw", expr.span)),
            ExprKind::Await { .. } => Err(comptime_unsupported("await", expr.span)),

            ExprKind::Template { parts } => self.eval_template(arena, scopes, env, parts),

            ExprKind::Block(block) => {
                let block_env = scopes.extend(env);
                for stmt in &block.stmts {
                    match stmt {
                        Stmt::Const(decl) => {
                            let value = self.eval_expr(arena, scopes, block_env, &decl.init)?;
                            let name = arena.intern_string(&decl.name);
                            let ty = infer_value_type(arena, &value);
                            scopes.define_type(
                                block_env,
                                name,
                                TypeBinding {
                                    ty,
                                    comptime_status: ComptimeStatus::Comptime,
                                },
                            );
                            scopes.define_comptime(block_env, name, ComptimeState::Evaluated(value));
                        }
                        Stmt::Expr(stmt) => {
                            self.eval_expr(arena, scopes, block_env, &stmt.expr)?;
                        }
                    }
                }
                match &block.result {
                    Some(result) => self.eval_expr(arena, scopes, block_env, result),
                    None => Ok(Value::unit()),
                }
            }
        }
    }

    /// `getValue(name)` with lazy force (spec.md §4.2, §4.3). Walks to the
    /// owning scope, drives the *unevaluated → evaluating → evaluated*
    /// state machine, and re-raises any failure after marking the binding
    /// `Unavailable` so later forces fail fast instead of recomputing.
    fn force(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, name: &str, span: Span) -> Result<Value, Diagnostic> {
        let atom = arena.intern_string(name);
        let owner = scopes
            .lookup_comptime_owner(env, atom)
            .ok_or_else(|| undefined_binding(name, span))?;

        match scopes.comptime_state(owner, atom) {
            Some(ComptimeState::Evaluated(v)) => Ok(v.clone()),
            Some(ComptimeState::Unavailable) => Err(comptime_unavailable(name, span)),
            Some(ComptimeState::Evaluating) => Err(cycle_in_comptime(name, span)),
            Some(ComptimeState::Unevaluated { expr, captured_env }) => {
                let expr = expr.clone();
                let captured_env = *captured_env;
                match scopes.begin_evaluation(owner, atom) {
                    Err(EnvError::Cycle) => Err(cycle_in_comptime(name, span)),
                    Err(_) => Err(undefined_binding(name, span)),
                    Ok(()) => match self.eval_expr(arena, scopes, captured_env, &expr) {
                        Ok(value) => {
                            scopes.complete_evaluation(owner, atom, value.clone());
                            Ok(value)
                        }
                        Err(diag) => {
                            scopes.mark_unavailable(owner, atom);
                            Err(diag)
                        }
                    },
                }
            }
            None => Err(undefined_binding(name, span)),
        }
    }

    fn eval_lambda(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, expr_id: NodeId, lambda: &Lambda) -> Result<Value, Diagnostic> {
        let mut params = Vec::with_capacity(lambda.params.len());
        for p in &lambda.params {
            let ty = match &p.type_ann {
                Some(ann) => self.eval_type_expr(arena, scopes, env, ann)?,
                None => arena.unknown(),
            };
            params.push(typeforge_types::ClosureParam {
                name: arena.intern_string(&p.name),
                ty,
                optional: p.optional,
            });
        }
        let return_type = match &lambda.return_ann {
            Some(ann) => self.eval_type_expr(arena, scopes, env, ann)?,
            None => arena.unknown(),
        };
        self.lambdas.insert(expr_id, lambda.clone());
        Ok(Value::Closure(typeforge_types::Closure {
            params,
            return_type,
            body: expr_id,
            env,
            is_async: lambda.is_async,
        }))
    }

    fn eval_type_expr(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, expr: &Expr) -> Result<TypeId, Diagnostic> {
        match self.eval_expr(arena, scopes, env, expr)? {
            Value::TypeValue(t) => Ok(t),
            _ => Err(invalid_type_expression("annotation", expr.span)),
        }
    }

    pub fn apply(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, callee: Value, args: Vec<Value>, call_site: Span) -> Result<Value, Diagnostic> {
        match callee {
            Value::Closure(closure) => {
                self.step(call_site)?;
                let lambda = self
                    .lambdas
                    .get(&closure.body)
                    .cloned()
                    .ok_or_else(|| undefined_binding("<closure body>", call_site))?;
                let call_env = scopes.extend(closure.env);
                let required = closure.params.iter().filter(|p| !p.optional).count();
                for (i, (cparam, lparam)) in closure.params.iter().zip(lambda.params.iter()).enumerate() {
                    let value = match args.get(i) {
                        Some(v) => v.clone(),
                        None => match &lparam.default {
                            Some(default_expr) => self.eval_expr(arena, scopes, call_env, default_expr)?,
                            None if cparam.optional => Value::unit(),
                            None => return Err(arity_error(required, args.len(), call_site)),
                        },
                    };
                    scopes.define_type(
                        call_env,
                        cparam.name,
                        TypeBinding {
                            ty: cparam.ty,
                            comptime_status: ComptimeStatus::Comptime,
                        },
                    );
                    scopes.define_comptime(call_env, cparam.name, ComptimeState::Evaluated(value));
                }
                self.eval_expr(arena, scopes, call_env, &lambda.body)
            }
            Value::Builtin(id) => crate::builtins::call(arena, id, args, call_site, self.sandbox_root.as_deref()),
            // `Type(Bound)` (spec.md §6's reflective operator `Type`): the bare
            // metatype name is bound as a plain `TypeValue`, not a closure, so
            // it can also serve as the `Type` annotation in `x: Type`; this is
            // the one place a `TypeValue` receiver is callable.
            Value::TypeValue(t) if t == arena.type_meta() => match args.into_iter().next() {
                None => Ok(Value::TypeValue(t)),
                Some(Value::TypeValue(bound)) => Ok(Value::TypeValue(arena.make_bounded(bound))),
                Some(_) => Err(invalid_type_expression("Type(...) argument", call_site)),
            },
            other => Err(non_callable(arena, &other, call_site)),
        }
    }

    fn eval_property(&mut self, arena: &mut TypeArena, obj: Value, name: &str, span: Span) -> Result<Value, Diagnostic> {
        match obj {
            Value::TypeValue(t) => reflect::resolve(arena, t, name, span).map(|p| p.value),
            Value::Array(items) if name == "length" => Ok(Value::Scalar(Raw::Int(items.len() as i64))),
            Value::Scalar(Raw::Str(s)) if name == "length" => {
                let len = arena.resolve_atom(s).chars().count() as i64;
                Ok(Value::Scalar(Raw::Int(len)))
            }
            Value::Record(fields) => fields
                .into_iter()
                .find(|(n, _)| arena.resolve_atom(*n) == name)
                .map(|(_, v)| v)
                .ok_or_else(|| property_missing_on_value(name, span)),
            _ => Err(property_missing_on_value(name, span)),
        }
    }

    fn eval_record(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, fields: &[RecordField]) -> Result<Value, Diagnostic> {
        let mut result: Vec<(typeforge_common::Atom, Value)> = Vec::new();
        for field in fields {
            match field {
                RecordField::Field { name, value } => {
                    let v = self.eval_expr(arena, scopes, env, value)?;
                    let atom = arena.intern_string(name);
                    result.retain(|(n, _)| *n != atom);
                    result.push((atom, v));
                }
                RecordField::Spread(e) => {
                    let v = self.eval_expr(arena, scopes, env, e)?;
                    match v {
                        Value::Record(entries) => {
                            for (n, val) in entries {
                                result.retain(|(rn, _)| *rn != n);
                                result.push((n, val));
                            }
                        }
                        _ => return Err(spread_must_be_record(e.span)),
                    }
                }
            }
        }
        Ok(Value::Record(result))
    }

    fn eval_array(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, elements: &[ArrayElem]) -> Result<Value, Diagnostic> {
        let mut items = Vec::with_capacity(elements.len());
        for el in elements {
            match el {
                ArrayElem::Element(e) => items.push(self.eval_expr(arena, scopes, env, e)?),
                ArrayElem::Spread(e) => match self.eval_expr(arena, scopes, env, e)? {
                    Value::Array(vs) => items.extend(vs),
                    _ => return Err(spread_must_be_array(e.span)),
                },
            }
        }
        Ok(Value::Array(items))
    }

    fn eval_template(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, parts: &[TemplatePart]) -> Result<Value, Diagnostic> {
        let mut out = String::new();
        for part in parts {
            match part {
                TemplatePart::Str(s) => out.push_str(s),
                TemplatePart::Expr(e) => {
                    let v = self.eval_expr(arena, scopes, env, e)?;
                    out.push_str(&stringify_value(arena, &v));
                }
            }
        }
        Ok(Value::Scalar(Raw::Str(arena.intern_string(&out))))
    }

    fn eval_match(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        scrutinee: &Expr,
        arms: &[MatchArm],
        span: Span,
    ) -> Result<Value, Diagnostic> {
        let value = self.eval_expr(arena, scopes, env, scrutinee)?;
        for arm in arms {
            let arm_env = scopes.extend(env);
            if let Some(bindings) = self.try_match(arena, scopes, arm_env, &arm.pattern, &value)? {
                for (name, (ty, val)) in bindings {
                    scopes.define_type(
                        arm_env,
                        name,
                        TypeBinding {
                            ty,
                            comptime_status: ComptimeStatus::Comptime,
                        },
                    );
                    scopes.define_comptime(arm_env, name, ComptimeState::Evaluated(val));
                }
                if let Some(guard) = &arm.guard {
                    match self.eval_expr(arena, scopes, arm_env, guard)? {
                        Value::Scalar(Raw::Bool(true)) => {}
                        Value::Scalar(Raw::Bool(false)) => continue,
                        _ => return Err(invalid_type_expression("guard", guard.span)),
                    }
                }
                return self.eval_expr(arena, scopes, arm_env, &arm.body);
            }
        }
        Err(pattern_exhaustion(span))
    }

    fn try_match(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        pattern: &Pattern,
        value: &Value,
    ) -> Result<Option<Vec<(typeforge_common::Atom, (TypeId, Value))>>, Diagnostic> {
        match pattern {
            Pattern::Wildcard => Ok(Some(Vec::new())),

            Pattern::Literal(lit) => Ok(if literal_matches_value(arena, lit, value) {
                Some(Vec::new())
            } else {
                None
            }),

            Pattern::Type(type_expr) => {
                let target = self.eval_type_expr(arena, scopes, env, type_expr)?;
                let inferred = infer_value_type(arena, value);
                if typeforge_types::judge::is_subtype(arena, inferred, target) {
                    Ok(Some(Vec::new()))
                } else {
                    Ok(None)
                }
            }

            Pattern::Binding { name, nested } => {
                let mut bindings = match nested {
                    Some(inner) => match self.try_match(arena, scopes, env, inner, value)? {
                        Some(b) => b,
                        None => return Ok(None),
                    },
                    None => Vec::new(),
                };
                let atom = arena.intern_string(name);
                let ty = infer_value_type(arena, value);
                bindings.push((atom, (ty, value.clone())));
                Ok(Some(bindings))
            }

            Pattern::Destructure { fields } => {
                let Value::Record(entries) = value else {
                    return Ok(None);
                };
                let mut bindings = Vec::new();
                for df in fields {
                    let field_value = entries
                        .iter()
                        .find(|(n, _)| arena.resolve_atom(*n) == df.name.as_str())
                        .map(|(_, v)| v.clone());
                    let Some(field_value) = field_value else {
                        return Ok(None);
                    };
                    match &df.nested {
                        Some(inner) => match self.try_match(arena, scopes, env, inner, &field_value)? {
                            Some(b) => bindings.extend(b),
                            None => return Ok(None),
                        },
                        None => {
                            let bind_name = df.alias.as_deref().unwrap_or(&df.name);
                            let atom = arena.intern_string(bind_name);
                            let ty = infer_value_type(arena, &field_value);
                            bindings.push((atom, (ty, field_value)));
                        }
                    }
                }
                Ok(Some(bindings))
            }
        }
    }
}

/// A structural runtime type for a Value, used to drive `.extends`-style
/// narrowing of `Pattern::Type` against concrete values, and reused by the
/// checker to derive a static type for anything it has already reduced to a
/// concrete comptime value — not a substitute for bidirectional inference
/// over unevaluated expressions.
pub fn infer_value_type(arena: &mut TypeArena, value: &Value) -> TypeId {
    match value {
        Value::Scalar(Raw::Int(i)) => arena.make_literal(LiteralValue::Int(*i)),
        Value::Scalar(Raw::Float(f)) => arena.make_literal(LiteralValue::Float(*f)),
        Value::Scalar(Raw::Str(s)) => arena.make_literal(LiteralValue::Str(*s)),
        Value::Scalar(Raw::Bool(b)) => arena.make_literal(LiteralValue::Bool(*b)),
        Value::Scalar(Raw::Null) => arena.null(),
        Value::Scalar(Raw::Undefined) => arena.undefined(),
        Value::Array(items) => {
            let elements = items
                .iter()
                .map(|item| {
                    let ty = infer_value_type(arena, item);
                    typeforge_types::ArrayElement {
                        ty,
                        label: None,
                        spread: false,
                    }
                })
                .collect::<Vec<_>>();
            arena.make_array(elements)
        }
        Value::Record(fields) => {
            let fields = fields
                .iter()
                .map(|(name, v)| {
                    let ty = infer_value_type(arena, v);
                    typeforge_types::FieldInfo {
                        name: *name,
                        ty,
                        optional: false,
                    }
                })
                .collect::<Vec<_>>();
            arena.make_record(fields, None, true)
        }
        Value::TypeValue(_) => arena.type_meta(),
        Value::Closure(closure) => arena.make_function(
            closure
                .params
                .iter()
                .map(|p| typeforge_types::ParamInfo {
                    name: p.name,
                    ty: p.ty,
                    optional: p.optional,
                    rest: false,
                })
                .collect(),
            closure.return_type,
            closure.is_async,
        ),
        Value::Builtin(_) => arena.unknown(),
    }
}

fn literal_value(arena: &mut TypeArena, lit: &Literal) -> Value {
    match lit {
        Literal::Int(i) => Value::Scalar(Raw::Int(*i)),
        Literal::Float(f) => Value::Scalar(Raw::Float(*f)),
        Literal::Str(s) => Value::Scalar(Raw::Str(arena.intern_string(s))),
        Literal::Bool(b) => Value::Scalar(Raw::Bool(*b)),
        Literal::Null => Value::Scalar(Raw::Null),
        Literal::Undefined => Value::Scalar(Raw::Undefined),
    }
}

fn literal_matches_value(arena: &mut TypeArena, lit: &Literal, value: &Value) -> bool {
    let expected = literal_value(arena, lit);
    expected == *value
}

pub fn stringify_value(arena: &TypeArena, value: &Value) -> String {
    match value {
        Value::Scalar(Raw::Int(i)) => i.to_string(),
        Value::Scalar(Raw::Float(f)) => f.to_string(),
        Value::Scalar(Raw::Str(s)) => arena.resolve_atom(*s).to_string(),
        Value::Scalar(Raw::Bool(b)) => b.to_string(),
        Value::Scalar(Raw::Null) => "null".to_string(),
        Value::Scalar(Raw::Undefined) => "undefined".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(|v| stringify_value(arena, v)).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Record(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .map(|(n, v)| format!("{}:{}", arena.resolve_atom(*n), stringify_value(arena, v)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        Value::TypeValue(t) => typeforge_types::render_type(arena, *t),
        Value::Closure(_) => "<closure>".to_string(),
        Value::Builtin(_) => "<builtin>".to_string(),
    }
}

fn is_numeric(v: &Value) -> Option<(f64, bool)> {
    match v {
        Value::Scalar(Raw::Int(i)) => Some((*i as f64, true)),
        Value::Scalar(Raw::Float(f)) => Some((*f, false)),
        _ => None,
    }
}

fn eval_binary(arena: &mut TypeArena, op: BinOp, l: Value, r: Value, span: Span) -> Result<Value, Diagnostic> {
    use BinOp::*;

    if op == Add {
        let is_string = matches!(l, Value::Scalar(Raw::Str(_))) || matches!(r, Value::Scalar(Raw::Str(_)));
        if is_string {
            let mut s = stringify_value(arena, &l);
            s.push_str(&stringify_value(arena, &r));
            return Ok(Value::Scalar(Raw::Str(arena.intern_string(&s))));
        }
    }

    if matches!(op, Eq | NotEq) {
        let eq = l == r;
        return Ok(Value::Scalar(Raw::Bool(if op == Eq { eq } else { !eq })));
    }

    if matches!(op, And | Or) {
        let (Value::Scalar(Raw::Bool(lb)), Value::Scalar(Raw::Bool(rb))) = (&l, &r) else {
            return Err(invalid_type_expression("logical operand", span));
        };
        return Ok(Value::Scalar(Raw::Bool(if op == And { *lb && *rb } else { *lb || *rb })));
    }

    if matches!(op, BitAnd | BitOr | BitXor | Shl | Shr) {
        let (Value::Scalar(Raw::Int(li)), Value::Scalar(Raw::Int(ri))) = (&l, &r) else {
            return Err(invalid_type_expression("bitwise operand", span));
        };
        let result = match op {
            BitAnd => li & ri,
            BitOr => li | ri,
            BitXor => li ^ ri,
            Shl => li << ri,
            Shr => li >> ri,
            _ => unreachable!(),
        };
        return Ok(Value::Scalar(Raw::Int(result)));
    }

    let (Some((lf, l_is_int)), Some((rf, r_is_int))) = (is_numeric(&l), is_numeric(&r)) else {
        return Err(invalid_type_expression("numeric operand", span));
    };
    let both_int = l_is_int && r_is_int;

    match op {
        Add | Sub | Mul | Div | Mod => {
            let result = match op {
                Add => lf + rf,
                Sub => lf - rf,
                Mul => lf * rf,
                Div => lf / rf,
                Mod => lf % rf,
                _ => unreachable!(),
            };
            Ok(if both_int && op != Div {
                Value::Scalar(Raw::Int(result as i64))
            } else {
                Value::Scalar(Raw::Float(result))
            })
        }
        Lt => Ok(Value::Scalar(Raw::Bool(lf < rf))),
        LtEq => Ok(Value::Scalar(Raw::Bool(lf <= rf))),
        Gt => Ok(Value::Scalar(Raw::Bool(lf > rf))),
        GtEq => Ok(Value::Scalar(Raw::Bool(lf >= rf))),
        _ => unreachable!("handled above"),
    }
}

fn eval_unary(op: UnOp, v: Value, span: Span) -> Result<Value, Diagnostic> {
    match (op, v) {
        (UnOp::Neg, Value::Scalar(Raw::Int(i))) => Ok(Value::Scalar(Raw::Int(-i))),
        (UnOp::Neg, Value::Scalar(Raw::Float(f))) => Ok(Value::Scalar(Raw::Float(-f))),
        (UnOp::Not, Value::Scalar(Raw::Bool(b))) => Ok(Value::Scalar(Raw::Bool(!b))),
        (UnOp::BitNot, Value::Scalar(Raw::Int(i))) => Ok(Value::Scalar(Raw::Int(!i))),
        _ => Err(invalid_type_expression("unary operand", span)),
    }
}

fn eval_index(arena: &mut TypeArena, obj: Value, idx: Value, span: Span) -> Result<Value, Diagnostic> {
    match (obj, idx) {
        (Value::Array(items), Value::Scalar(Raw::Int(i))) => items
            .get(i as usize)
            .cloned()
            .ok_or_else(|| property_missing_on_value(&i.to_string(), span)),
        (Value::Record(fields), Value::Scalar(Raw::Str(key))) => {
            let key_str = arena.resolve_atom(key).to_string();
            fields
                .into_iter()
                .find(|(n, _)| arena.resolve_atom(*n) == key_str.as_str())
                .map(|(_, v)| v)
                .ok_or_else(|| property_missing_on_value(&key_str, span))
        }
        (Value::Scalar(Raw::Str(s)), Value::Scalar(Raw::Int(i))) => {
            let ch = arena.resolve_atom(s).chars().nth(i as usize);
            match ch {
                Some(c) => Ok(Value::Scalar(Raw::Str(arena.intern_string(&c.to_string())))),
                None => Err(property_missing_on_value(&i.to_string(), span)),
            }
        }
        _ => Err(invalid_type_expression("index target", span)),
    }
}

fn fuel_exhausted(FuelExhausted { site }: FuelExhausted) -> Diagnostic {
    let message = format_message(diagnostic_messages::FUEL_EXHAUSTED, &["expression"]);
    Diagnostic::error("typecheck", site, diagnostic_codes::FUEL_EXHAUSTED, message)
}

pub(crate) fn undefined_binding(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::UNDEFINED_BINDING, &[name]);
    Diagnostic::error("typecheck", span, diagnostic_codes::UNDEFINED_BINDING, message)
}

fn cycle_in_comptime(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::CYCLE_IN_COMPTIME, &[name]);
    Diagnostic::error("typecheck", span, diagnostic_codes::CYCLE_IN_COMPTIME, message)
}

fn comptime_unavailable(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::COMPTIME_UNAVAILABLE, &[name]);
    Diagnostic::error("typecheck", span, diagnostic_codes::COMPTIME_UNAVAILABLE, message)
}

pub(crate) fn comptime_unsupported(construct: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::COMPTIME_UNSUPPORTED_CONSTRUCT, &[construct]);
    Diagnostic::error("typecheck", span, diagnostic_codes::COMPTIME_UNSUPPORTED_CONSTRUCT, message)
}

pub(crate) fn invalid_type_expression(what: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::INVALID_TYPE_EXPRESSION, &[what]);
    Diagnostic::error("typecheck", span, diagnostic_codes::INVALID_TYPE_EXPRESSION, message)
}

fn pattern_exhaustion(span: Span) -> Diagnostic {
    Diagnostic::error(
        "typecheck",
        span,
        diagnostic_codes::PATTERN_EXHAUSTION,
        diagnostic_messages::PATTERN_EXHAUSTION.to_string(),
    )
}

fn spread_must_be_array(span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::SPREAD_MUST_BE_ARRAY, &["..."]);
    Diagnostic::error("typecheck", span, diagnostic_codes::SPREAD_MUST_BE_ARRAY, message)
}

fn spread_must_be_record(span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::SPREAD_MUST_BE_RECORD, &["..."]);
    Diagnostic::error("typecheck", span, diagnostic_codes::SPREAD_MUST_BE_RECORD, message)
}

pub(crate) fn arity_error(expected: usize, got: usize, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::ARITY_ERROR, &[&expected.to_string(), &got.to_string()]);
    Diagnostic::error("typecheck", span, diagnostic_codes::ARITY_ERROR, message)
}

pub(crate) fn non_callable(_arena: &TypeArena, value: &Value, span: Span) -> Diagnostic {
    let kind = match value {
        Value::Scalar(_) => "Scalar",
        Value::Record(_) => "Record",
        Value::Array(_) => "Array",
        Value::TypeValue(_) => "Type",
        Value::Closure(_) => "Function",
        Value::Builtin(_) => "Function",
    };
    let message = format_message(diagnostic_messages::NON_CALLABLE, &[kind]);
    Diagnostic::error("typecheck", span, diagnostic_codes::NON_CALLABLE, message)
}

pub(crate) fn property_missing_on_value(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::PROPERTY_MISSING, &[name, "value"]);
    Diagnostic::error("typecheck", span, diagnostic_codes::PROPERTY_MISSING, message)
}

#[cfg(test)]
#[path = "tests/eval_tests.rs"]
mod eval_tests;
