//! The bidirectional dispatcher (spec.md §4.5): one `check_expr` match arm
//! per core `ExprKind` variant, each producing a `Checked` that the wrapper
//! records into the `TypedProgram` side table. Grounded on
//! `tsz-checker::checker`'s single recursive `check_expression` entry point,
//! adapted from a class-hierarchy AST to this core's algebraic `ExprKind`.

use typeforge_common::EnvId;
use typeforge_common::diagnostics::Diagnostic;
use typeforge_env::{ComptimeState, ComptimeStatus, ScopeArena, TypeBinding};
use typeforge_ir::core::{BinOp, Block, Expr, ExprKind, Lambda, Literal, Stmt, UnOp};
use typeforge_ir::typed::{ExprInfo, TypedProgram};
use typeforge_types::{judge, LiteralValue, ParamInfo, Raw, Type, TypeArena, TypeId, Value};

use crate::context::{Checked, Checker};
use crate::error_reporter::{invalid_type_expression, type_mismatch};
use crate::generics::{self, TypeParam};
use crate::properties;

impl<'r> Checker<'r> {
    /// Public entry point: checks `expr`, recording its `ty`/`comptimeOnly`/
    /// `comptimeValue` into `typed` regardless of which arm handled it —
    /// every other module in this crate calls this instead of touching
    /// `check_expr_inner` directly, so recording can never be forgotten.
    pub(crate) fn check_expr(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        let checked = self.check_expr_inner(arena, scopes, env, typed, expr, expected)?;
        typed.record_expr(
            expr.id,
            ExprInfo {
                ty: checked.ty,
                comptime_only: checked.comptime_only,
                comptime_value: checked.comptime_value.clone(),
            },
        );
        Ok(checked)
    }

    fn check_expr_inner(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        match expr.kind.as_ref() {
            ExprKind::Literal(lit) => Ok(self.check_literal(arena, lit)),

            ExprKind::Identifier(name) => self.check_identifier(arena, scopes, env, name, expr.span),

            ExprKind::Binary { op, left, right } => self.check_binary(arena, scopes, env, typed, expr, *op, left, right),

            ExprKind::Unary { op, operand } => self.check_unary(arena, scopes, env, typed, expr, *op, operand),

            ExprKind::Call { .. } => self.check_call(arena, scopes, env, typed, expr),

            ExprKind::Property { object, name } => {
                let object_checked = self.check_expr(arena, scopes, env, typed, object, None)?;
                properties::check_property(arena, &object_checked, name, expr.span)
            }

            ExprKind::Index { object, index } => self.check_index(arena, scopes, env, typed, object, index, expr.span),

            ExprKind::Lambda(lambda) => self.check_lambda(arena, scopes, env, typed, expr, lambda, expected),

            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => self.check_conditional(arena, scopes, env, typed, expr, condition, then_branch, else_branch, expected),

            ExprKind::Record { fields } => self.check_record(arena, scopes, env, typed, expr, fields, expected),

            ExprKind::Array { elements } => self.check_array(arena, scopes, env, typed, expr, elements, expected),

            ExprKind::Match { scrutinee, arms } => self.check_match(arena, scopes, env, typed, expr, scrutinee, arms, expected),

            ExprKind::Throw { error } => {
                self.check_expr(arena, scopes, env, typed, error, None)?;
                Ok(Checked::runtime(arena.never()))
            }

            // No `Promise<T>` wrapper exists in this core's Type grammar
            // (spec.md §3.1); `await` is treated as identity at the type
            // level and is never itself compile-time-evaluable (mirrors
            // `Evaluator::eval_expr`'s `comptime_unsupported("await", ..)`).
            ExprKind::Await { operand } => {
                let operand_checked = self.check_expr(arena, scopes, env, typed, operand, None)?;
                Ok(Checked {
                    ty: operand_checked.ty,
                    comptime_only: false,
                    comptime_value: None,
                })
            }

            ExprKind::Template { parts } => self.check_template(arena, scopes, env, typed, expr, parts),

            ExprKind::Block(block) => self.check_block(arena, scopes, env, typed, block, expected),
        }
    }

    fn check_literal(&self, arena: &mut TypeArena, lit: &Literal) -> Checked {
        let (ty, value) = match lit {
            Literal::Int(i) => (arena.make_literal(LiteralValue::Int(*i)), Value::Scalar(Raw::Int(*i))),
            Literal::Float(f) => (arena.make_literal(LiteralValue::Float(*f)), Value::Scalar(Raw::Float(*f))),
            Literal::Str(s) => {
                let atom = arena.intern_string(s);
                (arena.make_literal(LiteralValue::Str(atom)), Value::Scalar(Raw::Str(atom)))
            }
            Literal::Bool(b) => (arena.make_literal(LiteralValue::Bool(*b)), Value::Scalar(Raw::Bool(*b))),
            Literal::Null => (arena.null(), Value::Scalar(Raw::Null)),
            Literal::Undefined => (arena.undefined(), Value::Scalar(Raw::Undefined)),
        };
        Checked {
            ty,
            comptime_only: false,
            comptime_value: Some(value),
        }
    }

    fn check_identifier(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        name: &str,
        span: typeforge_common::Span,
    ) -> Result<Checked, Diagnostic> {
        let atom = arena.intern_string(name);
        let binding = scopes
            .lookup_type(env, atom)
            .ok_or_else(|| crate::error_reporter::undefined_binding(name, span))?;

        let comptime_only = matches!(binding.comptime_status, ComptimeStatus::ComptimeOnly);
        let comptime_value = match binding.comptime_status {
            ComptimeStatus::Runtime => None,
            ComptimeStatus::Comptime | ComptimeStatus::ComptimeOnly => Some(self.force_comptime(arena, scopes, env, atom, name, span)?),
        };

        Ok(Checked {
            ty: binding.ty,
            comptime_only,
            comptime_value,
        })
    }

    /// Drives the comptime binding's state machine the same way
    /// `Evaluator::force` does (spec.md §4.2), using only public
    /// `ScopeArena`/`Evaluator` operations since `Evaluator::force` itself is
    /// private to its crate.
    pub(crate) fn force_comptime(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        name: typeforge_common::Atom,
        display_name: &str,
        span: typeforge_common::Span,
    ) -> Result<Value, Diagnostic> {
        let owner = scopes
            .lookup_comptime_owner(env, name)
            .ok_or_else(|| crate::error_reporter::comptime_unavailable(display_name, span))?;
        let state = scopes
            .comptime_state(owner, name)
            .cloned()
            .ok_or_else(|| crate::error_reporter::comptime_unavailable(display_name, span))?;

        match state {
            ComptimeState::Evaluated(v) => Ok(v),
            ComptimeState::Unavailable => Err(crate::error_reporter::comptime_unavailable(display_name, span)),
            ComptimeState::Evaluating => Err(crate::error_reporter::cycle_in_comptime(display_name, span)),
            ComptimeState::Unevaluated { expr, captured_env } => {
                scopes
                    .begin_evaluation(owner, name)
                    .map_err(|_| crate::error_reporter::cycle_in_comptime(display_name, span))?;
                match self.evaluator.eval_expr(arena, scopes, captured_env, &expr) {
                    Ok(v) => {
                        scopes.complete_evaluation(owner, name, v.clone());
                        Ok(v)
                    }
                    Err(e) => {
                        scopes.mark_unavailable(owner, name);
                        Err(e)
                    }
                }
            }
        }
    }

    /// `T: Type` / `T: Type<Bound>` annotations and every other place a
    /// core expression is expected to reduce to a `Type` value (spec.md
    /// §3.1): routed through `check_expr` itself rather than the
    /// evaluator's private `eval_type_expr`, so annotation nodes get a
    /// `TypedProgram` entry like any other checked expression.
    pub(crate) fn eval_type_annotation(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        ann_expr: &Expr,
    ) -> Result<TypeId, Diagnostic> {
        let type_meta = arena.type_meta();
        let checked = self.check_expr(arena, scopes, env, typed, ann_expr, Some(type_meta))?;
        match checked.comptime_value {
            Some(Value::TypeValue(t)) => Ok(t),
            _ => Err(invalid_type_expression("type annotation", ann_expr.span)),
        }
    }

    /// Attempts to fold `expr` to a concrete value via the evaluator, but
    /// only when every operand already produced one — an unevaluated
    /// sub-expression makes the fold pointless (it would just fail and get
    /// swallowed) and needlessly spends fuel.
    fn fold_if_known(&mut self, arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, expr: &Expr, deps: &[&Option<Value>]) -> Option<Value> {
        if deps.iter().all(|d| d.is_some()) {
            self.speculative_eval(arena, scopes, env, expr)
        } else {
            None
        }
    }

    fn check_binary(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        op: BinOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Checked, Diagnostic> {
        use BinOp::*;
        let l = self.check_expr(arena, scopes, env, typed, left, None)?;
        let r = self.check_expr(arena, scopes, env, typed, right, None)?;

        let ty = match op {
            Add if is_string_ty(arena, l.ty) || is_string_ty(arena, r.ty) => arena.string(),
            Add | Sub | Mul | Div | Mod => numeric_result(arena, op, l.ty, r.ty, expr.span)?,
            BitAnd | BitOr | BitXor | Shl | Shr => {
                require_int(arena, l.ty, left.span)?;
                require_int(arena, r.ty, right.span)?;
                arena.int()
            }
            Eq | NotEq => arena.boolean(),
            Lt | LtEq | Gt | GtEq => {
                require_numeric(arena, l.ty, left.span)?;
                require_numeric(arena, r.ty, right.span)?;
                arena.boolean()
            }
            And | Or => {
                require_bool(arena, l.ty, left.span)?;
                require_bool(arena, r.ty, right.span)?;
                arena.boolean()
            }
        };

        let comptime_only = l.comptime_only || r.comptime_only;
        let comptime_value = self.fold_if_known(arena, scopes, env, expr, &[&l.comptime_value, &r.comptime_value]);
        Ok(Checked { ty, comptime_only, comptime_value })
    }

    fn check_unary(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        op: UnOp,
        operand: &Expr,
    ) -> Result<Checked, Diagnostic> {
        let v = self.check_expr(arena, scopes, env, typed, operand, None)?;
        let ty = match op {
            UnOp::Neg => {
                require_numeric(arena, v.ty, operand.span)?;
                if is_int_ty(arena, v.ty) { arena.int() } else { arena.number() }
            }
            UnOp::Not => {
                require_bool(arena, v.ty, operand.span)?;
                arena.boolean()
            }
            UnOp::BitNot => {
                require_int(arena, v.ty, operand.span)?;
                arena.int()
            }
        };
        let comptime_value = self.fold_if_known(arena, scopes, env, expr, &[&v.comptime_value]);
        Ok(Checked {
            ty,
            comptime_only: v.comptime_only,
            comptime_value,
        })
    }

    fn check_index(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        object: &Expr,
        index: &Expr,
        span: typeforge_common::Span,
    ) -> Result<Checked, Diagnostic> {
        let object_checked = self.check_expr(arena, scopes, env, typed, object, None)?;

        // A literal string index is a property access in disguise (spec.md
        // §4.5.6's C6 table treats `obj["field"]` and `obj.field` alike).
        if let ExprKind::Literal(Literal::Str(s)) = index.kind.as_ref() {
            return properties::check_property(arena, &object_checked, s, span);
        }

        let index_checked = self.check_expr(arena, scopes, env, typed, index, None)?;
        let structural = typeforge_types::unwrap_metadata(arena, object_checked.ty);
        let ty = match arena.get(structural).clone() {
            Type::Array { .. } => {
                require_int(arena, index_checked.ty, index.span)?;
                properties::element_type_of(arena, structural)
            }
            Type::Primitive(typeforge_types::Primitive::String) => {
                require_int(arena, index_checked.ty, index.span)?;
                arena.string()
            }
            Type::Record { index_type: Some(it), .. } => {
                require_string(arena, index_checked.ty, index.span)?;
                it
            }
            _ => return Err(invalid_type_expression("index target", span)),
        };

        let comptime_only = object_checked.comptime_only || index_checked.comptime_only;
        Ok(Checked::runtime(ty).with_comptime(comptime_only))
    }

    fn check_lambda(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        lambda: &Lambda,
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        let type_params = generics::detect_type_params(lambda);
        let lambda_env = scopes.extend(env);

        let params = self
            .bind_lambda_params(arena, scopes, lambda_env, typed, lambda, &type_params, expected, false)?
            .expect("non-pre-registration call always resolves every parameter or errors");

        let declared_return = lambda
            .return_ann
            .as_ref()
            .map(|ann| self.eval_type_annotation(arena, scopes, lambda_env, typed, ann))
            .transpose()?;

        let body_checked = self.check_expr(arena, scopes, lambda_env, typed, &lambda.body, declared_return)?;
        let return_type = match declared_return {
            Some(d) => {
                if !judge::is_subtype(arena, body_checked.ty, d) {
                    return Err(type_mismatch(arena, body_checked.ty, d, lambda.body.span));
                }
                d
            }
            None => body_checked.ty,
        };

        let function_ty = arena.make_function(params, return_type, lambda.is_async);
        // A type parameter's own declared type (`Type`/`Bounded`) is
        // metatype-shaped, so `contains_metatype` already marks any generic
        // lambda comptime-only without a separate check here.
        let comptime_only = judge::contains_metatype(arena, function_ty);
        let comptime_value = self.speculative_eval(arena, scopes, env, expr);

        Ok(Checked {
            ty: function_ty,
            comptime_only,
            comptime_value,
        })
    }

    /// Binds a lambda's parameters (type parameters and value parameters
    /// alike) into `target_env`. When `pre_registration` is true, any
    /// parameter or the return type lacking both an explicit annotation and
    /// a contextual fallback makes the whole attempt bail with `Ok(None)`
    /// instead of erroring, signaling the caller to fall back to the
    /// ordinary (non-recursive) check path (spec.md §4.5.1 point 4).
    pub(crate) fn bind_lambda_params(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        target_env: EnvId,
        typed: &mut TypedProgram,
        lambda: &Lambda,
        type_params: &[TypeParam<'_>],
        expected: Option<TypeId>,
        pre_registration: bool,
    ) -> Result<Option<Vec<ParamInfo>>, Diagnostic> {
        let expected_params: Option<Vec<ParamInfo>> = expected.and_then(|e| match arena.get(e).clone() {
            Type::Function { params, .. } => Some(params),
            _ => None,
        });

        let mut params = Vec::with_capacity(lambda.params.len());
        for (i, p) in lambda.params.iter().enumerate() {
            if let Some(tp) = type_params.iter().find(|tp| tp.index == i) {
                let name_atom = arena.intern_string(&tp.param.name);
                let ann_ty = match &tp.param.type_ann {
                    Some(ann) => self.eval_type_annotation(arena, scopes, target_env, typed, ann)?,
                    None => arena.type_meta(),
                };
                let bound = match arena.get(ann_ty).clone() {
                    Type::Bounded { bound } => Some(bound),
                    _ => None,
                };
                let type_var = arena.make_type_var(name_atom, bound);
                scopes.define_type(target_env, name_atom, TypeBinding { ty: ann_ty, comptime_status: ComptimeStatus::Comptime });
                scopes.define_comptime(target_env, name_atom, ComptimeState::Evaluated(Value::TypeValue(type_var)));
                params.push(ParamInfo { name: name_atom, ty: ann_ty, optional: false, rest: false });
                continue;
            }

            let ty = if let Some(ann) = &p.type_ann {
                self.eval_type_annotation(arena, scopes, target_env, typed, ann)?
            } else if let Some(fallback) = expected_params.as_ref().and_then(|ps| ps.get(i)) {
                fallback.ty
            } else if pre_registration {
                return Ok(None);
            } else {
                return Err(invalid_type_expression(&format!("parameter '{}' needs a type annotation", p.name), lambda.body.span));
            };

            let name_atom = arena.intern_string(&p.name);
            scopes.define_type(target_env, name_atom, TypeBinding { ty, comptime_status: ComptimeStatus::Runtime });
            params.push(ParamInfo { name: name_atom, ty, optional: p.optional, rest: p.rest });
        }

        Ok(Some(params))
    }

    fn check_conditional(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        let bool_ty = arena.boolean();
        let cond_checked = self.check_expr(arena, scopes, env, typed, condition, Some(bool_ty))?;
        if !judge::is_subtype(arena, cond_checked.ty, bool_ty) {
            return Err(type_mismatch(arena, cond_checked.ty, bool_ty, condition.span));
        }

        let then_checked = self.check_expr(arena, scopes, env, typed, then_branch, expected)?;
        let else_checked = self.check_expr(arena, scopes, env, typed, else_branch, expected)?;

        let ty = arena.make_union(vec![then_checked.ty, else_checked.ty]);
        let comptime_only = cond_checked.comptime_only || then_checked.comptime_only || else_checked.comptime_only;
        // Dead-branch collapse (picking just the live branch when the
        // condition is a known literal) is left to erasure (C7), not
        // decided here.
        let comptime_value = self.fold_if_known(arena, scopes, env, expr, &[&cond_checked.comptime_value, &then_checked.comptime_value, &else_checked.comptime_value]);

        Ok(Checked { ty, comptime_only, comptime_value })
    }

    fn check_record(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        fields: &[typeforge_ir::core::RecordField],
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        use typeforge_ir::core::RecordField;

        let expected_fields: Option<Vec<typeforge_types::FieldInfo>> = expected.and_then(|e| match arena.get(e).clone() {
            Type::Record { fields, .. } => Some(fields),
            _ => None,
        });

        let mut result_fields = Vec::new();
        let mut comptime_only = false;
        let mut all_known = true;
        let mut deps: Vec<Option<Value>> = Vec::new();

        for field in fields {
            match field {
                RecordField::Field { name, value } => {
                    let field_expected = expected_fields.as_ref().and_then(|fs| fs.iter().find(|f| arena.resolve_atom(f.name) == name).map(|f| f.ty));
                    let checked = self.check_expr(arena, scopes, env, typed, value, field_expected)?;
                    comptime_only = comptime_only || checked.comptime_only;
                    all_known = all_known && checked.comptime_value.is_some();
                    deps.push(checked.comptime_value.clone());
                    let atom = arena.intern_string(name);
                    result_fields.push(typeforge_types::FieldInfo { name: atom, ty: checked.ty, optional: false });
                }
                RecordField::Spread(spread_expr) => {
                    let checked = self.check_expr(arena, scopes, env, typed, spread_expr, None)?;
                    comptime_only = comptime_only || checked.comptime_only;
                    all_known = all_known && checked.comptime_value.is_some();
                    deps.push(checked.comptime_value.clone());
                    let structural = typeforge_types::unwrap_metadata(arena, checked.ty);
                    let Type::Record { fields: spread_fields, .. } = arena.get(structural).clone() else {
                        return Err(crate::error_reporter::spread_must_be_record(spread_expr.span));
                    };
                    // `make_record`'s field dedup keeps each name's *last*
                    // occurrence, so later fields (explicit or spread) win
                    // regardless of push order here.
                    result_fields.extend(spread_fields);
                }
            }
        }

        let ty = arena.make_record(result_fields, None, true);
        let dep_refs: Vec<&Option<Value>> = deps.iter().collect();
        let comptime_value = if all_known || comptime_only { self.fold_if_known(arena, scopes, env, expr, &dep_refs) } else { None };

        Ok(Checked { ty, comptime_only, comptime_value })
    }

    fn check_array(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        elements: &[typeforge_ir::core::ArrayElem],
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        use typeforge_ir::core::ArrayElem;

        let expected_elem: Option<TypeId> = expected.and_then(|e| match arena.get(e) {
            Type::Array { .. } => Some(properties::element_type_of(arena, e)),
            _ => None,
        });

        let mut result_elements = Vec::new();
        let mut comptime_only = false;
        let mut deps: Vec<Option<Value>> = Vec::new();

        for el in elements {
            match el {
                ArrayElem::Element(e) => {
                    let checked = self.check_expr(arena, scopes, env, typed, e, expected_elem)?;
                    comptime_only = comptime_only || checked.comptime_only;
                    deps.push(checked.comptime_value.clone());
                    result_elements.push(typeforge_types::ArrayElement { ty: checked.ty, label: None, spread: false });
                }
                ArrayElem::Spread(e) => {
                    let checked = self.check_expr(arena, scopes, env, typed, e, None)?;
                    comptime_only = comptime_only || checked.comptime_only;
                    deps.push(checked.comptime_value.clone());
                    let structural = typeforge_types::unwrap_metadata(arena, checked.ty);
                    match arena.get(structural).clone() {
                        Type::Array { elements: src_elements } if !src_elements.iter().any(|el| el.spread) => {
                            result_elements.extend(src_elements);
                        }
                        Type::Array { elements: src_elements } => {
                            let elem_ty = properties::element_type_of(arena, structural);
                            let _ = src_elements;
                            result_elements.push(typeforge_types::ArrayElement { ty: elem_ty, label: None, spread: true });
                        }
                        _ => return Err(crate::error_reporter::spread_must_be_array(e.span)),
                    }
                }
            }
        }

        let ty = arena.make_array(result_elements);
        let dep_refs: Vec<&Option<Value>> = deps.iter().collect();
        let all_known = dep_refs.iter().all(|d| d.is_some());
        let comptime_value = if all_known || comptime_only { self.fold_if_known(arena, scopes, env, expr, &dep_refs) } else { None };

        Ok(Checked { ty, comptime_only, comptime_value })
    }

    fn check_match(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        scrutinee: &Expr,
        arms: &[typeforge_ir::core::MatchArm],
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        let scrutinee_checked = self.check_expr(arena, scopes, env, typed, scrutinee, None)?;

        let mut arm_types = Vec::with_capacity(arms.len());
        let mut comptime_only = scrutinee_checked.comptime_only;
        for arm in arms {
            let arm_checked = crate::narrowing::check_match_arm(self, arena, scopes, env, typed, &scrutinee_checked, arm, expected)?;
            comptime_only = comptime_only || arm_checked.comptime_only;
            arm_types.push(arm_checked.ty);
        }

        let ty = if arm_types.is_empty() { arena.never() } else { arena.make_union(arm_types) };
        let comptime_value = self.fold_if_known(arena, scopes, env, expr, &[&scrutinee_checked.comptime_value]);

        Ok(Checked { ty, comptime_only, comptime_value })
    }

    fn check_template(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        expr: &Expr,
        parts: &[typeforge_ir::core::TemplatePart],
    ) -> Result<Checked, Diagnostic> {
        use typeforge_ir::core::TemplatePart;

        let mut comptime_only = false;
        let mut deps: Vec<Option<Value>> = Vec::new();
        for part in parts {
            if let TemplatePart::Expr(e) = part {
                let checked = self.check_expr(arena, scopes, env, typed, e, None)?;
                comptime_only = comptime_only || checked.comptime_only;
                deps.push(checked.comptime_value.clone());
            }
        }

        let dep_refs: Vec<&Option<Value>> = deps.iter().collect();
        let comptime_value = self.fold_if_known(arena, scopes, env, expr, &dep_refs);
        Ok(Checked {
            ty: arena.string(),
            comptime_only,
            comptime_value,
        })
    }

    fn check_block(
        &mut self,
        arena: &mut TypeArena,
        scopes: &mut ScopeArena,
        env: EnvId,
        typed: &mut TypedProgram,
        block: &Block,
        expected: Option<TypeId>,
    ) -> Result<Checked, Diagnostic> {
        let block_env = scopes.extend(env);
        for stmt in &block.stmts {
            match stmt {
                Stmt::Const(decl) => crate::declarations::check_const_decl(self, arena, scopes, block_env, typed, decl)?,
                Stmt::Expr(stmt) => {
                    self.check_expr(arena, scopes, block_env, typed, &stmt.expr, None)?;
                }
            }
        }

        match &block.result {
            Some(result) => self.check_expr(arena, scopes, block_env, typed, result, expected),
            None => Ok(Checked::runtime(arena.void())),
        }
    }
}

impl Checked {
    fn with_comptime(mut self, comptime_only: bool) -> Self {
        self.comptime_only = comptime_only;
        self
    }
}

fn is_string_ty(arena: &TypeArena, ty: TypeId) -> bool {
    judge::is_subtype(arena, ty, arena.string())
}

fn is_int_ty(arena: &TypeArena, ty: TypeId) -> bool {
    judge::is_subtype(arena, ty, arena.int())
}

fn is_numeric_ty(arena: &TypeArena, ty: TypeId) -> bool {
    judge::is_subtype(arena, ty, arena.number())
}

fn is_bool_ty(arena: &TypeArena, ty: TypeId) -> bool {
    judge::is_subtype(arena, ty, arena.boolean())
}

fn require_numeric(arena: &TypeArena, ty: TypeId, span: typeforge_common::Span) -> Result<(), Diagnostic> {
    if is_numeric_ty(arena, ty) {
        Ok(())
    } else {
        Err(type_mismatch(arena, ty, arena.number(), span))
    }
}

fn require_int(arena: &TypeArena, ty: TypeId, span: typeforge_common::Span) -> Result<(), Diagnostic> {
    if is_int_ty(arena, ty) {
        Ok(())
    } else {
        Err(type_mismatch(arena, ty, arena.int(), span))
    }
}

fn require_bool(arena: &TypeArena, ty: TypeId, span: typeforge_common::Span) -> Result<(), Diagnostic> {
    if is_bool_ty(arena, ty) {
        Ok(())
    } else {
        Err(type_mismatch(arena, ty, arena.boolean(), span))
    }
}

fn require_string(arena: &TypeArena, ty: TypeId, span: typeforge_common::Span) -> Result<(), Diagnostic> {
    if is_string_ty(arena, ty) {
        Ok(())
    } else {
        Err(type_mismatch(arena, ty, arena.string(), span))
    }
}

/// Mirrors `eval_binary`'s arithmetic widening: `Int op Int` stays `Int`
/// (except `Div`, which the evaluator always floats), anything else numeric
/// widens to `Number`.
fn numeric_result(arena: &mut TypeArena, op: BinOp, l: TypeId, r: TypeId, span: typeforge_common::Span) -> Result<TypeId, Diagnostic> {
    require_numeric(arena, l, span)?;
    require_numeric(arena, r, span)?;
    if op != BinOp::Div && is_int_ty(arena, l) && is_int_ty(arena, r) {
        Ok(arena.int())
    } else {
        Ok(arena.number())
    }
}
