//! §4.5.3 generic parameter desugaring. The surface form `<T>(x: T) => body`
//! arrives already desugared to a function of an extra leading parameter
//! `T: Type`, its default argument set to `typeOf(x)` by the desugarer as a
//! marker of which later parameter it stands for — there is no separate
//! "type parameter" node in the core grammar (spec.md §6).

use typeforge_ir::core::{CallArg, Expr, ExprKind, Lambda, Param};

/// One recognized type parameter of a lambda: its position and the name of
/// the later parameter whose `typeOf` marks it.
pub struct TypeParam<'a> {
    pub index: usize,
    pub param: &'a Param,
    pub marks_param: String,
}

/// Scans `lambda`'s parameters for the `typeOf(x)`-default marker. Order is
/// preserved; a lambda may desugar more than one type parameter (e.g.
/// `<T, U>(x: T, y: U) => ...`).
pub fn detect_type_params(lambda: &Lambda) -> Vec<TypeParam<'_>> {
    detect_type_params_in(&lambda.params)
}

fn typeof_marker_target(expr: &Expr) -> Option<String> {
    let ExprKind::Call { callee, args } = expr.kind.as_ref() else {
        return None;
    };
    let ExprKind::Identifier(name) = callee.kind.as_ref() else {
        return None;
    };
    if name != "typeOf" {
        return None;
    }
    let [CallArg::Normal(arg_expr)] = args.as_slice() else {
        return None;
    };
    match arg_expr.kind.as_ref() {
        ExprKind::Identifier(target) => Some(target.clone()),
        _ => None,
    }
}

/// `T: Type` and the bounded form `T: Type<Bound>` both evaluate to a
/// `Type`-shaped value (a bare metatype or a `Bounded`); the checker tells
/// them apart after evaluating the annotation, not from its syntax, so this
/// just recognizes that a parameter is a type-parameter annotation at all.
pub fn is_type_param(params: &[Param], param_index: usize) -> bool {
    detect_type_params_in(params).iter().any(|p| p.index == param_index)
}

fn detect_type_params_in(params: &[Param]) -> Vec<TypeParam<'_>> {
    params
        .iter()
        .enumerate()
        .filter_map(|(index, param)| {
            let default = param.default.as_ref()?;
            let marks_param = typeof_marker_target(default)?;
            Some(TypeParam {
                index,
                param,
                marks_param,
            })
        })
        .collect()
}
