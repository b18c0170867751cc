//! The `Judge`: pure type algebra (subtyping, equality) with no
//! language-specific quirks layered on top, grounded on
//! `tsz-checker::judge_integration`'s separation between a pure `Judge`
//! and the TypeScript-flavored assignability layer above it. spec.md §4.1
//! is implemented here as `is_subtype`.

use rustc_hash::FxHashSet;

use crate::arena::{TypeArena, TypeId};
use crate::metadata::unwrap_metadata;
use crate::type_def::{ArrayElement, ParamInfo, Primitive, ScalarBase, Type};

pub trait Judge {
    fn is_subtype(&self, s: TypeId, t: TypeId) -> bool;
    fn types_equal(&self, a: TypeId, b: TypeId) -> bool;
}

pub struct DefaultJudge<'a> {
    pub arena: &'a TypeArena,
}

impl<'a> DefaultJudge<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        DefaultJudge { arena }
    }
}

impl<'a> Judge for DefaultJudge<'a> {
    fn is_subtype(&self, s: TypeId, t: TypeId) -> bool {
        is_subtype(self.arena, s, t)
    }

    fn types_equal(&self, a: TypeId, b: TypeId) -> bool {
        crate::equality::types_equal(self.arena, a, b)
    }
}

/// `S <: T` (spec.md §4.1). `WithMetadata` is unwrapped on both sides
/// before comparison; a cycle guard makes the relation coinductive for
/// recursive types (self-referential records reached through a brand or
/// type variable are assumed subtypes of themselves while the traversal
/// is still open, matching structural type systems with recursive types).
pub fn is_subtype(arena: &TypeArena, s: TypeId, t: TypeId) -> bool {
    let mut seen = FxHashSet::default();
    is_subtype_rec(arena, s, t, &mut seen)
}

fn is_subtype_rec(arena: &TypeArena, s: TypeId, t: TypeId, seen: &mut FxHashSet<(TypeId, TypeId)>) -> bool {
    let s = unwrap_metadata(arena, s);
    let t = unwrap_metadata(arena, t);
    if s == t {
        return true;
    }
    if !seen.insert((s, t)) {
        return true;
    }

    if matches!(arena.get(s), Type::Primitive(Primitive::Never)) {
        return true;
    }
    if matches!(arena.get(t), Type::Primitive(Primitive::Unknown)) {
        return true;
    }

    // Unions/intersections are handled before anything else touches their
    // members, so e.g. a union-of-records reaches the record rule once
    // per member rather than failing a tuple match against `Type::Record`.
    if let Type::Union(members) = arena.get(s).clone() {
        return members.iter().all(|&m| is_subtype_rec(arena, m, t, seen));
    }
    if let Type::Union(members) = arena.get(t).clone() {
        return members.iter().any(|&m| is_subtype_rec(arena, s, m, seen));
    }
    if let Type::Intersection(members) = arena.get(t).clone() {
        return members.iter().all(|&m| is_subtype_rec(arena, s, m, seen));
    }
    if let Type::Intersection(members) = arena.get(s).clone() {
        return members.iter().any(|&m| is_subtype_rec(arena, m, t, seen));
    }

    if let Type::Bounded { bound: tb } = arena.get(t).clone() {
        if let Type::Bounded { bound: sb } = arena.get(s).clone() {
            return is_subtype_rec(arena, sb, tb, seen);
        }
        // a concrete C <: Type<B> iff C <: B
        return is_subtype_rec(arena, s, tb, seen);
    }

    if let Type::TypeVar { bound: tbound, .. } = arena.get(t).clone() {
        if let Type::TypeVar { bound: sbound, .. } = arena.get(s).clone() {
            return match (sbound, tbound) {
                (Some(sb), Some(tb)) => is_subtype_rec(arena, sb, tb, seen),
                _ => false,
            };
        }
        // concrete <: var passes if the bound holds (or unbounded).
        return match tbound {
            Some(b) => is_subtype_rec(arena, s, b, seen),
            None => true,
        };
    }
    if matches!(arena.get(s), Type::TypeVar { .. }) {
        // s is a bare type variable but t is not Bounded/TypeVar: no rule
        // in spec.md §4.1 grants this, so it only holds via the bound.
        if let Type::TypeVar { bound: Some(sb), .. } = arena.get(s).clone() {
            return is_subtype_rec(arena, sb, t, seen);
        }
        return false;
    }

    match (arena.get(s).clone(), arena.get(t).clone()) {
        (Type::Primitive(a), Type::Primitive(b)) => {
            a == b
                || (matches!(a, Primitive::Int | Primitive::Float) && matches!(b, Primitive::Number))
        }

        (Type::Literal { value, base }, Type::Primitive(p)) => scalar_base_is(base, p) && literal_base_matches(&value, base),

        (Type::Literal { value: v1, base: b1 }, Type::Literal { value: v2, base: b2 }) => b1 == b2 && v1 == v2,

        (
            Type::Record {
                fields: sf,
                index_type: _sidx,
                closed: _sclosed,
            },
            Type::Record {
                fields: tf,
                index_type: tidx,
                closed: tclosed,
            },
        ) => record_subtype(arena, &sf, &tf, tidx, tclosed, seen),

        (Type::Array { elements: se }, Type::Array { elements: te }) => array_subtype(arena, &se, &te, seen),

        (
            Type::Function {
                params: sp,
                return_type: sr,
                is_async: sa,
            },
            Type::Function {
                params: tp,
                return_type: tr,
                is_async: ta,
            },
        ) => {
            if ta && !sa {
                return false;
            }
            is_subtype_rec(arena, sr, tr, seen) && function_params_subtype(arena, &sp, &tp, seen)
        }

        (
            Type::Branded {
                base: sb,
                brand: sbrand,
                name: sname,
            },
            Type::Branded {
                base: tb,
                brand: tbrand,
                name: tname,
            },
        ) => sname == tname && sbrand == tbrand && crate::equality::types_equal(arena, sb, tb),

        (Type::This, Type::This) => true,

        (Type::Keyof { operand: so }, Type::Keyof { operand: to }) => crate::equality::types_equal(arena, so, to),

        (
            Type::IndexedAccess {
                object: so,
                index: si,
            },
            Type::IndexedAccess {
                object: to,
                index: ti,
            },
        ) => crate::equality::types_equal(arena, so, to) && crate::equality::types_equal(arena, si, ti),

        _ => false,
    }
}

fn scalar_base_is(base: ScalarBase, prim: Primitive) -> bool {
    match base {
        ScalarBase::Int => matches!(prim, Primitive::Int | Primitive::Number),
        ScalarBase::Float => matches!(prim, Primitive::Float | Primitive::Number),
        ScalarBase::String => matches!(prim, Primitive::String),
        ScalarBase::Boolean => matches!(prim, Primitive::Boolean),
    }
}

fn literal_base_matches(_value: &crate::type_def::LiteralValue, _base: ScalarBase) -> bool {
    true
}

fn record_subtype(
    arena: &TypeArena,
    sf: &[crate::type_def::FieldInfo],
    tf: &[crate::type_def::FieldInfo],
    tidx: Option<TypeId>,
    tclosed: bool,
    seen: &mut FxHashSet<(TypeId, TypeId)>,
) -> bool {
    let fields_ok = tf.iter().all(|tfield| match sf.iter().find(|sfield| sfield.name == tfield.name) {
        Some(sfield) => is_subtype_rec(arena, sfield.ty, tfield.ty, seen),
        None => tfield.optional,
    });
    if !fields_ok {
        return false;
    }
    if tclosed && sf.iter().any(|sfield| !tf.iter().any(|tfield| tfield.name == sfield.name)) {
        return false;
    }
    if let Some(tindex) = tidx {
        let extra_ok = sf
            .iter()
            .filter(|sfield| !tf.iter().any(|tfield| tfield.name == sfield.name))
            .all(|sfield| is_subtype_rec(arena, sfield.ty, tindex, seen));
        if !extra_ok {
            return false;
        }
    }
    true
}

fn array_subtype(
    arena: &TypeArena,
    se: &[ArrayElement],
    te: &[ArrayElement],
    seen: &mut FxHashSet<(TypeId, TypeId)>,
) -> bool {
    let s_variadic = se.iter().any(|e| e.spread);
    let t_variadic = te.iter().any(|e| e.spread);
    match (s_variadic, t_variadic) {
        (false, false) => {
            se.len() == te.len() && se.iter().zip(te.iter()).all(|(a, b)| is_subtype_rec(arena, a.ty, b.ty, seen))
        }
        (true, false) => false,
        (false, true) => {
            // A fixed array is a subtype of a variadic array whose element
            // type is the union of the fixed array's elements: each fixed
            // element must be a subtype of *some* variadic element slot.
            se.iter()
                .all(|s_elem| te.iter().any(|t_elem| is_subtype_rec(arena, s_elem.ty, t_elem.ty, seen)))
        }
        (true, true) => {
            // Spread-suffix arrays must agree on the fixed prefix and the
            // spread element type.
            let s_fixed: Vec<_> = se.iter().take_while(|e| !e.spread).collect();
            let t_fixed: Vec<_> = te.iter().take_while(|e| !e.spread).collect();
            if s_fixed.len() != t_fixed.len() {
                return false;
            }
            let prefix_ok = s_fixed
                .iter()
                .zip(t_fixed.iter())
                .all(|(a, b)| is_subtype_rec(arena, a.ty, b.ty, seen));
            if !prefix_ok {
                return false;
            }
            let s_spread = se.iter().find(|e| e.spread);
            let t_spread = te.iter().find(|e| e.spread);
            match (s_spread, t_spread) {
                (Some(s), Some(t)) => is_subtype_rec(arena, s.ty, t.ty, seen),
                _ => false,
            }
        }
    }
}

fn function_params_subtype(
    arena: &TypeArena,
    sp: &[ParamInfo],
    tp: &[ParamInfo],
    seen: &mut FxHashSet<(TypeId, TypeId)>,
) -> bool {
    let s_rest = sp.iter().find(|p| p.rest);
    let t_rest = tp.iter().find(|p| p.rest);
    // if T has rest and S does not, S is not a subtype.
    if t_rest.is_some() && s_rest.is_none() {
        return false;
    }

    let s_fixed: Vec<_> = sp.iter().filter(|p| !p.rest).collect();
    let t_fixed: Vec<_> = tp.iter().filter(|p| !p.rest).collect();

    // S may have fewer parameters than T (excess are ignored); S must not
    // *require* more than T provides.
    let s_required = s_fixed.iter().filter(|p| !p.optional).count();
    if s_required > t_fixed.len() {
        return false;
    }

    for (i, s_param) in s_fixed.iter().enumerate() {
        // contravariant in each parameter position
        let t_ty = if let Some(t_param) = t_fixed.get(i) {
            t_param.ty
        } else if let Some(rest) = t_rest {
            rest.ty
        } else {
            // T ran out of positions and has no rest; only fine if S's
            // remaining parameters are themselves optional (unused by caller).
            if s_param.optional {
                continue;
            }
            return false;
        };
        if !is_subtype_rec(arena, t_ty, s_param.ty, seen) {
            return false;
        }
    }

    if let (Some(s_rest), Some(t_rest)) = (s_rest, t_rest) {
        if !is_subtype_rec(arena, t_rest.ty, s_rest.ty, seen) {
            return false;
        }
    }

    true
}

/// `containsType(T) ⇒ T has no runtime representation and is
/// compile-time-only` (spec.md §3.1). Recursively searches for the
/// metatype `Type` or a `Bounded` wrapper anywhere inside `id`.
pub fn contains_metatype(arena: &TypeArena, id: TypeId) -> bool {
    contains_metatype_rec(arena, id, &mut FxHashSet::default())
}

fn contains_metatype_rec(arena: &TypeArena, id: TypeId, seen: &mut FxHashSet<TypeId>) -> bool {
    if !seen.insert(id) {
        return false;
    }
    match arena.get(id) {
        Type::Primitive(Primitive::Type) => true,
        Type::Bounded { .. } => true,
        Type::Literal { .. } | Type::Primitive(_) | Type::This => false,
        Type::Record {
            fields,
            index_type,
            ..
        } => {
            fields.iter().any(|f| contains_metatype_rec(arena, f.ty, seen))
                || index_type.is_some_and(|it| contains_metatype_rec(arena, it, seen))
        }
        Type::Array { elements } => elements.iter().any(|e| contains_metatype_rec(arena, e.ty, seen)),
        Type::Function {
            params,
            return_type,
            ..
        } => {
            params.iter().any(|p| contains_metatype_rec(arena, p.ty, seen))
                || contains_metatype_rec(arena, *return_type, seen)
        }
        Type::Union(members) | Type::Intersection(members) => {
            members.iter().any(|&m| contains_metatype_rec(arena, m, seen))
        }
        Type::Branded { base, .. } => contains_metatype_rec(arena, *base, seen),
        Type::TypeVar { bound, .. } => bound.is_some_and(|b| contains_metatype_rec(arena, b, seen)),
        Type::WithMetadata { base, .. } => contains_metatype_rec(arena, *base, seen),
        Type::Keyof { operand } => contains_metatype_rec(arena, *operand, seen),
        Type::IndexedAccess { object, index } => {
            contains_metatype_rec(arena, *object, seen) || contains_metatype_rec(arena, *index, seen)
        }
    }
}

/// Structural runtime-usability of a type (spec.md §4.6 erasure rule):
/// `Type`, `Void`, an unbound `TypeVar`, `Bounded`, `Keyof`, and
/// `IndexedAccess` are non-runtime; everything else is, provided every
/// component is. Mapped-type families don't exist in this type model, so
/// that clause of §4.6 has no counterpart here.
pub fn runtime_usable(arena: &TypeArena, id: TypeId) -> bool {
    runtime_usable_rec(arena, id, &mut FxHashSet::default())
}

fn runtime_usable_rec(arena: &TypeArena, id: TypeId, seen: &mut FxHashSet<TypeId>) -> bool {
    if !seen.insert(id) {
        return true;
    }
    match arena.get(id) {
        Type::Primitive(Primitive::Type | Primitive::Void) => false,
        Type::Bounded { .. } | Type::Keyof { .. } | Type::IndexedAccess { .. } => false,
        Type::TypeVar { bound: None, .. } => false,
        Type::TypeVar { bound: Some(b), .. } => runtime_usable_rec(arena, *b, seen),
        Type::Primitive(_) | Type::Literal { .. } | Type::This => true,
        Type::Record { fields, index_type, .. } => {
            fields.iter().all(|f| runtime_usable_rec(arena, f.ty, seen))
                && index_type.is_none_or(|it| runtime_usable_rec(arena, it, seen))
        }
        Type::Array { elements } => elements.iter().all(|e| runtime_usable_rec(arena, e.ty, seen)),
        Type::Function { params, return_type, .. } => {
            params.iter().all(|p| runtime_usable_rec(arena, p.ty, seen))
                && runtime_usable_rec(arena, *return_type, seen)
        }
        Type::Union(members) | Type::Intersection(members) => {
            members.iter().all(|&m| runtime_usable_rec(arena, m, seen))
        }
        Type::Branded { base, .. } => runtime_usable_rec(arena, *base, seen),
        Type::WithMetadata { base, .. } => runtime_usable_rec(arena, *base, seen),
    }
}

/// Attempt to reduce a `Keyof`/`IndexedAccess` deferred operator to a
/// concrete type when its operands are already concrete (spec.md §3.1:
/// "deferred type operators used only when operands contain unresolved
/// type variables"; once they don't, this reduces them).
pub fn try_reduce_deferred(arena: &mut TypeArena, id: TypeId) -> TypeId {
    match arena.get(id).clone() {
        Type::Keyof { operand } => {
            if let Type::Record { fields, .. } = arena.get(operand).clone() {
                let members: Vec<TypeId> = fields
                    .iter()
                    .map(|f| {
                        arena.make_literal(crate::type_def::LiteralValue::Str(f.name))
                    })
                    .collect();
                if members.is_empty() {
                    arena.never()
                } else {
                    arena.make_union(members)
                }
            } else {
                id
            }
        }
        Type::IndexedAccess { object, index } => {
            if let (Type::Record { fields, index_type, .. }, Type::Literal { value: crate::type_def::LiteralValue::Str(name), .. }) =
                (arena.get(object).clone(), arena.get(index).clone())
            {
                fields
                    .iter()
                    .find(|f| f.name == name)
                    .map(|f| f.ty)
                    .or(index_type)
                    .unwrap_or(id)
            } else {
                id
            }
        }
        _ => id,
    }
}

#[cfg(test)]
#[path = "tests/judge_tests.rs"]
mod judge_tests;
