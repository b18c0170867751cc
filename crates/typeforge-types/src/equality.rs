//! Structural type equality (spec.md §4.1): a separate traversal from
//! subtyping because flattening, metadata stripping, and field ordering
//! require explicit, symmetric comparison rather than a one-directional
//! subtype check in each direction. Satisfies
//! `is_subtype(A,B) ∧ is_subtype(B,A) ⇔ types_equal(A,B)` modulo metadata.

use crate::arena::{TypeArena, TypeId};
use crate::metadata::unwrap_metadata;
use crate::type_def::Type;

pub fn types_equal(arena: &TypeArena, a: TypeId, b: TypeId) -> bool {
    let a = unwrap_metadata(arena, a);
    let b = unwrap_metadata(arena, b);
    if a == b {
        return true;
    }
    match (arena.get(a), arena.get(b)) {
        (Type::Primitive(x), Type::Primitive(y)) => x == y,

        (Type::Literal { value: v1, base: b1 }, Type::Literal { value: v2, base: b2 }) => v1 == v2 && b1 == b2,

        (
            Type::Record {
                fields: f1,
                index_type: i1,
                closed: c1,
            },
            Type::Record {
                fields: f2,
                index_type: i2,
                closed: c2,
            },
        ) => {
            c1 == c2
                && f1.len() == f2.len()
                && index_types_equal(arena, *i1, *i2)
                && f1.iter().all(|field| {
                    f2.iter()
                        .any(|other| other.name == field.name && other.optional == field.optional && types_equal(arena, field.ty, other.ty))
                })
        }

        (Type::Array { elements: e1 }, Type::Array { elements: e2 }) => {
            e1.len() == e2.len()
                && e1
                    .iter()
                    .zip(e2.iter())
                    .all(|(x, y)| x.spread == y.spread && x.label == y.label && types_equal(arena, x.ty, y.ty))
        }

        (
            Type::Function {
                params: p1,
                return_type: r1,
                is_async: a1,
            },
            Type::Function {
                params: p2,
                return_type: r2,
                is_async: a2,
            },
        ) => {
            a1 == a2
                && p1.len() == p2.len()
                && types_equal(arena, *r1, *r2)
                && p1
                    .iter()
                    .zip(p2.iter())
                    .all(|(x, y)| x.optional == y.optional && x.rest == y.rest && types_equal(arena, x.ty, y.ty))
        }

        (Type::Union(m1), Type::Union(m2)) => same_set(arena, m1, m2),
        (Type::Intersection(m1), Type::Intersection(m2)) => same_set(arena, m1, m2),

        (
            Type::Branded {
                base: b1,
                brand: br1,
                name: n1,
            },
            Type::Branded {
                base: b2,
                brand: br2,
                name: n2,
            },
        ) => n1 == n2 && br1 == br2 && types_equal(arena, *b1, *b2),

        (Type::TypeVar { name: n1, bound: bd1 }, Type::TypeVar { name: n2, bound: bd2 }) => {
            n1 == n2
                && match (bd1, bd2) {
                    (None, None) => true,
                    (Some(x), Some(y)) => types_equal(arena, *x, *y),
                    _ => false,
                }
        }

        (Type::This, Type::This) => true,

        (Type::Bounded { bound: x }, Type::Bounded { bound: y }) => types_equal(arena, *x, *y),

        (Type::Keyof { operand: x }, Type::Keyof { operand: y }) => types_equal(arena, *x, *y),

        (
            Type::IndexedAccess { object: o1, index: i1 },
            Type::IndexedAccess { object: o2, index: i2 },
        ) => types_equal(arena, *o1, *o2) && types_equal(arena, *i1, *i2),

        _ => false,
    }
}

fn index_types_equal(arena: &TypeArena, a: Option<TypeId>, b: Option<TypeId>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => types_equal(arena, x, y),
        _ => false,
    }
}

fn same_set(arena: &TypeArena, a: &[TypeId], b: &[TypeId]) -> bool {
    a.len() == b.len()
        && a.iter().all(|&x| b.iter().any(|&y| types_equal(arena, x, y)))
        && b.iter().all(|&y| a.iter().any(|&x| types_equal(arena, x, y)))
}

#[cfg(test)]
#[path = "tests/equality_tests.rs"]
mod equality_tests;
