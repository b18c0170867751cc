//! `WithMetadata` unwrapping and `This`-substitution (spec.md §3.1, §4.5.6).
//!
//! `WithMetadata` is transparent to subtyping: `unwrap_metadata` strips it
//! for any traversal that must not see display-only wrapping.
//! `substitute_this` rewrites `This` to a concrete receiver type at member
//! access/call sites, the mechanism behind fluent-chain typing (spec.md §8
//! scenario 4).

use crate::arena::{TypeArena, TypeId};
use crate::type_def::{ArrayElement, FieldInfo, ParamInfo, Type};

pub fn unwrap_metadata(arena: &TypeArena, id: TypeId) -> TypeId {
    let mut current = id;
    loop {
        match arena.get(current) {
            Type::WithMetadata { base, .. } => current = *base,
            _ => return current,
        }
    }
}

pub fn substitute_this(arena: &mut TypeArena, id: TypeId, receiver: TypeId) -> TypeId {
    let ty = arena.get(id).clone();
    match ty {
        Type::This => receiver,

        Type::Primitive(_) | Type::Literal { .. } => id,

        Type::TypeVar { name, bound } => match bound {
            None => id,
            Some(b) => {
                let b2 = substitute_this(arena, b, receiver);
                if b2 == b {
                    id
                } else {
                    arena.make_type_var(name, Some(b2))
                }
            }
        },

        Type::Record {
            fields,
            index_type,
            closed,
        } => {
            let mut changed = false;
            let new_fields: Vec<FieldInfo> = fields
                .iter()
                .map(|f| {
                    let t2 = substitute_this(arena, f.ty, receiver);
                    changed |= t2 != f.ty;
                    FieldInfo {
                        name: f.name,
                        ty: t2,
                        optional: f.optional,
                    }
                })
                .collect();
            let new_index = match index_type {
                None => None,
                Some(it) => {
                    let it2 = substitute_this(arena, it, receiver);
                    changed |= it2 != it;
                    Some(it2)
                }
            };
            if changed {
                arena.make_record(new_fields, new_index, closed)
            } else {
                id
            }
        }

        Type::Array { elements } => {
            let mut changed = false;
            let new_elements: Vec<ArrayElement> = elements
                .iter()
                .map(|e| {
                    let t2 = substitute_this(arena, e.ty, receiver);
                    changed |= t2 != e.ty;
                    ArrayElement {
                        ty: t2,
                        label: e.label,
                        spread: e.spread,
                    }
                })
                .collect();
            if changed {
                arena.make_array(new_elements)
            } else {
                id
            }
        }

        Type::Function {
            params,
            return_type,
            is_async,
        } => {
            let mut changed = false;
            let new_params: Vec<ParamInfo> = params
                .iter()
                .map(|p| {
                    let t2 = substitute_this(arena, p.ty, receiver);
                    changed |= t2 != p.ty;
                    ParamInfo {
                        name: p.name,
                        ty: t2,
                        optional: p.optional,
                        rest: p.rest,
                    }
                })
                .collect();
            let rt2 = substitute_this(arena, return_type, receiver);
            changed |= rt2 != return_type;
            if changed {
                arena.make_function(new_params, rt2, is_async)
            } else {
                id
            }
        }

        Type::Union(members) => {
            let mut changed = false;
            let new_members: Vec<TypeId> = members
                .iter()
                .map(|&m| {
                    let m2 = substitute_this(arena, m, receiver);
                    changed |= m2 != m;
                    m2
                })
                .collect();
            if changed {
                arena.make_union(new_members)
            } else {
                id
            }
        }

        Type::Intersection(members) => {
            let mut changed = false;
            let new_members: Vec<TypeId> = members
                .iter()
                .map(|&m| {
                    let m2 = substitute_this(arena, m, receiver);
                    changed |= m2 != m;
                    m2
                })
                .collect();
            if changed {
                arena.make_intersection(new_members)
            } else {
                id
            }
        }

        Type::Branded { base, brand, name } => {
            let b2 = substitute_this(arena, base, receiver);
            if b2 == base {
                id
            } else {
                arena.make_branded(b2, brand, name)
            }
        }

        Type::WithMetadata { base, metadata } => {
            let b2 = substitute_this(arena, base, receiver);
            if b2 == base {
                id
            } else {
                arena.make_with_metadata(b2, metadata)
            }
        }

        Type::Bounded { bound } => {
            let b2 = substitute_this(arena, bound, receiver);
            if b2 == bound {
                id
            } else {
                arena.make_bounded(b2)
            }
        }

        Type::Keyof { operand } => {
            let o2 = substitute_this(arena, operand, receiver);
            if o2 == operand {
                id
            } else {
                arena.make_keyof(o2)
            }
        }

        Type::IndexedAccess { object, index } => {
            let o2 = substitute_this(arena, object, receiver);
            let i2 = substitute_this(arena, index, receiver);
            if o2 == object && i2 == index {
                id
            } else {
                arena.make_indexed_access(o2, i2)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/metadata_tests.rs"]
mod metadata_tests;
