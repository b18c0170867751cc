//! Construction-time normalization invariants from spec.md §3.1:
//! unions/intersections are flattened, record fields are name-unique with
//! later (spread) fields winning, and a function has at most one rest
//! parameter, which is last.

use rustc_hash::FxHashMap;
use typeforge_common::Atom;

use crate::arena::{TypeArena, TypeId};
use crate::type_def::{FieldInfo, ParamInfo, Type};

pub fn make_union(arena: &mut TypeArena, members: Vec<TypeId>) -> TypeId {
    let mut flat = Vec::new();
    for m in members {
        flatten_union_member(arena, m, &mut flat);
    }
    let mut deduped: Vec<TypeId> = Vec::new();
    for id in flat {
        if !deduped.contains(&id) {
            deduped.push(id);
        }
    }
    match deduped.len() {
        // length 0 ⇒ Never; length 1 ⇒ the member (spec.md §3.1).
        0 => arena.never(),
        1 => deduped[0],
        _ => arena.intern(Type::Union(deduped)),
    }
}

fn flatten_union_member(arena: &TypeArena, id: TypeId, out: &mut Vec<TypeId>) {
    match arena.get(id) {
        Type::Union(members) => {
            let members = members.clone();
            for m in members {
                flatten_union_member(arena, m, out);
            }
        }
        _ => out.push(id),
    }
}

pub fn make_intersection(arena: &mut TypeArena, members: Vec<TypeId>) -> TypeId {
    let mut flat = Vec::new();
    for m in members {
        flatten_intersection_member(arena, m, &mut flat);
    }
    if flat.iter().any(|&id| id == arena.never()) {
        return arena.never();
    }
    let mut deduped: Vec<TypeId> = Vec::new();
    for id in flat {
        if !deduped.contains(&id) {
            deduped.push(id);
        }
    }
    match deduped.len() {
        // spec.md is silent on the 0-member case; an empty intersection is
        // the algebraic identity, i.e. the top type (Open Question,
        // recorded in DESIGN.md).
        0 => arena.unknown(),
        1 => deduped[0],
        _ => arena.intern(Type::Intersection(deduped)),
    }
}

fn flatten_intersection_member(arena: &TypeArena, id: TypeId, out: &mut Vec<TypeId>) {
    match arena.get(id) {
        Type::Intersection(members) => {
            let members = members.clone();
            for m in members {
                flatten_intersection_member(arena, m, out);
            }
        }
        _ => out.push(id),
    }
}

/// Field names within a record are unique after construction; when the
/// same name occurs more than once (object-spread merge), the later
/// occurrence's type/optionality wins but the *first* occurrence's
/// position is kept, matching field order being observable to reflection.
pub fn dedupe_fields(fields: Vec<FieldInfo>) -> Vec<FieldInfo> {
    let mut order: Vec<Atom> = Vec::new();
    let mut latest: FxHashMap<Atom, FieldInfo> = FxHashMap::default();
    for field in fields {
        if !latest.contains_key(&field.name) {
            order.push(field.name);
        }
        latest.insert(field.name, field);
    }
    order.into_iter().map(|name| latest[&name]).collect()
}

/// A `Function` has at most one rest parameter, which is last. Defensive
/// normalization: if more than one parameter was marked `rest`, only the
/// last survives as such; if the surviving rest parameter isn't last, it
/// is moved there.
pub fn canonicalize_rest_params(params: &mut Vec<ParamInfo>) {
    let Some(last_rest_idx) = params.iter().rposition(|p| p.rest) else {
        return;
    };
    for (i, p) in params.iter_mut().enumerate() {
        if p.rest && i != last_rest_idx {
            p.rest = false;
        }
    }
    if last_rest_idx != params.len() - 1 {
        let p = params.remove(last_rest_idx);
        params.push(p);
    }
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod normalize_tests;
