use super::*;
use crate::arena::TypeArena;
use crate::type_def::{FieldInfo, LiteralValue};

#[test]
fn never_is_subtype_of_everything() {
    let arena = TypeArena::new();
    assert!(is_subtype(&arena, arena.never(), arena.string()));
}

#[test]
fn everything_is_subtype_of_unknown() {
    let arena = TypeArena::new();
    assert!(is_subtype(&arena, arena.string(), arena.unknown()));
}

#[test]
fn int_widens_to_number_but_not_vice_versa() {
    let arena = TypeArena::new();
    assert!(is_subtype(&arena, arena.int(), arena.number()));
    assert!(!is_subtype(&arena, arena.number(), arena.int()));
}

#[test]
fn literal_is_subtype_of_its_base_primitive() {
    let mut arena = TypeArena::new();
    let lit = arena.make_literal(LiteralValue::Int(5));
    assert!(is_subtype(&arena, lit, arena.int()));
    assert!(!is_subtype(&arena, arena.int(), lit));
}

#[test]
fn wider_record_is_not_subtype_of_narrower_required_field() {
    let mut arena = TypeArena::new();
    let name = arena.intern_string("x");
    let narrow = arena.make_record(
        vec![FieldInfo {
            name,
            ty: arena.int(),
            optional: false,
        }],
        None,
        true,
    );
    let wide = arena.make_record(vec![], None, true);
    assert!(!is_subtype(&arena, wide, narrow));
    assert!(is_subtype(&arena, narrow, wide));
}

#[test]
fn extra_field_on_open_record_is_fine() {
    let mut arena = TypeArena::new();
    let x = arena.intern_string("x");
    let y = arena.intern_string("y");
    let target = arena.make_record(
        vec![FieldInfo {
            name: x,
            ty: arena.int(),
            optional: false,
        }],
        None,
        false,
    );
    let source = arena.make_record(
        vec![
            FieldInfo {
                name: x,
                ty: arena.int(),
                optional: false,
            },
            FieldInfo {
                name: y,
                ty: arena.string(),
                optional: false,
            },
        ],
        None,
        true,
    );
    assert!(is_subtype(&arena, source, target));
}

#[test]
fn extra_field_on_closed_record_fails() {
    let mut arena = TypeArena::new();
    let x = arena.intern_string("x");
    let y = arena.intern_string("y");
    let target = arena.make_record(
        vec![FieldInfo {
            name: x,
            ty: arena.int(),
            optional: false,
        }],
        None,
        true,
    );
    let source = arena.make_record(
        vec![
            FieldInfo {
                name: x,
                ty: arena.int(),
                optional: false,
            },
            FieldInfo {
                name: y,
                ty: arena.string(),
                optional: false,
            },
        ],
        None,
        true,
    );
    assert!(!is_subtype(&arena, source, target));
}

#[test]
fn function_params_are_contravariant() {
    let mut arena = TypeArena::new();
    let pname = arena.intern_string("p");
    // (number) => int  <:  (int) => int   (accepts a wider parameter)
    let wide_param_fn = arena.make_function(
        vec![ParamInfo {
            name: pname,
            ty: arena.number(),
            optional: false,
            rest: false,
        }],
        arena.int(),
        false,
    );
    let narrow_param_fn = arena.make_function(
        vec![ParamInfo {
            name: pname,
            ty: arena.int(),
            optional: false,
            rest: false,
        }],
        arena.int(),
        false,
    );
    assert!(is_subtype(&arena, wide_param_fn, narrow_param_fn));
    assert!(!is_subtype(&arena, narrow_param_fn, wide_param_fn));
}

#[test]
fn function_return_type_is_covariant() {
    let mut arena = TypeArena::new();
    let pname = arena.intern_string("p");
    let int_return = arena.make_function(
        vec![ParamInfo {
            name: pname,
            ty: arena.number(),
            optional: false,
            rest: false,
        }],
        arena.int(),
        false,
    );
    let number_return = arena.make_function(
        vec![ParamInfo {
            name: pname,
            ty: arena.number(),
            optional: false,
            rest: false,
        }],
        arena.number(),
        false,
    );
    assert!(is_subtype(&arena, int_return, number_return));
    assert!(!is_subtype(&arena, number_return, int_return));
}

#[test]
fn union_subtype_requires_every_member_to_qualify() {
    let mut arena = TypeArena::new();
    let u = arena.make_union(vec![arena.int(), arena.string()]);
    assert!(!is_subtype(&arena, u, arena.int()));
    assert!(is_subtype(&arena, arena.int(), u));
}

#[test]
fn branded_types_are_nominal() {
    let mut arena = TypeArena::new();
    let brand = arena.intern_string("UserId#brand");
    let name = arena.intern_string("UserId");
    let other_name = arena.intern_string("OrderId");
    let a = arena.make_branded(arena.int(), brand, name);
    let b = arena.make_branded(arena.int(), brand, other_name);
    assert!(!is_subtype(&arena, a, b));
    assert!(!is_subtype(&arena, a, arena.int()));
}

#[test]
fn contains_metatype_detects_nested_type_primitive() {
    let mut arena = TypeArena::new();
    let name = arena.intern_string("t");
    let record = arena.make_record(
        vec![FieldInfo {
            name,
            ty: arena.type_meta(),
            optional: false,
        }],
        None,
        true,
    );
    assert!(contains_metatype(&arena, record));
    assert!(!contains_metatype(&arena, arena.int()));
}
