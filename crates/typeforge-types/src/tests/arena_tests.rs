use super::*;
use crate::type_def::{FieldInfo, LiteralValue};

#[test]
fn primitives_are_preinterned_and_stable() {
    let arena = TypeArena::new();
    assert_eq!(arena.int(), arena.int());
    assert_ne!(arena.int(), arena.string());
}

#[test]
fn structurally_equal_types_share_an_id() {
    let mut arena = TypeArena::new();
    let name = arena.intern_string("x");
    let a = arena.make_record(
        vec![FieldInfo {
            name,
            ty: arena.int(),
            optional: false,
        }],
        None,
        true,
    );
    let b = arena.make_record(
        vec![FieldInfo {
            name,
            ty: arena.int(),
            optional: false,
        }],
        None,
        true,
    );
    assert_eq!(a, b);
}

#[test]
fn literal_interning_deduplicates_equal_values() {
    let mut arena = TypeArena::new();
    let a = arena.make_literal(LiteralValue::Int(42));
    let b = arena.make_literal(LiteralValue::Int(42));
    let c = arena.make_literal(LiteralValue::Int(7));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn function_constructor_moves_rest_param_last() {
    let mut arena = TypeArena::new();
    let rest_name = arena.intern_string("rest");
    let fixed_name = arena.intern_string("fixed");
    let f = arena.make_function(
        vec![
            ParamInfo {
                name: rest_name,
                ty: arena.int(),
                optional: false,
                rest: true,
            },
            ParamInfo {
                name: fixed_name,
                ty: arena.string(),
                optional: false,
                rest: false,
            },
        ],
        arena.void(),
        false,
    );
    match arena.get(f) {
        Type::Function { params, .. } => {
            assert_eq!(params.len(), 2);
            assert!(params.last().unwrap().rest);
            assert_eq!(params.last().unwrap().name, rest_name);
        }
        _ => panic!("expected Function"),
    }
}
