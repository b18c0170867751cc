use super::*;
use typeforge_common::Span;
use typeforge_types::{FieldInfo, ParamInfo};

#[test]
fn field_names_lists_record_fields_in_source_order() {
    let mut arena = TypeArena::new();
    let a = arena.intern_string("a");
    let b = arena.intern_string("b");
    let rec = arena.make_record(
        vec![
            FieldInfo { name: a, ty: arena.int(), optional: false },
            FieldInfo { name: b, ty: arena.string(), optional: false },
        ],
        None,
        true,
    );
    let prop = resolve(&mut arena, rec, "fieldNames", Span::dummy()).unwrap();
    match prop.value {
        Value::Array(items) => {
            assert_eq!(items.len(), 2);
            assert!(matches!(&items[0], Value::Scalar(Raw::Str(_))));
        }
        other => panic!("expected array, got {other:?}"),
    }
    assert!(prop.runtime_usable);
}

#[test]
fn fields_reflection_is_comptime_only() {
    let mut arena = TypeArena::new();
    let a = arena.intern_string("a");
    let rec = arena.make_record(
        vec![FieldInfo { name: a, ty: arena.int(), optional: true }],
        None,
        true,
    );
    let prop = resolve(&mut arena, rec, "fields", Span::dummy()).unwrap();
    assert!(!prop.runtime_usable);
    match prop.value {
        Value::Array(items) => assert_eq!(items.len(), 1),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn length_on_a_spread_array_is_undefined_not_an_error() {
    let mut arena = TypeArena::new();
    let elements = vec![typeforge_types::ArrayElement {
        ty: arena.int(),
        label: None,
        spread: true,
    }];
    let arr = arena.make_array(elements);
    let prop = resolve(&mut arena, arr, "length", Span::dummy()).unwrap();
    assert_eq!(prop.value, Value::unit());
}

#[test]
fn is_fixed_is_false_for_a_spread_array() {
    let mut arena = TypeArena::new();
    let elements = vec![typeforge_types::ArrayElement {
        ty: arena.int(),
        label: None,
        spread: true,
    }];
    let arr = arena.make_array(elements);
    let prop = resolve(&mut arena, arr, "isFixed", Span::dummy()).unwrap();
    assert_eq!(prop.value, Value::Scalar(Raw::Bool(false)));
}

#[test]
fn return_type_on_an_intersection_is_ambiguous() {
    let mut arena = TypeArena::new();
    let f1 = arena.make_function(vec![], arena.int(), false);
    let f2 = arena.make_function(vec![], arena.string(), false);
    let inter = arena.make_intersection(vec![f1, f2]);
    let err = resolve(&mut arena, inter, "returnType", Span::dummy()).unwrap_err();
    assert_eq!(
        err.code,
        typeforge_common::diagnostics::diagnostic_codes::AMBIGUOUS_INTERSECTION_ACCESS
    );
}

#[test]
fn signatures_on_a_plain_function_wraps_it_as_a_single_signature() {
    let mut arena = TypeArena::new();
    let f = arena.make_function(
        vec![ParamInfo {
            name: arena.intern_string("x"),
            ty: arena.int(),
            optional: false,
            rest: false,
        }],
        arena.void(),
        false,
    );
    let prop = resolve(&mut arena, f, "signatures", Span::dummy()).unwrap();
    match prop.value {
        Value::Array(items) => assert_eq!(items.len(), 1),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn unknown_property_reports_property_missing() {
    let mut arena = TypeArena::new();
    let t = arena.int();
    let err = resolve(&mut arena, t, "nonsense", Span::dummy()).unwrap_err();
    assert_eq!(err.code, typeforge_common::diagnostics::diagnostic_codes::PROPERTY_MISSING);
}

#[test]
fn extends_checks_subtyping_and_is_always_comptime_only() {
    let mut arena = TypeArena::new();
    let int_lit = arena.make_literal(typeforge_types::LiteralValue::Int(1));
    let number = arena.number();
    let prop = extends(&arena, int_lit, number);
    assert_eq!(prop.value, Value::Scalar(Raw::Bool(true)));
    assert!(!prop.runtime_usable);
}

#[test]
fn keys_type_of_an_empty_record_is_never() {
    let mut arena = TypeArena::new();
    let rec = arena.make_record(vec![], None, true);
    let prop = resolve(&mut arena, rec, "keysType", Span::dummy()).unwrap();
    assert_eq!(prop.value, Value::TypeValue(arena.never()));
}

#[test]
fn base_name_reports_the_structural_kind() {
    let mut arena = TypeArena::new();
    let rec = arena.make_record(vec![], None, true);
    let prop = resolve(&mut arena, rec, "baseName", Span::dummy()).unwrap();
    match prop.value {
        Value::Scalar(Raw::Str(s)) => assert_eq!(arena.resolve_atom(s), "Record"),
        other => panic!("expected string, got {other:?}"),
    }
}
