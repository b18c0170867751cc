use super::*;
use crate::arena::TypeArena;
use crate::type_def::TypeMetadata;

#[test]
fn this_substitutes_to_receiver() {
    let mut arena = TypeArena::new();
    let receiver = arena.string();
    let this_ty = arena.make_this();
    assert_eq!(substitute_this(&mut arena, this_ty, receiver), receiver);
}

#[test]
fn this_substitution_rewrites_nested_function_return() {
    let mut arena = TypeArena::new();
    let this_ty = arena.make_this();
    let name = arena.intern_string("self");
    let method = arena.make_function(
        vec![ParamInfo {
            name,
            ty: arena.int(),
            optional: false,
            rest: false,
        }],
        this_ty,
        false,
    );
    let receiver = arena.string();
    let substituted = substitute_this(&mut arena, method, receiver);
    match arena.get(substituted) {
        Type::Function { return_type, .. } => assert_eq!(*return_type, receiver),
        _ => panic!("expected Function"),
    }
}

#[test]
fn substitution_is_identity_when_this_does_not_occur() {
    let mut arena = TypeArena::new();
    let int_ty = arena.int();
    let receiver = arena.string();
    assert_eq!(substitute_this(&mut arena, int_ty, receiver), int_ty);
}

#[test]
fn unwrap_metadata_strips_repeated_wrapping() {
    let mut arena = TypeArena::new();
    let base = arena.int();
    let wrapped = arena.make_with_metadata(base, TypeMetadata::named(arena.intern_string("MyInt")));
    let double_wrapped = arena.make_with_metadata(wrapped, TypeMetadata::named(arena.intern_string("AliasOfMyInt")));
    assert_eq!(unwrap_metadata(&arena, double_wrapped), base);
}
