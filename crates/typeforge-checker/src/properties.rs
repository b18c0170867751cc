//! §4.5.6 property access and method dispatch: the three-case lookup order
//! (Type reflection via C5, array/string builtin methods, record fields)
//! plus `This` substitution at access time. Grounded on
//! `tsz-checker::property_checker`'s case ordering, adapted to this
//! checker's interned `TypeId` model instead of a class hierarchy.

use typeforge_common::Span;
use typeforge_types::{substitute_this, Type, TypeArena, TypeId, Value};

use crate::context::Checked;
use crate::error_reporter::property_missing;

/// The fixed array-method table consulted by §4.5.4's generic-return
/// post-pass. Each entry names the method and whether it takes a callback
/// (all of them do, here) so `calls.rs` can recognize the call site.
pub const ARRAY_CALLBACK_METHODS: &[&str] =
    &["map", "flatMap", "filter", "find", "findIndex", "reduce", "some", "every", "flat"];

/// Builds the static `Function` type of a builtin array method against its
/// receiver's element type. The callback parameter types are filled in;
/// the method's own return type is a placeholder the call-checking
/// post-pass (`calls.rs`) replaces with the callback's actual inferred
/// return type once it has one to look at.
pub fn array_method_type(arena: &mut TypeArena, element_ty: TypeId, method: &str) -> Option<TypeId> {
    let index_name = arena.intern_string("index");
    let item_name = arena.intern_string("item");
    let acc_name = arena.intern_string("acc");
    let bool_ty = arena.boolean();
    let int_ty = arena.int();
    let unknown = arena.unknown();

    let callback_params = |arena: &mut TypeArena, extra: TypeId| {
        vec![
            typeforge_types::ParamInfo { name: item_name, ty: element_ty, optional: false, rest: false },
            typeforge_types::ParamInfo { name: index_name, ty: int_ty, optional: true, rest: false },
            typeforge_types::ParamInfo { name: acc_name, ty: extra, optional: true, rest: false },
        ]
    };

    match method {
        "map" | "flatMap" | "filter" | "find" | "findIndex" | "some" | "every" | "flat" => {
            let callback = arena.make_function(callback_params(arena, unknown), unknown, false);
            let method_return = match method {
                // `map`/`flatMap` are replaced by the generic-return
                // post-pass (calls.rs) once the callback's actual return
                // type is known; this placeholder is never observed.
                "map" | "flatMap" => unknown,
                "some" | "every" => bool_ty,
                "findIndex" => int_ty,
                "find" => arena.make_union(vec![element_ty, arena.undefined()]),
                "filter" | "flat" => arena.make_array(vec![typeforge_types::ArrayElement { ty: element_ty, label: None, spread: true }]),
                _ => unreachable!(),
            };
            let params = vec![typeforge_types::ParamInfo { name: arena.intern_string("callback"), ty: callback, optional: method == "flat", rest: false }];
            Some(arena.make_function(params, method_return, false))
        }
        "reduce" => {
            let callback = arena.make_function(callback_params(arena, unknown), unknown, false);
            let params = vec![
                typeforge_types::ParamInfo { name: arena.intern_string("callback"), ty: callback, optional: false, rest: false },
                typeforge_types::ParamInfo { name: arena.intern_string("initial"), ty: unknown, optional: true, rest: false },
            ];
            Some(arena.make_function(params, unknown, false))
        }
        _ => None,
    }
}

/// A handful of string methods exercised the same way as array methods,
/// learned from the same "external method table" idiom — there is no
/// generic-return post-pass for these (spec.md §4.5.4 names only array
/// methods), so their return types are fixed.
pub fn string_method_type(arena: &mut TypeArena, method: &str) -> Option<TypeId> {
    let string_ty = arena.string();
    let int_ty = arena.int();
    let bool_ty = arena.boolean();
    match method {
        "toUpperCase" | "toLowerCase" | "trim" => Some(arena.make_function(vec![], string_ty, false)),
        "charAt" => Some(arena.make_function(
            vec![typeforge_types::ParamInfo { name: arena.intern_string("index"), ty: int_ty, optional: false, rest: false }],
            string_ty,
            false,
        )),
        "includes" => Some(arena.make_function(
            vec![typeforge_types::ParamInfo { name: arena.intern_string("needle"), ty: string_ty, optional: false, rest: false }],
            bool_ty,
            false,
        )),
        "split" => {
            let elements = vec![typeforge_types::ArrayElement { ty: string_ty, label: None, spread: true }];
            let array_ty = arena.make_array(elements);
            Some(arena.make_function(
                vec![typeforge_types::ParamInfo { name: arena.intern_string("sep"), ty: string_ty, optional: false, rest: false }],
                array_ty,
                false,
            ))
        }
        _ => None,
    }
}

pub(crate) fn element_type_of(arena: &mut TypeArena, array_ty: TypeId) -> TypeId {
    match arena.get(array_ty).clone() {
        Type::Array { elements } => {
            let tys: Vec<TypeId> = elements.iter().map(|e| e.ty).collect();
            arena.make_union(tys)
        }
        _ => arena.unknown(),
    }
}

/// Case 1 of §4.5.6: the receiver is a Type. Delegates to C5
/// (`typeforge_eval::reflect`). Requires the receiver's concrete Type to be
/// statically known (`object.comptime_value`); a `Type`-typed expression
/// whose value isn't known yet (an un-instantiated generic type parameter)
/// can't be reflected on and is rejected (Open Question, recorded in
/// DESIGN.md).
fn check_type_reflection(arena: &mut TypeArena, object: &Checked, name: &str, span: Span) -> Result<Checked, typeforge_common::diagnostics::Diagnostic> {
    let Some(Value::TypeValue(receiver)) = &object.comptime_value else {
        return Err(crate::error_reporter::invalid_type_expression(
            &format!("{name} on an unresolved type parameter"),
            span,
        ));
    };
    let receiver = *receiver;
    let property = typeforge_eval::reflect::resolve(arena, receiver, name, span)?;
    let ty = typeforge_eval::infer_value_type(arena, &property.value);
    Ok(Checked {
        ty,
        comptime_only: !property.runtime_usable,
        comptime_value: Some(property.value),
    })
}

/// Case 3 of §4.5.6: the receiver is a record. `This` in a field's type is
/// substituted with `receiver_ty` itself before the result is handed back,
/// enabling fluent-chain typing.
fn check_record_field(arena: &mut TypeArena, receiver_ty: TypeId, name: &str, span: Span) -> Result<Checked, typeforge_common::diagnostics::Diagnostic> {
    let structural = typeforge_types::unwrap_metadata(arena, receiver_ty);
    let Type::Record { fields, index_type, .. } = arena.get(structural).clone() else {
        return Err(property_missing(name, &typeforge_types::render_type(arena, receiver_ty), span));
    };
    let field_ty = fields.iter().find(|f| arena.resolve_atom(f.name) == name).map(|f| f.ty);
    let ty = match field_ty.or(index_type) {
        Some(t) => t,
        None => return Err(property_missing(name, &typeforge_types::render_type(arena, receiver_ty), span)),
    };
    let substituted = substitute_this(arena, ty, receiver_ty);
    Ok(Checked::runtime(substituted))
}

/// The full §4.5.6 dispatch, given the receiver's already-checked type and
/// its (possibly absent) concrete value.
pub fn check_property(arena: &mut TypeArena, object: &Checked, name: &str, span: Span) -> Result<Checked, typeforge_common::diagnostics::Diagnostic> {
    let structural = typeforge_types::unwrap_metadata(arena, object.ty);
    if arena.get(structural).is_metatype_shaped() {
        return check_type_reflection(arena, object, name, span);
    }

    if let Type::Array { .. } = arena.get(structural).clone() {
        if name == "length" {
            return Ok(Checked::runtime(arena.int()));
        }
        let elem = element_type_of(arena, structural);
        if let Some(fn_ty) = array_method_type(arena, elem, name) {
            return Ok(Checked::runtime(fn_ty));
        }
        return Err(property_missing(name, &typeforge_types::render_type(arena, object.ty), span));
    }

    if matches!(arena.get(structural), Type::Primitive(typeforge_types::Primitive::String)) {
        if name == "length" {
            return Ok(Checked::runtime(arena.int()));
        }
        if let Some(fn_ty) = string_method_type(arena, name) {
            return Ok(Checked::runtime(fn_ty));
        }
        return Err(property_missing(name, &typeforge_types::render_type(arena, object.ty), span));
    }

    check_record_field(arena, object.ty, name, span)
}
