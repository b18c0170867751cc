//! C5 — the type property resolver (spec.md §4.4): reflective access on
//! `Type` values. Every property has a fixed result shape and a fixed
//! answer to "does the result survive erasure" (spec.md §4.4's table).

use typeforge_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message, Diagnostic};
use typeforge_common::Span;
use typeforge_types::{judge, metadata::unwrap_metadata, render_type, LiteralValue, Raw, Type, TypeArena, TypeId, Value};

/// A resolved property: its value, and whether that value's *type* is
/// runtime-representable (spec.md §4.4's "Runtime-usable?" column). A
/// `false` here means the expression reading this property can never be
/// erased to a plain runtime value, no matter what it evaluates to.
pub struct Property {
    pub value: Value,
    pub runtime_usable: bool,
}

impl Property {
    fn runtime(value: Value) -> Self {
        Property {
            value,
            runtime_usable: true,
        }
    }
    fn comptime_only(value: Value) -> Self {
        Property {
            value,
            runtime_usable: false,
        }
    }
}

fn str_value(arena: &mut TypeArena, s: &str) -> Value {
    Value::Scalar(Raw::Str(arena.intern_string(s)))
}

/// Resolves a non-call reflective property (everything but `extends(U)`
/// and `annotation(A)`, which need an extra argument — see
/// `extends`/`annotation` below).
pub fn resolve(arena: &mut TypeArena, receiver: TypeId, prop: &str, span: Span) -> Result<Property, Diagnostic> {
    let structural = unwrap_metadata(arena, receiver);

    match prop {
        "name" => Ok(Property::runtime(match arena.get(receiver) {
            Type::WithMetadata { metadata, .. } => match metadata.display_name {
                Some(name) => {
                    let s = arena.resolve_atom(name).to_string();
                    str_value(arena, &s)
                }
                None => Value::unit(),
            },
            Type::Branded { name, .. } => {
                let s = arena.resolve_atom(*name).to_string();
                str_value(arena, &s)
            }
            _ => Value::unit(),
        })),

        "baseName" => {
            let s = base_name(arena, structural);
            Ok(Property::runtime(str_value(arena, &s)))
        }

        "fieldNames" => match arena.get(structural) {
            Type::Record { fields, .. } => {
                let names: Vec<Value> = fields
                    .iter()
                    .map(|f| arena.resolve_atom(f.name).to_string())
                    .collect::<Vec<_>>()
                    .into_iter()
                    .map(|s| str_value(arena, &s))
                    .collect();
                Ok(Property::runtime(Value::Array(names)))
            }
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "length" => match arena.get(structural) {
            Type::Array { elements } if !elements.iter().any(|e| e.spread) => {
                Ok(Property::runtime(Value::Scalar(Raw::Int(elements.len() as i64))))
            }
            Type::Array { .. } => Ok(Property::runtime(Value::unit())),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "isFixed" => match arena.get(structural) {
            Type::Array { elements } => Ok(Property::runtime(Value::Scalar(Raw::Bool(!elements.iter().any(|e| e.spread))))),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "closed" => match arena.get(structural) {
            Type::Record { closed, .. } => Ok(Property::runtime(Value::Scalar(Raw::Bool(*closed)))),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "async" => match arena.get(structural) {
            Type::Function { is_async, .. } => Ok(Property::runtime(Value::Scalar(Raw::Bool(*is_async)))),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "brand" => match arena.get(structural) {
            Type::Branded { brand, .. } => {
                let s = arena.resolve_atom(*brand).to_string();
                Ok(Property::runtime(str_value(arena, &s)))
            }
            _ => Ok(Property::runtime(Value::unit())),
        },

        "fields" => match arena.get(structural).clone() {
            Type::Record { fields, .. } => {
                let values: Vec<Value> = fields
                    .iter()
                    .map(|f| {
                        let name = arena.resolve_atom(f.name).to_string();
                        let name_value = str_value(arena, &name);
                        Value::Record(vec![
                            (arena.intern_string("name"), name_value),
                            (arena.intern_string("type"), Value::TypeValue(f.ty)),
                            (arena.intern_string("optional"), Value::Scalar(Raw::Bool(f.optional))),
                        ])
                    })
                    .collect();
                Ok(Property::comptime_only(Value::Array(values)))
            }
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "variants" => match arena.get(structural).clone() {
            Type::Union(members) => Ok(Property::comptime_only(Value::Array(
                members.into_iter().map(Value::TypeValue).collect(),
            ))),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "typeArgs" => match arena.get(receiver).clone() {
            Type::WithMetadata { metadata, .. } => Ok(Property::comptime_only(Value::Array(
                metadata.type_args.into_iter().map(Value::TypeValue).collect(),
            ))),
            _ => Ok(Property::comptime_only(Value::Array(vec![]))),
        },

        "elementType" => match arena.get(structural).clone() {
            Type::Array { elements } => {
                let spread_elem = elements.iter().find(|e| e.spread).map(|e| e.ty);
                let ty = match spread_elem {
                    Some(t) => t,
                    None => {
                        let member_tys: Vec<TypeId> = elements.iter().map(|e| e.ty).collect();
                        arena.make_union(member_tys)
                    }
                };
                Ok(Property::comptime_only(Value::TypeValue(ty)))
            }
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "returnType" => match arena.get(structural).clone() {
            Type::Function { return_type, .. } => Ok(Property::comptime_only(Value::TypeValue(return_type))),
            Type::Intersection(_) => Err(ambiguous_intersection_access(prop, span)),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "parameterTypes" => match arena.get(structural).clone() {
            Type::Function { params, .. } => Ok(Property::comptime_only(Value::Array(
                params.into_iter().map(|p| Value::TypeValue(p.ty)).collect(),
            ))),
            Type::Intersection(_) => Err(ambiguous_intersection_access(prop, span)),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "signatures" => match arena.get(structural).clone() {
            Type::Intersection(members) => Ok(Property::comptime_only(Value::Array(
                members.into_iter().map(Value::TypeValue).collect(),
            ))),
            Type::Function { .. } => Ok(Property::comptime_only(Value::Array(vec![Value::TypeValue(structural)]))),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "baseType" => match arena.get(receiver).clone() {
            Type::Branded { base, .. } => Ok(Property::comptime_only(Value::TypeValue(base))),
            Type::WithMetadata { base, .. } => Ok(Property::comptime_only(Value::TypeValue(base))),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "keysType" => match arena.get(structural).clone() {
            Type::Record { fields, .. } => {
                let literals: Vec<TypeId> = fields
                    .iter()
                    .map(|f| arena.make_literal(LiteralValue::Str(f.name)))
                    .collect();
                let ty = if literals.is_empty() { arena.never() } else { arena.make_union(literals) };
                Ok(Property::comptime_only(Value::TypeValue(ty)))
            }
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        "indexType" => match arena.get(structural).clone() {
            Type::Record { index_type, .. } => Ok(Property::comptime_only(match index_type {
                Some(it) => Value::TypeValue(it),
                None => Value::unit(),
            })),
            _ => Err(property_missing(arena, receiver, prop, span)),
        },

        _ => Err(property_missing(arena, receiver, prop, span)),
    }
}

/// `.extends(U)` (spec.md §4.4): always comptime-only, regardless of the
/// structural runtime-usability of `Boolean` — there is no runtime
/// implementation of subtyping.
pub fn extends(arena: &TypeArena, receiver: TypeId, argument: TypeId) -> Property {
    Property::comptime_only(Value::Scalar(Raw::Bool(judge::is_subtype(arena, receiver, argument))))
}

/// `.annotation(A)`: the first annotation on `receiver`'s metadata whose
/// declared type is `<: A`.
pub fn annotation(arena: &TypeArena, receiver: TypeId, argument: TypeId, span: Span) -> Result<Property, Diagnostic> {
    match arena.get(receiver) {
        Type::WithMetadata { metadata, .. } => metadata
            .annotations
            .iter()
            .find(|a| judge::is_subtype(arena, a.declared_type, argument))
            .map(|a| Property::comptime_only(a.value.clone()))
            .ok_or_else(|| property_missing(arena, receiver, "annotation", span)),
        _ => Err(property_missing(arena, receiver, "annotation", span)),
    }
}

fn base_name(arena: &TypeArena, id: TypeId) -> String {
    match arena.get(id) {
        Type::Primitive(p) => format!("{p:?}"),
        Type::Literal { .. } => "Literal".to_string(),
        Type::Record { .. } => "Record".to_string(),
        Type::Array { .. } => "Array".to_string(),
        Type::Function { .. } => "Function".to_string(),
        Type::Union(_) => "Union".to_string(),
        Type::Intersection(_) => "Intersection".to_string(),
        Type::Branded { .. } => "Branded".to_string(),
        Type::TypeVar { .. } => "TypeVar".to_string(),
        Type::This => "This".to_string(),
        Type::WithMetadata { .. } => "WithMetadata".to_string(),
        Type::Bounded { .. } => "Type".to_string(),
        Type::Keyof { .. } => "Keyof".to_string(),
        Type::IndexedAccess { .. } => "IndexedAccess".to_string(),
    }
}

fn property_missing(arena: &TypeArena, receiver: TypeId, prop: &str, span: Span) -> Diagnostic {
    let type_name = render_type(arena, receiver);
    let message = format_message(diagnostic_messages::PROPERTY_MISSING, &[prop, type_name.as_str()]);
    Diagnostic::error("typecheck", span, diagnostic_codes::PROPERTY_MISSING, message)
}

fn ambiguous_intersection_access(prop: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::AMBIGUOUS_INTERSECTION_ACCESS, &[prop]);
    Diagnostic::error(
        "typecheck",
        span,
        diagnostic_codes::AMBIGUOUS_INTERSECTION_ACCESS,
        message,
    )
}

#[cfg(test)]
#[path = "tests/reflect_tests.rs"]
mod reflect_tests;
