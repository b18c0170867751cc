//! The built-in catalog (spec.md §6): primitives, record/type constructors,
//! reflective operators, builders, and `comptime.readFile`, all bound into
//! the initial environment by `install` and dispatched by `call`.
//!
//! Built-ins are "ordinary callable values distinguished only by carrying a
//! native implementation pointer" (spec.md §9) — `Value::Builtin` is that
//! pointer, and `call` is the native implementation it points to.

use std::path::{Component, Path};

use typeforge_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message, Diagnostic};
use typeforge_common::{Atom, EnvId, Span};
use typeforge_env::{ComptimeState, ComptimeStatus, ScopeArena, TypeBinding};
use typeforge_types::{
    ArrayElement, BuiltinId, FieldInfo, LiteralValue, ParamInfo, Raw, TypeArena, TypeId, TypeMetadata, Value,
};

use crate::eval::{arity_error, infer_value_type, invalid_type_expression};

/// Binds every name spec.md §6 lists as part of the initial environment.
/// Called once per compilation before the checker/evaluator sees any user
/// declaration.
pub fn install(arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId) {
    let type_meta = arena.type_meta();

    let primitives: &[(&str, TypeId)] = &[
        ("Int", arena.int()),
        ("Float", arena.float()),
        ("Number", arena.number()),
        ("String", arena.string()),
        ("Boolean", arena.boolean()),
        ("Null", arena.null()),
        ("Undefined", arena.undefined()),
        ("Never", arena.never()),
        ("Unknown", arena.unknown()),
        ("Void", arena.void()),
        ("Type", type_meta),
    ];
    for (name, ty) in primitives.iter().copied() {
        bind(arena, scopes, env, name, Value::TypeValue(ty), type_meta);
    }

    let builtins: &[(&str, BuiltinId)] = &[
        ("typeOf", BuiltinId::TypeOf),
        ("assert", BuiltinId::Assert),
        ("FieldInfo", BuiltinId::FieldInfoCtor),
        ("ParamInfo", BuiltinId::ParamInfoCtor),
        ("ArrayElementInfo", BuiltinId::ArrayElementInfoCtor),
        ("TypeMetadata", BuiltinId::TypeMetadataCtor),
        ("Error", BuiltinId::ErrorCtor),
        ("RecordType", BuiltinId::RecordTypeCtor),
        ("Union", BuiltinId::UnionCtor),
        ("Intersection", BuiltinId::IntersectionCtor),
        ("FunctionType", BuiltinId::FunctionTypeCtor),
        ("Array", BuiltinId::ArrayCtor),
        ("WithMetadata", BuiltinId::WithMetadataCtor),
        ("Branded", BuiltinId::BrandedCtor),
        ("LiteralType", BuiltinId::LiteralTypeCtor),
        ("TryResult", BuiltinId::TryResultCtor),
        ("fromEntries", BuiltinId::FromEntries),
        ("buildRecord", BuiltinId::BuildRecord),
        ("parseInt", BuiltinId::ParseInt),
        ("parseFloat", BuiltinId::ParseFloat),
        ("Try", BuiltinId::Try),
    ];
    let unknown = arena.unknown();
    for (name, id) in builtins.iter().copied() {
        bind(arena, scopes, env, name, Value::Builtin(id), unknown);
    }

    // `comptime.readFile` lives under a namespace record rather than a bare
    // name (spec.md §6: "a comptime namespace with `readFile`").
    let read_file = arena.intern_string("readFile");
    let comptime_ns = Value::Record(vec![(read_file, Value::Builtin(BuiltinId::ReadFile))]);
    bind(arena, scopes, env, "comptime", comptime_ns, arena.unknown());
}

fn bind(arena: &mut TypeArena, scopes: &mut ScopeArena, env: EnvId, name: &str, value: Value, ty: TypeId) {
    let atom = arena.intern_string(name);
    scopes.define_type(
        env,
        atom,
        TypeBinding {
            ty,
            comptime_status: ComptimeStatus::Comptime,
        },
    );
    scopes.define_comptime(env, atom, ComptimeState::Evaluated(value));
}

/// Dispatches a call to a built-in (`Value::Builtin`). Mirrors `apply`'s
/// shape for closures: arguments are already evaluated `Value`s.
pub fn call(arena: &mut TypeArena, id: BuiltinId, mut args: Vec<Value>, call_site: Span, sandbox_root: Option<&Path>) -> Result<Value, Diagnostic> {
    match id {
        BuiltinId::TypeOf => {
            let v = arg(&mut args, 0, call_site)?;
            Ok(Value::TypeValue(infer_value_type(arena, &v)))
        }

        BuiltinId::Assert => {
            let cond = arg(&mut args, 0, call_site)?;
            let message = match args.into_iter().next() {
                Some(Value::Scalar(Raw::Str(s))) => arena.resolve_atom(s).to_string(),
                _ => "assertion failed".to_string(),
            };
            match cond {
                Value::Scalar(Raw::Bool(true)) => Ok(Value::unit()),
                Value::Scalar(Raw::Bool(false)) => Err(assertion_failed(&message, call_site)),
                _ => Err(invalid_type_expression("assert condition", call_site)),
            }
        }

        BuiltinId::FieldInfoCtor => {
            let name = expect_string(arena, &arg(&mut args, 0, call_site)?, call_site)?;
            let ty = expect_type(&arg(&mut args, 1, call_site)?, call_site)?;
            let optional = opt_bool(&args, 2, false);
            Ok(field_info_value(arena, &name, ty, optional))
        }

        BuiltinId::ParamInfoCtor => {
            let name = expect_string(arena, &arg(&mut args, 0, call_site)?, call_site)?;
            let ty = expect_type(&arg(&mut args, 1, call_site)?, call_site)?;
            let optional = opt_bool(&args, 2, false);
            let rest = opt_bool(&args, 3, false);
            Ok(param_info_value(arena, &name, ty, optional, rest))
        }

        BuiltinId::ArrayElementInfoCtor => {
            let ty = expect_type(&arg(&mut args, 0, call_site)?, call_site)?;
            let label = match args.get(1) {
                Some(Value::Scalar(Raw::Str(s))) => Some(arena.resolve_atom(*s).to_string()),
                _ => None,
            };
            let spread = opt_bool(&args, 2, false);
            Ok(array_element_info_value(arena, ty, label.as_deref(), spread))
        }

        BuiltinId::TypeMetadataCtor => {
            let display_name = match args.first() {
                Some(Value::Scalar(Raw::Str(s))) => Some(arena.resolve_atom(*s).to_string()),
                _ => None,
            };
            let type_args = match args.get(1) {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            Ok(type_metadata_value(arena, display_name.as_deref(), &type_args))
        }

        BuiltinId::ErrorCtor => {
            let message = expect_string(arena, &arg(&mut args, 0, call_site)?, call_site)?;
            Ok(error_value(arena, &message))
        }

        BuiltinId::RecordTypeCtor => {
            let fields = expect_array(arg(&mut args, 0, call_site)?, call_site)?;
            let index_type = match args.get(1) {
                Some(Value::TypeValue(t)) => Some(*t),
                _ => None,
            };
            let closed = opt_bool(&args, 2, true);
            build_record_type(arena, &fields, index_type, closed, call_site)
        }

        BuiltinId::UnionCtor => {
            let members = type_list(&args, call_site)?;
            Ok(Value::TypeValue(arena.make_union(members)))
        }

        BuiltinId::IntersectionCtor => {
            let members = type_list(&args, call_site)?;
            Ok(Value::TypeValue(arena.make_intersection(members)))
        }

        BuiltinId::FunctionTypeCtor => {
            let params = expect_array(arg(&mut args, 0, call_site)?, call_site)?;
            let return_type = expect_type(&arg(&mut args, 1, call_site)?, call_site)?;
            let is_async = opt_bool(&args, 2, false);
            let mut param_infos = Vec::with_capacity(params.len());
            for p in params {
                param_infos.push(param_info_from_value(arena, p, call_site)?);
            }
            Ok(Value::TypeValue(arena.make_function(param_infos, return_type, is_async)))
        }

        BuiltinId::ArrayCtor => {
            let elements = expect_array(arg(&mut args, 0, call_site)?, call_site)?;
            let mut out = Vec::with_capacity(elements.len());
            for e in elements {
                out.push(array_element_from_value(arena, e, call_site)?);
            }
            Ok(Value::TypeValue(arena.make_array(out)))
        }

        BuiltinId::WithMetadataCtor => {
            let base = expect_type(&arg(&mut args, 0, call_site)?, call_site)?;
            let metadata_value = arg(&mut args, 1, call_site)?;
            let metadata = type_metadata_from_value(arena, metadata_value, call_site)?;
            Ok(Value::TypeValue(arena.make_with_metadata(base, metadata)))
        }

        BuiltinId::BrandedCtor => {
            let base = expect_type(&arg(&mut args, 0, call_site)?, call_site)?;
            let brand = expect_string(arena, &arg(&mut args, 1, call_site)?, call_site)?;
            let name = expect_string(arena, &arg(&mut args, 2, call_site)?, call_site)?;
            let brand = arena.intern_string(&brand);
            let name = arena.intern_string(&name);
            Ok(Value::TypeValue(arena.make_branded(base, brand, name)))
        }

        BuiltinId::LiteralTypeCtor => {
            let v = arg(&mut args, 0, call_site)?;
            let lit = match v {
                Value::Scalar(Raw::Int(i)) => LiteralValue::Int(i),
                Value::Scalar(Raw::Float(f)) => LiteralValue::Float(f),
                Value::Scalar(Raw::Str(s)) => LiteralValue::Str(s),
                Value::Scalar(Raw::Bool(b)) => LiteralValue::Bool(b),
                _ => return Err(invalid_type_expression("LiteralType argument", call_site)),
            };
            Ok(Value::TypeValue(arena.make_literal(lit)))
        }

        BuiltinId::TryResultCtor => {
            let t = expect_type(&arg(&mut args, 0, call_site)?, call_site)?;
            Ok(Value::TypeValue(try_result_type(arena, t)))
        }

        BuiltinId::FromEntries => {
            let entries = expect_array(arg(&mut args, 0, call_site)?, call_site)?;
            let mut fields = Vec::with_capacity(entries.len());
            for entry in entries {
                let Value::Array(pair) = entry else {
                    return Err(invalid_type_expression("fromEntries entry", call_site));
                };
                let mut it = pair.into_iter();
                let key = it.next().ok_or_else(|| invalid_type_expression("fromEntries key", call_site))?;
                let val = it.next().ok_or_else(|| invalid_type_expression("fromEntries value", call_site))?;
                let key = expect_string(arena, &key, call_site)?;
                let atom = arena.intern_string(&key);
                fields.retain(|(n, _)| *n != atom);
                fields.push((atom, val));
            }
            Ok(Value::Record(fields))
        }

        BuiltinId::BuildRecord => {
            let fields = expect_array(arg(&mut args, 0, call_site)?, call_site)?;
            build_record_type(arena, &fields, None, true, call_site)
        }

        BuiltinId::ParseInt => {
            let s = expect_string(arena, &arg(&mut args, 0, call_site)?, call_site)?;
            Ok(match s.trim().parse::<i64>() {
                Ok(i) => Value::Scalar(Raw::Int(i)),
                Err(_) => Value::Scalar(Raw::Undefined),
            })
        }

        BuiltinId::ParseFloat => {
            let s = expect_string(arena, &arg(&mut args, 0, call_site)?, call_site)?;
            Ok(match s.trim().parse::<f64>() {
                Ok(f) => Value::Scalar(Raw::Float(f)),
                Err(_) => Value::Scalar(Raw::Undefined),
            })
        }

        BuiltinId::ReadFile => {
            let path = expect_string(arena, &arg(&mut args, 0, call_site)?, call_site)?;
            let contents = read_sandboxed(sandbox_root, &path, call_site)?;
            Ok(Value::Scalar(Raw::Str(arena.intern_string(&contents))))
        }

        BuiltinId::Try => Err(crate::eval::comptime_unsupported("Try", call_site)),
    }
}

fn arg(args: &mut Vec<Value>, index: usize, span: Span) -> Result<Value, Diagnostic> {
    if index < args.len() {
        Ok(args[index].clone())
    } else {
        Err(arity_error(index + 1, args.len(), span))
    }
}

fn opt_bool(args: &[Value], index: usize, default: bool) -> bool {
    match args.get(index) {
        Some(Value::Scalar(Raw::Bool(b))) => *b,
        _ => default,
    }
}

fn expect_type(v: &Value, span: Span) -> Result<TypeId, Diagnostic> {
    match v {
        Value::TypeValue(t) => Ok(*t),
        _ => Err(invalid_type_expression("built-in argument", span)),
    }
}

fn expect_string(arena: &TypeArena, v: &Value, span: Span) -> Result<String, Diagnostic> {
    match v {
        Value::Scalar(Raw::Str(s)) => Ok(arena.resolve_atom(*s).to_string()),
        _ => Err(invalid_type_expression("built-in argument", span)),
    }
}

fn expect_array(v: Value, span: Span) -> Result<Vec<Value>, Diagnostic> {
    match v {
        Value::Array(items) => Ok(items),
        _ => Err(invalid_type_expression("built-in argument", span)),
    }
}

fn expect_record(v: Value, span: Span) -> Result<Vec<(Atom, Value)>, Diagnostic> {
    match v {
        Value::Record(fields) => Ok(fields),
        _ => Err(invalid_type_expression("built-in argument", span)),
    }
}

fn record_field<'a>(arena: &TypeArena, fields: &'a [(Atom, Value)], name: &str) -> Option<&'a Value> {
    fields.iter().find(|(n, _)| arena.resolve_atom(*n) == name).map(|(_, v)| v)
}

fn type_list(args: &[Value], span: Span) -> Result<Vec<TypeId>, Diagnostic> {
    args.iter().map(|v| expect_type(v, span)).collect()
}

fn field_info_value(arena: &mut TypeArena, name: &str, ty: TypeId, optional: bool) -> Value {
    let name_atom = arena.intern_string("name");
    let type_atom = arena.intern_string("type");
    let optional_atom = arena.intern_string("optional");
    let name_value = Value::Scalar(Raw::Str(arena.intern_string(name)));
    Value::Record(vec![
        (name_atom, name_value),
        (type_atom, Value::TypeValue(ty)),
        (optional_atom, Value::Scalar(Raw::Bool(optional))),
    ])
}

fn param_info_value(arena: &mut TypeArena, name: &str, ty: TypeId, optional: bool, rest: bool) -> Value {
    let name_atom = arena.intern_string("name");
    let type_atom = arena.intern_string("type");
    let optional_atom = arena.intern_string("optional");
    let rest_atom = arena.intern_string("rest");
    let name_value = Value::Scalar(Raw::Str(arena.intern_string(name)));
    Value::Record(vec![
        (name_atom, name_value),
        (type_atom, Value::TypeValue(ty)),
        (optional_atom, Value::Scalar(Raw::Bool(optional))),
        (rest_atom, Value::Scalar(Raw::Bool(rest))),
    ])
}

fn array_element_info_value(arena: &mut TypeArena, ty: TypeId, label: Option<&str>, spread: bool) -> Value {
    let type_atom = arena.intern_string("type");
    let label_atom = arena.intern_string("label");
    let spread_atom = arena.intern_string("spread");
    let label_value = match label {
        Some(l) => Value::Scalar(Raw::Str(arena.intern_string(l))),
        None => Value::unit(),
    };
    Value::Record(vec![
        (type_atom, Value::TypeValue(ty)),
        (label_atom, label_value),
        (spread_atom, Value::Scalar(Raw::Bool(spread))),
    ])
}

fn type_metadata_value(arena: &mut TypeArena, display_name: Option<&str>, type_args: &[Value]) -> Value {
    let display_name_atom = arena.intern_string("displayName");
    let type_args_atom = arena.intern_string("typeArgs");
    let display_name_value = match display_name {
        Some(n) => Value::Scalar(Raw::Str(arena.intern_string(n))),
        None => Value::unit(),
    };
    Value::Record(vec![
        (display_name_atom, display_name_value),
        (type_args_atom, Value::Array(type_args.to_vec())),
    ])
}

fn error_value(arena: &mut TypeArena, message: &str) -> Value {
    let message_atom = arena.intern_string("message");
    let message_value = Value::Scalar(Raw::Str(arena.intern_string(message)));
    Value::Record(vec![(message_atom, message_value)])
}

/// The `Error` record type shape (unbounded text message), used as the
/// `error` arm of `TryResult<T>` (spec.md GLOSSARY).
fn error_type(arena: &mut TypeArena) -> TypeId {
    let message = arena.intern_string("message");
    arena.make_record(
        vec![FieldInfo {
            name: message,
            ty: arena.string(),
            optional: false,
        }],
        None,
        true,
    )
}

fn try_result_type(arena: &mut TypeArena, t: TypeId) -> TypeId {
    let ok = arena.intern_string("ok");
    let value = arena.intern_string("value");
    let error = arena.intern_string("error");

    let true_ty = arena.make_literal(LiteralValue::Bool(true));
    let false_ty = arena.make_literal(LiteralValue::Bool(false));
    let error_ty = error_type(arena);

    let ok_variant = arena.make_record(
        vec![
            FieldInfo { name: ok, ty: true_ty, optional: false },
            FieldInfo { name: value, ty: t, optional: false },
        ],
        None,
        true,
    );
    let err_variant = arena.make_record(
        vec![
            FieldInfo { name: ok, ty: false_ty, optional: false },
            FieldInfo { name: error, ty: error_ty, optional: false },
        ],
        None,
        true,
    );
    arena.make_union(vec![ok_variant, err_variant])
}

fn field_info_from_value(arena: &TypeArena, v: Value, span: Span) -> Result<FieldInfo, Diagnostic> {
    let fields = expect_record(v, span)?;
    let name = match record_field(arena, &fields, "name") {
        Some(Value::Scalar(Raw::Str(s))) => *s,
        _ => return Err(invalid_type_expression("FieldInfo.name", span)),
    };
    let ty = match record_field(arena, &fields, "type") {
        Some(Value::TypeValue(t)) => *t,
        _ => return Err(invalid_type_expression("FieldInfo.type", span)),
    };
    let optional = matches!(record_field(arena, &fields, "optional"), Some(Value::Scalar(Raw::Bool(true))));
    Ok(FieldInfo { name, ty, optional })
}

fn param_info_from_value(arena: &TypeArena, v: Value, span: Span) -> Result<ParamInfo, Diagnostic> {
    let fields = expect_record(v, span)?;
    let name = match record_field(arena, &fields, "name") {
        Some(Value::Scalar(Raw::Str(s))) => *s,
        _ => return Err(invalid_type_expression("ParamInfo.name", span)),
    };
    let ty = match record_field(arena, &fields, "type") {
        Some(Value::TypeValue(t)) => *t,
        _ => return Err(invalid_type_expression("ParamInfo.type", span)),
    };
    let optional = matches!(record_field(arena, &fields, "optional"), Some(Value::Scalar(Raw::Bool(true))));
    let rest = matches!(record_field(arena, &fields, "rest"), Some(Value::Scalar(Raw::Bool(true))));
    Ok(ParamInfo { name, ty, optional, rest })
}

fn array_element_from_value(arena: &TypeArena, v: Value, span: Span) -> Result<ArrayElement, Diagnostic> {
    let fields = expect_record(v, span)?;
    let ty = match record_field(arena, &fields, "type") {
        Some(Value::TypeValue(t)) => *t,
        _ => return Err(invalid_type_expression("ArrayElementInfo.type", span)),
    };
    let label = match record_field(arena, &fields, "label") {
        Some(Value::Scalar(Raw::Str(s))) => Some(*s),
        _ => None,
    };
    let spread = matches!(record_field(arena, &fields, "spread"), Some(Value::Scalar(Raw::Bool(true))));
    Ok(ArrayElement { ty, label, spread })
}

fn type_metadata_from_value(arena: &mut TypeArena, v: Value, span: Span) -> Result<TypeMetadata, Diagnostic> {
    let fields = expect_record(v, span)?;
    let display_name = match record_field(arena, &fields, "displayName") {
        Some(Value::Scalar(Raw::Str(s))) => Some(*s),
        _ => None,
    };
    let type_args = match record_field(arena, &fields, "typeArgs") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| expect_type(v, span))
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };
    Ok(TypeMetadata {
        display_name,
        type_args,
        annotations: Vec::new(),
    })
}

fn build_record_type(
    arena: &mut TypeArena,
    fields: &[Value],
    index_type: Option<TypeId>,
    closed: bool,
    span: Span,
) -> Result<Value, Diagnostic> {
    let mut out = Vec::with_capacity(fields.len());
    for f in fields.iter().cloned() {
        out.push(field_info_from_value(arena, f, span)?);
    }
    Ok(Value::TypeValue(arena.make_record(out, index_type, closed)))
}

fn assertion_failed(message: &str, span: Span) -> Diagnostic {
    let msg = format_message(diagnostic_messages::ASSERTION_FAILED, &[message]);
    Diagnostic::error("typecheck", span, diagnostic_codes::ASSERTION_FAILED, msg)
}

/// `comptime.readFile` (SPEC_FULL.md §2): relative paths only, resolved
/// against `sandbox_root`, read-only. A `..` component or an absolute path
/// is rejected outright rather than normalized, since normalizing could
/// still resolve outside the root depending on symlinks.
fn read_sandboxed(sandbox_root: Option<&Path>, relative: &str, span: Span) -> Result<String, Diagnostic> {
    let root = sandbox_root.ok_or_else(|| read_file_failed(relative, span))?;
    let requested = Path::new(relative);
    let safe = requested
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        return Err(read_file_failed(relative, span));
    }
    let mut full = root.to_path_buf();
    full.push(requested);
    std::fs::read_to_string(&full).map_err(|_| read_file_failed(relative, span))
}

fn read_file_failed(path: &str, span: Span) -> Diagnostic {
    let msg = format_message(diagnostic_messages::PROPERTY_MISSING, &[path, "comptime.readFile"]);
    Diagnostic::error("typecheck", span, diagnostic_codes::PROPERTY_MISSING, msg)
}

#[cfg(test)]
#[path = "tests/builtins_tests.rs"]
mod builtins_tests;
