use super::*;
use std::fs;
use typeforge_common::Span;
use typeforge_env::ScopeArena;

fn installed(arena: &mut TypeArena) -> (ScopeArena, typeforge_common::EnvId) {
    let mut scopes = ScopeArena::new();
    let env = scopes.root();
    install(arena, &mut scopes, env);
    (scopes, env)
}

fn lookup(arena: &mut TypeArena, scopes: &mut ScopeArena, env: typeforge_common::EnvId, name: &str) -> Value {
    let atom = arena.intern_string(name);
    match scopes.comptime_state(env, atom) {
        Some(ComptimeState::Evaluated(v)) => v.clone(),
        other => panic!("expected evaluated binding for {name}, got {other:?}"),
    }
}

#[test]
fn primitive_names_bind_to_the_matching_arena_type() {
    let mut arena = TypeArena::new();
    let (mut scopes, env) = installed(&mut arena);
    assert_eq!(lookup(&mut arena, &mut scopes, env, "Int"), Value::TypeValue(arena.int()));
    assert_eq!(lookup(&mut arena, &mut scopes, env, "String"), Value::TypeValue(arena.string()));
    assert_eq!(lookup(&mut arena, &mut scopes, env, "Type"), Value::TypeValue(arena.type_meta()));
}

#[test]
fn comptime_namespace_exposes_read_file() {
    let mut arena = TypeArena::new();
    let (mut scopes, env) = installed(&mut arena);
    match lookup(&mut arena, &mut scopes, env, "comptime") {
        Value::Record(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(arena.resolve_atom(fields[0].0), "readFile");
            assert_eq!(fields[0].1, Value::Builtin(BuiltinId::ReadFile));
        }
        other => panic!("expected record, got {other:?}"),
    }
}

#[test]
fn type_of_infers_a_literal_type_for_a_scalar() {
    let mut arena = TypeArena::new();
    let v = call(&mut arena, BuiltinId::TypeOf, vec![Value::Scalar(Raw::Int(7))], Span::dummy(), None).unwrap();
    match v {
        Value::TypeValue(t) => {
            let expected = arena.make_literal(LiteralValue::Int(7));
            assert_eq!(t, expected);
        }
        other => panic!("expected TypeValue, got {other:?}"),
    }
}

#[test]
fn assert_true_is_a_no_op() {
    let mut arena = TypeArena::new();
    let v = call(&mut arena, BuiltinId::Assert, vec![Value::Scalar(Raw::Bool(true))], Span::dummy(), None).unwrap();
    assert_eq!(v, Value::unit());
}

#[test]
fn assert_false_reports_assertion_failed() {
    let mut arena = TypeArena::new();
    let args = vec![
        Value::Scalar(Raw::Bool(false)),
        Value::Scalar(Raw::Str(arena.intern_string("nope"))),
    ];
    let err = call(&mut arena, BuiltinId::Assert, args, Span::dummy(), None).unwrap_err();
    assert_eq!(err.code, diagnostic_codes::ASSERTION_FAILED);
    assert!(err.message_text.contains("nope"));
}

#[test]
fn record_type_constructor_builds_a_closed_record() {
    let mut arena = TypeArena::new();
    let field = field_info_value(&mut arena, "x", arena.int(), false);
    let args = vec![Value::Array(vec![field])];
    let v = call(&mut arena, BuiltinId::RecordTypeCtor, args, Span::dummy(), None).unwrap();
    match v {
        Value::TypeValue(t) => {
            let expected = arena.make_record(
                vec![typeforge_types::FieldInfo {
                    name: arena.intern_string("x"),
                    ty: arena.int(),
                    optional: false,
                }],
                None,
                true,
            );
            assert_eq!(t, expected);
        }
        other => panic!("expected TypeValue, got {other:?}"),
    }
}

#[test]
fn union_constructor_builds_a_union_of_its_arguments() {
    let mut arena = TypeArena::new();
    let int = arena.int();
    let string = arena.string();
    let args = vec![Value::TypeValue(int), Value::TypeValue(string)];
    let v = call(&mut arena, BuiltinId::UnionCtor, args, Span::dummy(), None).unwrap();
    match v {
        Value::TypeValue(t) => assert_eq!(t, arena.make_union(vec![int, string])),
        other => panic!("expected TypeValue, got {other:?}"),
    }
}

#[test]
fn try_result_ctor_wraps_ok_and_error_variants() {
    let mut arena = TypeArena::new();
    let int = arena.int();
    let args = vec![Value::TypeValue(int)];
    let v = call(&mut arena, BuiltinId::TryResultCtor, args, Span::dummy(), None).unwrap();
    match v {
        Value::TypeValue(t) => match arena.get(t) {
            typeforge_types::Type::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected a union, got {other:?}"),
        },
        other => panic!("expected TypeValue, got {other:?}"),
    }
}

#[test]
fn try_builtin_has_no_compile_time_semantics() {
    let mut arena = TypeArena::new();
    let err = call(&mut arena, BuiltinId::Try, vec![], Span::dummy(), None).unwrap_err();
    assert_eq!(err.code, diagnostic_codes::COMPTIME_UNSUPPORTED_CONSTRUCT);
}

#[test]
fn parse_int_of_garbage_is_undefined_not_an_error() {
    let mut arena = TypeArena::new();
    let s = Value::Scalar(Raw::Str(arena.intern_string("not a number")));
    let v = call(&mut arena, BuiltinId::ParseInt, vec![s], Span::dummy(), None).unwrap();
    assert_eq!(v, Value::Scalar(Raw::Undefined));
}

#[test]
fn parse_float_of_a_valid_literal_succeeds() {
    let mut arena = TypeArena::new();
    let s = Value::Scalar(Raw::Str(arena.intern_string("3.5")));
    let v = call(&mut arena, BuiltinId::ParseFloat, vec![s], Span::dummy(), None).unwrap();
    assert_eq!(v, Value::Scalar(Raw::Float(3.5)));
}

#[test]
fn read_file_without_a_sandbox_root_fails_closed() {
    let mut arena = TypeArena::new();
    let path = Value::Scalar(Raw::Str(arena.intern_string("data.txt")));
    let err = call(&mut arena, BuiltinId::ReadFile, vec![path], Span::dummy(), None).unwrap_err();
    assert_eq!(err.code, diagnostic_codes::PROPERTY_MISSING);
}

#[test]
fn read_file_rejects_parent_dir_escape() {
    let mut arena = TypeArena::new();
    let dir = tempfile::tempdir().unwrap();
    let path = Value::Scalar(Raw::Str(arena.intern_string("../escape.txt")));
    let err = call(&mut arena, BuiltinId::ReadFile, vec![path], Span::dummy(), Some(dir.path())).unwrap_err();
    assert_eq!(err.code, diagnostic_codes::PROPERTY_MISSING);
}

#[test]
fn read_file_reads_a_relative_path_under_the_sandbox_root() {
    let mut arena = TypeArena::new();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), "hello").unwrap();
    let path = Value::Scalar(Raw::Str(arena.intern_string("data.txt")));
    let v = call(&mut arena, BuiltinId::ReadFile, vec![path], Span::dummy(), Some(dir.path())).unwrap();
    match v {
        Value::Scalar(Raw::Str(s)) => assert_eq!(arena.resolve_atom(s), "hello"),
        other => panic!("expected string, got {other:?}"),
    }
}
