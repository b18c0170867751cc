use super::*;
use crate::arena::TypeArena;
use crate::type_def::{FieldInfo, LiteralValue, TypeMetadata};

#[test]
fn renders_primitives() {
    let arena = TypeArena::new();
    assert_eq!(render_type(&arena, arena.string()), "string");
    assert_eq!(render_type(&arena, arena.never()), "never");
}

#[test]
fn renders_string_literal_with_quotes() {
    let mut arena = TypeArena::new();
    let lit = arena.make_literal(LiteralValue::Str(arena.intern_string("ok")));
    assert_eq!(render_type(&arena, lit), "\"ok\"");
}

#[test]
fn prefers_display_name_over_structural_rendering() {
    let mut arena = TypeArena::new();
    let base = arena.int();
    let named = arena.make_with_metadata(base, TypeMetadata::named(arena.intern_string("UserId")));
    assert_eq!(render_type(&arena, named), "UserId");
}

#[test]
fn renders_union_with_bar_separators() {
    let mut arena = TypeArena::new();
    let u = arena.make_union(vec![arena.int(), arena.string()]);
    let rendered = render_type(&arena, u);
    assert!(rendered.contains(" | "));
}

#[test]
fn renders_record_fields_with_optionality_marker() {
    let mut arena = TypeArena::new();
    let name = arena.intern_string("age");
    let r = arena.make_record(
        vec![FieldInfo {
            name,
            ty: arena.int(),
            optional: true,
        }],
        None,
        true,
    );
    let rendered = render_type(&arena, r);
    assert!(rendered.contains("age?: int"));
}

#[test]
fn recursive_type_renders_without_infinite_loop() {
    let mut arena = TypeArena::new();
    let brand = arena.intern_string("List#brand");
    let name = arena.intern_string("List");
    // A self-referential type built through a placeholder id: the renderer
    // must not recurse forever even on structures that cycle back to an id
    // already on the stack.
    let base = arena.int();
    let branded = arena.make_branded(base, brand, name);
    let rendered = render_type(&arena, branded);
    assert!(rendered.starts_with("List<"));
}
