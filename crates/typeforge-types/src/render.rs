//! Minimal type pretty-printer (SPEC_FULL.md §2's "pretty-printing hooks"
//! requirement, used by diagnostics to render `{0}`/`{1}` placeholders).

use crate::arena::{TypeArena, TypeId};
use crate::type_def::{LiteralValue, Primitive, Type};

pub fn render_type(arena: &TypeArena, id: TypeId) -> String {
    let mut stack = Vec::new();
    render_rec(arena, id, &mut stack)
}

fn render_rec(arena: &TypeArena, id: TypeId, stack: &mut Vec<TypeId>) -> String {
    if stack.contains(&id) {
        return "...".to_string();
    }
    stack.push(id);
    let rendered = match arena.get(id) {
        Type::WithMetadata { base, metadata } => match &metadata.display_name {
            Some(name) if !metadata.type_args.is_empty() => {
                let args: Vec<String> = metadata.type_args.iter().map(|&t| render_rec(arena, t, stack)).collect();
                format!("{}<{}>", arena.resolve_atom(*name), args.join(", "))
            }
            Some(name) => arena.resolve_atom(*name).to_string(),
            None => render_rec(arena, *base, stack),
        },

        Type::Primitive(p) => render_primitive(*p).to_string(),

        Type::Literal { value, .. } => render_literal(arena, value),

        Type::Record {
            fields,
            index_type,
            closed,
        } => {
            let mut parts: Vec<String> = fields
                .iter()
                .map(|f| {
                    format!(
                        "{}{}: {}",
                        arena.resolve_atom(f.name),
                        if f.optional { "?" } else { "" },
                        render_rec(arena, f.ty, stack)
                    )
                })
                .collect();
            if let Some(it) = index_type {
                parts.push(format!("[key: string]: {}", render_rec(arena, *it, stack)));
            }
            if *closed {
                format!("{{ {} }}", parts.join("; "))
            } else {
                format!("{{ {}; [..] }}", parts.join("; "))
            }
        }

        Type::Array { elements } => {
            let parts: Vec<String> = elements
                .iter()
                .map(|e| {
                    let rendered = render_rec(arena, e.ty, stack);
                    if e.spread {
                        format!("...{}[]", rendered)
                    } else {
                        rendered
                    }
                })
                .collect();
            format!("[{}]", parts.join(", "))
        }

        Type::Function {
            params,
            return_type,
            is_async,
        } => {
            let parts: Vec<String> = params
                .iter()
                .map(|p| {
                    format!(
                        "{}{}{}: {}",
                        if p.rest { "..." } else { "" },
                        arena.resolve_atom(p.name),
                        if p.optional { "?" } else { "" },
                        render_rec(arena, p.ty, stack)
                    )
                })
                .collect();
            let prefix = if *is_async { "async " } else { "" };
            format!("{}({}) => {}", prefix, parts.join(", "), render_rec(arena, *return_type, stack))
        }

        Type::Union(members) => members
            .iter()
            .map(|&m| render_rec(arena, m, stack))
            .collect::<Vec<_>>()
            .join(" | "),

        Type::Intersection(members) => members
            .iter()
            .map(|&m| render_rec(arena, m, stack))
            .collect::<Vec<_>>()
            .join(" & "),

        Type::Branded { base, name, .. } => format!("{}<{}>", arena.resolve_atom(*name), render_rec(arena, *base, stack)),

        Type::TypeVar { name, .. } => arena.resolve_atom(*name).to_string(),

        Type::This => "this".to_string(),

        Type::Bounded { bound } => format!("Type<{}>", render_rec(arena, *bound, stack)),

        Type::Keyof { operand } => format!("keyof {}", render_rec(arena, *operand, stack)),

        Type::IndexedAccess { object, index } => {
            format!("{}[{}]", render_rec(arena, *object, stack), render_rec(arena, *index, stack))
        }
    };
    stack.pop();
    rendered
}

fn render_primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Int => "int",
        Primitive::Float => "float",
        Primitive::Number => "number",
        Primitive::String => "string",
        Primitive::Boolean => "boolean",
        Primitive::Null => "null",
        Primitive::Undefined => "undefined",
        Primitive::Never => "never",
        Primitive::Unknown => "unknown",
        Primitive::Void => "void",
        Primitive::Type => "Type",
    }
}

fn render_literal(arena: &TypeArena, value: &LiteralValue) -> String {
    match value {
        LiteralValue::Int(v) => v.to_string(),
        LiteralValue::Float(v) => v.to_string(),
        LiteralValue::Str(a) => format!("\"{}\"", arena.resolve_atom(*a)),
        LiteralValue::Bool(v) => v.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod render_tests;
