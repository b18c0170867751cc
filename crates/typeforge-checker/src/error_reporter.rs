//! Checker-specific diagnostic construction, grounded on
//! `tsz-checker::error_reporter`'s separation of "how to phrase a
//! diagnostic" from the checking logic that decides one is needed.

use typeforge_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message, Diagnostic};
use typeforge_common::Span;
use typeforge_types::{render_type, TypeArena, TypeId};

pub fn undefined_binding(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::UNDEFINED_BINDING, &[name]);
    Diagnostic::error("typecheck", span, diagnostic_codes::UNDEFINED_BINDING, message)
}

pub fn type_mismatch(arena: &TypeArena, actual: TypeId, expected: TypeId, span: Span) -> Diagnostic {
    let message = format_message(
        diagnostic_messages::TYPE_MISMATCH,
        &[&render_type(arena, actual), &render_type(arena, expected)],
    );
    Diagnostic::error("typecheck", span, diagnostic_codes::TYPE_MISMATCH, message)
}

pub fn non_callable(arena: &TypeArena, ty: TypeId, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::NON_CALLABLE, &[&render_type(arena, ty)]);
    Diagnostic::error("typecheck", span, diagnostic_codes::NON_CALLABLE, message)
}

pub fn arity_error(expected: usize, got: usize, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::ARITY_ERROR, &[&expected.to_string(), &got.to_string()]);
    Diagnostic::error("typecheck", span, diagnostic_codes::ARITY_ERROR, message)
}

pub fn no_matching_overload(arena: &TypeArena, attempted: &[TypeId], span: Span) -> Diagnostic {
    let rendered: Vec<String> = attempted.iter().map(|&t| render_type(arena, t)).collect();
    let message = format_message(diagnostic_messages::NO_MATCHING_OVERLOAD, &[&rendered.join(", ")]);
    Diagnostic::error("typecheck", span, diagnostic_codes::NO_MATCHING_OVERLOAD, message)
}

pub fn property_missing(name: &str, on: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::PROPERTY_MISSING, &[name, on]);
    Diagnostic::error("typecheck", span, diagnostic_codes::PROPERTY_MISSING, message)
}

pub fn invalid_type_expression(what: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::INVALID_TYPE_EXPRESSION, &[what]);
    Diagnostic::error("typecheck", span, diagnostic_codes::INVALID_TYPE_EXPRESSION, message)
}

pub fn ambiguous_intersection_access(what: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::AMBIGUOUS_INTERSECTION_ACCESS, &[what]);
    Diagnostic::error("typecheck", span, diagnostic_codes::AMBIGUOUS_INTERSECTION_ACCESS, message)
}

pub fn spread_must_be_record(span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::SPREAD_MUST_BE_RECORD, &["..."]);
    Diagnostic::error("typecheck", span, diagnostic_codes::SPREAD_MUST_BE_RECORD, message)
}

pub fn spread_must_be_array(span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::SPREAD_MUST_BE_ARRAY, &["..."]);
    Diagnostic::error("typecheck", span, diagnostic_codes::SPREAD_MUST_BE_ARRAY, message)
}

pub fn pattern_exhaustion(span: Span) -> Diagnostic {
    Diagnostic::error(
        "typecheck",
        span,
        diagnostic_codes::PATTERN_EXHAUSTION,
        diagnostic_messages::PATTERN_EXHAUSTION.to_string(),
    )
}

pub fn cycle_in_comptime(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::CYCLE_IN_COMPTIME, &[name]);
    Diagnostic::error("typecheck", span, diagnostic_codes::CYCLE_IN_COMPTIME, message)
}

pub fn comptime_unavailable(name: &str, span: Span) -> Diagnostic {
    let message = format_message(diagnostic_messages::COMPTIME_UNAVAILABLE, &[name]);
    Diagnostic::error("typecheck", span, diagnostic_codes::COMPTIME_UNAVAILABLE, message)
}
