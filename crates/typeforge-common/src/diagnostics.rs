//! Diagnostic data model, shared by the checker, evaluator, and erasure
//! passes. Every failure kind named in spec.md §7 gets a stable numeric
//! code here; message templates use `{0}`, `{1}`, ... placeholders filled
//! by `format_message`.

pub mod data;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

pub mod diagnostic_codes {
    pub use super::data::diagnostic_codes::*;
}

pub mod diagnostic_messages {
    pub use super::data::diagnostic_messages::*;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub span: crate::span::Span,
    pub message_text: String,
}

/// A single compile-time failure, fatal at its enclosing top-level
/// declaration (spec.md §7: "All are fatal at the enclosing top-level
/// declaration").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub phase: &'static str,
    pub span: crate::span::Span,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        phase: &'static str,
        span: crate::span::Span,
        code: u32,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            phase,
            span,
            message_text: message.into(),
            related_information: Vec::new(),
        }
    }

    pub fn with_related(mut self, span: crate::span::Span, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            span,
            message_text: message.into(),
        });
        self
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    data::DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn format_message_substitutes_positional_args() {
        let msg = format_message("Type '{0}' is not assignable to type '{1}'.", &["Int", "String"]);
        assert_eq!(msg, "Type 'Int' is not assignable to type 'String'.");
    }

    #[test]
    fn with_related_appends_entries() {
        let d = Diagnostic::error("typecheck", Span::new(0, 1), diagnostic_codes::TYPE_MISMATCH, "bad")
            .with_related(Span::new(2, 3), "declared here");
        assert_eq!(d.related_information.len(), 1);
    }
}
