//! Diagnostic printing. Grounded on `tsz-cli`'s practice of coloring by
//! severity (`colored`) and printing one line per diagnostic followed by
//! its related-information entries indented underneath.

use colored::Colorize;
use typeforge_common::diagnostics::{Diagnostic, DiagnosticCategory};

fn category_label(category: DiagnosticCategory) -> colored::ColoredString {
    match category {
        DiagnosticCategory::Error => "error".red().bold(),
        DiagnosticCategory::Warning => "warning".yellow().bold(),
        DiagnosticCategory::Message => "message".blue().bold(),
    }
}

/// Prints one diagnostic as `phase error TF1234 [12..18]: message`,
/// followed by each related-information entry on its own indented line.
pub fn print_diagnostic(diagnostic: &Diagnostic) {
    println!(
        "{} {} TF{} [{}..{}]: {}",
        diagnostic.phase,
        category_label(diagnostic.category),
        diagnostic.code,
        diagnostic.span.start,
        diagnostic.span.end,
        diagnostic.message_text,
    );
    for related in &diagnostic.related_information {
        println!(
            "    {} [{}..{}]: {}",
            category_label(related.category),
            related.span.start,
            related.span.end,
            related.message_text,
        );
    }
}

/// Prints every diagnostic in `diagnostics`, returning the count (used by
/// the binary entry point to pick an exit code).
pub fn print_diagnostics(diagnostics: &[Diagnostic]) -> usize {
    for diagnostic in diagnostics {
        print_diagnostic(diagnostic);
    }
    diagnostics.len()
}
