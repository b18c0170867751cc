//! Common types and utilities shared across the typeforge compiler core.
//!
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Diagnostics (`Diagnostic`, `diagnostic_codes`, `diagnostic_messages`)
//! - Engine configuration (`EngineOptions`)
//! - Centralized limits (fuel, recursion depth)
//! - Logging setup (`logging::init`)

pub mod interner;
pub use interner::{Atom, Interner};

pub mod span;
pub use span::{Span, Spanned};

pub mod ids;
pub use ids::{EnvId, NodeId, NodeIdGen};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

pub mod options;
pub use options::EngineOptions;

pub mod limits;

pub mod logging;
