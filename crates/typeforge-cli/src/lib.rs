//! The `typeforge` driver: reads a desugared core IR program, runs the
//! checker (C6) and, on success, the erasure pass (C7), and prints
//! diagnostics or the resulting runtime IR. Grounded on
//! `tsz-cli::{driver, args, trace}`, scaled to this core's much narrower
//! surface — one input file, no project/module graph, no watch mode.

pub mod args;
pub mod driver;
pub mod reporter;

pub use args::CliArgs;
pub use driver::{run, Outcome};
