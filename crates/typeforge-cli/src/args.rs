//! Command-line surface for the `typeforge` binary. Grounded on
//! `tsz-cli::args`'s `clap::Parser`-derived `CliArgs`, scaled down to the
//! handful of knobs this core's pipeline actually has — no project files,
//! no watch mode, no module/target selection, since this core checks one
//! desugared core IR file at a time.

use std::path::PathBuf;

use clap::Parser;

/// Check a desugared core IR program and print its diagnostics, or (on
/// success) its erased runtime IR.
#[derive(Parser, Debug)]
#[command(name = "typeforge", version, about = "typeforge compiler core driver")]
pub struct CliArgs {
    /// Path to a JSON file holding a serialized `typeforge_ir::core::Program`.
    pub input: PathBuf,

    /// Write the erased runtime IR here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Total recursive evaluation steps the evaluator may take per
    /// top-level declaration before raising `FuelExhausted`.
    #[arg(long)]
    pub fuel_limit: Option<u32>,

    /// Maximum lexical-scope nesting depth.
    #[arg(long)]
    pub max_recursion_depth: Option<u32>,

    /// Apply the `--strict`-equivalent bundle (currently: strict null
    /// checks at record-field narrowing).
    #[arg(long)]
    pub strict: bool,

    /// Root directory `comptime.readFile` resolves relative paths
    /// against. Without this flag, `comptime.readFile` always fails.
    #[arg(long)]
    pub sandbox_root: Option<PathBuf>,

    /// Print indented phase timings (check / lower) via `tracing-tree`
    /// instead of the default flat `tracing-subscriber` format.
    #[arg(long)]
    pub trace: bool,
}
