//! Engine configuration, threaded through the evaluator and checker.
//!
//! Mirrors `tsz_common::checker_options::CheckerOptions`: a flat bag of
//! flags with an `apply_strict_defaults`-style constructor, rather than a
//! cascade of constructor arguments.

/// Compile-time resource limits (see `crate::limits` for the default
/// constants these are seeded from).
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Total recursive evaluation steps the compile-time evaluator may take
    /// per top-level declaration before raising `FuelExhausted`.
    pub fuel_limit: u32,
    /// Maximum lexical-scope nesting depth for both environments.
    pub max_recursion_depth: u32,
    /// When true, a record field typed `T` absorbs `Null`/`Undefined` only
    /// when explicitly present in `T`'s union (affects narrowing in match
    /// patterns and optional-field defaults).
    pub strict_null_checks: bool,
    /// When true, speculative comptime evaluation failures (§9 Open
    /// Questions) are logged at `debug` level instead of being silent.
    pub log_swallowed_comptime_errors: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            fuel_limit: crate::limits::DEFAULT_FUEL,
            max_recursion_depth: crate::limits::DEFAULT_MAX_RECURSION_DEPTH,
            strict_null_checks: false,
            log_swallowed_comptime_errors: true,
        }
    }
}

impl EngineOptions {
    /// Apply a `--strict`-equivalent bundle, mirroring
    /// `CheckerOptions::apply_strict_defaults`.
    pub fn apply_strict_defaults(mut self) -> Self {
        self.strict_null_checks = true;
        self
    }
}
