//! Centralized limits and thresholds, so tuning one number doesn't require
//! hunting through every crate that enforces it.

/// Default fuel budget for the compile-time evaluator (spec.md §4.3: "Fuel
/// decrements on every recursive step; exhaustion is a hard compile
/// error"). Generous enough for small recursive constant functions like
/// `fac(5)` (spec.md §8 scenario 1) without masking runaway recursion.
pub const DEFAULT_FUEL: u32 = 50_000;

/// Maximum lexical-scope chain depth before both environments refuse to
/// `extend()` further (guards against pathological nesting rather than
/// ordinary recursion, which is bounded by fuel instead).
pub const DEFAULT_MAX_RECURSION_DEPTH: u32 = 512;

/// Maximum number of match arms scanned before giving up on
/// `PatternExhaustion` bookkeeping (purely a sanity bound; real programs
/// have a handful of arms).
pub const MAX_MATCH_ARMS: usize = 4096;
