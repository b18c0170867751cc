//! Fuel: a decrementing integer bounding evaluator recursion depth × steps
//! (spec.md §5, GLOSSARY). Owned by the `Evaluator` instance and reset
//! only between top-level evaluations initiated by the checker.

use typeforge_common::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelExhausted {
    pub site: Span,
}

pub struct Fuel {
    remaining: u32,
}

impl Fuel {
    pub fn new(limit: u32) -> Self {
        Fuel { remaining: limit }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Charges one step at `site`. Every recursive evaluator step must
    /// call this before doing further work, so exhaustion is reported at
    /// the innermost step (spec.md §7 *FuelExhausted*).
    pub fn step(&mut self, site: Span) -> Result<(), FuelExhausted> {
        if self.remaining == 0 {
            return Err(FuelExhausted { site });
        }
        self.remaining -= 1;
        Ok(())
    }
}
