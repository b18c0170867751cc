//! C4/C5 — the fuel-limited compile-time evaluator and the type property
//! resolver (spec.md §4.3, §4.4), plus the built-in catalog (spec.md §6)
//! that populates the initial environment both read from.

pub mod builtins;
pub mod eval;
pub mod fuel;
pub mod reflect;

pub use builtins::install;
pub use eval::{infer_value_type, stringify_value, Evaluator};
pub use fuel::{Fuel, FuelExhausted};
pub use reflect::Property;
