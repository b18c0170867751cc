//! C7 — erasure: lowers a checked `typed` program to the `runtime` IR,
//! dropping every construct that exists only for compile-time purposes
//! (spec.md §4.6). Grounded on the teacher's (structurally present but
//! empty) `tsz-lowering` crate's stated role as an "AST-to-type lowering
//! bridge", fleshed out here since this core's erasure pass has actual work
//! to do.

pub mod erase;

pub use erase::erase_program;

#[cfg(test)]
#[path = "tests/erase_tests.rs"]
mod erase_tests;
