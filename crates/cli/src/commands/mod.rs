//! Command implementations.

mod run;

pub use run::{run_allocator, run_preview};
