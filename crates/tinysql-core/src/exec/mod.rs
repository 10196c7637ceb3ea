//! Execution pipeline: JOIN row-context materialization, grouping,
//! sorting, query processing, and the top-level executor.

pub mod executor;
pub mod group;
pub mod join;
pub mod processor;
pub mod sort;

pub use executor::{ExecOutcome, Executor};
