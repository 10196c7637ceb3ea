//! Scalar and aggregate expression evaluation.

pub mod aggregate;
pub mod scalar;

pub use scalar::{evaluate, Environment};
