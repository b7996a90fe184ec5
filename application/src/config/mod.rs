//! Application configuration.
//!
//! - [`ExecutionParams`]: agent loop control

mod execution_params;

pub use execution_params::ExecutionParams;
