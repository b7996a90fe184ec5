//! Test-management domain.
//!
//! The entities the assistant's tools read and write. Durable state is owned
//! by the store adapter; this module only fixes their shape, the closed value
//! sets, list filters, summaries and statistics.

pub mod entities;
pub mod filter;
pub mod statistics;
pub mod summary;
pub mod value_objects;
