//! Test store adapters.
//!
//! - [`InMemoryTestStore`]: process-local store, optionally seeded with demo data

mod memory;
mod seed;

pub use memory::InMemoryTestStore;
