//! Produce record storage for the pantry service.
//!
//! A store maps unique produce codes to [`Produce`](pantry_types::Produce)
//! records and enforces the one-record-per-code invariant under concurrent
//! access. The storage capability is expressed as the [`ProduceStore`]
//! trait so alternate backends (a real database, say) can be substituted
//! without touching the callers; [`InMemoryProduceStore`] is the
//! process-lifetime implementation the service runs on.
//!
//! # Design Rules
//!
//! 1. At most one record per code at any instant.
//! 2. The store owns its records outright; copies are exchanged at the
//!    boundary, so callers can never mutate stored state behind the lock.
//! 3. Writers are serialized against each other and against readers;
//!    concurrent readers proceed in parallel.
//! 4. Missing and duplicate codes are ordinary error values, never panics.

pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryProduceStore;
pub use traits::ProduceStore;
