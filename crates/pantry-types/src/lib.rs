//! Domain types for the pantry produce service.
//!
//! This crate holds the vocabulary shared by the storage, service, and HTTP
//! layers:
//!
//! - [`Produce`] -- a uniquely-coded inventory record
//! - [`Usd`] -- unit price in whole cents, serialized as a `"$3.25"` string
//! - [`validate`] -- pure validation and canonicalization of incoming
//!   records (produce codes and names arrive in free case and are folded to
//!   a canonical form before storage)
//!
//! Everything here is plain data: no I/O, no locking, no async.

pub mod error;
pub mod produce;
pub mod usd;
pub mod validate;

// Re-export primary types at crate root for ergonomic imports.
pub use error::TypeError;
pub use produce::Produce;
pub use usd::Usd;
pub use validate::{canonicalize_code, canonicalize_name, validate_and_canonicalize};
