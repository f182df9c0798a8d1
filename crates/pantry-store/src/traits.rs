use pantry_types::Produce;

use crate::error::StoreResult;

/// Keyed produce record storage.
///
/// All implementations must satisfy these invariants:
/// - At most one record per code at any observable instant.
/// - `add` never replaces an existing record; the first writer wins.
/// - The store takes ownership of the records it holds and hands out
///   copies, never references into its own state.
/// - `list_all` returns a fully-consistent snapshot: no half-applied
///   mutation is ever visible, and iteration order is unspecified.
/// - Expected conditions (duplicate code, missing code) are returned as
///   [`StoreError`](crate::StoreError) values, never panics.
pub trait ProduceStore: Send + Sync {
    /// Insert a record under its code.
    ///
    /// Fails with `AlreadyExists` if a record with the same code is
    /// present; the existing record is left untouched.
    fn add(&self, item: Produce) -> StoreResult<()>;

    /// Remove the record with the given code.
    ///
    /// Fails with `NotFound` if no such record exists.
    fn delete(&self, code: &str) -> StoreResult<()>;

    /// Snapshot of all current records, in unspecified order.
    fn list_all(&self) -> StoreResult<Vec<Produce>>;

    /// Atomically discard every record. Intended for reset endpoints and
    /// tests.
    fn clear(&self) -> StoreResult<()>;
}
