//! Crate-level error types for store access and record mutations.

/// Error returned when reading or writing the storage slot fails.
///
/// Corruption of the persisted blob is deliberately *not* represented here:
/// an unparseable slot is recovered by reseeding inside
/// [`StateStore::load`](crate::StateStore::load) and never reaches the
/// caller. Only genuine backend I/O failures propagate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage backend I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned when a collection operation fails.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A required field was missing or empty.
    ///
    /// Carries the blocking user-facing message the UI shows verbatim.
    /// The operation performed no mutation.
    #[error("{0}")]
    Validation(String),

    /// Delete targeted a position outside the collection.
    ///
    /// The collection is left unchanged.
    #[error("no record at index {index} (collection has {len})")]
    NotFound { index: usize, len: usize },

    /// Loading or persisting the aggregate failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
