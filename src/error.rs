use thiserror::Error;

/// Errors returned by table operations.
///
/// Every failure is reported to the immediate caller. A failed operation
/// leaves the table in its last valid state; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Slot storage for the requested capacity could not be obtained.
    #[error("could not allocate {capacity} slots")]
    Allocation {
        /// The capacity that was requested.
        capacity: usize,
    },

    /// The key is not present.
    #[error("key not found")]
    NotFound,

    /// A probe ran through every slot without finding a place for the entry.
    ///
    /// The load factor ceiling keeps this unreachable in practice; seeing it
    /// means a table invariant was broken.
    #[error("no free slot within {capacity} probe steps")]
    Capacity {
        /// Capacity of the table at the time of the failure.
        capacity: usize,
    },

    /// A required argument was missing or empty.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The request was rejected, e.g. swapping the hash function of a table
    /// that already holds entries.
    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub(crate) fn generic<T>(msg: impl Into<String>) -> Result<T> {
        Err(Error::Generic(msg.into()))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
