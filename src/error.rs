use alloc::collections::TryReserveError;

/// Errors reported by [`HashMap`](crate::HashMap) operations that cannot
/// express failure as a plain `bool` or `Option`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("hash map does not contain the given key")]
    NotFound,
    /// Bulk construction was given key and value sequences of different
    /// lengths.
    #[error("given sequences are of different size: {keys} keys, {values} values")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// The bucket array or a bucket chain could not be allocated.
    #[error("could not allocate hash table storage")]
    ResourceExhausted(#[from] TryReserveError),
}
