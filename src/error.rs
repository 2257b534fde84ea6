use std::collections::TryReserveError;
use thiserror::Error;

/// Construction failed because a collaborator was not supplied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    #[error("hash function is missing")]
    MissingHash,
    #[error("equality predicate is missing")]
    MissingEquals,
}

/// Why the bucket array could not be doubled.
///
/// Never returned from `put`: the insert proceeds into the existing,
/// more heavily loaded table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrowError {
    #[error("bucket count {buckets} is already at the growth ceiling")]
    AtCapacity { buckets: usize },
    #[error("could not allocate the enlarged bucket array")]
    Alloc(#[from] TryReserveError),
}
