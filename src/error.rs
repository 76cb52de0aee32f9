//! Error type shared by the ring buffer and the channel handles.

use thiserror::Error;

/// Failures surfaced by the crate.
///
/// "Nothing new yet" and "data was overwritten" are ordinary read results
/// ([`ReadOutcome`](crate::ReadOutcome)), not errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Capacity was zero or not a power of two. No buffer is created.
    #[error("invalid capacity {0}: must be a non-zero power of two")]
    InvalidCapacity(u64),

    /// A consumer ran out of data after the producer was dropped.
    #[error("producer has terminated")]
    Disconnected,
}

impl From<RingError> for std::io::Error {
    fn from(err: RingError) -> Self {
        let kind = match err {
            RingError::InvalidCapacity(_) => std::io::ErrorKind::InvalidInput,
            RingError::Disconnected => std::io::ErrorKind::BrokenPipe,
        };
        std::io::Error::new(kind, err)
    }
}
