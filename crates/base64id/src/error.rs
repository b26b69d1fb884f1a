/// A result type defaulting to this crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `base64id` can produce.
///
/// Only [`Error::SourceUnavailable`] is expected in practice. The remaining
/// variants are internal assertions or belong to parsing an identifier back
/// from its string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The secure random source failed to produce bytes.
    #[error("secure random source unavailable: {0}")]
    SourceUnavailable(String),

    /// A sequence value or offset did not fit the identifier block.
    ///
    /// The block size and the counter range are fixed, so this is never
    /// observed through [`crate::Base64IdGenerator`].
    #[error("value {value} does not fit a 4-byte write at offset {offset} of a {len}-byte block")]
    RangeViolation {
        value: i64,
        offset: usize,
        len: usize,
    },

    /// The buffer state lock was poisoned by a panicking thread.
    ///
    /// When the `parking-lot` feature is enabled, mutexes do **not** poison,
    /// so this variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("buffer state lock is poisoned")]
    LockPoisoned,

    /// A string of the wrong length was decoded as an identifier.
    #[error("invalid length: {len}")]
    DecodeInvalidLen { len: usize },

    /// A string containing a byte outside the URL-safe alphabet was decoded.
    #[error("invalid ascii byte {byte:#04x} at index {index}")]
    DecodeInvalidAscii { byte: u8, index: usize },
}

#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
