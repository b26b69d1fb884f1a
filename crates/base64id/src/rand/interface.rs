use crate::Result;
use std::sync::Arc;

/// A trait for sources of unpredictable bytes.
///
/// This abstraction allows you to plug in a real secure source or a mocked
/// source in tests.
///
/// # Example
/// ```
/// use base64id::{RandSource, Result};
///
/// struct Zeroes;
/// impl RandSource for Zeroes {
///     fn fill(&self, dest: &mut [u8]) -> Result<()> {
///         dest.fill(0);
///         Ok(())
///     }
/// }
///
/// let mut buf = [0xFF; 4];
/// Zeroes.fill(&mut buf).unwrap();
/// assert_eq!(buf, [0; 4]);
/// ```
pub trait RandSource {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::SourceUnavailable`] if the source cannot
    /// produce bytes. Implementations must not retry internally.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}

impl<R: RandSource + ?Sized> RandSource for Arc<R> {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}
