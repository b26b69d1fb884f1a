use crate::{Error, RandSource, Result};
use ::rand::{TryRngCore, rngs::OsRng};

/// A `RandSource` that reads straight from the operating system's entropy
/// source.
///
/// Every call is a system call, which is exactly the cost
/// [`crate::BufferedRandom`] amortizes. Unlike [`crate::ThreadRandom`], a
/// failing OS source is reported as [`Error::SourceUnavailable`] rather than
/// panicking.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl RandSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| Error::SourceUnavailable(e.to_string()))
    }
}
