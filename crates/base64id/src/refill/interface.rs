use crate::Result;

/// A trait that abstracts over *where* a chunk refill runs.
///
/// [`crate::BufferedRandom`] hands the refill job to the spawner and keeps
/// serving requests. A spawner either runs the job before returning (and
/// reports its outcome), or dispatches it to run independently, in which case
/// the buffer falls back to direct generation until the job installs the new
/// chunk.
///
/// This allows the buffer to be generic over runtimes like `Tokio` or `Smol`.
pub trait RefillSpawner {
    /// Runs or dispatches `job`.
    ///
    /// Returns `Some` with the outcome when `job` completed before returning,
    /// or `None` when it was handed off.
    fn spawn_refill<F>(job: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static;
}
