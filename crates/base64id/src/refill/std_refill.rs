use crate::{RefillSpawner, Result};

/// Runs the refill on the calling thread before the request continues.
///
/// This is the synchronous model: the new chunk is available to the very
/// request that triggered it, and a failing source propagates to that
/// caller.
#[derive(Default, Clone, Copy, Debug)]
pub struct InlineRefill;

impl RefillSpawner for InlineRefill {
    fn spawn_refill<F>(job: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Some(job())
    }
}

/// Runs each refill on a detached OS thread.
///
/// Requests that arrive while the thread is drawing keep reading the
/// remainder of the current chunk, or fall back to direct generation when
/// none is left.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRefill;

impl RefillSpawner for ThreadRefill {
    fn spawn_refill<F>(job: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        // Failures are reported by the job itself; the next request redispatches.
        std::thread::spawn(move || {
            let _ = job();
        });
        None
    }
}
