use crate::{RefillSpawner, Result};
use tokio::runtime::Handle;

/// Runs each refill on Tokio's blocking thread pool.
///
/// Drawing a chunk from the secure source is a blocking call, so it goes
/// through [`tokio::task::spawn_blocking`] rather than onto a worker thread.
/// Outside of a runtime context the refill runs inline instead.
#[derive(Default, Clone, Copy, Debug)]
pub struct TokioRefill;

impl RefillSpawner for TokioRefill {
    fn spawn_refill<F>(job: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        match Handle::try_current() {
            Ok(handle) => {
                let _ = handle.spawn_blocking(job);
                None
            }
            Err(_) => Some(job()),
        }
    }
}
