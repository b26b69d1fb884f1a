use crate::{RefillSpawner, Result};

/// Runs each refill on smol's blocking thread pool via [`smol::unblock`].
#[derive(Default, Clone, Copy, Debug)]
pub struct SmolRefill;

impl RefillSpawner for SmolRefill {
    fn spawn_refill<F>(job: F) -> Option<Result<()>>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        smol::unblock(job).detach();
        None
    }
}
