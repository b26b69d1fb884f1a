use super::state::{BufferSnapshot, BufferState};
use crate::{
    BufferConfig, DEFAULT_REQUEST_LEN, InlineRefill, RandSource, RefillSpawner, Result,
    mutex::{self, Mutex, MutexGuard},
};
use core::marker::PhantomData;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A [`RandSource`] that amortizes an expensive secure source by drawing
/// large chunks and serving small requests out of them.
///
/// A request for `n` bytes is served from slot `k` of the current chunk, the
/// byte range `[n*k, n*(k+1))`. Slots are never served twice. Once more than
/// the configured fraction of a chunk's slots are spent, a refill is handed
/// to the [`RefillSpawner`] `S`; while it is outstanding, requests keep
/// reading the rest of the old chunk, and fall back to drawing `n` bytes
/// directly from the source when nothing is left.
///
/// Requests larger than the chunk, or so large that fewer than two slots fit
/// below the refill threshold, always go straight to the source.
///
/// ## Features
///
/// - ✅ Thread-safe (state is guarded by a mutex, never held across a draw)
/// - ✅ At most one refill in flight
/// - ✅ Always makes progress, even if a refill never completes
///
/// Clones share the same buffer.
///
/// # Example
/// ```
/// use base64id::{BufferedRandom, ThreadRandom};
///
/// let rng: BufferedRandom<_> = BufferedRandom::new(ThreadRandom);
/// let bytes = rng.get_bytes(12);
/// assert_eq!(bytes.len(), 12);
/// ```
pub struct BufferedRandom<R, S = InlineRefill> {
    source: Arc<R>,
    state: Arc<Mutex<BufferState>>,
    config: BufferConfig,
    _spawner: PhantomData<fn() -> S>,
}

impl<R, S> Clone for BufferedRandom<R, S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            config: self.config,
            _spawner: PhantomData,
        }
    }
}

impl<R, S> core::fmt::Debug for BufferedRandom<R, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferedRandom")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R> Default for BufferedRandom<R>
where
    R: RandSource + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R, S> BufferedRandom<R, S>
where
    R: RandSource + Send + Sync + 'static,
    S: RefillSpawner,
{
    /// Creates a buffer over `source` with the default 4096-byte chunks.
    ///
    /// No bytes are drawn until the first request.
    pub fn new(source: R) -> Self {
        Self::with_config(source, BufferConfig::default())
    }

    /// Creates a buffer over `source` with explicit tuning.
    ///
    /// # Example
    /// ```
    /// use base64id::{BufferConfig, BufferedRandom, ThreadRefill, ThreadRandom};
    ///
    /// let rng = BufferedRandom::<_, ThreadRefill>::with_config(
    ///     ThreadRandom,
    ///     BufferConfig::default().with_chunk_size(16 * 1024),
    /// );
    /// assert_eq!(rng.get_bytes(32).len(), 32);
    /// ```
    pub fn with_config(source: R, config: BufferConfig) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(BufferState::default())),
            config,
            _spawner: PhantomData,
        }
    }

    pub const fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Returns `n` random bytes, where `n == 0` means
    /// [`DEFAULT_REQUEST_LEN`].
    ///
    /// # Panics
    /// Panics if the secure source fails or the state lock is poisoned. Use
    /// [`Self::try_get_bytes`] to handle those explicitly.
    pub fn get_bytes(&self, n: usize) -> Vec<u8> {
        self.try_get_bytes(n)
            .expect("secure random source failed to produce bytes")
    }

    /// Fallible version of [`Self::get_bytes`].
    ///
    /// # Errors
    /// - [`crate::Error::SourceUnavailable`] if a direct draw fails, or if an
    ///   inline refill fails.
    /// - [`crate::Error::LockPoisoned`] if the state lock is poisoned.
    pub fn try_get_bytes(&self, n: usize) -> Result<Vec<u8>> {
        let n = if n == 0 { DEFAULT_REQUEST_LEN } else { n };
        let mut bytes = vec![0; n];
        self.try_fill(&mut bytes)?;
        Ok(bytes)
    }

    /// Fills `dest` with random bytes without allocating, treating
    /// `dest.len()` as the request length.
    ///
    /// # Errors
    /// See [`Self::try_get_bytes`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, dest), fields(len = dest.len()))
    )]
    pub fn try_fill(&self, dest: &mut [u8]) -> Result<()> {
        let n = dest.len();
        let Some(plan) = self.config.plan(n) else {
            return self.source.fill(dest);
        };

        let dispatch = self.lock()?.begin_request(n, plan.slots, plan.threshold);
        if dispatch {
            self.dispatch_refill()?;
        }

        let mut state = self.lock()?;
        if let Some(slot) = state.take_slot(n, plan.slots) {
            dest.copy_from_slice(slot);
            return Ok(());
        }
        drop(state);

        #[cfg(feature = "tracing")]
        tracing::trace!(len = n, "no buffered chunk available, drawing directly");
        self.source.fill(dest)
    }

    /// Returns a view of the buffer state.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockPoisoned`] if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<BufferSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BufferState>> {
        mutex::lock(&self.state)
    }

    fn dispatch_refill(&self) -> Result<()> {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let chunk_size = self.config.chunk_size();

        #[cfg(feature = "tracing")]
        tracing::debug!(chunk_size, "dispatching chunk refill");
        S::spawn_refill(move || refill(&*source, &state, chunk_size)).unwrap_or(Ok(()))
    }
}

impl<R, S> RandSource for BufferedRandom<R, S>
where
    R: RandSource + Send + Sync + 'static,
    S: RefillSpawner,
{
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        self.try_fill(dest)
    }
}

/// Draws a fresh chunk and installs it. The state lock is only taken after
/// the draw completes.
fn refill<R: RandSource + ?Sized>(
    source: &R,
    state: &Mutex<BufferState>,
    chunk_size: usize,
) -> Result<()> {
    let mut chunk = vec![0; chunk_size].into_boxed_slice();
    let drawn = source.fill(&mut chunk);

    let mut state = mutex::lock(state)?;
    match drawn {
        Ok(()) => {
            state.install(chunk);
            Ok(())
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "chunk refill failed");
            state.abandon_refill();
            Err(e)
        }
    }
}
