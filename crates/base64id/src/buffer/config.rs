/// Capacity, in bytes, of each chunk drawn from the secure source.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Fraction of a chunk's slots that may be consumed before a refill is
/// started.
pub const DEFAULT_REFILL_RATIO: f64 = 0.85;

/// Request length used when a caller asks for zero bytes.
pub const DEFAULT_REQUEST_LEN: usize = 12;

/// Tuning for [`crate::BufferedRandom`].
///
/// The defaults draw 4096-byte chunks and start refilling once 85% of a
/// chunk's slots are spent.
///
/// # Example
/// ```
/// use base64id::BufferConfig;
///
/// let config = BufferConfig::default().with_chunk_size(8192);
/// assert_eq!(config.chunk_size(), 8192);
/// assert_eq!(config.refill_ratio(), 0.85);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferConfig {
    chunk_size: usize,
    refill_ratio: f64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            refill_ratio: DEFAULT_REFILL_RATIO,
        }
    }
}

impl BufferConfig {
    /// Sets the chunk capacity in bytes. Requests larger than the chunk
    /// always bypass the buffer.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the consumed fraction after which a refill starts.
    ///
    /// A ratio at or above `1.0` only refills once a chunk is exhausted. A
    /// ratio small enough to make the threshold zero for a given request
    /// length disables buffering for that length.
    #[must_use]
    pub const fn with_refill_ratio(mut self, refill_ratio: f64) -> Self {
        self.refill_ratio = refill_ratio;
        self
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub const fn refill_ratio(&self) -> f64 {
        self.refill_ratio
    }

    /// Works out how a request of `len` bytes maps onto a chunk, or `None`
    /// when it should bypass the buffer.
    pub(crate) fn plan(&self, len: usize) -> Option<SlotPlan> {
        if len == 0 || len > self.chunk_size {
            return None;
        }
        let slots = self.chunk_size / len;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let threshold = (slots as f64 * self.refill_ratio) as usize;
        if threshold == 0 {
            return None;
        }
        Some(SlotPlan { slots, threshold })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotPlan {
    /// How many `len`-byte slots fit in one chunk.
    pub(crate) slots: usize,
    /// Cursor position past which a refill is started.
    pub(crate) threshold: usize,
}
