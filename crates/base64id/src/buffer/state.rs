/// Mutable buffering state shared between a [`crate::BufferedRandom`] and its
/// refill jobs.
#[derive(Debug, Default)]
pub(crate) struct BufferState {
    chunk: Option<Box<[u8]>>,
    /// Next unconsumed slot, `None` when no chunk is held.
    cursor: Option<usize>,
    /// Slot width the cursor is currently counted in.
    slot_width: usize,
    refill_in_flight: bool,
}

impl BufferState {
    /// Drops an exhausted chunk. Returns `true` if a refill should be
    /// dispatched now, marking it in flight.
    pub(crate) fn begin_request(&mut self, len: usize, slots: usize, threshold: usize) -> bool {
        self.align_cursor(len);
        if self.cursor.is_some_and(|cursor| cursor >= slots) {
            self.chunk = None;
            self.cursor = None;
        }

        let wants_refill = self.cursor.is_none_or(|cursor| cursor > threshold);
        if wants_refill && !self.refill_in_flight {
            self.refill_in_flight = true;
            return true;
        }
        false
    }

    /// Claims the next slot of `len` bytes, or `None` when no chunk is
    /// available to serve it.
    pub(crate) fn take_slot(&mut self, len: usize, slots: usize) -> Option<&[u8]> {
        self.align_cursor(len);
        let cursor = self.cursor?;
        if cursor >= slots {
            self.chunk = None;
            self.cursor = None;
            return None;
        }
        self.cursor = Some(cursor + 1);

        let start = len * cursor;
        self.chunk.as_deref().map(|chunk| &chunk[start..start + len])
    }

    pub(crate) fn install(&mut self, chunk: Box<[u8]>) {
        self.chunk = Some(chunk);
        self.cursor = Some(0);
        self.refill_in_flight = false;
    }

    pub(crate) fn abandon_refill(&mut self) {
        self.refill_in_flight = false;
    }

    pub(crate) fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            cursor: self.cursor,
            has_chunk: self.chunk.is_some(),
            refill_in_flight: self.refill_in_flight,
        }
    }

    /// Re-expresses the cursor in units of `len`, rounding up, so slices of
    /// different widths never overlap within one chunk.
    fn align_cursor(&mut self, len: usize) {
        if self.slot_width == len {
            return;
        }
        if let Some(cursor) = self.cursor {
            self.cursor = Some((cursor * self.slot_width).div_ceil(len));
        }
        self.slot_width = len;
    }
}

/// A point-in-time view of a [`crate::BufferedRandom`]'s buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSnapshot {
    /// Next slot to be served, `None` when no chunk is held.
    pub cursor: Option<usize>,
    /// Whether a chunk is currently installed.
    pub has_chunk: bool,
    /// Whether a refill has been dispatched and not yet completed.
    pub refill_in_flight: bool,
}
