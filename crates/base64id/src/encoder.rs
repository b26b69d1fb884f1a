use crate::{
    Base64Id, BufferedRandom, ID_BYTES, RANDOM_BYTES, RandSource, Result, SEQUENCE_OFFSET,
    Sequence, ThreadRandom, write_i32_be,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// How the random bytes are placed in the identifier block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockLayout {
    /// Random bytes fill `[0, 11)` and all four sequence bytes survive.
    #[default]
    Disjoint,
    /// All 12 random bytes are copied into `[0, 12)`, overwriting the most
    /// significant byte of the sequence counter.
    ///
    /// Produces the same byte layout as socket.io-style `base64id`
    /// generators, where only the low 24 bits of the counter are visible.
    Compatible,
}

impl BlockLayout {
    const fn random_len(self) -> usize {
        match self {
            Self::Disjoint => SEQUENCE_OFFSET,
            Self::Compatible => RANDOM_BYTES,
        }
    }
}

/// A minimal interface for producing identifier strings.
pub trait IdGenerator {
    /// Returns the next identifier.
    ///
    /// # Panics
    /// May panic if the underlying random source fails.
    fn generate(&self) -> String;

    /// A fallible version of [`Self::generate`].
    ///
    /// # Errors
    /// Returns an error if the underlying random source fails.
    fn try_generate(&self) -> Result<String>;
}

/// Produces 20-character URL-safe identifiers from a wrapping sequence
/// counter and random bytes.
///
/// Each identifier is a 15-byte block: random bytes from `R` followed by the
/// big-endian sequence number at offset 11, encoded with the URL-safe base64
/// alphabet. The counter makes consecutive identifiers from one generator
/// distinct even if the random source were constant.
///
/// `R` is normally a [`BufferedRandom`], so most identifiers are served from a
/// pre-drawn chunk instead of a fresh secure-random call.
///
/// ## Features
///
/// - ✅ Thread-safe
/// - ✅ Unique per generator until the counter wraps (2^32 identifiers)
/// - ❌ No uniqueness across processes or restarts
///
/// # Example
/// ```
/// use base64id::{Base64IdGenerator, BlockLayout, BufferedRandom, ThreadRandom};
///
/// let rng: BufferedRandom<_> = BufferedRandom::new(ThreadRandom);
/// let generator = Base64IdGenerator::new(rng).with_layout(BlockLayout::Compatible);
///
/// let id = generator.generate();
/// assert_eq!(id.len(), 20);
/// assert!(id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
/// ```
#[derive(Debug)]
pub struct Base64IdGenerator<R = BufferedRandom<ThreadRandom>> {
    rng: R,
    sequence: Sequence,
    layout: BlockLayout,
}

impl Default for Base64IdGenerator {
    fn default() -> Self {
        Self::new(BufferedRandom::default())
    }
}

impl<R: RandSource> Base64IdGenerator<R> {
    /// Creates a generator with the sequence at zero and the
    /// [`BlockLayout::Disjoint`] layout.
    pub const fn new(rng: R) -> Self {
        Self {
            rng,
            sequence: Sequence::new(),
            layout: BlockLayout::Disjoint,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: BlockLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Resumes the counter so that the next identifier carries
    /// `last.wrapping_add(1)`.
    #[must_use]
    pub fn with_sequence(mut self, last: i32) -> Self {
        self.sequence = Sequence::starting_at(last);
        self
    }

    pub const fn layout(&self) -> BlockLayout {
        self.layout
    }

    pub const fn rng(&self) -> &R {
        &self.rng
    }

    /// The sequence number carried by the most recent identifier.
    pub fn sequence(&self) -> i32 {
        self.sequence.current()
    }

    /// Generates the next identifier.
    ///
    /// # Panics
    /// Panics if the random source fails. Use [`Self::try_next_id`] to
    /// handle that explicitly.
    pub fn next_id(&self) -> Base64Id {
        self.try_next_id()
            .expect("random source failed while generating an id")
    }

    /// Attempts to generate the next identifier.
    ///
    /// # Errors
    /// Returns an error if the random source fails. The sequence number is
    /// consumed regardless.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<Base64Id> {
        let mut block = [0; ID_BYTES];
        let sequence = self.sequence.next();
        write_i32_be(&mut block, i64::from(sequence), SEQUENCE_OFFSET)?;

        let mut random = [0; RANDOM_BYTES];
        self.rng.fill(&mut random)?;
        let len = self.layout.random_len();
        block[..len].copy_from_slice(&random[..len]);

        Ok(Base64Id::from_bytes(block))
    }

    /// Generates the next identifier as its 20-character string.
    ///
    /// # Panics
    /// Panics if the random source fails. Use [`Self::try_generate`] to
    /// handle that explicitly.
    pub fn generate(&self) -> String {
        self.next_id().encode()
    }

    /// Fallible version of [`Self::generate`].
    ///
    /// # Errors
    /// Returns an error if the random source fails.
    pub fn try_generate(&self) -> Result<String> {
        self.try_next_id().map(|id| id.encode())
    }
}

impl<R: RandSource> IdGenerator for Base64IdGenerator<R> {
    fn generate(&self) -> String {
        self.generate()
    }

    fn try_generate(&self) -> Result<String> {
        self.try_generate()
    }
}
