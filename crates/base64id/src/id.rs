use crate::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use core::{fmt, str::FromStr};

/// Size of an identifier block in bytes. A multiple of 3, so the encoding
/// never needs padding.
pub const ID_BYTES: usize = 15;

/// Length of an encoded identifier.
pub const ID_CHARS: usize = 20;

/// Random bytes requested per identifier.
pub const RANDOM_BYTES: usize = 12;

/// Offset of the big-endian sequence counter within the block.
pub const SEQUENCE_OFFSET: usize = 11;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Membership table for the URL-safe alphabet.
const VALID: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = true;
        i += 1;
    }
    table
};

/// A 15-byte identifier: random bytes followed by a big-endian sequence
/// counter, rendered as 20 characters of URL-safe base64 (`[A-Za-z0-9_-]`,
/// no padding).
///
/// # Example
/// ```
/// use base64id::Base64Id;
///
/// let mut bytes = [0u8; 15];
/// bytes[14] = 1;
/// let id = Base64Id::from_bytes(bytes);
/// assert_eq!(id.encode(), "AAAAAAAAAAAAAAAAAAAB");
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(Base64Id::decode("AAAAAAAAAAAAAAAAAAAB").unwrap(), id);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Base64Id([u8; ID_BYTES]);

impl Base64Id {
    pub const fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ID_BYTES] {
        &self.0
    }

    pub const fn into_bytes(self) -> [u8; ID_BYTES] {
        self.0
    }

    /// The random prefix, bytes `[0, 11)`.
    pub fn random_bytes(&self) -> &[u8] {
        &self.0[..SEQUENCE_OFFSET]
    }

    /// The sequence counter stored in bytes `[11, 15)`.
    ///
    /// For identifiers produced with [`crate::BlockLayout::Compatible`] the
    /// most significant byte is random, so only the low 24 bits are the
    /// counter's.
    pub const fn sequence(&self) -> i32 {
        let b = &self.0;
        i32::from_be_bytes([b[11], b[12], b[13], b[14]])
    }

    /// Encodes this identifier into a 20-character [`String`].
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Encodes this identifier into `buf` without heap allocation.
    ///
    /// ```
    /// use base64id::{Base64Id, ID_CHARS};
    ///
    /// let id = Base64Id::from_bytes([0xFB, 0xFF, 0xBF, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// let mut buf = [0u8; ID_CHARS];
    /// id.encode_to_buf(&mut buf);
    /// assert_eq!(&buf[..4], b"-_-_");
    /// ```
    pub fn encode_to_buf(&self, buf: &mut [u8; ID_CHARS]) {
        let written = URL_SAFE_NO_PAD.encode_slice(self.0, buf);
        debug_assert_eq!(written.ok(), Some(ID_CHARS));
    }

    /// Decodes a 20-character URL-safe base64 string.
    ///
    /// # Errors
    /// - [`Error::DecodeInvalidLen`] if `s` is not exactly 20 bytes long.
    /// - [`Error::DecodeInvalidAscii`] if `s` contains a byte outside
    ///   `[A-Za-z0-9_-]`, including standard base64's `+`, `/` and `=`.
    pub fn decode(s: &str) -> Result<Self> {
        if s.len() != ID_CHARS {
            return Err(Error::DecodeInvalidLen { len: s.len() });
        }
        if let Some((index, byte)) = s.bytes().enumerate().find(|&(_, b)| !VALID[b as usize]) {
            return Err(Error::DecodeInvalidAscii { byte, index });
        }

        let mut bytes = [0; ID_BYTES];
        // 20 alphabet characters are exactly 120 bits, so this cannot fail
        URL_SAFE_NO_PAD
            .decode_slice(s, &mut bytes)
            .map_err(|_| Error::DecodeInvalidLen { len: s.len() })?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ID_BYTES]> for Base64Id {
    fn from(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Base64Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Base64Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; ID_CHARS];
        self.encode_to_buf(&mut buf);
        // the alphabet is ASCII
        f.write_str(core::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Base64Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Base64Id").field(&self.encode()).finish()
    }
}

impl FromStr for Base64Id {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}
