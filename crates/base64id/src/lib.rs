//! Short, URL-safe identifiers built from a wrapping sequence counter and
//! cryptographically sourced random bytes.
//!
//! Random bytes are drawn in large chunks by [`BufferedRandom`] and served in
//! small slices, so producing an identifier rarely touches the secure source
//! directly. [`Base64IdGenerator`] assembles the 15-byte block and encodes it
//! into 20 characters of URL-safe base64.
//!
//! ```
//! use base64id::Base64IdGenerator;
//!
//! let generator = Base64IdGenerator::default();
//! let id = generator.generate();
//! assert_eq!(id.len(), 20);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod buffer;
mod encoder;
mod error;
mod id;
mod mutex;
mod rand;
mod refill;
mod sequence;
#[cfg(feature = "serde")]
mod serde;

pub use crate::buffer::*;
pub use crate::encoder::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::refill::*;
pub use crate::sequence::*;
