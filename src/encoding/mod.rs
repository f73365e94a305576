//! An encoder for bencode. Guarantees that the output is canonical: the
//! emitted bytes are valid bencode and dictionary keys appear in ascending
//! raw-byte order, so equal structures always encode to equal bytes.
//!
//! # Encoding a structure
//!
//! The easiest way to encode a structure is to implement [`ToBencode`]
//! for it:
//!
//! ```
//! use benc::encoding::{Error, SingleItemEncoder, ToBencode};
//!
//! struct Message {
//!     foo: i32,
//!     bar: String,
//! }
//!
//! impl ToBencode for Message {
//!     // Atoms have depth zero. The dict wrapper adds one level to that.
//!     const MAX_DEPTH: usize = 1;
//!
//!     fn encode(&self, encoder: SingleItemEncoder) -> Result<(), Error> {
//!         encoder.emit_dict(|mut e| {
//!             // Keys must be emitted in sorted order here.
//!             e.emit_pair(b"bar", &self.bar)?;
//!             e.emit_pair(b"foo", &self.foo)
//!         })
//!     }
//! }
//!
//! # fn main() -> Result<(), Error> {
//! let message = Message {
//!     foo: 1,
//!     bar: "quux".to_string(),
//! };
//!
//! assert_eq!(b"d3:bar4:quux3:fooi1ee".to_vec(), message.to_bencode()?);
//! # Ok(())
//! # }
//! ```
//!
//! Most primitive types already implement [`ToBencode`]. Byte containers
//! encode as lists of integers by default; wrap them in [`AsString`] to
//! emit a byte string instead.
//!
//! # Nesting depth limits
//!
//! Every [`ToBencode`] implementation declares the maximum depth it can
//! encode to, and [`ToBencode::to_bencode`] sizes the encoder's limit from
//! it. Arbitrarily nested types (like [`Value`](crate::Value), whose limit
//! is [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH)) get a configurable
//! cap instead: construct the [`Encoder`] manually and pick the limit with
//! [`Encoder::with_max_depth`].
//!
//! # Error handling
//!
//! Encoding fails fast: the first error aborts the encoding call and
//! propagates out through every enclosing `emit_*` callback. A
//! collaborator-supplied renderer reports its own failures by returning
//! [`Error::render`]`(cause)`.

mod encoder;
mod error;
mod printable_integer;
mod to_bencode;

pub use self::{
    encoder::{Encoder, SingleItemEncoder, SortedDictEncoder},
    error::Error,
    printable_integer::PrintableInteger,
    to_bencode::{AsString, ToBencode},
};
