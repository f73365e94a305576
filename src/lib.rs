//! Encodes and decodes bencoded structures.
//!
//! The decoder is deliberately permissive about dictionary key order: real
//! world inputs contain unsorted dictionaries, and rejecting them would
//! reject data that other implementations happily produce. The encoder is
//! the canonicalizing half of the pair and always emits dictionary keys in
//! ascending raw-byte order, so `encode(decode(x))` is a stable, canonical
//! rendition of `x`.
//!
//! # Decoding
//!
//! [`parse`] turns an in-memory byte slice into a [`Value`] tree:
//!
//! ```
//! use benc::{parse, Value};
//!
//! let value = parse(b"li10e4:spam3:eggse")?;
//! let list = value.as_list().unwrap();
//! assert_eq!(Some(10), list[0].as_integer());
//! assert_eq!(Some("spam"), list[1].as_str());
//! # Ok::<(), benc::decoding::Error>(())
//! ```
//!
//! Callers holding a [`Read`](std::io::Read) source use [`decode`], which also
//! reports how many bytes of the source made up the value:
//!
//! ```
//! use benc::{decode, Value};
//!
//! let (value, consumed) = decode(&b"i3e i4e"[..])?;
//! assert_eq!(Value::Integer(3), value);
//! assert_eq!(3, consumed);
//! # Ok::<(), benc::decoding::Error>(())
//! ```
//!
//! # Encoding
//!
//! [`encode`] renders a [`Value`] tree as canonical bencode. Types that
//! know their own bencode shape implement [`encoding::ToBencode`] instead
//! and serialize themselves without building an intermediate tree.
//!
//! ```
//! use benc::{encode, Value};
//!
//! let value = benc::parse(b"d4:spam4:eggs3:cow3:mooe")?;
//! // Keys arrived unsorted; re-encoding canonicalizes them.
//! assert_eq!(b"d3:cow3:moo4:spam4:eggse".to_vec(), encode(&value)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(not(test), warn(missing_docs))]

pub mod decoding;
pub mod encoding;
mod value;

pub use crate::value::Value;

use std::io::Read;

use crate::encoding::ToBencode;

/// Default cap on list/dictionary nesting, shared by decoder and encoder.
///
/// The grammar itself permits arbitrary nesting; the cap exists so that
/// adversarial input fails with [`decoding::Error::NestingTooDeep`] instead
/// of overflowing the call stack. Use [`decoding::Decoder::with_max_depth`]
/// or [`encoding::Encoder::with_max_depth`] to pick a different limit.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decode a single value from a byte source.
///
/// Returns the decoded [`Value`] together with the number of bytes it
/// occupied in the source. Bytes past the end of the value are left
/// unread, so a clean end of input between top-level values is not an
/// error. Unbuffered sources should be wrapped in an
/// [`io::BufReader`](std::io::BufReader) first, as the decoder reads a
/// byte at a time.
pub fn decode<R: Read>(reader: R) -> Result<(Value, usize), decoding::Error> {
    let mut decoder = decoding::Decoder::new(reader);
    let value = decoder.decode_value()?;
    Ok((value, decoder.bytes_consumed()))
}

/// Decode the first value from an in-memory buffer.
///
/// Convenience wrapper around [`decode`] for callers that already hold the
/// full input. Trailing bytes after the first complete value are ignored.
pub fn parse(bytes: impl AsRef<[u8]>) -> Result<Value, decoding::Error> {
    let (value, _) = decode(bytes.as_ref())?;
    Ok(value)
}

/// Encode a value tree as canonical bencode.
///
/// Dictionary keys are emitted in ascending raw-byte order regardless of
/// how the tree was built, so structurally equal trees encode to identical
/// bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, encoding::Error> {
    value.to_bencode()
}
