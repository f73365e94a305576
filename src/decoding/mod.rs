//! Decodes bencoded byte streams into [`Value`](crate::Value) trees.
//!
//! # Decoding a structure
//!
//! The common case is a buffer that already holds the whole input; use
//! [`parse`](crate::parse) for that. For streaming sources, build a
//! [`Decoder`] over anything implementing [`Read`](std::io::Read):
//!
//! ```
//! use benc::decoding::{Decoder, Error};
//!
//! # fn main() -> Result<(), Error> {
//! let mut decoder = Decoder::new(&b"d3:cow3:moo4:spam4:eggse"[..]);
//! let value = decoder.decode_value()?;
//!
//! assert_eq!(Some("moo"), value.get("cow").unwrap().as_str());
//! assert_eq!(24, decoder.bytes_consumed());
//! # Ok(())
//! # }
//! ```
//!
//! # Strictness
//!
//! The decoder accepts dictionaries whose keys arrive out of order; the
//! encoder is the component responsible for canonical ordering. Duplicate
//! keys are resolved last-write-wins by default and recorded via
//! [`Decoder::saw_duplicate_keys`]; [`Decoder::with_strict_keys`] turns
//! them into a hard [`Error::DuplicateKey`] instead.
//!
//! # Hardening
//!
//! List/dictionary nesting is capped at
//! [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH) levels (configurable
//! via [`Decoder::with_max_depth`]) so that adversarial input fails with
//! [`Error::NestingTooDeep`] instead of overflowing the call stack. The
//! bencode grammar itself has no such limit; this is a strengthening over
//! the literal grammar.
//!
//! # Error handling
//!
//! Every error is terminal for the decode call in which it occurs and
//! carries the byte offset (and, where relevant, the offending byte or
//! literal) needed for a caller-side diagnostic. The decoder itself never
//! logs.

mod decoder;
mod error;
mod source;

pub use self::{decoder::Decoder, error::Error, source::Source};
