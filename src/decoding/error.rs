use std::io;

use thiserror::Error;

/// An enumeration of potential errors that appear during bencode decoding.
///
/// Every variant is terminal for the current decode call; the grammar
/// offers no ambiguity to recover from. Offsets are byte positions into
/// the input, counted from the start of the decode.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A byte that cannot start any production.
    #[error("invalid token {got:?} at offset {offset}", got = *token as char)]
    InvalidToken {
        /// The offending byte.
        token: u8,
        /// Position of the offending byte.
        offset: usize,
    },

    /// Input ended before the `e` terminating an integer.
    #[error("integer at offset {offset} is not terminated by 'e'")]
    UnterminatedInteger {
        /// Position of the opening `i`.
        offset: usize,
    },

    /// An `ie` with nothing between the delimiters.
    #[error("empty integer literal at offset {offset}")]
    EmptyIntegerLiteral {
        /// Position of the opening `i`.
        offset: usize,
    },

    /// An integer literal with a leading zero, e.g. `i07e`.
    #[error("integer literal at offset {offset} has a leading zero")]
    LeadingZero {
        /// Position of the opening `i`.
        offset: usize,
    },

    /// The forbidden `i-0e` form (or `-0` with more digits).
    #[error("negative zero integer literal at offset {offset}")]
    NegativeZero {
        /// Position of the opening `i`.
        offset: usize,
    },

    /// An integer literal that does not parse as a signed 64-bit number,
    /// either because of stray characters or because it overflows.
    #[error("malformed integer literal {literal:?} at offset {offset}")]
    MalformedInteger {
        /// The rejected literal, lossily decoded for display.
        literal: String,
        /// Position of the opening `i`.
        offset: usize,
    },

    /// Input ended before the `:` separating a length prefix from its
    /// payload.
    #[error("byte string at offset {offset} is missing the ':' length delimiter")]
    MissingLengthDelimiter {
        /// Position of the first length digit.
        offset: usize,
    },

    /// A `:` with no length digits in front of it.
    #[error("empty byte string length at offset {offset}")]
    EmptyLength {
        /// Position where the length was expected.
        offset: usize,
    },

    /// A length prefix that is not a non-negative decimal number.
    #[error("invalid byte string length {literal:?} at offset {offset}")]
    InvalidLength {
        /// The rejected length literal, lossily decoded for display.
        literal: String,
        /// Position of the first length byte.
        offset: usize,
    },

    /// Input ended before the declared number of payload bytes was read.
    #[error(
        "byte string at offset {offset} is truncated: declared {expected} bytes, found {actual}"
    )]
    TruncatedString {
        /// The declared payload length.
        expected: usize,
        /// The number of payload bytes actually available.
        actual: usize,
        /// Position of the first length digit.
        offset: usize,
    },

    /// Input ended inside a list, before its closing `e`.
    #[error("list opened at offset {offset} is not terminated")]
    UnterminatedList {
        /// Position of the opening `l`.
        offset: usize,
    },

    /// Input ended inside a dictionary, before its closing `e`.
    #[error("dictionary opened at offset {offset} is not terminated")]
    UnterminatedDictionary {
        /// Position of the opening `d`.
        offset: usize,
    },

    /// A dictionary key that does not start a byte-string production.
    #[error("dictionary key at offset {offset} is not a byte string (starts with {got:?})", got = *token as char)]
    NonStringKey {
        /// The offending byte.
        token: u8,
        /// Position of the offending byte.
        offset: usize,
    },

    /// A dictionary key that occurred twice. Only raised in strict mode;
    /// the default decode keeps the last occurrence.
    #[error("duplicate dictionary key {key:?} at offset {offset}")]
    DuplicateKey {
        /// The repeated key, lossily decoded for display.
        key: String,
        /// Position of the second occurrence.
        offset: usize,
    },

    /// Exceeded the configured nesting limit.
    #[error("maximum nesting depth {max_depth} exceeded at offset {offset}")]
    NestingTooDeep {
        /// The configured limit.
        max_depth: usize,
        /// Position of the container that went over the limit.
        offset: usize,
    },

    /// Input ended where a value was expected.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEndOfInput {
        /// Position of the end of input.
        offset: usize,
    },

    /// The underlying byte source failed.
    #[error("read from the underlying byte source failed")]
    Io(#[from] io::Error),
}

#[test]
fn decoding_errors_are_sync_send() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<Error>();
    is_sync::<Error>();
}
