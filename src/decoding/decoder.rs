use std::{
    collections::{BTreeMap, btree_map::Entry},
    io::Read,
    str,
};

use crate::{
    Value,
    decoding::{Error, Source},
};

/// A recursive-descent bencode decoder.
///
/// The decoder dispatches on a single byte of lookahead to one of the four
/// grammar productions and recurses for list elements and dictionary
/// values. It is permissive about dictionary key order: unsorted keys are
/// accepted as presented, and canonical ordering is restored by the
/// encoder. Duplicate keys keep the last occurrence unless
/// [`Decoder::with_strict_keys`] is set.
#[derive(Debug)]
pub struct Decoder<R> {
    source: Source<R>,
    max_depth: usize,
    depth: usize,
    strict_keys: bool,
    saw_duplicate_keys: bool,
}

impl<R: Read> Decoder<R> {
    /// Create a new decoder reading from the given byte source.
    pub fn new(reader: R) -> Self {
        Decoder {
            source: Source::new(reader),
            max_depth: crate::DEFAULT_MAX_DEPTH,
            depth: 0,
            strict_keys: false,
            saw_duplicate_keys: false,
        }
    }

    /// Set the maximum nesting depth of the decoder. An effectively
    /// unlimited decoder may be created using `with_max_depth(usize::MAX)`,
    /// but be warned that deeply nested input will then exhaust the call
    /// stack.
    #[must_use]
    pub fn with_max_depth(mut self, new_max_depth: usize) -> Self {
        self.max_depth = new_max_depth;
        self
    }

    /// Reject duplicate dictionary keys with [`Error::DuplicateKey`]
    /// instead of keeping the last occurrence.
    #[must_use]
    pub fn with_strict_keys(mut self) -> Self {
        self.strict_keys = true;
        self
    }

    /// Number of bytes consumed from the source so far. After a
    /// successful [`Decoder::decode_value`] this is the exact length of
    /// the value's encoding.
    pub fn bytes_consumed(&self) -> usize {
        self.source.offset()
    }

    /// Whether any dictionary decoded so far contained a duplicate key.
    /// Only meaningful outside strict mode, where duplicates are resolved
    /// last-write-wins without failing the decode.
    pub fn saw_duplicate_keys(&self) -> bool {
        self.saw_duplicate_keys
    }

    /// Decode the next value from the source.
    ///
    /// Bytes past the end of the value are left unread; a caller may
    /// invoke this repeatedly to read a sequence of top-level values.
    pub fn decode_value(&mut self) -> Result<Value, Error> {
        let offset = self.source.offset();
        let byte = self
            .source
            .next_byte()?
            .ok_or(Error::UnexpectedEndOfInput { offset })?;

        match byte {
            b'i' => self.decode_integer(offset),
            b'l' => self.decode_list(offset),
            b'd' => self.decode_dictionary(offset),
            b'0'..=b'9' => {
                // The digit is part of the length prefix.
                self.source.push_back(byte);
                self.decode_bytes().map(Value::Bytes)
            },
            token => Err(Error::InvalidToken { token, offset }),
        }
    }

    /// `i<digits>e`. The opening `i` has already been consumed; `start`
    /// is its offset.
    fn decode_integer(&mut self, start: usize) -> Result<Value, Error> {
        let mut literal = Vec::new();
        loop {
            match self.source.next_byte()? {
                None => return Err(Error::UnterminatedInteger { offset: start }),
                Some(b'e') => break,
                Some(byte) => literal.push(byte),
            }
        }

        if literal.is_empty() {
            return Err(Error::EmptyIntegerLiteral { offset: start });
        }

        if literal[0] == b'-' {
            if literal.get(1) == Some(&b'0') {
                return Err(Error::NegativeZero { offset: start });
            }
        } else if literal[0] == b'0' && literal.len() > 1 {
            return Err(Error::LeadingZero { offset: start });
        }

        let integer = str::from_utf8(&literal)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .ok_or_else(|| Error::MalformedInteger {
                literal: String::from_utf8_lossy(&literal).into_owned(),
                offset: start,
            })?;

        Ok(Value::Integer(integer))
    }

    /// `<len>:<bytes>`. Nothing has been consumed yet; also used for
    /// dictionary keys.
    fn decode_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let start = self.source.offset();

        let mut length_literal = Vec::new();
        loop {
            match self.source.next_byte()? {
                None => return Err(Error::MissingLengthDelimiter { offset: start }),
                Some(b':') => break,
                Some(byte) => length_literal.push(byte),
            }
        }

        if length_literal.is_empty() {
            return Err(Error::EmptyLength { offset: start });
        }

        // A negative or non-decimal length fails the usize parse.
        let length = str::from_utf8(&length_literal)
            .ok()
            .and_then(|text| text.parse::<usize>().ok())
            .ok_or_else(|| Error::InvalidLength {
                literal: String::from_utf8_lossy(&length_literal).into_owned(),
                offset: start,
            })?;

        let payload = self.source.read_chunk(length)?;
        if payload.len() < length {
            return Err(Error::TruncatedString {
                expected: length,
                actual: payload.len(),
                offset: start,
            });
        }

        Ok(payload)
    }

    /// `l<values>e`. The opening `l` has already been consumed.
    fn decode_list(&mut self, start: usize) -> Result<Value, Error> {
        self.enter(start)?;

        let mut items = Vec::new();
        loop {
            match self.source.next_byte()? {
                None => return Err(Error::UnterminatedList { offset: start }),
                Some(b'e') => break,
                Some(byte) => {
                    self.source.push_back(byte);
                    items.push(self.decode_value()?);
                },
            }
        }

        self.leave();
        Ok(Value::List(items))
    }

    /// `d<key><value>...e`. The opening `d` has already been consumed.
    fn decode_dictionary(&mut self, start: usize) -> Result<Value, Error> {
        self.enter(start)?;

        let mut entries = BTreeMap::new();
        loop {
            let offset = self.source.offset();
            match self.source.next_byte()? {
                None => return Err(Error::UnterminatedDictionary { offset: start }),
                Some(b'e') => break,
                Some(byte @ b'0'..=b'9') => {
                    self.source.push_back(byte);
                    let key = self.decode_bytes()?;
                    let value = self.decode_value()?;

                    match entries.entry(key) {
                        Entry::Vacant(vacancy) => {
                            vacancy.insert(value);
                        },
                        Entry::Occupied(mut occupation) => {
                            self.saw_duplicate_keys = true;
                            if self.strict_keys {
                                return Err(Error::DuplicateKey {
                                    key: String::from_utf8_lossy(occupation.key()).into_owned(),
                                    offset,
                                });
                            }
                            occupation.insert(value);
                        },
                    }
                },
                Some(token) => return Err(Error::NonStringKey { token, offset }),
            }
        }

        self.leave();
        Ok(Value::Dict(entries))
    }

    fn enter(&mut self, offset: usize) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                max_depth: self.max_depth,
                offset,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

#[cfg(test)]
mod test {
    use std::iter;

    use super::*;

    fn decode_ok(msg: &[u8]) -> Value {
        match Decoder::new(msg).decode_value() {
            Ok(value) => value,
            Err(err) => panic!("Unexpected decode failure for {:?}: {}", msg, err),
        }
    }

    fn decode_err(msg: &[u8], err_regex: &str) -> Error {
        match Decoder::new(msg).decode_value() {
            Ok(value) => panic!("Unexpected decode success: {:?}", value),
            Err(err) => {
                let rendered = err.to_string();
                let err_regex = regex::Regex::new(err_regex).expect("Test regexes should be valid");
                assert!(
                    err_regex.is_match(&rendered),
                    "Unexpected error: {}",
                    rendered
                );
                err
            },
        }
    }

    #[test]
    fn simple_values_decode() {
        assert_eq!(Value::Integer(3), decode_ok(b"i3e"));
        assert_eq!(Value::Integer(-7), decode_ok(b"i-7e"));
        assert_eq!(Value::Integer(0), decode_ok(b"i0e"));
        assert_eq!(Value::Bytes(b"hello".to_vec()), decode_ok(b"5:hello"));
        assert_eq!(Value::Bytes(Vec::new()), decode_ok(b"0:"));
        assert_eq!(Value::List(Vec::new()), decode_ok(b"le"));
        assert_eq!(Value::Dict(BTreeMap::new()), decode_ok(b"de"));
    }

    #[test]
    fn nested_structure_decodes() {
        let value = decode_ok(b"d3:bari1e3:fooli2ei3eee");

        assert_eq!(Some(1), value.get("bar").unwrap().as_integer());
        let foo = value.get("foo").and_then(Value::as_list).unwrap();
        assert_eq!(Some(2), foo[0].as_integer());
        assert_eq!(Some(3), foo[1].as_integer());
    }

    #[test]
    fn invalid_token_reports_byte_and_offset() {
        let err = decode_err(b"x", "invalid token 'x' at offset 0");
        assert!(matches!(err, Error::InvalidToken { token: b'x', offset: 0 }));

        decode_err(b"li1exe", "invalid token 'x' at offset 4");
    }

    #[test]
    fn short_int_should_fail() {
        let err = decode_err(b"i12", "not terminated");
        assert!(matches!(err, Error::UnterminatedInteger { offset: 0 }));
    }

    #[test]
    fn ints_must_have_bodies() {
        let err = decode_err(b"ie", "empty integer literal");
        assert!(matches!(err, Error::EmptyIntegerLiteral { .. }));
    }

    #[test]
    fn leading_zeros_are_illegal() {
        assert!(matches!(
            decode_err(b"i07e", "leading zero"),
            Error::LeadingZero { offset: 0 }
        ));
        assert!(matches!(
            decode_err(b"i00e", "leading zero"),
            Error::LeadingZero { .. }
        ));
    }

    #[test]
    fn negative_zero_is_illegal() {
        assert!(matches!(
            decode_err(b"i-0e", "negative zero"),
            Error::NegativeZero { offset: 0 }
        ));
        assert!(matches!(
            decode_err(b"i-01e", "negative zero"),
            Error::NegativeZero { .. }
        ));
    }

    #[test]
    fn malformed_integers_are_rejected() {
        assert!(matches!(
            decode_err(b"i e", "malformed integer"),
            Error::MalformedInteger { .. }
        ));
        assert!(matches!(
            decode_err(b"i1x2e", "malformed integer"),
            Error::MalformedInteger { .. }
        ));
        // One past i64::MAX.
        assert!(matches!(
            decode_err(b"i9223372036854775808e", "malformed integer"),
            Error::MalformedInteger { .. }
        ));
    }

    #[test]
    fn sixty_four_bit_bounds_decode() {
        assert_eq!(
            Value::Integer(i64::MAX),
            decode_ok(b"i9223372036854775807e")
        );
        assert_eq!(
            Value::Integer(i64::MIN),
            decode_ok(b"i-9223372036854775808e")
        );
    }

    #[test]
    fn string_length_must_be_delimited() {
        assert!(matches!(
            decode_err(b"5", "missing the ':' length delimiter"),
            Error::MissingLengthDelimiter { offset: 0 }
        ));
    }

    #[test]
    fn string_length_must_be_a_number() {
        assert!(matches!(
            decode_err(b"1x:ab", "invalid byte string length"),
            Error::InvalidLength { .. }
        ));
    }

    #[test]
    fn truncated_string_reports_both_lengths() {
        let err = decode_err(b"5:hi", "declared 5 bytes, found 2");
        assert!(matches!(
            err,
            Error::TruncatedString {
                expected: 5,
                actual: 2,
                offset: 0,
            }
        ));
    }

    #[test]
    fn short_list_should_fail() {
        assert!(matches!(
            decode_err(b"l", "list opened at offset 0"),
            Error::UnterminatedList { offset: 0 }
        ));
        assert!(matches!(
            decode_err(b"li1e", "not terminated"),
            Error::UnterminatedList { .. }
        ));
    }

    #[test]
    fn short_dict_should_fail() {
        assert!(matches!(
            decode_err(b"d", "dictionary opened at offset 0"),
            Error::UnterminatedDictionary { offset: 0 }
        ));
        assert!(matches!(
            decode_err(b"d3:foo", "unexpected end of input"),
            Error::UnexpectedEndOfInput { .. }
        ));
    }

    #[test]
    fn map_keys_must_be_strings() {
        let err = decode_err(b"di1ei2ee", "dictionary key at offset 1");
        assert!(matches!(err, Error::NonStringKey { token: b'i', offset: 1 }));
    }

    #[test]
    fn map_keys_may_arrive_unsorted() {
        // Out-of-order keys are accepted; the encoder restores canonical
        // order on the way back out.
        let value = decode_ok(b"d3:fooi1e3:bari2ee");
        assert_eq!(Some(1), value.get("foo").unwrap().as_integer());
        assert_eq!(Some(2), value.get("bar").unwrap().as_integer());
    }

    #[test]
    fn duplicate_keys_keep_the_last_occurrence() {
        let mut decoder = Decoder::new(&b"d3:fooi1e3:fooi2ee"[..]);
        let value = decoder.decode_value().unwrap();

        assert_eq!(Some(2), value.get("foo").unwrap().as_integer());
        assert!(decoder.saw_duplicate_keys());
    }

    #[test]
    fn strict_mode_rejects_duplicate_keys() {
        let err = Decoder::new(&b"d3:fooi1e3:fooi2ee"[..])
            .with_strict_keys()
            .decode_value()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { key, .. } if key == "foo"));
    }

    #[test]
    fn unique_keys_do_not_trip_the_duplicate_flag() {
        let mut decoder = Decoder::new(&b"d3:bari1e3:fooi2ee"[..]);
        decoder.decode_value().unwrap();
        assert!(!decoder.saw_duplicate_keys());
    }

    #[test]
    fn empty_input_is_unexpected_eof() {
        assert!(matches!(
            decode_err(b"", "unexpected end of input at offset 0"),
            Error::UnexpectedEndOfInput { offset: 0 }
        ));
    }

    #[test]
    fn recursion_should_be_limited() {
        let mut msg = Vec::new();
        msg.extend(iter::repeat(b'l').take(4096));
        msg.extend(iter::repeat(b'e').take(4096));
        assert!(matches!(
            decode_err(&msg, "nesting depth"),
            Error::NestingTooDeep { max_depth, .. } if max_depth == crate::DEFAULT_MAX_DEPTH
        ));
    }

    #[test]
    fn recursion_bounds_should_be_tight() {
        let test_msg = b"lllleeee";
        assert!(
            Decoder::new(&test_msg[..])
                .with_max_depth(4)
                .decode_value()
                .is_ok()
        );
        assert!(
            Decoder::new(&test_msg[..])
                .with_max_depth(3)
                .decode_value()
                .is_err()
        );
    }

    #[test]
    fn bytes_consumed_stops_at_the_value_end() {
        let mut decoder = Decoder::new(&b"i3ei4e"[..]);

        assert_eq!(Value::Integer(3), decoder.decode_value().unwrap());
        assert_eq!(3, decoder.bytes_consumed());

        // The remainder is still there for a second top-level value.
        assert_eq!(Value::Integer(4), decoder.decode_value().unwrap());
        assert_eq!(6, decoder.bytes_consumed());
    }

    #[test]
    fn depth_resets_between_values() {
        let mut decoder = Decoder::new(&b"lelele"[..]).with_max_depth(1);
        for _ in 0..3 {
            assert_eq!(Value::List(Vec::new()), decoder.decode_value().unwrap());
        }
    }
}
