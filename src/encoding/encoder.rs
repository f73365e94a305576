use std::io::Write;

use crate::encoding::{Error, PrintableInteger, ToBencode};

/// The encoder. Mirrors the decoder's recursion over the grammar in
/// reverse, accumulating canonical bencode in an internal buffer.
///
/// Containers are written through closure-taking methods ([`emit_list`],
/// [`emit_dict`]), so a well-behaved caller cannot leave a container
/// unterminated. A failed emit leaves one open anyway, so the first error
/// poisons the encoder: every later emit fails with the same error, and
/// [`Encoder::into_bytes`] refuses to hand out the partial buffer.
///
/// [`emit_list`]: Encoder::emit_list
/// [`emit_dict`]: Encoder::emit_dict
#[derive(Debug)]
pub struct Encoder {
    output: Vec<u8>,
    depth: usize,
    max_depth: usize,
    error: Option<Error>,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder {
            output: Vec::new(),
            depth: 0,
            max_depth: crate::DEFAULT_MAX_DEPTH,
            error: None,
        }
    }
}

impl Encoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Set the max nesting depth of the encoded object.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Emit an integer.
    pub fn emit_int<T: PrintableInteger>(&mut self, value: T) -> Result<(), Error> {
        self.check_error()?;
        self.output.push(b'i');
        // Writing to a vec can't fail.
        let _ = write!(self.output, "{}", value);
        self.output.push(b'e');
        Ok(())
    }

    /// Emit a string.
    pub fn emit_str(&mut self, value: &str) -> Result<(), Error> {
        self.emit_bytes(value.as_bytes())
    }

    /// Emit a byte string.
    pub fn emit_bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        self.check_error()?;
        let _ = write!(self.output, "{}:", value.len());
        self.output.extend_from_slice(value);
        Ok(())
    }

    /// Emit an arbitrary encodable object.
    pub fn emit<E: ToBencode>(&mut self, value: E) -> Result<(), Error> {
        self.emit_with(|e| value.encode(e))
    }

    /// Emit a single object using a callback, enforcing that the callback
    /// emits exactly one value.
    pub fn emit_with<F>(&mut self, value_cb: F) -> Result<(), Error>
    where
        F: FnOnce(SingleItemEncoder) -> Result<(), Error>,
    {
        self.check_error()?;

        let mut value_written = false;

        let result = value_cb(SingleItemEncoder {
            encoder: self,
            value_written: &mut value_written,
        });

        let result = result.and_then(|()| {
            if value_written {
                Ok(())
            } else {
                Err(Error::NoValueEmitted)
            }
        });

        self.latch_err(result)
    }

    /// Emit a list. The callback writes the elements, in order, to the
    /// given encoder.
    ///
    /// ```
    /// # use benc::encoding::{Encoder, Error};
    /// # fn main() -> Result<(), Error> {
    /// let mut encoder = Encoder::new();
    /// encoder.emit_list(|e| {
    ///     e.emit_int(1)?;
    ///     e.emit_str("two")
    /// })?;
    /// assert_eq!(b"li1e3:twoe".to_vec(), encoder.into_bytes()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn emit_list<F>(&mut self, list_cb: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Encoder) -> Result<(), Error>,
    {
        self.check_error()?;
        let result = self.encode_list(list_cb);
        self.latch_err(result)
    }

    fn encode_list<F>(&mut self, list_cb: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Encoder) -> Result<(), Error>,
    {
        self.enter()?;
        self.output.push(b'l');
        list_cb(self)?;
        self.output.push(b'e');
        self.leave();
        Ok(())
    }

    /// Emit a dictionary. The callback must emit key/value pairs to the
    /// given encoder in ascending raw-byte key order; an out-of-order (or
    /// repeated) key fails with [`Error::UnsortedKeys`]. Callers holding
    /// an unordered map should sort its pairs first, as the
    /// [`ToBencode`] impl for `HashMap` does.
    ///
    /// ```
    /// # use benc::encoding::{Encoder, Error};
    /// # fn main() -> Result<(), Error> {
    /// let mut encoder = Encoder::new();
    /// encoder.emit_dict(|mut e| {
    ///     e.emit_pair(b"a", "foo")?;
    ///     e.emit_pair(b"b", 2)
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn emit_dict<F>(&mut self, content_cb: F) -> Result<(), Error>
    where
        F: FnOnce(SortedDictEncoder) -> Result<(), Error>,
    {
        self.check_error()?;
        let result = self.encode_dict(content_cb);
        self.latch_err(result)
    }

    fn encode_dict<F>(&mut self, content_cb: F) -> Result<(), Error>
    where
        F: FnOnce(SortedDictEncoder) -> Result<(), Error>,
    {
        self.enter()?;
        self.output.push(b'd');
        content_cb(SortedDictEncoder {
            encoder: self,
            last_key: None,
        })?;
        self.output.push(b'e');
        self.leave();
        Ok(())
    }

    /// Return the encoded bytes, or the first emit error if one occurred.
    /// A failed emit can leave an unterminated container in the buffer, so
    /// the partial output is never handed out.
    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }

    fn check_error(&self) -> Result<(), Error> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn latch_err<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(err) = &result {
            if self.error.is_none() {
                self.error = Some(err.clone());
            }
        }
        result
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                max_depth: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// An encoder handle that can emit exactly one value. This is what a
/// [`ToBencode`] implementation receives; consuming `self` on every emit
/// method makes emitting two values a compile error, and the owning
/// [`Encoder`] checks that one was emitted at all.
pub struct SingleItemEncoder<'a> {
    encoder: &'a mut Encoder,
    /// Whether a value was written. Meaningless if the emit method failed.
    value_written: &'a mut bool,
}

impl<'a> SingleItemEncoder<'a> {
    /// Emit an arbitrary encodable object.
    pub fn emit<E: ToBencode + ?Sized>(self, value: &E) -> Result<(), Error> {
        value.encode(self)
    }

    /// Emit an integer.
    pub fn emit_int<T: PrintableInteger>(self, value: T) -> Result<(), Error> {
        *self.value_written = true;
        self.encoder.emit_int(value)
    }

    /// Emit a string.
    pub fn emit_str(self, value: &str) -> Result<(), Error> {
        *self.value_written = true;
        self.encoder.emit_str(value)
    }

    /// Emit a byte string.
    pub fn emit_bytes(self, value: &[u8]) -> Result<(), Error> {
        *self.value_written = true;
        self.encoder.emit_bytes(value)
    }

    /// Emit a list. See [`Encoder::emit_list`].
    pub fn emit_list<F>(self, list_cb: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Encoder) -> Result<(), Error>,
    {
        *self.value_written = true;
        self.encoder.emit_list(list_cb)
    }

    /// Emit a dictionary with pre-sorted keys. See [`Encoder::emit_dict`].
    pub fn emit_dict<F>(self, content_cb: F) -> Result<(), Error>
    where
        F: FnOnce(SortedDictEncoder) -> Result<(), Error>,
    {
        *self.value_written = true;
        self.encoder.emit_dict(content_cb)
    }
}

/// Emits the body of a dictionary while enforcing canonical key order.
pub struct SortedDictEncoder<'a> {
    encoder: &'a mut Encoder,
    last_key: Option<Vec<u8>>,
}

impl<'a> SortedDictEncoder<'a> {
    /// Emit a key/value pair.
    pub fn emit_pair<E>(&mut self, key: &[u8], value: E) -> Result<(), Error>
    where
        E: ToBencode,
    {
        self.emit_pair_with(key, |e| value.encode(e))
    }

    /// Equivalent to [`SortedDictEncoder::emit_pair()`], but forces the
    /// type of the value to be a callback.
    pub fn emit_pair_with<F>(&mut self, key: &[u8], value_cb: F) -> Result<(), Error>
    where
        F: FnOnce(SingleItemEncoder) -> Result<(), Error>,
    {
        if let Some(previous) = &self.last_key {
            if previous.as_slice() >= key {
                let err = Error::UnsortedKeys {
                    key: String::from_utf8_lossy(key).into_owned(),
                    previous: String::from_utf8_lossy(previous).into_owned(),
                };
                return self.encoder.latch_err(Err(err));
            }
        }
        self.last_key = Some(key.to_vec());

        self.encoder.emit_bytes(key)?;
        self.encoder.emit_with(value_cb)
    }
}
