use std::io::{self, Read};

/// A byte source with a single byte of push-back.
///
/// Every bencode production is determined by its first byte, so one byte
/// of lookahead is all the grammar requires. The cursor tracks the offset
/// of the next byte to hand out, which error reporting and
/// [`Decoder::bytes_consumed`](crate::decoding::Decoder::bytes_consumed)
/// build on.
#[derive(Debug)]
pub struct Source<R> {
    inner: R,
    pushback: Option<u8>,
    offset: usize,
}

impl<R: Read> Source<R> {
    /// Wrap a reader. The source reads one byte at a time, so unbuffered
    /// readers should be wrapped in an [`io::BufReader`] first.
    pub fn new(inner: R) -> Self {
        Source {
            inner,
            pushback: None,
            offset: 0,
        }
    }

    /// Read the next byte. Returns `None` on a clean end of input.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            self.offset += 1;
            return Ok(Some(byte));
        }

        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(buf[0]));
                },
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Return the most recently read byte to the source, to be handed out
    /// again by the next [`Source::next_byte`] call.
    ///
    /// # Panics
    ///
    /// The grammar never needs more than one byte of lookahead; pushing
    /// back twice without an intervening read is a bug in the caller and
    /// panics in debug builds.
    pub fn push_back(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "push_back would overwrite lookahead");
        self.pushback = Some(byte);
        self.offset -= 1;
    }

    /// Read up to `count` bytes. The returned buffer is shorter than
    /// `count` only if the source ended early; the caller decides whether
    /// that is an error.
    pub fn read_chunk(&mut self, count: usize) -> io::Result<Vec<u8>> {
        // Capacity is capped so a huge declared length in the input can't
        // trigger a huge allocation before a single byte has been read.
        let mut chunk = Vec::with_capacity(count.min(8 * 1024));

        if count > 0 {
            if let Some(byte) = self.pushback.take() {
                chunk.push(byte);
                self.offset += 1;
            }
        }

        let mut buf = [0u8; 4096];
        while chunk.len() < count {
            let want = (count - chunk.len()).min(buf.len());
            match self.inner.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => {
                    chunk.extend_from_slice(&buf[..n]);
                    self.offset += n;
                },
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(chunk)
    }

    /// Offset of the next byte to be handed out; equivalently, the number
    /// of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}
