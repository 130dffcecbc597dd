//! Lookahead wrapper that can preview bytes without consuming them.

use std::collections::TryReserveError;
use std::io::{self, Read};

/// Smallest lookahead buffer a [`PeekReader`] allocates.
pub const MIN_BUFFER_SIZE: usize = 8 * 1024;

/// A buffered reader whose read position only advances on [`read_full`].
///
/// [`peek`] fills the internal buffer as far as needed and hands back a view
/// of it, leaving those bytes in place for the next [`read_full`]. Errors hit
/// while peeking are held back and returned by the next [`read_full`] once the
/// buffered bytes ahead of them have been handed out.
///
/// [`read_full`]: PeekReader::read_full
/// [`peek`]: PeekReader::peek
pub struct PeekReader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    end: usize,
    pending: Option<io::Error>,
}

impl<R: Read> PeekReader<R> {
    /// Wraps `inner` with a lookahead buffer of at least `capacity` bytes.
    ///
    /// Fails without allocating if the allocator refuses the buffer.
    pub fn try_with_capacity(capacity: usize, inner: R) -> Result<Self, TryReserveError> {
        let capacity = capacity.max(MIN_BUFFER_SIZE);
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        buf.resize(capacity, 0u8);
        Ok(Self {
            inner,
            buf: buf.into_boxed_slice(),
            pos: 0,
            end: 0,
            pending: None,
        })
    }

    /// Returns the size of the lookahead buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the bytes currently buffered but not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.pos..self.end]
    }

    /// Reads until `out` is full, the stream ends, or the source fails.
    ///
    /// Returns the number of bytes written to `out` together with:
    /// - `Ok(())` when `out` was filled completely
    /// - an [`io::ErrorKind::UnexpectedEof`] error when the stream ended first,
    ///   including when no byte at all was available
    /// - the source's own error otherwise
    ///
    /// [`io::ErrorKind::Interrupted`] is retried.
    pub fn read_full(&mut self, out: &mut [u8]) -> (usize, io::Result<()>) {
        let mut n = 0;

        while n < out.len() {
            if self.pos < self.end {
                let take = (self.end - self.pos).min(out.len() - n);
                out[n..n + take].copy_from_slice(&self.buf[self.pos..self.pos + take]);
                self.pos += take;
                n += take;
                continue;
            }

            if let Some(err) = self.pending.take() {
                return (n, Err(err));
            }

            let remaining = &mut out[n..];
            let direct = remaining.len() >= self.buf.len();
            let read = if direct {
                // Nothing buffered and the caller wants at least a buffer's
                // worth, so skip the extra copy.
                self.inner.read(remaining)
            } else {
                self.pos = 0;
                self.end = 0;
                self.inner.read(&mut self.buf)
            };

            match read {
                Ok(0) => {
                    return (
                        n,
                        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream")),
                    );
                }
                Ok(read) if direct => n += read,
                Ok(read) => self.end = read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return (n, Err(e)),
            }
        }

        (n, Ok(()))
    }

    /// Returns up to `n` upcoming bytes without consuming them.
    ///
    /// The result is shorter than `n` when the stream ends or fails first, or
    /// when `n` exceeds the buffer capacity.
    pub fn peek(&mut self, n: usize) -> &[u8] {
        let want = n.min(self.buf.len());
        if self.end - self.pos < want && self.pending.is_none() {
            self.fill_to(want);
        }
        let available = (self.end - self.pos).min(want);
        &self.buf[self.pos..self.pos + available]
    }

    fn fill_to(&mut self, want: usize) {
        if self.pos > 0 {
            self.buf.copy_within(self.pos..self.end, 0);
            self.end -= self.pos;
            self.pos = 0;
        }

        while self.end < want {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(0) => break,
                Ok(read) => self.end += read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.pending = Some(e);
                    break;
                }
            }
        }
    }
}
