use std::io::{self, Read};

use crate::io::discard;

/// A view over a reader that yields at most `limit` bytes.
///
/// Every tag payload is decoded through a `BoundedReader` sized to the
/// tag's declared data size, so a sub-decoder can never read into the
/// next tag's framing. Reaching the limit looks like a clean end of
/// stream to whoever reads from it.
///
/// ```text
///   underlying stream:  ... │ prologue │ payload (data_size bytes) │ tag size │ ...
///                                      ▲                           ▲
///                                      └──── BoundedReader ────────┘
/// ```
#[derive(Debug)]
pub struct BoundedReader<R> {
    inner: R,
    remaining: u64,
}

impl<R> BoundedReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    /// Bytes still readable before the limit is reached.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

impl<R: Read> BoundedReader<R> {
    /// Discard everything left in the view.
    ///
    /// Returns the number of bytes discarded, which is less than
    /// [`remaining`](Self::remaining) only if the underlying stream ended
    /// early.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub fn drain(&mut self) -> io::Result<u64> {
        let target = self.remaining;
        let n = discard(&mut self.inner, target)?;
        self.remaining -= n;
        Ok(n)
    }

    /// Read the rest of the view into a new `Vec`.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub fn read_remaining(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(usize::try_from(self.remaining).unwrap_or(0));
        self.read_to_end(&mut out)?;
        Ok(out)
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.inner.read(&mut buf[..max])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}
