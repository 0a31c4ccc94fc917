use std::io::{self, Read};

use crate::error::WireError;
use crate::pool::{self, ScratchBuffer};

/// A reader that counts the bytes pulled through it.
///
/// The decoder wraps its input in a `TrackedReader` so it can tell how
/// much of a tag's payload the caller actually consumed, and report
/// byte offsets in diagnostics.
#[derive(Debug)]
pub struct TrackedReader<R> {
    inner: R,
    position: u64,
}

impl<R> TrackedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Total bytes read since construction.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for TrackedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
///
/// Unlike [`Read::read_exact`], a short read is not an error here: the
/// number of bytes actually read is returned so callers can tell a clean
/// end of stream (0) from a field that was cut in half.
///
/// # Errors
///
/// Propagates any I/O error other than [`io::ErrorKind::Interrupted`].
pub fn read_fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read exactly `len` bytes of a fixed-size field into a pooled buffer.
///
/// # Returns
///
/// - `Ok(Some(buf))` with `buf.len() == len` on success.
/// - `Ok(None)` if the stream was already at its end (zero bytes read).
///
/// # Errors
///
/// - [`WireError::Truncated`] if some, but not all, bytes were available.
/// - [`WireError::Io`] on reader failure.
pub fn read_field<R: Read + ?Sized>(
    reader: &mut R,
    len: usize,
    field: &'static str,
) -> Result<Option<ScratchBuffer<'static>>, WireError> {
    let mut buf = pool::global().acquire();
    buf.resize(len, 0);

    let got = read_fill(reader, &mut buf)?;
    if got == 0 {
        return Ok(None);
    }
    if got < len {
        return Err(WireError::Truncated {
            field,
            needed: len,
            got,
        });
    }
    Ok(Some(buf))
}

/// Discard up to `n` bytes. Returns how many were actually discarded.
///
/// # Errors
///
/// Propagates I/O errors from `reader`.
pub fn discard<R: Read + ?Sized>(reader: &mut R, n: u64) -> io::Result<u64> {
    io::copy(&mut reader.take(n), &mut io::sink())
}
