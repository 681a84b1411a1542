use std::io::{ErrorKind, Read};

/// Reads until `buffer` is full or the reader reports end of stream
///
/// Returns the number of bytes placed in `buffer`. Unlike [Read::read_exact],
/// a short count is not an error, so callers can tell a clean end of stream
/// (zero bytes) apart from a truncated structure.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
/// Reads exactly `length` bytes into `buffer`, replacing its contents
///
/// The buffer only grows as data actually arrives so a hostile length
/// cannot force a large allocation up front. Returns the number of bytes read.
pub(crate) fn read_into_vec<R: Read>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
    length: usize,
) -> std::io::Result<usize> {
    buffer.clear();
    reader.take(length as u64).read_to_end(buffer)
}

/// A reader that allows peeking into the first N bytes without consuming them
#[derive(Debug)]
pub struct PeekableReader<R: Read> {
    inner: R,
    peeked: Vec<u8>,
    position: usize,
}
impl<R: Read> PeekableReader<R> {
    /// Creates a new `PeekableReader` that buffers the first `peek_size` bytes
    ///
    /// Fewer bytes are buffered if the stream ends early.
    pub fn new(mut inner: R, peek_size: usize) -> std::io::Result<Self> {
        let mut peeked = vec![0u8; peek_size];
        let n = read_up_to(&mut inner, &mut peeked)?;
        peeked.truncate(n);
        Ok(Self {
            inner,
            peeked,
            position: 0,
        })
    }
    /// Returns the bytes that have been peeked but not yet consumed
    pub fn peek(&self) -> &[u8] {
        &self.peeked[self.position..]
    }
}
impl<R: Read> Read for PeekableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = &self.peeked[self.position..];
        if remaining.is_empty() {
            return self.inner.read(buf);
        }
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}
