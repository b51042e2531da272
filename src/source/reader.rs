//! Buffered byte source over any `std::io::Read`

use super::ByteSource;
use crate::{Result, SegflateError};
use std::io::{ErrorKind, Read};

/// Default size of the transport buffer (8 KiB)
pub const DEFAULT_READ_BUF_SIZE: usize = 8192;

/// Byte source that buffers a reader such as a file or a socket
///
/// A non-blocking reader reporting `WouldBlock` makes a non-blocking probe fail
/// softly; a blocking probe needs a blocking reader and surfaces `WouldBlock` as
/// an I/O error.
#[derive(Debug)]
pub struct ReaderSource<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    end: usize,
}

impl<R: Read> ReaderSource<R> {
    /// Create a source with the default buffer size
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_READ_BUF_SIZE)
    }

    /// Create a source with a custom buffer size
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buffer: vec![0; capacity.max(1)],
            pos: 0,
            end: 0,
        }
    }

    /// Get a reference to the wrapped reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Unwrap the source, dropping any buffered bytes
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn compact(&mut self) {
        if self.pos > 0 {
            self.buffer.copy_within(self.pos..self.end, 0);
            self.end -= self.pos;
            self.pos = 0;
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn ensure_available(&mut self, min_bytes: usize, wait: bool) -> Result<bool> {
        if min_bytes > self.buffer.len() {
            return Err(SegflateError::Capacity {
                item_size: min_bytes,
                capacity: self.buffer.len(),
            });
        }

        while self.end - self.pos < min_bytes {
            self.compact();
            match self.reader.read(&mut self.buffer[self.end..]) {
                Ok(0) => return Err(SegflateError::UnexpectedEof),
                Ok(n) => self.end += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock && !wait => return Ok(false),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(true)
    }

    fn readable(&self) -> &[u8] {
        &self.buffer[self.pos..self.end]
    }

    /// Clamped to the buffered window
    fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that yields one byte per call and then blocks once
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        blocked: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.blocked {
                self.blocked = true;
                return Err(std::io::Error::new(ErrorKind::WouldBlock, "not yet"));
            }
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_reads_and_compacts() {
        let mut source = ReaderSource::with_capacity(Cursor::new((0u8..10).collect::<Vec<_>>()), 4);

        assert!(source.ensure_available(4, true).unwrap());
        assert_eq!(source.readable(), &[0, 1, 2, 3]);
        source.advance(3);

        assert!(source.ensure_available(2, true).unwrap());
        assert_eq!(source.readable(), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_capacity_and_eof() {
        let mut source = ReaderSource::with_capacity(Cursor::new(vec![1u8, 2]), 4);

        assert!(matches!(
            source.ensure_available(5, true),
            Err(SegflateError::Capacity { .. })
        ));
        assert!(matches!(
            source.ensure_available(3, true),
            Err(SegflateError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_would_block() {
        let trickle = Trickle {
            data: vec![7, 8],
            pos: 0,
            blocked: false,
        };
        let mut source = ReaderSource::new(trickle);

        assert!(!source.ensure_available(1, false).unwrap());
        assert!(source.ensure_available(2, true).unwrap());
        assert_eq!(source.readable(), &[7, 8]);
    }

    #[test]
    fn test_advance_clamps_to_window() {
        let mut source = ReaderSource::with_capacity(Cursor::new(vec![1u8, 2, 3, 4, 5, 6]), 4);

        assert!(source.ensure_available(4, true).unwrap());
        source.advance(9);
        assert!(source.readable().is_empty());

        assert!(source.ensure_available(2, true).unwrap());
        assert_eq!(source.readable(), &[5, 6]);
    }
}
