//! In-memory transport delivering bytes in scheduled chunks

use super::ByteSource;
use crate::{Result, SegflateError};

/// In-memory byte source that releases its data one chunk at a time
///
/// The chunk schedule models a socket that hands over bytes in small, uneven
/// pieces. Once the schedule runs out its last size repeats. A blocking probe lets
/// the next chunk arrive immediately; a non-blocking probe only sees chunks that
/// were already released with [`ChunkedSource::deliver_next`].
#[derive(Debug, Clone)]
pub struct ChunkedSource {
    data: Vec<u8>,
    pos: usize,
    arrived: usize,
    schedule: Vec<usize>,
    next_chunk: usize,
}

impl ChunkedSource {
    /// Create a source that releases `data` following `schedule`
    ///
    /// An empty schedule releases everything as one chunk. Zero sizes are
    /// treated as one byte.
    pub fn new(data: Vec<u8>, schedule: &[usize]) -> Self {
        Self {
            data,
            pos: 0,
            arrived: 0,
            schedule: schedule.iter().map(|&size| size.max(1)).collect(),
            next_chunk: 0,
        }
    }

    /// Create a source whose bytes have all arrived already
    pub fn complete(data: Vec<u8>) -> Self {
        let mut source = Self::new(data, &[]);
        source.deliver_all();
        source
    }

    fn next_chunk_len(&mut self) -> usize {
        let len = match self.schedule.get(self.next_chunk) {
            Some(&len) => {
                self.next_chunk += 1;
                len
            }
            None => self.schedule.last().copied().unwrap_or(self.data.len()),
        };
        len.max(1)
    }

    /// Release the next chunk; returns false once every byte has arrived
    pub fn deliver_next(&mut self) -> bool {
        if self.arrived >= self.data.len() {
            return false;
        }
        let len = self.next_chunk_len();
        self.arrived = (self.arrived + len).min(self.data.len());
        true
    }

    /// Release every remaining chunk
    pub fn deliver_all(&mut self) {
        self.arrived = self.data.len();
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed, whether or not they have arrived
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ByteSource for ChunkedSource {
    fn ensure_available(&mut self, min_bytes: usize, wait: bool) -> Result<bool> {
        while self.arrived - self.pos < min_bytes {
            if !wait {
                return Ok(false);
            }
            if !self.deliver_next() {
                return Err(SegflateError::UnexpectedEof);
            }
        }
        Ok(true)
    }

    fn readable(&self) -> &[u8] {
        &self.data[self.pos..self.arrived]
    }

    /// Clamped to the bytes that have arrived
    fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.arrived);
    }
}
