//! Segment - read access to one bound compressed segment

use super::cursor::InflateCursor;
use super::engine::{InflateEngine, ZlibEngine};
use crate::source::ByteSource;
use crate::{Result, SegflateError};
use std::fmt;
use std::io::Read;

/// A segment bound to a cursor and its byte source
///
/// Dropping the guard releases the borrows but keeps the segment bound on the
/// cursor; [`InflateCursor::rebind`] picks it up again. Call [`reset`](Self::reset)
/// to finish the segment.
pub struct Segment<'a, S: ByteSource + ?Sized, E: InflateEngine = ZlibEngine> {
    cursor: &'a mut InflateCursor<E>,
    source: &'a mut S,
}

impl<'a, S: ByteSource + ?Sized, E: InflateEngine> Segment<'a, S, E> {
    pub(super) fn new(cursor: &'a mut InflateCursor<E>, source: &'a mut S) -> Self {
        Self { cursor, source }
    }

    /// Make at least `item_size` decoded bytes available
    ///
    /// Returns how many whole items of `item_size` bytes, up to `n_items`, can be
    /// read from [`buffered`](Self::buffered). With `wait` false, returns 0 when
    /// the source would block; the caller may yield and retry later.
    pub fn ensure_available(&mut self, item_size: usize, n_items: usize, wait: bool) -> Result<usize> {
        self.cursor
            .ensure_available(&mut *self.source, item_size, n_items, wait)
    }

    /// Decoded bytes available without pulling
    pub fn buffered(&self) -> &[u8] {
        self.cursor.buffer.unread()
    }

    /// Consume `count` buffered bytes
    pub fn advance(&mut self, count: usize) -> Result<()> {
        let available = self.cursor.buffer.available();
        if count > available {
            return Err(SegflateError::ProtocolState(format!(
                "advance by {count} with only {available} bytes buffered"
            )));
        }
        self.cursor.buffer.consume(count);
        Ok(())
    }

    /// Logical position of the cursor
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Compressed bytes of this segment not yet consumed
    pub fn budget(&self) -> usize {
        self.cursor.budget
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure_available(1, 1, true)?;
        let value = self.buffered()[0];
        self.cursor.buffer.consume(1);
        Ok(value)
    }

    /// Read a big-endian u16
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure_available(2, 1, true)?;
        let value = u16::from_be_bytes([self.buffered()[0], self.buffered()[1]]);
        self.cursor.buffer.consume(2);
        Ok(value)
    }

    /// Read a big-endian u32
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure_available(4, 1, true)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.buffered()[..4]);
        self.cursor.buffer.consume(4);
        Ok(u32::from_be_bytes(bytes))
    }

    /// Fill `buf` completely
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.ensure_available(1, buf.len() - filled, true)?;
            buf[filled..filled + n].copy_from_slice(&self.buffered()[..n]);
            self.cursor.buffer.consume(n);
            filled += n;
        }
        Ok(())
    }

    /// Discard `count` decoded bytes
    pub fn skip(&mut self, count: usize) -> Result<()> {
        let mut left = count;
        while left > 0 {
            let n = self.ensure_available(1, left, true)?;
            self.cursor.buffer.consume(n);
            left -= n;
        }
        Ok(())
    }

    /// Append every remaining decoded byte of the segment to `out`
    pub fn read_to_vec(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        let mut total = 0;
        while self.fill_some()? {
            let chunk = self.cursor.buffer.unread();
            let len = chunk.len();
            out.extend_from_slice(chunk);
            self.cursor.buffer.consume(len);
            total += len;
        }
        Ok(total)
    }

    /// Buffer at least one byte; false once the segment has nothing more to give
    fn fill_some(&mut self) -> Result<bool> {
        if self.cursor.buffer.available() > 0 {
            return Ok(true);
        }
        if self.cursor.engine.is_finished() && self.cursor.budget == 0 {
            return Ok(false);
        }
        match self.ensure_available(1, 1, true) {
            Ok(_) => Ok(true),
            Err(SegflateError::SegmentExhausted) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Finish the segment
    ///
    /// Drains the remaining compressed bytes and flushes output the engine still
    /// holds, then detaches the source. Unread decoded bytes are dropped.
    pub fn reset(self) -> Result<()> {
        self.cursor.reset_segment(self.source)
    }
}

impl<S: ByteSource + ?Sized, E: InflateEngine> Read for Segment<'_, S, E> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() || !self.fill_some()? {
            return Ok(0);
        }

        let unread = self.cursor.buffer.unread();
        let to_copy = buf.len().min(unread.len());
        buf[..to_copy].copy_from_slice(&unread[..to_copy]);
        self.cursor.buffer.consume(to_copy);
        Ok(to_copy)
    }
}

impl<S: ByteSource + ?Sized, E: InflateEngine> fmt::Debug for Segment<'_, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("position", &self.cursor.position())
            .field("budget", &self.cursor.budget)
            .field("buffered", &self.cursor.buffer.available())
            .finish()
    }
}
