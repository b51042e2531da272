//! InflateCursor - decoded-byte cursor over bounded compressed segments
//!
//! This module implements the pull loop and segment resynchronisation of the
//! cursor. Reading happens through the [`Segment`] guard returned by
//! [`InflateCursor::attach`].

use super::buffer::DecodedBuffer;
use super::engine::{InflateEngine, ZlibEngine};
use super::segment::Segment;
use crate::source::ByteSource;
use crate::{CursorOptions, CursorStats, Result, SegflateError, DEFAULT_BUF_SIZE};

/// Decompressing cursor shared by every segment of one inflate session
///
/// The cursor and its buffer live as long as the connection. Each segment is
/// bound with [`attach`](Self::attach), read through the returned [`Segment`],
/// and finished with [`Segment::reset`], which leaves the engine on a clean
/// boundary for the next segment while keeping its dictionary.
#[derive(Debug)]
pub struct InflateCursor<E: InflateEngine = ZlibEngine> {
    pub(super) buffer: DecodedBuffer,
    pub(super) engine: E,
    offset: u64,
    pub(super) budget: usize,
    attached: bool,
    needs_input: bool,
    stats: CursorStats,
}

impl InflateCursor<ZlibEngine> {
    /// Create a zlib cursor with a 16 KiB buffer
    pub fn new() -> Self {
        Self::from_parts(ZlibEngine::new(true), DEFAULT_BUF_SIZE)
    }

    /// Create a cursor from options
    pub fn with_options(options: CursorOptions) -> Result<Self> {
        Self::with_engine(ZlibEngine::new(options.zlib_header), options.buffer_size)
    }
}

impl Default for InflateCursor<ZlibEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: InflateEngine> InflateCursor<E> {
    /// Create a cursor around a custom engine
    pub fn with_engine(engine: E, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(SegflateError::ProtocolState(
                "buffer size must be nonzero".to_string(),
            ));
        }
        Ok(Self::from_parts(engine, buffer_size))
    }

    fn from_parts(engine: E, buffer_size: usize) -> Self {
        Self {
            buffer: DecodedBuffer::new(buffer_size),
            engine,
            offset: 0,
            budget: 0,
            attached: false,
            needs_input: true,
            stats: CursorStats::default(),
        }
    }

    /// Logical number of decoded bytes delivered over the cursor's lifetime
    pub fn position(&self) -> u64 {
        self.offset + self.buffer.consumed() as u64
    }

    /// Capacity of the decoded buffer
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Compressed bytes the bound segment still allows the cursor to consume
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Whether a segment is currently bound
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether the engine is known to be starved of input
    pub fn needs_input(&self) -> bool {
        self.needs_input
    }

    /// Lifetime totals
    pub fn stats(&self) -> &CursorStats {
        &self.stats
    }

    /// The inflate engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Bind a segment of `compressed_len` bytes read from `source`
    ///
    /// Decoded bytes still buffered from the previous segment are discarded; only
    /// the engine's session state carries over. Fails if the previous segment
    /// still has compressed bytes that were never drained with `reset`.
    pub fn attach<'a, S: ByteSource + ?Sized>(
        &'a mut self,
        source: &'a mut S,
        compressed_len: usize,
    ) -> Result<Segment<'a, S, E>> {
        if self.budget > 0 {
            return Err(SegflateError::ProtocolState(format!(
                "attach while previous segment has {} undrained compressed bytes",
                self.budget
            )));
        }

        self.discard_buffered();
        self.budget = compressed_len;
        self.attached = true;
        self.stats.segments += 1;
        log::debug!(
            "attached segment {} ({} compressed bytes) at position {}",
            self.stats.segments,
            compressed_len,
            self.position()
        );

        Ok(Segment::new(self, source))
    }

    /// Borrow the still-bound segment again, e.g. after yielding on a would-block result
    pub fn rebind<'a, S: ByteSource + ?Sized>(
        &'a mut self,
        source: &'a mut S,
    ) -> Result<Segment<'a, S, E>> {
        if !self.attached {
            return Err(SegflateError::ProtocolState(
                "no segment attached".to_string(),
            ));
        }
        Ok(Segment::new(self, source))
    }

    /// Start a fresh inflate stream, dropping the dictionary
    ///
    /// Only legal between segments.
    pub fn reset_session(&mut self) -> Result<()> {
        if self.attached {
            return Err(SegflateError::ProtocolState(
                "session reset while a segment is attached".to_string(),
            ));
        }
        self.engine.reset();
        self.needs_input = true;
        log::debug!("inflate session reset at position {}", self.position());
        Ok(())
    }

    /// Release the buffer and the engine
    pub fn close(self) {
        log::debug!(
            "closing cursor at position {} after {} segments",
            self.position(),
            self.stats.segments
        );
    }

    fn discard_buffered(&mut self) {
        self.offset += self.buffer.consumed() as u64;
        self.stats.discarded_bytes += self.buffer.discard() as u64;
    }

    /// Make at least `item_size` decoded bytes available; returns the achievable item count
    pub(super) fn ensure_available<S: ByteSource + ?Sized>(
        &mut self,
        source: &mut S,
        item_size: usize,
        n_items: usize,
        wait: bool,
    ) -> Result<usize> {
        let capacity = self.buffer.capacity();
        if item_size > capacity {
            return Err(SegflateError::Capacity {
                item_size,
                capacity,
            });
        }

        if self.buffer.available() < item_size {
            self.offset += self.buffer.compact() as u64;

            while self.buffer.available() < item_size {
                if !self.pull(source, wait)? {
                    return Ok(0);
                }
            }
        }

        if item_size == 0 {
            return Ok(n_items);
        }
        Ok(n_items.min(self.buffer.available() / item_size))
    }

    /// Run the engine once; returns false if the source would block
    ///
    /// The engine may produce output without consuming input, or consume input
    /// without producing output.
    fn pull<S: ByteSource + ?Sized>(&mut self, source: &mut S, wait: bool) -> Result<bool> {
        if !self.attached {
            return Err(SegflateError::ProtocolState(
                "pull with no segment attached".to_string(),
            ));
        }
        if self.engine.is_finished() {
            return Err(SegflateError::ProtocolState(
                "inflate stream already ended".to_string(),
            ));
        }

        if self.needs_input {
            if self.budget == 0 {
                return Err(SegflateError::SegmentExhausted);
            }
            if !source.ensure_available(1, wait)? {
                return Ok(false);
            }
            self.needs_input = false;
        }

        let input = source.readable();
        let input_len = input.len().min(self.budget);
        let output = self.buffer.free_mut();
        let offered = output.len();

        let inflated = match self.engine.inflate(&input[..input_len], output) {
            Ok(inflated) => inflated,
            Err(e) => {
                log::warn!("inflate failed with {} segment bytes left: {}", self.budget, e);
                return Err(e);
            }
        };
        let consumed = input_len - inflated.remaining;

        // A full output buffer says nothing about pending output inside the engine.
        if inflated.produced < offered {
            self.needs_input = true;
        }

        self.buffer.fill(inflated.produced);
        self.budget -= consumed;
        source.advance(consumed);

        self.stats.compressed_bytes += consumed as u64;
        self.stats.decoded_bytes += inflated.produced as u64;
        log::trace!(
            "pull: {} in, {} out, {} budget left",
            consumed,
            inflated.produced,
            self.budget
        );

        Ok(true)
    }

    /// Drain the bound segment and flush the engine to a clean boundary
    pub(super) fn reset_segment<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        self.discard_buffered();

        while self.budget > 0 {
            self.pull(source, true)?;
            self.stats.discarded_bytes += self.buffer.discard() as u64;
        }

        if !self.engine.is_finished() {
            loop {
                let output = self.buffer.whole_mut();
                let offered = output.len();
                let inflated = self.engine.inflate(&[], output).map_err(|e| {
                    log::warn!("inflate failed while flushing segment: {}", e);
                    e
                })?;

                self.stats.decoded_bytes += inflated.produced as u64;
                self.stats.discarded_bytes += inflated.produced as u64;
                if inflated.produced < offered {
                    break;
                }
            }
        }

        self.needs_input = true;
        self.attached = false;
        self.budget = 0;
        log::debug!("segment reset at position {}", self.position());
        Ok(())
    }
}
