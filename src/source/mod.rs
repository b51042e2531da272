//! Underlying byte sources
//!
//! A [`ByteSource`] is the transport that feeds compressed bytes to an inflate
//! cursor. It exposes a contiguous window of bytes that have arrived but have not
//! been consumed, plus a probe that waits (or refuses to wait) for more.

mod chunked;
mod reader;

#[cfg(feature = "async")]
mod channel_source;

pub use chunked::ChunkedSource;
pub use reader::{ReaderSource, DEFAULT_READ_BUF_SIZE};

#[cfg(feature = "async")]
pub use channel_source::{channel, ChannelSource};

use crate::Result;

/// Transport contract consumed by the inflate cursor
pub trait ByteSource {
    /// Make sure at least `min_bytes` contiguous bytes are readable
    ///
    /// Returns `Ok(false)` only when `wait` is false and fewer than `min_bytes`
    /// bytes are currently buffered. With `wait` set the call blocks until the
    /// bytes arrive or the transport fails.
    fn ensure_available(&mut self, min_bytes: usize, wait: bool) -> Result<bool>;

    /// Bytes that have arrived and have not been consumed yet
    fn readable(&self) -> &[u8];

    /// Mark `count` readable bytes consumed
    ///
    /// Callers must not pass more than `self.readable().len()`. The sources in
    /// this crate clamp a larger `count` to the readable window, so an
    /// over-advance empties the window instead of failing.
    fn advance(&mut self, count: usize);
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn ensure_available(&mut self, min_bytes: usize, wait: bool) -> Result<bool> {
        (**self).ensure_available(min_bytes, wait)
    }

    fn readable(&self) -> &[u8] {
        (**self).readable()
    }

    fn advance(&mut self, count: usize) {
        (**self).advance(count)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn ensure_available(&mut self, min_bytes: usize, wait: bool) -> Result<bool> {
        (**self).ensure_available(min_bytes, wait)
    }

    fn readable(&self) -> &[u8] {
        (**self).readable()
    }

    fn advance(&mut self, count: usize) {
        (**self).advance(count)
    }
}
