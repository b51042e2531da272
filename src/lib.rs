//! segflate - segmented zlib inflate cursor
//!
//! This crate provides the decompressing input cursor used by remote-framebuffer
//! style protocols, where many independently sized compressed segments are
//! carried over one long-lived zlib stream. Each segment's compressed length is
//! known from a protocol header; its decoded length is not. The cursor keeps the
//! inflate dictionary alive across segments while the transport hands over
//! compressed bytes in arbitrarily small, possibly not-yet-available chunks.
//!
//! # Features
//!
//! - Fixed-capacity decoded buffer with item-sized pulls
//! - Exact per-segment compressed byte budgets
//! - Non-blocking pulls for event-loop callers
//! - Clean segment boundaries through `reset`
//! - Streaming API via the `Read` trait
//! - Optional tokio channel source (`async` feature)
//!
//! # Example
//!
//! ```no_run
//! use segflate::{ChunkedSource, InflateCursor};
//!
//! # let compressed: Vec<u8> = Vec::new();
//! let mut cursor = InflateCursor::new();
//! let mut source = ChunkedSource::complete(compressed.clone());
//!
//! let mut segment = cursor.attach(&mut source, compressed.len())?;
//! let width = segment.read_u16()?;
//! let height = segment.read_u16()?;
//! let mut pixels = vec![0u8; width as usize * height as usize];
//! segment.read_bytes(&mut pixels)?;
//! segment.reset()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod error;
pub mod inflate;
pub mod source;

// Re-export commonly used types
pub use common::{
    CursorOptions, CursorStats, ErrorKind, Result, SegflateError, DEFAULT_BUF_SIZE,
};
pub use inflate::{inflate_segments, InflateCursor, InflateEngine, Inflated, Segment, ZlibEngine};
pub use source::{ByteSource, ChunkedSource, ReaderSource};

#[cfg(feature = "async")]
pub use source::{channel, ChannelSource};
