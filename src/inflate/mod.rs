//! Segmented inflate
//!
//! This module provides the decompressing cursor and the segment guard used to
//! read from it, on top of the [`InflateEngine`] contract.

mod buffer;
mod cursor;
mod engine;
mod segment;

pub use buffer::DecodedBuffer;
pub use cursor::InflateCursor;
pub use engine::{InflateEngine, Inflated, ZlibEngine};
pub use segment::Segment;

use crate::source::ChunkedSource;
use crate::Result;

/// Decode consecutive segments that share one zlib stream
///
/// Each segment is read to its end and then reset, exactly as a protocol reader
/// would process successive compressed rectangles.
pub fn inflate_segments(segments: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
    let mut cursor = InflateCursor::new();
    let mut decoded = Vec::with_capacity(segments.len());

    for data in segments {
        let mut source = ChunkedSource::complete(data.to_vec());
        let mut segment = cursor.attach(&mut source, data.len())?;
        let mut output = Vec::new();
        segment.read_to_vec(&mut output)?;
        segment.reset()?;
        decoded.push(output);
    }

    cursor.close();
    Ok(decoded)
}
