//! Inflate engine contract and its flate2 implementation

use crate::{Result, SegflateError};
use flate2::{Decompress, FlushDecompress, Status};

/// Outcome of one engine invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inflated {
    /// Decoded bytes written to the output slice
    pub produced: usize,
    /// Input bytes the engine left unconsumed
    pub remaining: usize,
}

/// Stateful inflate primitive driven by the cursor
///
/// Session state, including the sliding dictionary and any pending output,
/// lives inside the engine and survives between calls.
pub trait InflateEngine {
    /// Decode from `input` into `output`
    ///
    /// Malformed input is reported as [`SegflateError::DataFormat`].
    fn inflate(&mut self, input: &[u8], output: &mut [u8]) -> Result<Inflated>;

    /// Whether the compressed stream reached its terminal block
    fn is_finished(&self) -> bool;

    /// Discard the session state and start a fresh stream
    fn reset(&mut self);
}

/// zlib/deflate engine backed by `flate2::Decompress`
#[derive(Debug)]
pub struct ZlibEngine {
    decompress: Decompress,
    zlib_header: bool,
    finished: bool,
}

impl ZlibEngine {
    /// Create an engine; `zlib_header` selects zlib framing over raw deflate
    pub fn new(zlib_header: bool) -> Self {
        Self {
            decompress: Decompress::new(zlib_header),
            zlib_header,
            finished: false,
        }
    }

    /// Total compressed bytes consumed by this session
    pub fn total_in(&self) -> u64 {
        self.decompress.total_in()
    }

    /// Total decoded bytes produced by this session
    pub fn total_out(&self) -> u64 {
        self.decompress.total_out()
    }
}

impl Default for ZlibEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InflateEngine for ZlibEngine {
    fn inflate(&mut self, input: &[u8], output: &mut [u8]) -> Result<Inflated> {
        let before_in = self.decompress.total_in();
        let before_out = self.decompress.total_out();

        let status = self
            .decompress
            .decompress(input, output, FlushDecompress::None)
            .map_err(|e| SegflateError::DataFormat(e.to_string()))?;

        if status == Status::StreamEnd {
            self.finished = true;
        }

        let consumed = (self.decompress.total_in() - before_in) as usize;
        let produced = (self.decompress.total_out() - before_out) as usize;

        Ok(Inflated {
            produced,
            remaining: input.len() - consumed,
        })
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn reset(&mut self) {
        self.decompress.reset(self.zlib_header);
        self.finished = false;
    }
}
