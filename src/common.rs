//! Common types and constants for the segmented inflate cursor
//!
//! This module defines the error type, cursor options and lifetime statistics
//! shared across the crate.

use thiserror::Error;

/// Default capacity of the decoded-byte buffer (16 KiB)
pub const DEFAULT_BUF_SIZE: usize = 16384;

/// Error type for segmented inflate operations
///
/// Every variant is fatal to the session that raised it: compressed data
/// corruption or protocol desynchronisation cannot be repaired locally, so the
/// owning connection is expected to tear the session down.
#[derive(Debug, Error)]
pub enum SegflateError {
    /// A requested item does not fit in the decoded buffer
    #[error("Item size {item_size} exceeds buffer capacity {capacity}")]
    Capacity {
        /// Requested item size in bytes
        item_size: usize,
        /// Capacity of the decoded buffer
        capacity: usize,
    },

    /// The cursor was driven in a state that does not permit the operation
    #[error("Protocol state error: {0}")]
    ProtocolState(String),

    /// Decoded bytes were requested past the end of the bound segment
    #[error("Segment exhausted: no compressed input left and no pending output")]
    SegmentExhausted,

    /// The inflate engine rejected the compressed bytes
    #[error("Invalid compressed data: {0}")]
    DataFormat(String),

    /// The transport ended while a blocking probe was waiting for bytes
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`SegflateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Item larger than the decoded buffer
    Capacity,
    /// Cursor used out of order, or past the end of a segment
    ProtocolState,
    /// Malformed compressed data
    DataFormat,
    /// The underlying byte source failed or ended
    Transport,
}

impl SegflateError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SegflateError::Capacity { .. } => ErrorKind::Capacity,
            SegflateError::ProtocolState(_) | SegflateError::SegmentExhausted => {
                ErrorKind::ProtocolState
            }
            SegflateError::DataFormat(_) => ErrorKind::DataFormat,
            SegflateError::UnexpectedEof | SegflateError::Io(_) => ErrorKind::Transport,
        }
    }
}

impl From<SegflateError> for std::io::Error {
    fn from(err: SegflateError) -> Self {
        match err {
            SegflateError::Io(e) => e,
            eof @ SegflateError::UnexpectedEof => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, eof)
            }
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}

/// Result type alias for segmented inflate operations
pub type Result<T> = std::result::Result<T, SegflateError>;

/// Configuration options for an inflate cursor
#[derive(Debug, Clone)]
pub struct CursorOptions {
    /// Capacity of the decoded buffer; also the largest item that can be requested
    pub buffer_size: usize,
    /// Expect a zlib header and trailer (`false` for raw deflate)
    pub zlib_header: bool,
}

impl Default for CursorOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUF_SIZE,
            zlib_header: true,
        }
    }
}

impl CursorOptions {
    /// Options for a raw deflate stream without zlib framing
    pub fn raw_deflate() -> Self {
        Self {
            zlib_header: false,
            ..Self::default()
        }
    }

    /// Override the decoded buffer capacity
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

/// Running totals kept by a cursor over its whole lifetime
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CursorStats {
    /// Number of segments bound with `attach`
    pub segments: u64,
    /// Compressed bytes handed to the engine and consumed
    pub compressed_bytes: u64,
    /// Decoded bytes produced by the engine, including drained output
    pub decoded_bytes: u64,
    /// Decoded bytes dropped unread by `attach` or `reset`
    pub discarded_bytes: u64,
}
