//! Byte source fed by an async connection task
//!
//! The network side runs on tokio and pushes every chunk it receives into a
//! bounded channel; the decoding side owns the receiving end and drives the
//! cursor from a blocking context such as `spawn_blocking`.

use super::ByteSource;
use crate::{Result, SegflateError};
use bytes::{Buf, Bytes, BytesMut};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Byte source receiving `Bytes` chunks from a tokio channel
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Bytes>,
    current: Bytes,
}

/// Create a connected sender and source with room for `buffer` chunks in flight
pub fn channel(buffer: usize) -> (mpsc::Sender<Bytes>, ChannelSource) {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    (sender, ChannelSource::new(receiver))
}

impl ChannelSource {
    /// Wrap the receiving end of a chunk channel
    pub fn new(receiver: mpsc::Receiver<Bytes>) -> Self {
        Self {
            receiver,
            current: Bytes::new(),
        }
    }

    fn append(&mut self, chunk: Bytes) {
        log::trace!("received {} byte chunk", chunk.len());
        if self.current.is_empty() {
            self.current = chunk;
        } else {
            let mut merged = BytesMut::with_capacity(self.current.len() + chunk.len());
            merged.extend_from_slice(&self.current);
            merged.extend_from_slice(&chunk);
            self.current = merged.freeze();
        }
    }
}

impl ByteSource for ChannelSource {
    /// Blocking probes call `blocking_recv` and must not run on an async worker thread.
    fn ensure_available(&mut self, min_bytes: usize, wait: bool) -> Result<bool> {
        while self.current.len() < min_bytes {
            let next = if wait {
                self.receiver.blocking_recv()
            } else {
                match self.receiver.try_recv() {
                    Ok(chunk) => Some(chunk),
                    Err(TryRecvError::Empty) => return Ok(false),
                    Err(TryRecvError::Disconnected) => None,
                }
            };

            match next {
                Some(chunk) => self.append(chunk),
                None => return Err(SegflateError::UnexpectedEof),
            }
        }
        Ok(true)
    }

    fn readable(&self) -> &[u8] {
        &self.current
    }

    /// Clamped to the current chunk
    fn advance(&mut self, count: usize) {
        self.current.advance(count.min(self.current.len()));
    }
}
