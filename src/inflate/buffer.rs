//! Fixed-capacity decoded-byte buffer

/// Decoded bytes waiting to be read by the protocol parser
///
/// Offsets always satisfy `start <= ptr <= end <= capacity`. Bytes in
/// `ptr..end` are unread; `end..capacity` is free space the engine writes into.
#[derive(Debug)]
pub struct DecodedBuffer {
    data: Box<[u8]>,
    start: usize,
    ptr: usize,
    end: usize,
}

impl DecodedBuffer {
    /// Allocate a buffer of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            start: 0,
            ptr: 0,
            end: 0,
        }
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of unread bytes
    pub fn available(&self) -> usize {
        self.end - self.ptr
    }

    /// Bytes consumed since the last compaction
    pub fn consumed(&self) -> usize {
        self.ptr - self.start
    }

    /// Unread bytes
    pub fn unread(&self) -> &[u8] {
        &self.data[self.ptr..self.end]
    }

    /// Free space after `end`
    pub fn free_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.end..]
    }

    /// Free space measured from `start`, ignoring anything buffered
    pub fn whole_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.start..]
    }

    /// Move unread bytes down to `start`; returns the number of bytes dropped from the front
    pub fn compact(&mut self) -> usize {
        let dropped = self.ptr - self.start;
        if dropped > 0 {
            self.data.copy_within(self.ptr..self.end, self.start);
            self.end -= dropped;
            self.ptr = self.start;
        }
        dropped
    }

    /// Drop all unread bytes; returns how many were dropped
    pub fn discard(&mut self) -> usize {
        let dropped = self.end - self.ptr;
        self.ptr = self.start;
        self.end = self.start;
        dropped
    }

    /// Mark `count` bytes after `end` as written
    pub fn fill(&mut self, count: usize) {
        debug_assert!(self.end + count <= self.data.len());
        self.end += count;
    }

    /// Mark `count` unread bytes consumed
    pub fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.available());
        self.ptr += count;
    }
}
