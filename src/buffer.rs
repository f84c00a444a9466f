//! Incremental byte accumulation with bounded memory.

use crate::error::{Error, Result};
use crate::source::ByteSource;

/// Consumed prefixes below this size are left in place; larger ones are
/// compacted away once they dominate the buffer.
const COMPACT_MIN: usize = 4096;

/// Accumulates bytes from a [`ByteSource`] on demand and hands them to the
/// decoder through a read cursor.
///
/// A WPILOG record does not declare its total length up front: one
/// bitfield byte selects the width of each header field, and only the
/// decoded header reveals the payload size. The buffer supports exactly
/// that "read a little, decide how much more" pattern: [`ensure`] suspends
/// until enough unread bytes are available, [`peek`] exposes them, and
/// [`consume`] releases them. Consumed bytes are dropped, so retention is
/// bounded by the largest single request (the header's extra string or one
/// record's payload) rather than by the log size.
///
/// [`ensure`]: ChunkBuffer::ensure
/// [`peek`]: ChunkBuffer::peek
/// [`consume`]: ChunkBuffer::consume
pub struct ChunkBuffer<S> {
    source: S,
    buf: Vec<u8>,
    cursor: usize,
    offset: u64,
    exhausted: bool,
}

impl<S: ByteSource> ChunkBuffer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buf: Vec::new(),
            cursor: 0,
            offset: 0,
            exhausted: false,
        }
    }

    /// Unread bytes currently retained.
    pub fn buffered(&self) -> usize {
        self.buf.len() - self.cursor
    }

    /// Absolute stream position of the read cursor.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Suspend until at least `n` unread bytes are buffered.
    ///
    /// Fails with [`Error::UnexpectedEof`] if the source drains first, and
    /// with [`Error::Source`] if it fails outright; either way the
    /// in-flight read errors instead of hanging.
    pub async fn ensure(&mut self, n: usize) -> Result<()> {
        while self.buffered() < n {
            if !self.pull().await? {
                return Err(Error::UnexpectedEof {
                    offset: self.offset,
                    expected: n,
                    available: self.buffered(),
                });
            }
        }
        Ok(())
    }

    /// True once no unread bytes remain and the source is drained.
    ///
    /// This is how a clean end of stream at a record boundary is told
    /// apart from truncation inside a record (which makes [`ensure`] fail).
    ///
    /// [`ensure`]: ChunkBuffer::ensure
    pub async fn at_end(&mut self) -> Result<bool> {
        while self.buffered() == 0 {
            if !self.pull().await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// View `n` bytes at the cursor without consuming them.
    ///
    /// Callers must have [`ensure`]d `n` bytes first.
    ///
    /// [`ensure`]: ChunkBuffer::ensure
    pub fn peek(&self, n: usize) -> &[u8] {
        debug_assert!(n <= self.buffered(), "peek({n}) beyond buffered bytes");
        &self.buf[self.cursor..self.cursor + n]
    }

    /// Advance the cursor by `n`, releasing the consumed bytes.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.buffered(), "consume({n}) beyond buffered bytes");
        self.cursor += n;
        self.offset += n as u64;
        self.compact();
    }

    /// Copy out `n` bytes at the cursor and consume them.
    pub fn take(&mut self, n: usize) -> Vec<u8> {
        let bytes = self.peek(n).to_vec();
        self.consume(n);
        bytes
    }

    /// Pull one non-empty chunk from the source. Returns false once the
    /// source is exhausted. Empty chunks are legal and skipped.
    async fn pull(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        loop {
            match self.source.next_chunk().await? {
                Some(chunk) if chunk.is_empty() => continue,
                Some(chunk) => {
                    self.buf.extend_from_slice(&chunk);
                    return Ok(true);
                }
                None => {
                    self.exhausted = true;
                    return Ok(false);
                }
            }
        }
    }

    /// Drop the consumed prefix. Deferring until the prefix dominates the
    /// buffer keeps the total bytes moved linear in the stream length.
    fn compact(&mut self) {
        if self.cursor == self.buf.len() {
            self.buf.clear();
            self.cursor = 0;
        } else if self.cursor >= COMPACT_MIN && self.cursor * 2 >= self.buf.len() {
            self.buf.drain(..self.cursor);
            self.cursor = 0;
        }
    }
}
