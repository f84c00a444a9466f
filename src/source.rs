//! Byte sources feeding the incremental buffer.
//!
//! A [`ByteSource`] is anything that can supply ordered chunks of bytes on
//! demand: an in-memory buffer, a file, a socket, a channel fed by another
//! task. The parser never touches I/O directly; it only pulls chunks
//! through this trait, so fragmentation and delivery timing are entirely
//! the source's business.

use std::collections::VecDeque;
use std::io;

#[cfg(feature = "tokio-io")]
use std::path::Path;

#[cfg(feature = "tokio-io")]
use tokio::io::{AsyncRead, AsyncReadExt};
#[cfg(feature = "tokio-io")]
use tokio::sync::mpsc;

/// Default read size for chunked sources, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// An asynchronous, ordered, finite supply of byte chunks.
///
/// `next_chunk` yields `Ok(Some(chunk))` while bytes remain, `Ok(None)`
/// once the source is cleanly exhausted, and `Err` if the underlying
/// transport fails. Exhaustion and failure are deliberately distinct: the
/// parser treats the former as a potential record boundary and the latter
/// as fatal.
///
/// Chunks may be any size, including empty; parse results never depend on
/// how the stream happens to be fragmented.
#[allow(async_fn_in_trait)]
pub trait ByteSource {
    /// Pull the next chunk, or `None` when the source is exhausted.
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// A byte source over a fixed sequence of in-memory chunks.
///
/// The workhorse for tests (scripted fragmentation) and for feeding an
/// already-loaded log in one piece.
#[derive(Debug, Default)]
pub struct ChunkSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ChunkSource {
    /// A source yielding the given chunks in order.
    pub fn new(chunks: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().collect(),
        }
    }

    /// A source yielding all of `bytes` as a single chunk.
    pub fn contiguous(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new([bytes.into()])
    }

    /// A source yielding `bytes` split into chunks of at most `size` bytes.
    pub fn fragmented(bytes: &[u8], size: usize) -> Self {
        assert!(size > 0, "chunk size must be nonzero");
        Self::new(bytes.chunks(size).map(<[u8]>::to_vec))
    }
}

impl ByteSource for ChunkSource {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.chunks.pop_front())
    }
}

/// Adapts any [`AsyncRead`] into a [`ByteSource`], reading up to a fixed
/// number of bytes per chunk.
///
/// This is the bridge to files, pipes and sockets. A read of zero bytes is
/// reported as clean exhaustion.
#[cfg(feature = "tokio-io")]
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

#[cfg(feature = "tokio-io")]
impl<R: AsyncRead + Unpin> ReaderSource<R> {
    /// Wrap a reader with the default chunk size.
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Wrap a reader, pulling at most `chunk_size` bytes per read.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be nonzero");
        Self { reader, chunk_size }
    }
}

#[cfg(feature = "tokio-io")]
impl ReaderSource<tokio::fs::File> {
    /// Open a file for streaming with the default chunk size.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(tokio::fs::File::open(path).await?))
    }
}

#[cfg(feature = "tokio-io")]
impl<R: AsyncRead + Unpin> ByteSource for ReaderSource<R> {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut chunk = vec![0; self.chunk_size];
        let n = self.reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        chunk.truncate(n);
        Ok(Some(chunk))
    }
}

/// A byte source fed through an [`mpsc`] channel by another task.
///
/// Suits network-style producers: the channel capacity applies
/// backpressure, and dropping the sender ends the stream. A sender dropped
/// mid-record therefore surfaces as truncation in the parser, never as a
/// hang.
#[cfg(feature = "tokio-io")]
pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

#[cfg(feature = "tokio-io")]
impl ChannelSource {
    /// A channel-backed source buffering up to `capacity` in-flight chunks.
    pub fn new(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

#[cfg(feature = "tokio-io")]
impl ByteSource for ChannelSource {
    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.rx.recv().await)
    }
}
