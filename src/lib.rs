//! # WPILOG Streaming Parser
//!
//! An incremental Rust parser for WPILib data log files (`.wpilog`) that
//! works over any chunked byte stream: files, sockets, channels, or
//! in-memory buffers.
//!
//! ## Features
//!
//! - **Streaming**: records are decoded one at a time as bytes arrive;
//!   memory stays bounded by the largest single record, not the log size
//! - **Source-agnostic**: parse results never depend on how the input is
//!   fragmented into chunks
//! - **Entry tracking**: `start`/`finish`/`set_metadata` control records
//!   maintain a live entry table alongside the record stream
//! - **Strict validation**: magic, version, field widths, and control
//!   record structure are all checked, with byte offsets in every error
//! - **Raw payloads**: data record payloads are handed over untouched,
//!   with little-endian helpers in [`wire`] for decoding them
//!
//! ## Quick Start
//!
//! Collect a whole log into entries and their records:
//!
//! ```no_run
//! use wpilog_stream::{read_log, ReaderSource};
//!
//! # async fn demo() -> wpilog_stream::Result<()> {
//! let source = ReaderSource::open("data.wpilog").await?;
//! let log = read_log(source).await?;
//!
//! println!("version {}.{}", log.header.major(), log.header.minor());
//! for entry in log.entries.values() {
//!     println!("{}: {} records of {}", entry.name, entry.records.len(), entry.type_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming
//!
//! For logs too large to hold, or logs still being written, pull records
//! incrementally. The reader suspends whenever the source has no bytes
//! ready and resumes exactly where it left off:
//!
//! ```no_run
//! use wpilog_stream::{LogReader, ReaderSource};
//!
//! # async fn demo() -> wpilog_stream::Result<()> {
//! let source = ReaderSource::open("data.wpilog").await?;
//! let mut reader = LogReader::new(source).await?;
//!
//! while let Some(record) = reader.next_record().await? {
//!     if let Some(payload) = record.data() {
//!         // Look up the entry's declared type to interpret the payload.
//!         let entry = reader.entries().get(record.entry_id);
//!         let _ = (entry, payload);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Byte Sources
//!
//! Input arrives through the [`ByteSource`] trait. Three implementations
//! ship with the crate:
//!
//! - [`ChunkSource`]: fixed in-memory chunks, for tests and preloaded data
//! - [`ReaderSource`]: any [`tokio::io::AsyncRead`], including files
//! - [`ChannelSource`]: chunks fed through an mpsc channel by another task
//!
//! Implementing the trait yourself takes one method; see the `ByteSource`
//! docs.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, Error>`. A clean end of input between
//! records ends the stream with `Ok(None)`; everything else that stops the
//! parse is an error carrying the offset where it happened:
//!
//! ```no_run
//! use wpilog_stream::{read_log_bytes, Error};
//!
//! # async fn demo(bytes: Vec<u8>) {
//! match read_log_bytes(bytes).await {
//!     Ok(log) => println!("{} entries", log.entries.len()),
//!     Err(Error::BadMagic { found }) => eprintln!("not a WPILOG file: {found:?}"),
//!     Err(Error::UnexpectedEof { offset, .. }) => eprintln!("truncated at byte {offset}"),
//!     Err(err) => eprintln!("parse failed: {err}"),
//! }
//! # }
//! ```

// Public API modules
pub mod buffer;
pub mod entry;
pub mod error;
pub mod header;
pub mod reader;
pub mod record;
pub mod source;
pub mod wire;

// Re-export commonly used types
pub use buffer::ChunkBuffer;
pub use entry::{Entry, EntryTable};
pub use error::{Error, Result};
pub use header::{Header, MAGIC, SUPPORTED_VERSION};
pub use reader::{read_log, read_log_bytes, LogReader, WpiLog};
pub use record::{ControlData, Record, RecordBody};
pub use source::{ByteSource, ChunkSource, DEFAULT_CHUNK_SIZE};

#[cfg(feature = "tokio-io")]
pub use source::{ChannelSource, ReaderSource};
