//! Error types for the WPILOG streaming decoder.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Result type alias for WPILOG parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a WPILOG stream.
///
/// Every variant aborts the parse: the format has no record-level
/// resynchronization, so after a structural error the remaining bytes
/// cannot be trusted to align to a record boundary. The only tolerated
/// irregularities are `finish` or `set_metadata` aimed at an entry id that
/// was never started; those are logged and skipped internally and never
/// reach the caller as errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream does not begin with the ASCII magic `"WPILOG"`.
    #[error("bad magic: expected \"WPILOG\", found {found:?}")]
    BadMagic {
        /// The six bytes actually found at the start of the stream.
        found: [u8; 6],
    },

    /// The header declares a format version other than 1.0.
    #[error("unsupported WPILOG version {major}.{minor}, only 1.0 is supported")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// The byte source ran out in the middle of a field.
    ///
    /// A clean end of stream at a record boundary is not an error; this
    /// variant always means truncation.
    #[error(
        "unexpected end of stream at offset {offset}: needed {expected} bytes, {available} available"
    )]
    UnexpectedEof {
        offset: u64,
        expected: usize,
        available: usize,
    },

    /// A variable-width integer was requested with an unsupported width.
    #[error("invalid field width {width}, expected 1..={max} bytes")]
    InvalidFieldWidth { width: usize, max: usize },

    /// A data record referenced an entry id never introduced by a `start`
    /// control record.
    #[error("record at offset {offset} references unknown entry id {entry}")]
    UnknownEntry { entry: u32, offset: u64 },

    /// A control record carried an unrecognized subtype tag.
    #[error("unknown control record type {tag} at offset {offset}")]
    UnknownControlType { tag: u8, offset: u64 },

    /// A control record payload ended before its declared fields did.
    #[error("malformed control record at offset {offset}: {reason}")]
    MalformedControl { offset: u64, reason: String },

    /// A length-prefixed string in a control record was not valid UTF-8.
    #[error("invalid UTF-8 in control record string")]
    Utf8(#[from] FromUtf8Error),

    /// The underlying byte source failed.
    #[error("byte source error: {0}")]
    Source(#[from] std::io::Error),
}
