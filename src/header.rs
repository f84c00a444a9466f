//! File header parsing and validation.

use serde::Serialize;

use crate::buffer::ChunkBuffer;
use crate::error::{Error, Result};
use crate::source::ByteSource;
use crate::wire;

/// The six magic bytes every log file starts with.
pub const MAGIC: &[u8; 6] = b"WPILOG";

/// The only format version this crate understands, major 1 minor 0.
pub const SUPPORTED_VERSION: u16 = 0x0100;

/// Bytes of header before the variable-length extra string begins.
pub(crate) const FIXED_HEADER_LEN: usize = 12;

/// The validated file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Format version, major in the high byte and minor in the low byte.
    pub version: u16,
    /// Free-form metadata string recorded by the writer, often empty.
    pub extra: String,
}

impl Header {
    /// Major version number.
    pub fn major(&self) -> u8 {
        (self.version >> 8) as u8
    }

    /// Minor version number.
    pub fn minor(&self) -> u8 {
        (self.version & 0xff) as u8
    }
}

/// Read and validate the header at the start of the stream.
///
/// Magic and version are checked before the extra string length is trusted,
/// so a non-WPILOG input fails with [`Error::BadMagic`] instead of a bogus
/// read. The extra string is decoded lossily; invalid UTF-8 there is not
/// worth rejecting an otherwise readable log over.
pub(crate) async fn read_header<S: ByteSource>(buf: &mut ChunkBuffer<S>) -> Result<Header> {
    buf.ensure(FIXED_HEADER_LEN).await?;
    let fixed = buf.peek(FIXED_HEADER_LEN);

    if &fixed[..MAGIC.len()] != MAGIC {
        let mut found = [0u8; 6];
        found.copy_from_slice(&fixed[..MAGIC.len()]);
        return Err(Error::BadMagic { found });
    }

    let version = wire::read_u16(&fixed[6..8]);
    if version != SUPPORTED_VERSION {
        return Err(Error::UnsupportedVersion {
            major: (version >> 8) as u8,
            minor: (version & 0xff) as u8,
        });
    }

    let extra_len = wire::read_u32(&fixed[8..12]) as usize;
    buf.consume(FIXED_HEADER_LEN);

    buf.ensure(extra_len).await?;
    let extra_bytes = buf.take(extra_len);
    let extra = String::from_utf8(extra_bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());

    Ok(Header { version, extra })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChunkSource;

    fn header_bytes(magic: &[u8], version: u16, extra: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(magic);
        out.extend_from_slice(&version.to_le_bytes());
        out.extend_from_slice(&(extra.len() as u32).to_le_bytes());
        out.extend_from_slice(extra);
        out
    }

    #[tokio::test]
    async fn version_split_into_major_minor() {
        let bytes = header_bytes(MAGIC, SUPPORTED_VERSION, b"");
        let mut buf = ChunkBuffer::new(ChunkSource::contiguous(bytes));
        let header = read_header(&mut buf).await.unwrap();
        assert_eq!(header.major(), 1);
        assert_eq!(header.minor(), 0);
    }

    #[tokio::test]
    async fn bad_magic_reports_found_bytes() {
        let bytes = header_bytes(b"WPILOX", SUPPORTED_VERSION, b"");
        let mut buf = ChunkBuffer::new(ChunkSource::contiguous(bytes));
        match read_header(&mut buf).await {
            Err(Error::BadMagic { found }) => assert_eq!(&found, b"WPILOX"),
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extra_is_lossy_on_invalid_utf8() {
        let bytes = header_bytes(MAGIC, SUPPORTED_VERSION, &[0x61, 0xff, 0x62]);
        let mut buf = ChunkBuffer::new(ChunkSource::contiguous(bytes));
        let header = read_header(&mut buf).await.unwrap();
        assert_eq!(header.extra, "a\u{fffd}b");
    }
}
