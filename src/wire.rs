//! Little-endian primitive decoding for WPILOG fields.
//!
//! Everything here is stateless and operates on plain byte slices; the
//! incremental buffer decides when enough bytes are available to call in.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// The framing bitfield: first byte of every record.
///
/// Three width selectors are packed into one byte: bits 0-1 select the
/// entry-id width, bits 2-3 the payload-size width, bits 4-6 the timestamp
/// width. A stored selector value `w` denotes `w + 1` bytes on the wire,
/// so every framed field is at least one byte wide and no selector value
/// is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitfield(u8);

impl Bitfield {
    pub fn new(byte: u8) -> Self {
        Self(byte)
    }

    /// Entry-id field width in bytes (1..=4).
    pub fn entry_id_len(self) -> usize {
        (self.0 & 0x3) as usize + 1
    }

    /// Payload-size field width in bytes (1..=4).
    pub fn payload_size_len(self) -> usize {
        ((self.0 >> 2) & 0x3) as usize + 1
    }

    /// Timestamp field width in bytes (1..=8).
    pub fn timestamp_len(self) -> usize {
        ((self.0 >> 4) & 0x7) as usize + 1
    }

    /// Total width of the variable record header following the bitfield.
    pub fn header_len(self) -> usize {
        self.entry_id_len() + self.payload_size_len() + self.timestamp_len()
    }
}

/// Decode a 1-4 byte little-endian unsigned integer, the encoding used for
/// entry ids and payload sizes.
///
/// The width is the slice length; the 3-byte case packs as
/// `b0 | b1 << 8 | b2 << 16` with no sign extension. Any other width is an
/// [`Error::InvalidFieldWidth`].
pub fn read_uint_var(buf: &[u8]) -> Result<u32> {
    match buf.len() {
        1 => Ok(u32::from(buf[0])),
        2 => Ok(u32::from(LittleEndian::read_u16(buf))),
        3 => Ok(LittleEndian::read_u24(buf)),
        4 => Ok(LittleEndian::read_u32(buf)),
        width => Err(Error::InvalidFieldWidth { width, max: 4 }),
    }
}

/// Decode a 1-8 byte little-endian unsigned integer, the encoding used for
/// timestamps.
///
/// The full 64-bit range is preserved: the timestamp selector can demand
/// up to 8 bytes, and values above 2^53 must not lose precision.
pub fn read_ulong_var(buf: &[u8]) -> Result<u64> {
    match buf.len() {
        1..=8 => Ok(LittleEndian::read_uint(buf, buf.len())),
        width => Err(Error::InvalidFieldWidth { width, max: 8 }),
    }
}

/// Read a fixed-width little-endian `u16`.
pub fn read_u16(buf: &[u8]) -> u16 {
    LittleEndian::read_u16(buf)
}

/// Read a fixed-width little-endian `u32`.
pub fn read_u32(buf: &[u8]) -> u32 {
    LittleEndian::read_u32(buf)
}

/// Read a fixed-width little-endian `i64`.
pub fn read_i64(buf: &[u8]) -> i64 {
    LittleEndian::read_i64(buf)
}

/// Read a little-endian `f32`.
pub fn read_f32(buf: &[u8]) -> f32 {
    LittleEndian::read_f32(buf)
}

/// Read a little-endian `f64`.
pub fn read_f64(buf: &[u8]) -> f64 {
    LittleEndian::read_f64(buf)
}
