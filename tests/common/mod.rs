/// Test utilities for building WPILOG byte streams
use byteorder::{LittleEndian, WriteBytesExt};

/// Builder producing wire-format WPILOG bytes for tests
pub struct LogBuilder {
    data: Vec<u8>,
}

impl LogBuilder {
    /// Create a builder with the default header (version 1.0, no extra string)
    pub fn new() -> Self {
        Self::with_header(0x0100, "")
    }

    /// Create a builder with a specific version and extra header string
    pub fn with_header(version: u16, extra: &str) -> Self {
        let mut data = Vec::new();
        data.extend_from_slice(b"WPILOG");
        data.write_u16::<LittleEndian>(version).unwrap();
        data.write_u32::<LittleEndian>(extra.len() as u32).unwrap();
        data.extend_from_slice(extra.as_bytes());
        Self { data }
    }

    /// Add a start control record declaring an entry
    pub fn start_record(
        mut self,
        timestamp: u64,
        entry_id: u32,
        name: &str,
        type_name: &str,
        metadata: &str,
    ) -> Self {
        let mut payload = vec![0u8];
        payload.write_u32::<LittleEndian>(entry_id).unwrap();
        Self::write_string(&mut payload, name);
        Self::write_string(&mut payload, type_name);
        Self::write_string(&mut payload, metadata);
        self.write_record(0, timestamp, &payload);
        self
    }

    /// Add a finish control record
    pub fn finish_record(mut self, timestamp: u64, entry_id: u32) -> Self {
        let mut payload = vec![1u8];
        payload.write_u32::<LittleEndian>(entry_id).unwrap();
        self.write_record(0, timestamp, &payload);
        self
    }

    /// Add a set-metadata control record
    pub fn set_metadata_record(mut self, timestamp: u64, entry_id: u32, metadata: &str) -> Self {
        let mut payload = vec![2u8];
        payload.write_u32::<LittleEndian>(entry_id).unwrap();
        Self::write_string(&mut payload, metadata);
        self.write_record(0, timestamp, &payload);
        self
    }

    /// Add a control record with an arbitrary payload, bypassing the
    /// structured encoders above
    pub fn control_record(mut self, timestamp: u64, payload: &[u8]) -> Self {
        self.write_record(0, timestamp, payload);
        self
    }

    /// Add a data record with a raw payload
    pub fn data_record(mut self, entry_id: u32, timestamp: u64, payload: &[u8]) -> Self {
        self.write_record(entry_id, timestamp, payload);
        self
    }

    /// Add a data record with forced field widths instead of minimal ones
    pub fn data_record_with_widths(
        mut self,
        entry_id: u32,
        timestamp: u64,
        payload: &[u8],
        id_width: usize,
        size_width: usize,
        ts_width: usize,
    ) -> Self {
        assert!((1..=4).contains(&id_width));
        assert!((1..=4).contains(&size_width));
        assert!((1..=8).contains(&ts_width));
        self.write_framed(entry_id, timestamp, payload, id_width, size_width, ts_width);
        self
    }

    /// Write a record with minimal field widths
    fn write_record(&mut self, entry_id: u32, timestamp: u64, payload: &[u8]) {
        let id_width = Self::min_width(u64::from(entry_id));
        let size_width = Self::min_width(payload.len() as u64);
        let ts_width = Self::min_width(timestamp);
        self.write_framed(entry_id, timestamp, payload, id_width, size_width, ts_width);
    }

    fn write_framed(
        &mut self,
        entry_id: u32,
        timestamp: u64,
        payload: &[u8],
        id_width: usize,
        size_width: usize,
        ts_width: usize,
    ) {
        let bitfield =
            ((id_width - 1) | ((size_width - 1) << 2) | ((ts_width - 1) << 4)) as u8;
        self.data.push(bitfield);
        Self::put_le(&mut self.data, u64::from(entry_id), id_width);
        Self::put_le(&mut self.data, payload.len() as u64, size_width);
        Self::put_le(&mut self.data, timestamp, ts_width);
        self.data.extend_from_slice(payload);
    }

    /// Minimum bytes needed to represent a value, at least one
    fn min_width(value: u64) -> usize {
        let width = (u64::BITS - value.leading_zeros()).div_ceil(8) as usize;
        width.max(1)
    }

    /// Append the low `width` bytes of `value`, little endian
    fn put_le(data: &mut Vec<u8>, value: u64, width: usize) {
        data.extend_from_slice(&value.to_le_bytes()[..width]);
    }

    /// Append a 4-byte length-prefixed UTF-8 string
    fn write_string(data: &mut Vec<u8>, s: &str) {
        data.write_u32::<LittleEndian>(s.len() as u32).unwrap();
        data.extend_from_slice(s.as_bytes());
    }

    /// Build and return the final byte stream
    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creates_valid_header() {
        let data = LogBuilder::new().build();
        assert_eq!(&data[0..6], b"WPILOG");
        assert_eq!(data[6], 0x00); // Minor version
        assert_eq!(data[7], 0x01); // Major version
        assert_eq!(data[8..12], [0, 0, 0, 0]); // Extra header length = 0
    }

    #[test]
    fn test_builder_with_extra_header() {
        let data = LogBuilder::with_header(0x0100, "test").build();
        assert_eq!(data[8], 4); // Extra header length
        assert_eq!(&data[12..16], b"test");
    }

    #[test]
    fn test_min_width() {
        assert_eq!(LogBuilder::min_width(0), 1);
        assert_eq!(LogBuilder::min_width(255), 1);
        assert_eq!(LogBuilder::min_width(256), 2);
        assert_eq!(LogBuilder::min_width(0xFFFF), 2);
        assert_eq!(LogBuilder::min_width(0x10000), 3);
        assert_eq!(LogBuilder::min_width(0xFFFF_FFFF), 4);
        assert_eq!(LogBuilder::min_width(0x1_0000_0000), 5);
        assert_eq!(LogBuilder::min_width(u64::MAX), 8);
    }

    #[test]
    fn test_minimal_record_framing() {
        let data = LogBuilder::new().data_record(1, 2, &[0xaa]).build();
        // After the 12-byte header: bitfield, id, size, timestamp, payload.
        assert_eq!(&data[12..], &[0x00, 0x01, 0x01, 0x02, 0xaa]);
    }
}
