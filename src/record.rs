//! Record types and control-record payload parsing.

use crate::error::{Error, Result};
use crate::wire;

/// Control record subtype tag: declare a new entry.
pub const CONTROL_START: u8 = 0;
/// Control record subtype tag: mark an entry finished.
pub const CONTROL_FINISH: u8 = 1;
/// Control record subtype tag: replace an entry's metadata.
pub const CONTROL_SET_METADATA: u8 = 2;

/// A single decoded record.
///
/// Control records carry their decoded form; data records carry the raw
/// payload bytes. Interpreting a data payload (as a double, string array,
/// struct, ...) is the caller's business, keyed off the entry's declared
/// type string.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Entry the record belongs to. Zero for control records; the target
    /// entry of a control record lives inside [`ControlData`] instead.
    pub entry_id: u32,
    /// Microsecond timestamp recorded by the writer.
    pub timestamp: i64,
    pub body: RecordBody,
}

impl Record {
    pub fn is_control(&self) -> bool {
        matches!(self.body, RecordBody::Control(_))
    }

    /// Payload bytes for a data record, `None` for control records.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.body {
            RecordBody::Data(payload) => Some(payload),
            RecordBody::Control(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    /// Raw payload bytes of a data record.
    Data(Vec<u8>),
    /// A decoded control record.
    Control(ControlData),
}

/// The decoded payload of a control record (entry id 0 on the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlData {
    /// Declares an entry: its id, name, type string, and initial metadata.
    Start {
        entry: u32,
        name: String,
        type_name: String,
        metadata: String,
    },
    /// Marks an entry finished; the entry and its records stay queryable.
    Finish { entry: u32 },
    /// Replaces an entry's metadata string.
    SetMetadata { entry: u32, metadata: String },
}

impl ControlData {
    /// The entry the control record targets.
    pub fn entry(&self) -> u32 {
        match *self {
            ControlData::Start { entry, .. } => entry,
            ControlData::Finish { entry } => entry,
            ControlData::SetMetadata { entry, .. } => entry,
        }
    }

    /// Parse a control record payload.
    ///
    /// `offset` is the stream position of the record start, used only for
    /// error reporting. Strings inside control records must be valid UTF-8;
    /// unlike the header extra string they name entries and types, so a
    /// lossy decode would corrupt lookups silently.
    pub(crate) fn parse(payload: &[u8], offset: u64) -> Result<Self> {
        let mut cursor = PayloadCursor {
            payload,
            pos: 0,
            offset,
        };
        let tag = cursor.u8("control type tag")?;
        let control = match tag {
            CONTROL_START => {
                let entry = cursor.u32("start entry id")?;
                let name = cursor.string("entry name")?;
                let type_name = cursor.string("entry type")?;
                let metadata = cursor.string("entry metadata")?;
                ControlData::Start {
                    entry,
                    name,
                    type_name,
                    metadata,
                }
            }
            CONTROL_FINISH => ControlData::Finish {
                entry: cursor.u32("finish entry id")?,
            },
            CONTROL_SET_METADATA => {
                let entry = cursor.u32("set-metadata entry id")?;
                let metadata = cursor.string("entry metadata")?;
                ControlData::SetMetadata { entry, metadata }
            }
            tag => return Err(Error::UnknownControlType { tag, offset }),
        };
        Ok(control)
    }
}

/// Bounds-checked reader over one control payload.
struct PayloadCursor<'a> {
    payload: &'a [u8],
    pos: usize,
    offset: u64,
}

impl<'a> PayloadCursor<'a> {
    fn need(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let remaining = self.payload.len() - self.pos;
        if remaining < n {
            return Err(Error::MalformedControl {
                offset: self.offset,
                reason: format!("{what} needs {n} bytes, {remaining} remaining"),
            });
        }
        let bytes = &self.payload[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.need(1, what)?[0])
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        Ok(wire::read_u32(self.need(4, what)?))
    }

    /// A 4-byte little-endian length followed by that many UTF-8 bytes.
    fn string(&mut self, what: &str) -> Result<String> {
        let len = self.u32(what)? as usize;
        let bytes = self.need(len, what)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_string(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    #[test]
    fn parses_start() {
        let mut payload = vec![CONTROL_START];
        payload.extend_from_slice(&7u32.to_le_bytes());
        with_string(&mut payload, "/drive/speed");
        with_string(&mut payload, "double");
        with_string(&mut payload, "{}");

        let control = ControlData::parse(&payload, 0).unwrap();
        assert_eq!(
            control,
            ControlData::Start {
                entry: 7,
                name: "/drive/speed".into(),
                type_name: "double".into(),
                metadata: "{}".into(),
            }
        );
        assert_eq!(control.entry(), 7);
    }

    #[test]
    fn parses_finish_and_set_metadata() {
        let mut payload = vec![CONTROL_FINISH];
        payload.extend_from_slice(&3u32.to_le_bytes());
        assert_eq!(
            ControlData::parse(&payload, 0).unwrap(),
            ControlData::Finish { entry: 3 }
        );

        let mut payload = vec![CONTROL_SET_METADATA];
        payload.extend_from_slice(&3u32.to_le_bytes());
        with_string(&mut payload, "{\"source\":\"NT\"}");
        assert_eq!(
            ControlData::parse(&payload, 0).unwrap(),
            ControlData::SetMetadata {
                entry: 3,
                metadata: "{\"source\":\"NT\"}".into(),
            }
        );
    }

    #[test]
    fn rejects_unknown_tag() {
        let payload = [3u8, 0, 0, 0, 0];
        assert!(matches!(
            ControlData::parse(&payload, 40),
            Err(Error::UnknownControlType { tag: 3, offset: 40 })
        ));
    }

    #[test]
    fn truncated_string_is_malformed() {
        // Start record whose name claims 100 bytes but provides 3.
        let mut payload = vec![CONTROL_START];
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.extend_from_slice(&100u32.to_le_bytes());
        payload.extend_from_slice(b"abc");

        match ControlData::parse(&payload, 12) {
            Err(Error::MalformedControl { offset: 12, reason }) => {
                assert!(reason.contains("entry name"), "reason: {reason}");
            }
            other => panic!("expected MalformedControl, got {other:?}"),
        }
    }

    #[test]
    fn control_strings_must_be_utf8() {
        let mut payload = vec![CONTROL_START];
        payload.extend_from_slice(&1u32.to_le_bytes());
        payload.extend_from_slice(&2u32.to_le_bytes());
        payload.extend_from_slice(&[0xff, 0xfe]);
        with_string(&mut payload, "double");
        with_string(&mut payload, "");

        assert!(matches!(
            ControlData::parse(&payload, 0),
            Err(Error::Utf8(_))
        ));
    }

    #[test]
    fn empty_payload_is_malformed() {
        assert!(matches!(
            ControlData::parse(&[], 0),
            Err(Error::MalformedControl { .. })
        ));
    }
}
