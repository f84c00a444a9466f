//! Streaming record reader and the collected-log convenience API.

use std::collections::HashMap;

use crate::buffer::ChunkBuffer;
use crate::entry::{Entry, EntryTable};
use crate::error::{Error, Result};
use crate::header::{self, Header};
use crate::record::{ControlData, Record, RecordBody};
use crate::source::{ByteSource, ChunkSource};
use crate::wire::{self, Bitfield};

/// A fully parsed log: the header plus every declared entry with its
/// collected data records.
#[derive(Debug, PartialEq)]
pub struct WpiLog {
    pub header: Header,
    pub entries: HashMap<u32, Entry>,
}

impl WpiLog {
    pub fn entry(&self, id: u32) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub fn entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.values().find(|entry| entry.name == name)
    }

    /// Total data records across all entries.
    pub fn record_count(&self) -> usize {
        self.entries.values().map(|entry| entry.records.len()).sum()
    }
}

/// Incremental log reader.
///
/// Pulls chunks from a [`ByteSource`] on demand and yields one record per
/// [`next_record`](Self::next_record) call. Memory stays bounded by the
/// largest single record regardless of log size; nothing already yielded is
/// retained. The entry table is maintained internally so data records can
/// be validated against declared ids as they arrive.
pub struct LogReader<S> {
    buf: ChunkBuffer<S>,
    header: Header,
    table: EntryTable,
}

impl<S: ByteSource> LogReader<S> {
    /// Open a reader over a source, eagerly reading and validating the
    /// header so construction fails on a non-WPILOG input.
    pub async fn new(source: S) -> Result<Self> {
        let mut buf = ChunkBuffer::new(source);
        let header = header::read_header(&mut buf).await?;
        log::debug!(
            "read header: version {}.{}, {} bytes extra",
            header.major(),
            header.minor(),
            header.extra.len()
        );
        Ok(Self {
            buf,
            header,
            table: EntryTable::default(),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Entry state as of the records yielded so far.
    pub fn entries(&self) -> &EntryTable {
        &self.table
    }

    /// Bytes buffered but not yet parsed.
    pub fn buffered(&self) -> usize {
        self.buf.buffered()
    }

    /// Decode the next record, or `None` at a clean end of stream.
    ///
    /// End of input between records is the normal termination; end of input
    /// inside a record is a truncation error. Control records are applied
    /// to the entry table before being yielded, so the table already
    /// reflects a start record by the time the caller sees it.
    pub async fn next_record(&mut self) -> Result<Option<Record>> {
        if self.buf.at_end().await? {
            return Ok(None);
        }
        let start = self.buf.offset();

        self.buf.ensure(1).await?;
        let bitfield = Bitfield::new(self.buf.peek(1)[0]);
        self.buf.consume(1);

        self.buf.ensure(bitfield.header_len()).await?;
        let fields = self.buf.peek(bitfield.header_len());
        let (id_bytes, rest) = fields.split_at(bitfield.entry_id_len());
        let (size_bytes, ts_bytes) = rest.split_at(bitfield.payload_size_len());
        let entry_id = wire::read_uint_var(id_bytes)?;
        let payload_size = wire::read_uint_var(size_bytes)? as usize;
        let timestamp = wire::read_ulong_var(ts_bytes)? as i64;
        self.buf.consume(bitfield.header_len());

        self.buf.ensure(payload_size).await?;
        let payload = self.buf.take(payload_size);

        let body = if entry_id == 0 {
            let control = ControlData::parse(&payload, start)?;
            self.table.apply(&control);
            RecordBody::Control(control)
        } else {
            if !self.table.contains(entry_id) {
                return Err(Error::UnknownEntry {
                    entry: entry_id,
                    offset: start,
                });
            }
            RecordBody::Data(payload)
        };

        Ok(Some(Record {
            entry_id,
            timestamp,
            body,
        }))
    }

    /// Drain the remaining records and return the collected log.
    ///
    /// Data records are attached to their entries; control records shape
    /// the entry table but are not kept as records themselves.
    pub async fn into_log(mut self) -> Result<WpiLog> {
        let mut data_records = 0usize;
        while let Some(record) = self.next_record().await? {
            if !record.is_control() {
                data_records += 1;
                self.table.append(record);
            }
        }
        log::debug!(
            "collected {} entries, {} data records",
            self.table.len(),
            data_records
        );
        Ok(WpiLog {
            header: self.header,
            entries: self.table.into_entries(),
        })
    }
}

/// Read an entire log from a source into a [`WpiLog`].
pub async fn read_log<S: ByteSource>(source: S) -> Result<WpiLog> {
    LogReader::new(source).await?.into_log().await
}

/// Read an entire log already held in memory.
pub async fn read_log_bytes(bytes: impl Into<Vec<u8>>) -> Result<WpiLog> {
    read_log(ChunkSource::contiguous(bytes.into())).await
}
