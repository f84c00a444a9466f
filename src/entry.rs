//! Entry state built up from control records.

use std::collections::HashMap;

use crate::record::{ControlData, Record};

/// A declared entry and everything known about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: u32,
    /// Slash-separated path, e.g. `/drive/left/speed`.
    pub name: String,
    /// Declared payload type, e.g. `double` or `string[]`.
    pub type_name: String,
    /// Free-form metadata, usually JSON.
    pub metadata: String,
    /// Whether a finish control record was seen for this id.
    pub finished: bool,
    /// Data records collected for this entry, in stream order. Only filled
    /// by the collected interface; streaming never accumulates here.
    pub records: Vec<Record>,
}

/// Live entry state keyed by id, updated as control records arrive.
#[derive(Debug, Default, Clone)]
pub struct EntryTable {
    entries: HashMap<u32, Entry>,
}

impl EntryTable {
    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: u32) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Apply a control record to the table.
    ///
    /// A repeated start for a known id replaces the descriptor in place and
    /// clears the finished flag, keeping records already collected under
    /// that id. Finish and set-metadata for an unknown id are logged and
    /// skipped rather than failing the whole parse.
    pub(crate) fn apply(&mut self, control: &ControlData) {
        match control {
            ControlData::Start {
                entry,
                name,
                type_name,
                metadata,
            } => {
                let slot = self.entries.entry(*entry).or_insert_with(|| Entry {
                    id: *entry,
                    name: String::new(),
                    type_name: String::new(),
                    metadata: String::new(),
                    finished: false,
                    records: Vec::new(),
                });
                slot.name = name.clone();
                slot.type_name = type_name.clone();
                slot.metadata = metadata.clone();
                slot.finished = false;
            }
            ControlData::Finish { entry } => match self.entries.get_mut(entry) {
                Some(slot) => slot.finished = true,
                None => log::warn!("finish for undeclared entry {entry}, ignoring"),
            },
            ControlData::SetMetadata { entry, metadata } => match self.entries.get_mut(entry) {
                Some(slot) => slot.metadata = metadata.clone(),
                None => log::warn!("set-metadata for undeclared entry {entry}, ignoring"),
            },
        }
    }

    /// Attach a data record to its entry. Used by the collected interface.
    pub(crate) fn append(&mut self, record: Record) {
        if let Some(slot) = self.entries.get_mut(&record.entry_id) {
            slot.records.push(record);
        }
    }

    pub(crate) fn into_entries(self) -> HashMap<u32, Entry> {
        self.entries
    }
}
