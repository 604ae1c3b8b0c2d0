//! Latest device snapshot, replaced wholesale on every successful poll

use std::collections::HashMap;

use crate::device::{DeviceId, DeviceRecord};

/// Holds the last received list of records in received order
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    records: Vec<DeviceRecord>,
    index: HashMap<DeviceId, usize>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new snapshot. No record is merged with the previous one.
    pub fn replace(&mut self, records: Vec<DeviceRecord>) {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            // First occurrence wins if the backend ever repeats an id
            index.entry(record.ac_id.clone()).or_insert(i);
        }
        self.records = records;
        self.index = index;
    }

    pub fn get(&self, id: &DeviceId) -> Option<&DeviceRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &DeviceId) -> bool {
        self.index.contains_key(id)
    }

    /// Records in the order the backend sent them
    pub fn all(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
