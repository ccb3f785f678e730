use crate::ir::WarningRecord;
use std::collections::HashSet;

/// Keeps the first occurrence of every distinct record.
///
/// Records are compared on all of their fields. The collector never reorders:
/// callers see admitted records in the order they were offered.
#[derive(Debug, Default)]
pub struct Collector {
    seen: HashSet<WarningRecord>,
    duplicates: usize,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a record. Returns it back if this is its first occurrence.
    pub fn admit(&mut self, record: WarningRecord) -> Option<WarningRecord> {
        if self.seen.insert(record.clone()) {
            return Some(record);
        }
        self.duplicates += 1;
        log::debug!(
            "dropping duplicate warning {}:{} {}",
            record.file_path,
            record.line_number,
            record.message
        );
        None
    }

    /// Number of distinct records admitted so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
