use super::RecencyRecord;
use crate::error::{ErrorKind, Result};
use std::collections::HashSet;

/// Persisted column names, in order: key, date, version.
pub const COLUMNS: [&str; 3] = ["json_type", "latest_date", "latest_version"];

/// An ordered batch of recency records, one per dataset family.
///
/// The extractor hands back single-row batches; callers concatenate them
/// (`extend`, `collect`) and upsert the result in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecencyBatch {
    records: Vec<RecencyRecord>,
}

impl RecencyBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: RecencyRecord) {
        self.records.push(record);
    }

    /// Append all rows of another batch, keeping their order.
    pub fn append(&mut self, other: RecencyBatch) {
        self.records.extend(other.records);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecencyRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[RecencyRecord] {
        &self.records
    }

    /// Validate every record, then reject batches where two rows share a key.
    ///
    /// A single multi-row upsert cannot apply two conflicting rows for the
    /// same key deterministically, so duplicates are a malformed batch.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            record.validate()?;
            if !seen.insert(record.dataset_type()) {
                exn::bail!(ErrorKind::Validation(format!(
                    "json_type {} appears more than once in the batch",
                    record.dataset_type()
                )));
            }
        }
        Ok(())
    }
}

impl From<RecencyRecord> for RecencyBatch {
    fn from(record: RecencyRecord) -> Self {
        Self { records: vec![record] }
    }
}

impl FromIterator<RecencyRecord> for RecencyBatch {
    fn from_iter<I: IntoIterator<Item = RecencyRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl FromIterator<RecencyBatch> for RecencyBatch {
    fn from_iter<I: IntoIterator<Item = RecencyBatch>>(iter: I) -> Self {
        let mut batch = Self::new();
        for other in iter {
            batch.append(other);
        }
        batch
    }
}

impl Extend<RecencyRecord> for RecencyBatch {
    fn extend<I: IntoIterator<Item = RecencyRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl IntoIterator for RecencyBatch {
    type Item = RecencyRecord;
    type IntoIter = std::vec::IntoIter<RecencyRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecencyBatch {
    type Item = &'a RecencyRecord;
    type IntoIter = std::slice::Iter<'a, RecencyRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
