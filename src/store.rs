//! Read contract against the external demand store

use crate::data::DemandRecord;
use crate::error::Result;
use std::collections::BTreeSet;

/// The two read operations the forecasting core requires from its store
///
/// Records come back unordered and possibly duplicated; normalization
/// downstream handles both. The core needs no write access.
pub trait DemandStore {
    /// All records for one product, in no particular order
    fn product_records(&self, product: &str) -> Result<Vec<DemandRecord>>;

    /// All distinct product identifiers, sorted
    fn product_names(&self) -> Result<Vec<String>>;
}

/// In-memory demand store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<DemandRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record
    pub fn insert(&mut self, record: DemandRecord) {
        self.records.push(record);
    }

    /// Add a batch of records
    pub fn insert_all<I: IntoIterator<Item = DemandRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DemandStore for InMemoryStore {
    fn product_records(&self, product: &str) -> Result<Vec<DemandRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.product == product)
            .cloned()
            .collect())
    }

    fn product_names(&self) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .records
            .iter()
            .map(|record| record.product.clone())
            .collect();
        Ok(names.into_iter().collect())
    }
}
