mod entry;
mod local;

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{dates::parse_date, error::Result};

pub use entry::LedgerEntry;
pub use local::FileStore;

/// Every meal page crawled so far, persisted as `{"data": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    data: Vec<LedgerEntry>,
}

impl Ledger {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.data
    }

    pub fn seen_endpoints(&self) -> HashSet<String> {
        self.data
            .iter()
            .map(|entry| entry.endpoint().to_owned())
            .collect()
    }

    /// `None` for an empty ledger. A stored date that does not parse is an error.
    pub fn latest_date(&self) -> Result<Option<NaiveDate>> {
        let mut latest = None;
        for entry in &self.data {
            let date = parse_date(entry.date())?;
            latest = latest.max(Some(date));
        }
        Ok(latest)
    }

    /// Documents of every entry grouped by the entry's date, first-seen order, no repeats.
    pub fn documents_by_date(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &self.data {
            let urls = grouped.entry(entry.date().to_owned()).or_default();
            for document in entry.documents() {
                if !urls.contains(document) {
                    urls.push(document.clone());
                }
            }
        }
        grouped
    }

    /// Does not check for a repeated endpoint, callers skip seen endpoints.
    pub fn append(&mut self, entry: LedgerEntry) {
        self.data.push(entry);
    }
}
