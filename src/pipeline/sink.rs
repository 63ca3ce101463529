// src/pipeline/sink.rs

//! Record filtering and checkpointing.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{FilterConfig, ListingRecord};
use crate::storage::ListingStorage;

/// Filters extracted records and persists them page by page.
///
/// The sink owns no running total; the driver folds each page's kept
/// records into its own and hands the total back for the final write.
pub struct RecordSink<'a> {
    storage: &'a dyn ListingStorage,
    excluded: HashSet<String>,
}

impl<'a> RecordSink<'a> {
    pub fn new(storage: &'a dyn ListingStorage, filter: &FilterConfig) -> Self {
        Self {
            storage,
            excluded: filter.excluded_neighborhoods.iter().cloned().collect(),
        }
    }

    /// Drop failed extractions and excluded neighborhoods, preserving order.
    pub fn filter(&self, records: Vec<Option<ListingRecord>>) -> Vec<ListingRecord> {
        records
            .into_iter()
            .flatten()
            .filter(|record| {
                record
                    .neighborhood
                    .as_ref()
                    .is_none_or(|n| !self.excluded.contains(n))
            })
            .collect()
    }

    /// Persist one page's kept records before the crawl moves on.
    pub async fn checkpoint_page(&self, page: u32, records: &[ListingRecord]) -> Result<PathBuf> {
        self.storage.write_page(page, records).await
    }

    /// Persist every kept record of the crawl.
    pub async fn checkpoint_all(&self, records: &[ListingRecord]) -> Result<PathBuf> {
        self.storage.write_combined(records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStorage;

    fn record(neighborhood: &str) -> Option<ListingRecord> {
        let mut record = ListingRecord::new(format!("https://example.com/{neighborhood}"));
        record.neighborhood = Some(neighborhood.to_string());
        Some(record)
    }

    #[test]
    fn test_filter_drops_nulls_and_excluded() {
        let storage = MemoryStorage::default();
        let filter = FilterConfig {
            excluded_neighborhoods: vec!["Wedding".to_string()],
        };
        let sink = RecordSink::new(&storage, &filter);

        let kept = sink.filter(vec![
            record("Mitte"),
            record("Wedding"),
            None,
            record("Charlottenburg"),
        ]);
        let neighborhoods: Vec<_> = kept
            .iter()
            .map(|r| r.neighborhood.as_deref().unwrap())
            .collect();
        assert_eq!(neighborhoods, vec!["Mitte", "Charlottenburg"]);
    }

    #[test]
    fn test_filter_keeps_unknown_neighborhood() {
        let storage = MemoryStorage::default();
        let filter = FilterConfig {
            excluded_neighborhoods: vec!["Wedding".to_string()],
        };
        let sink = RecordSink::new(&storage, &filter);

        let kept = sink.filter(vec![Some(ListingRecord::new("https://example.com/x"))]);
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn test_checkpoints_reach_storage() {
        let storage = MemoryStorage::default();
        let sink = RecordSink::new(&storage, &FilterConfig::default());
        let kept = sink.filter(vec![record("Mitte")]);

        sink.checkpoint_page(1, &kept).await.unwrap();
        sink.checkpoint_all(&kept).await.unwrap();

        assert_eq!(storage.pages.lock().unwrap()[0].0, 1);
        assert_eq!(storage.combined.lock().unwrap()[0].len(), 1);
    }
}
