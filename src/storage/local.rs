//! Local filesystem CSV storage.
//!
//! Files are written atomically (temp file, then rename) so an interrupted
//! run never leaves a half-written checkpoint behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{ListingRecord, OutputConfig};
use crate::storage::{CSV_HEADER, ListingStorage};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    file_prefix: String,
}

impl LocalStorage {
    /// Create a LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(&output.dir, &output.file_prefix)
    }

    pub fn page_path(&self, page: u32) -> PathBuf {
        self.root_dir
            .join(format!("{}_page_{}.csv", self.file_prefix, page))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.root_dir.join(format!("{}_all.csv", self.file_prefix))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn write_records(&self, path: PathBuf, records: &[ListingRecord]) -> Result<PathBuf> {
        let bytes = encode_csv(records)?;
        self.write_bytes(&path, &bytes).await?;
        log::info!("Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

#[async_trait]
impl ListingStorage for LocalStorage {
    async fn write_page(&self, page: u32, records: &[ListingRecord]) -> Result<PathBuf> {
        self.write_records(self.page_path(page), records).await
    }

    async fn write_combined(&self, records: &[ListingRecord]) -> Result<PathBuf> {
        self.write_records(self.combined_path(), records).await
    }
}

/// Serialize records with the fixed header; absent values become empty cells.
pub fn encode_csv(records: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

fn row(record: &ListingRecord) -> [String; 10] {
    [
        text(&record.title),
        text(&record.address),
        text(&record.postal_code),
        text(&record.neighborhood),
        number(record.size),
        record.rooms.map(|r| r.to_string()).unwrap_or_default(),
        number(record.price),
        number(record.price_per_sqm),
        text(&record.description),
        record.url.clone(),
    ]
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ListingRecord {
        ListingRecord {
            url: "https://example.com/flat/1".to_string(),
            title: Some("Loft, bright".to_string()),
            address: Some("Kastanienallee 12, 10437 Berlin".to_string()),
            postal_code: Some("10437".to_string()),
            neighborhood: Some("Prenzlauer Berg".to_string()),
            size: Some(98.0),
            rooms: Some(3),
            price: Some(1960.0),
            price_per_sqm: Some(20.0),
            description: None,
        }
    }

    #[test]
    fn test_encode_csv_header_and_row() {
        let bytes = encode_csv(&[sample()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Title,Address,PostalCode,Neighborhood,Size (sqm),Rooms,Price (EUR),Price/Sqm (EUR),Description,URL"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"Loft, bright\",\"Kastanienallee 12, 10437 Berlin\",10437,Prenzlauer Berg,98,3,1960,20,,https://example.com/flat/1"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_encode_csv_empty_has_header_only() {
        let text = String::from_utf8(encode_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_write_page_and_combined() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("out"), "berlin");

        let page_path = storage.write_page(2, &[sample()]).await.unwrap();
        assert_eq!(page_path, dir.path().join("out/berlin_page_2.csv"));
        assert!(page_path.exists());
        assert!(!page_path.with_extension("tmp").exists());

        let all_path = storage.write_combined(&[sample(), sample()]).await.unwrap();
        let content = std::fs::read_to_string(all_path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_files_are_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "berlin");

        storage.write_page(1, &[sample(), sample()]).await.unwrap();
        let path = storage.write_page(1, &[sample()]).await.unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
