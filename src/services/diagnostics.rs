//! Diagnostic page snapshots for offline selector repair.

use std::path::{Path, PathBuf};

use chrono::Local;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::OutputConfig;

/// Writes rendered markup of pages the crawler could not read.
///
/// Writing is best-effort: failures are logged and never reach the caller.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: Option<PathBuf>,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// A writer that drops every snapshot.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        if output.snapshots_enabled {
            Self::new(&output.snapshot_dir)
        } else {
            Self::disabled()
        }
    }

    /// Save `markup` captured from `source_url` under a unique name.
    ///
    /// Returns the written path, or `None` when disabled or on failure.
    pub async fn save(&self, tag: &str, source_url: &str, markup: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let path = dir.join(snapshot_file_name(tag, source_url));
        match write_file(&path, markup).await {
            Ok(()) => {
                log::info!("Saved diagnostic snapshot to {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::warn!("Failed to save snapshot {}: {}", path.display(), e);
                None
            }
        }
    }
}

async fn write_file(path: &Path, markup: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, markup).await?;
    Ok(())
}

/// `{tag}_{timestamp}_{hash8}.html`, hash over tag and URL.
pub fn snapshot_file_name(tag: &str, source_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    hasher.update(source_url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    format!("{}_{}_{}.html", tag, timestamp, &digest[..8])
}
