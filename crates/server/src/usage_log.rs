//! Append-only record of who ran an analysis.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

pub const USAGE_LOG_FILE: &str = "usage.log";

#[derive(Clone, Debug)]
pub struct UsageLog {
    dir: PathBuf,
}

impl UsageLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(USAGE_LOG_FILE)
    }

    /// Append `username,YYYY-MM-DD,HH:MM:SS.mmm` (UTC).
    pub async fn record(&self, username: &str) -> std::io::Result<()> {
        self.record_at(username, Utc::now()).await
    }

    pub async fn record_at(&self, username: &str, at: DateTime<Utc>) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())
            .await?;
        file.write_all(format_entry(username, at).as_bytes()).await?;
        tracing::info!(username, "Logged usage");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn format_entry(username: &str, at: DateTime<Utc>) -> String {
    format!(
        "{},{},{}\n",
        username,
        at.format("%Y-%m-%d"),
        at.format("%H:%M:%S%.3f")
    )
}
