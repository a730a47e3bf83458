//! Plain-text file holding one float Unix timestamp, e.g. `1714564800.125000`.
//!
//! Reads and writes are not locked. Two processes sharing a file can both pass
//! the cooldown check; run a single instance per file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::persist::types::{PersistError, PersistResult};
use crate::persist::StampStore;

#[derive(Debug, Clone)]
pub struct FileStampStore {
    path: PathBuf,
}

impl FileStampStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io { path: self.path.clone(), source }
    }
}

pub fn format_stamp(at: DateTime<Utc>) -> String {
    format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros())
}

pub fn parse_stamp(raw: &str) -> Option<DateTime<Utc>> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_micros((seconds * 1_000_000.0).round() as i64)
}

#[async_trait]
impl StampStore for FileStampStore {
    async fn load(&self) -> PersistResult<Option<DateTime<Utc>>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let first_line = contents.lines().next().unwrap_or_default();
        parse_stamp(first_line)
            .map(Some)
            .ok_or_else(|| PersistError::Corrupt {
                path: self.path.clone(),
                raw: first_line.to_string(),
            })
    }

    async fn save(&self, at: DateTime<Utc>) -> PersistResult<()> {
        tokio::fs::write(&self.path, format_stamp(at)).await.map_err(|e| self.io_error(e))
    }
}
