//! JSON file implementation of [`RecordStore`].
//!
//! The whole record set lives in one file as a JSON array. Every append or
//! clear rewrites the file: the new content goes to a sibling temp file which
//! is then renamed over the original, so readers see either the old or the
//! new set, never a partial write.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use parley_core::store::{RecordStore, select_window};
use parley_types::error::StoreError;
use parley_types::record::{Record, next_id};

/// A [`RecordStore`] backed by a single JSON file.
///
/// Appends and clears within one process are serialized by an internal lock.
/// A missing or empty file reads as an empty store.
pub struct JsonFileStore<R> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> JsonFileStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    async fn load(&self) -> Result<Vec<R>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            StoreError::Serialization(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    async fn persist(&self, records: &[R]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Serialization(format!("failed to encode records: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let tmp = self.temp_path();
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

impl<R: Record> RecordStore<R> for JsonFileStore<R> {
    async fn append(&self, draft: R::Draft) -> Result<R, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let record = R::from_draft(next_id(&records), draft, Utc::now());
        records.push(record.clone());
        self.persist(&records).await?;

        tracing::debug!(path = %self.path.display(), id = record.id(), "appended record");
        Ok(record)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.persist(&[]).await?;
        tracing::debug!(path = %self.path.display(), "cleared store");
        Ok(())
    }

    async fn read(&self, limit: Option<usize>, reverse: bool) -> Result<Vec<R>, StoreError> {
        let records = self.load().await?;
        Ok(select_window(records, limit, reverse))
    }
}
