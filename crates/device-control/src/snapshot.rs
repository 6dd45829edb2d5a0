//! Lock-guarded store for the single shared snapshot image

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// The one well-known snapshot image, overwritten per successful capture.
///
/// Reads and writes are serialized through an async mutex so a concurrent
/// reader can never observe a half-written image.
pub struct SnapshotStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the stored image with a fresh capture.
    pub async fn write(&self, bytes: &[u8]) -> Result<()> {
        let _held = self.guard.lock().await;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| Error::Io(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), len = bytes.len(), "snapshot stored");
        Ok(())
    }

    /// Read back the stored image bytes (brightness check, outbound serving).
    pub async fn read(&self) -> Result<Vec<u8>> {
        let _held = self.guard.lock().await;
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir: {e}"),
        };
        let store = SnapshotStore::new(dir.path().join("latest.jpg"));
        assert!(store.write(b"abc").await.is_ok());
        assert_eq!(store.read().await.ok(), Some(b"abc".to_vec()));
    }

    #[tokio::test]
    async fn read_missing_file_is_io_error() {
        let store = SnapshotStore::new("/nonexistent/dir/latest.jpg");
        assert!(matches!(store.read().await, Err(Error::Io(_))));
    }
}
