//! Media file storage abstraction.
//!
//! The contract is deliberately narrow: write bytes to a named location and
//! report completion. `store` returns only after the data is durably flushed,
//! so callers can safely record the filename afterwards.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::storage::{Result, StorageError};
use crate::utils::validator;

/// Byte stream handed to the media sink
pub type MediaStream = Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Unpin>;

/// File sink interface for media assets
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Write the stream under `filename`, replacing previous content.
    /// Returns the number of bytes written once durably flushed.
    async fn store(&self, filename: &str, stream: MediaStream) -> Result<u64>;

    /// Check whether a stored file exists
    async fn exists(&self, filename: &str) -> Result<bool>;

    /// Remove a stored file
    async fn delete(&self, filename: &str) -> Result<()>;
}

/// Media storage on the local filesystem under a fixed root directory
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf> {
        if !validator::validate_filename(filename) {
            return Err(StorageError::Validation(format!(
                "Invalid media filename: {}",
                filename
            )));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, filename: &str, mut stream: MediaStream) -> Result<u64> {
        let path = self.path_for(filename)?;
        fs::create_dir_all(&self.root).await?;

        let mut file = fs::File::create(&path).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        // Flush to disk before reporting completion; the caller records the
        // filename only after this returns
        file.sync_all().await?;

        debug!("Stored media file {:?} ({} bytes)", path, written);
        Ok(written)
    }

    async fn exists(&self, filename: &str) -> Result<bool> {
        let path = self.path_for(filename)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.path_for(filename)?;
        fs::remove_file(&path).await?;
        Ok(())
    }
}
