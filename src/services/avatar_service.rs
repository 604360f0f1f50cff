//! Avatar asset management: streamed upload, deterministic naming, account
//! reference update with a cache-busting URL.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info};

use crate::config::settings::Config;
use crate::error::{IdentityError, Result};
use crate::models::account::AvatarUpload;
use crate::services::bounded;
use crate::storage::{MediaStorage, MediaStream, Storage, StorageError};

/// Length of the random query suffix appended to avatar URLs
const CACHE_BUSTER_LEN: usize = 3;

/// Avatar upload service
pub struct AvatarService {
    storage: Arc<dyn Storage>,
    media: Arc<dyn MediaStorage>,
    api_url: String,
    op_timeout: Duration,
}

impl AvatarService {
    pub fn new(storage: Arc<dyn Storage>, media: Arc<dyn MediaStorage>, config: &Config) -> Self {
        Self {
            storage,
            media,
            api_url: config.app.api_url.clone(),
            op_timeout: config.app.operation_timeout(),
        }
    }

    /// Store an uploaded avatar and update the account's asset reference.
    ///
    /// The stored name is `<username><original-extension>`, so a re-upload by
    /// the same account overwrites deterministically. The account row is
    /// updated only after the media write has confirmed completion, and the
    /// URL carries a random suffix so caches drop the stale image.
    pub async fn set_avatar(
        &self,
        account_id: &str,
        upload: MediaStream,
        original_filename: &str,
    ) -> Result<AvatarUpload> {
        let account = bounded(
            "account lookup",
            self.op_timeout,
            self.storage.get_account(account_id),
        )
        .await?
        .ok_or_else(|| IdentityError::NotFound(format!("No account with id {}", account_id)))?;

        let extension = Path::new(original_filename)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let filename = format!("{}{}", account.username, extension);

        let written = bounded(
            "avatar write",
            self.op_timeout,
            self.media.store(&filename, upload),
        )
        .await?;
        debug!("Avatar file {} written ({} bytes)", filename, written);

        let url = format!(
            "{}/media/avatar/{}?{}",
            self.api_url,
            filename,
            cache_buster()
        );

        match tokio::time::timeout(
            self.op_timeout,
            self.storage.set_avatar(account_id, &filename, &url),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(StorageError::NotFound(msg))) => return Err(IdentityError::NotFound(msg)),
            Ok(Err(e)) => {
                return Err(IdentityError::UpdateFailed(format!(
                    "Avatar update failed: {}",
                    e
                )))
            }
            Err(_) => {
                return Err(IdentityError::Timeout(format!(
                    "Avatar update timed out after {:?}",
                    self.op_timeout
                )))
            }
        }

        info!("Avatar updated for {} -> {}", account.username, filename);
        Ok(AvatarUpload { filename, url })
    }
}

fn cache_buster() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CACHE_BUSTER_LEN)
        .map(char::from)
        .collect()
}
