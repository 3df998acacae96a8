//! Image ingestion.
//!
//! Handlers only see [`ImageStore`]: give it bytes, get back a durable URL. Which
//! strategy backs it is decided once at startup by [`from_config`].

mod local;
mod remote;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalImageStore;
pub use remote::RemoteImageStore;

use crate::config::Config;

/// Public path prefix under which locally stored images are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// One uploaded image as received from the client.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl ImageUpload {
    /// File extension of the original name, lowercased and with the leading dot, or an
    /// empty string if there is no usable one.
    #[must_use]
    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("image file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("asset host request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("asset host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("image reference `{0}` is not managed by this store")]
    ForeignUrl(String),
}

/// Storage strategy for uploaded game images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image and return the URL clients should use to fetch it.
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError>;

    /// Remove a previously stored image. Removing an image that is already gone succeeds.
    async fn remove(&self, image_url: &str) -> Result<(), StorageError>;

    /// Short strategy name for logs.
    fn kind(&self) -> &'static str;
}

/// Select the storage strategy: the remote asset host when it is configured, the local
/// upload directory otherwise.
///
/// # Errors
///
/// Returns an error if the local upload directory cannot be created.
pub async fn from_config(config: &Config) -> Result<Arc<dyn ImageStore>, StorageError> {
    let store: Arc<dyn ImageStore> = match &config.asset_host {
        Some(host) => Arc::new(RemoteImageStore::new(host.clone())),
        None => Arc::new(LocalImageStore::new(&config.upload_dir).await?),
    };

    tracing::info!(strategy = store.kind(), "Image storage ready");
    Ok(store)
}

/// Best-effort removal: failures are logged and swallowed.
pub async fn discard(store: &dyn ImageStore, image_url: &str) {
    if let Err(err) = store.remove(image_url).await {
        tracing::warn!(%image_url, error = %err, "Failed to remove stored image");
    }
}
