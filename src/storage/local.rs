use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{ImageStore, ImageUpload, StorageError, UPLOADS_ROUTE};

/// Stores images in a directory on disk, served back under [`UPLOADS_ROUTE`].
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    /// Use `dir` as the upload directory, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a public URL back to the file name inside the upload directory.
    fn file_name_for<'a>(image_url: &'a str) -> Option<&'a str> {
        let name = image_url.strip_prefix(UPLOADS_ROUTE)?.strip_prefix('/')?;
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        plain.then_some(name)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError> {
        let file_name = format!("{}{}", Uuid::new_v4(), upload.extension());
        tokio::fs::write(self.dir.join(&file_name), &upload.data).await?;

        tracing::debug!(%file_name, size = upload.data.len(), "Stored image on disk");
        Ok(format!("{UPLOADS_ROUTE}/{file_name}"))
    }

    async fn remove(&self, image_url: &str) -> Result<(), StorageError> {
        let file_name = Self::file_name_for(image_url)
            .ok_or_else(|| StorageError::ForeignUrl(image_url.to_string()))?;

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> Option<LocalImageStore> {
        let dir = std::env::temp_dir().join(format!("game-catalog-local-{}", Uuid::new_v4()));
        LocalImageStore::new(dir).await.ok()
    }

    #[test]
    fn test_file_name_for() {
        assert_eq!(
            LocalImageStore::file_name_for("/uploads/abc.png"),
            Some("abc.png")
        );
        assert_eq!(LocalImageStore::file_name_for("/uploads/../etc/passwd"), None);
        assert_eq!(LocalImageStore::file_name_for("/uploads/.."), None);
        assert_eq!(LocalImageStore::file_name_for("/uploads/"), None);
        assert_eq!(LocalImageStore::file_name_for("/uploadsx/abc.png"), None);
        assert_eq!(
            LocalImageStore::file_name_for("https://cdn.example.com/abc.png"),
            None
        );
    }

    #[tokio::test]
    async fn test_store_then_remove() {
        let Some(store) = temp_store().await else {
            return;
        };

        let url = store
            .store(ImageUpload {
                file_name: Some("cover.png".to_string()),
                content_type: Some("image/png".to_string()),
                data: b"not really a png".to_vec(),
            })
            .await
            .unwrap_or_default();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let path = store
            .dir()
            .join(LocalImageStore::file_name_for(&url).unwrap_or_default());
        assert_eq!(
            tokio::fs::read(&path).await.unwrap_or_default(),
            b"not really a png"
        );

        assert!(store.remove(&url).await.is_ok());
        assert!(!path.exists());

        // Already gone
        assert!(store.remove(&url).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_refuses_foreign_url() {
        let Some(store) = temp_store().await else {
            return;
        };

        let result = store.remove("https://cdn.example.com/a.png").await;
        assert!(matches!(result, Err(StorageError::ForeignUrl(_))));
    }
}
