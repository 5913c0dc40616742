use axum::body::Bytes;
use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::BlobStore;

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("failed to store picture {name}: {source}")]
    Store { name: String, source: io::Error },
}

/// A file submitted with a form
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Text after the last `.`, if any
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Attaches uploaded pictures to rows and releases them again
#[derive(Clone)]
pub struct PictureManager {
    store: Arc<dyn BlobStore>,
    allowed_extensions: Arc<HashSet<String>>,
}

impl PictureManager {
    pub fn new(store: Arc<dyn BlobStore>, allowed_extensions: &[String]) -> Self {
        Self {
            store,
            allowed_extensions: Arc::new(allowed_extensions.iter().cloned().collect()),
        }
    }

    pub fn is_allowed(&self, upload: &Upload) -> bool {
        upload
            .extension()
            .is_some_and(|ext| self.allowed_extensions.contains(ext))
    }

    /// Store `upload` under a fresh `<uuid>.<ext>` name and return that name.
    ///
    /// Returns `Ok(None)` without touching the store when there is no file, the
    /// file name is empty, or the extension is not allowed.
    pub async fn attach(&self, upload: Option<&Upload>) -> Result<Option<String>, PictureError> {
        let Some(upload) = upload.filter(|u| !u.file_name.is_empty()) else {
            return Ok(None);
        };

        let Some(ext) = upload.extension().filter(|_| self.is_allowed(upload)) else {
            tracing::info!("Ignoring upload {:?}: extension not allowed", upload.file_name);
            return Ok(None);
        };

        let name = format!("{}.{}", Uuid::new_v4().simple(), ext);
        self.store
            .save(&name, &upload.bytes)
            .await
            .map_err(|source| PictureError::Store {
                name: name.clone(),
                source,
            })?;

        tracing::debug!("Stored picture {} ({} bytes)", name, upload.bytes.len());
        Ok(Some(name))
    }

    /// Best-effort removal; failures are logged and never returned
    pub async fn release(&self, reference: Option<&str>) {
        let Some(name) = reference.filter(|n| !n.is_empty()) else {
            return;
        };

        match self.store.delete(name).await {
            Ok(()) => tracing::debug!("Released picture {}", name),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Picture {} was already gone", name)
            }
            Err(e) => tracing::warn!("Failed to release picture {}: {}", name, e),
        }
    }

    pub async fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        self.store.load(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DirectoryBlobStore;

    async fn manager() -> (PictureManager, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryBlobStore::open(dir.path()).await.unwrap();
        let allowed = vec!["png".to_string(), "jpg".to_string()];
        (PictureManager::new(Arc::new(store), &allowed), dir)
    }

    fn stored_files(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(Upload::new("photo.final.png", "x").extension(), Some("png"));
        assert_eq!(Upload::new("noext", "x").extension(), None);
        assert_eq!(Upload::new("trailing.", "x").extension(), None);
    }

    #[tokio::test]
    async fn attach_keeps_extension_and_writes_bytes() {
        let (pictures, dir) = manager().await;

        let name = pictures
            .attach(Some(&Upload::new("ball.png", "png-data")))
            .await
            .unwrap()
            .unwrap();

        assert!(name.ends_with(".png"));
        assert_ne!(name, "ball.png");
        assert_eq!(pictures.load(&name).await.unwrap(), b"png-data");
        assert_eq!(stored_files(&dir), 1);
    }

    #[tokio::test]
    async fn attach_generates_distinct_names() {
        let (pictures, _dir) = manager().await;
        let upload = Upload::new("ball.png", "x");

        let first = pictures.attach(Some(&upload)).await.unwrap();
        let second = pictures.attach(Some(&upload)).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn disallowed_extension_writes_nothing() {
        let (pictures, dir) = manager().await;

        for file_name in ["script.exe", "photo.PNG", "noext", ""] {
            let result = pictures.attach(Some(&Upload::new(file_name, "data"))).await.unwrap();
            assert_eq!(result, None, "{file_name}");
        }
        assert_eq!(pictures.attach(None).await.unwrap(), None);
        assert_eq!(stored_files(&dir), 0);
    }

    #[tokio::test]
    async fn release_of_unknown_reference_does_not_fail() {
        let (pictures, _dir) = manager().await;
        pictures.release(Some("never-attached.png")).await;
        pictures.release(Some("../escape.png")).await;
        pictures.release(None).await;
    }

    #[tokio::test]
    async fn release_removes_blob() {
        let (pictures, dir) = manager().await;
        let name = pictures
            .attach(Some(&Upload::new("ball.jpg", "jpg")))
            .await
            .unwrap();

        pictures.release(name.as_deref()).await;
        assert_eq!(stored_files(&dir), 0);
    }
}
