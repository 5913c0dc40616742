// Blob storage for uploaded pictures

pub mod pictures;

pub use pictures::{PictureError, PictureManager, Upload};

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// Flat namespace of blobs keyed by generated filename
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()>;

    async fn load(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Fails with `io::ErrorKind::NotFound` when nothing is stored under `name`
    async fn delete(&self, name: &str) -> io::Result<()>;
}

/// Stores blobs as files directly under one directory
#[derive(Debug, Clone)]
pub struct DirectoryBlobStore {
    root: PathBuf,
}

impl DirectoryBlobStore {
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        if !is_plain_name(name) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("invalid blob name: {name}"),
            ));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for DirectoryBlobStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(self.path_for(name)?, bytes).await
    }

    async fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path_for(name)?).await
    }

    async fn delete(&self, name: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.path_for(name)?).await
    }
}

/// A single path component: no separators, no parent references
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_load_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryBlobStore::open(dir.path()).await.unwrap();

        store.save("a.png", b"png-bytes").await.unwrap();
        assert_eq!(store.load("a.png").await.unwrap(), b"png-bytes");

        store.delete("a.png").await.unwrap();
        let err = store.delete("a.png").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn rejects_names_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryBlobStore::open(dir.path().join("uploads")).await.unwrap();

        for name in ["../secret", "nested/file.png", "..", ""] {
            let err = store.load(name).await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::NotFound, "{name}");
        }
    }

    #[test]
    fn plain_names() {
        assert!(is_plain_name("0f1e.png"));
        assert!(!is_plain_name("a/b"));
        assert!(!is_plain_name("a\\b"));
    }
}
