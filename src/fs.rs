//! File system abstraction for testability.

use async_trait::async_trait;
use std::path::Path;

/// Abstraction over the file system operations the downloader needs.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns true if the path exists and is a regular file.
    async fn is_file(&self, path: &Path) -> bool;

    /// Returns true if the path exists and is a directory.
    async fn is_dir(&self, path: &Path) -> bool;

    /// Returns the size of a regular file, or `None` if the path is absent
    /// or not a regular file.
    async fn file_size(&self, path: &Path) -> Option<u64>;

    /// Opens the destination file for writing, creating it if needed.
    ///
    /// With `append` set the file is opened in append mode, preserving
    /// existing content; otherwise it is truncated.
    async fn open_write(&self, path: &Path, append: bool) -> std::io::Result<tokio::fs::File>;
}

/// Default file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem` instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn is_file(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
    }

    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
    }

    async fn file_size(&self, path: &Path) -> Option<u64> {
        tokio::fs::metadata(path)
            .await
            .ok()
            .filter(std::fs::Metadata::is_file)
            .map(|m| m.len())
    }

    async fn open_write(&self, path: &Path, append: bool) -> std::io::Result<tokio::fs::File> {
        let mut options = tokio::fs::OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        options.open(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn tokio_fs_is_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::File::create(&path).unwrap();

        let fs = TokioFileSystem::new();
        assert!(fs.is_file(&path).await);
        assert!(!fs.is_file(dir.path()).await);
        assert!(!fs.is_file(&dir.path().join("nonexistent.txt")).await);
    }

    #[tokio::test]
    async fn tokio_fs_is_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::File::create(&path).unwrap();

        let fs = TokioFileSystem::new();
        assert!(fs.is_dir(dir.path()).await);
        assert!(!fs.is_dir(&path).await);
        assert!(!fs.is_dir(&dir.path().join("nonexistent")).await);
    }

    #[tokio::test]
    async fn tokio_fs_file_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"hello").unwrap();

        let fs = TokioFileSystem::new();
        assert_eq!(fs.file_size(&path).await, Some(5));
        assert_eq!(fs.file_size(dir.path()).await, None);
        assert_eq!(
            fs.file_size(&dir.path().join("nonexistent.txt")).await,
            None
        );
    }

    #[tokio::test]
    async fn open_write_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::write(&path, b"old content").unwrap();

        let fs = TokioFileSystem::new();
        let mut file = fs.open_write(&path, false).await.unwrap();
        file.write_all(b"new").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn open_write_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::write(&path, b"part-").unwrap();

        let fs = TokioFileSystem::new();
        let mut file = fs.open_write(&path, true).await.unwrap();
        file.write_all(b"rest").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        assert_eq!(std::fs::read(&path).unwrap(), b"part-rest");
    }

    #[tokio::test]
    async fn open_write_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.bin");

        let fs = TokioFileSystem::new();
        let _file = fs.open_write(&path, true).await.unwrap();
        assert!(path.exists());
    }
}
