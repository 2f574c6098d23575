//! Destination path resolution and validation.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// Resolves the final destination file path for a download.
///
/// A relative `requested` path is joined to `base_dir`; an absolute one is
/// used as given. When the result is an existing directory, the file name
/// comes from the server-suggested name or, failing that, the last
/// segment of the URL path. Otherwise the parent directory must already
/// exist.
///
/// This function never creates directories; it only validates and
/// composes paths.
///
/// # Errors
///
/// Returns [`Error::InvalidDestination`] when the target directory does
/// not exist, or when the destination is a directory and no file name can
/// be derived from the suggestion or the URL.
pub async fn resolve_output_path<F: FileSystem>(
    fs: &F,
    requested: &Path,
    base_dir: &Path,
    url: &Url,
    suggested: Option<&str>,
) -> Result<PathBuf> {
    let resolved = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        base_dir.join(requested)
    };

    if fs.is_dir(&resolved).await {
        let name = match suggested {
            Some(name) => name.to_string(),
            None => url_filename(url).ok_or_else(|| Error::InvalidDestination {
                path: resolved.clone(),
            })?,
        };
        return Ok(resolved.join(name));
    }

    match resolved.parent() {
        Some(parent) if fs.is_dir(parent).await => Ok(resolved),
        _ => Err(Error::InvalidDestination { path: resolved }),
    }
}

/// Returns the last segment of the URL path, if it is non-empty.
fn url_filename(url: &Url) -> Option<String> {
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::TokioFileSystem;
    use tempfile::TempDir;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn url_filename_last_segment() {
        assert_eq!(
            url_filename(&url("https://example.com/data/archive.zip")),
            Some("archive.zip".to_string())
        );
        assert_eq!(
            url_filename(&url("https://example.com/top.bin?sig=abc")),
            Some("top.bin".to_string())
        );
    }

    #[test]
    fn url_filename_trailing_slash_is_none() {
        assert_eq!(url_filename(&url("https://example.com/data/")), None);
        assert_eq!(url_filename(&url("https://example.com/")), None);
    }

    #[tokio::test]
    async fn directory_destination_uses_url_name() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();

        let path = resolve_output_path(
            &fs,
            dir.path(),
            Path::new("."),
            &url("https://example.com/data/archive.zip"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(path, dir.path().join("archive.zip"));
    }

    #[tokio::test]
    async fn directory_destination_prefers_suggested_name() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();

        let path = resolve_output_path(
            &fs,
            dir.path(),
            Path::new("."),
            &url("https://example.com/data/archive.zip"),
            Some("report.pdf"),
        )
        .await
        .unwrap();

        assert_eq!(path, dir.path().join("report.pdf"));
    }

    #[tokio::test]
    async fn file_destination_with_existing_parent() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let requested = dir.path().join("out.bin");

        let path = resolve_output_path(
            &fs,
            &requested,
            Path::new("."),
            &url("https://example.com/a.bin"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(path, requested);
    }

    #[tokio::test]
    async fn missing_parent_is_invalid_destination() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();
        let requested = dir.path().join("no/such/dir/out.bin");

        let err = resolve_output_path(
            &fs,
            &requested,
            Path::new("."),
            &url("https://example.com/a.bin"),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidDestination { .. }));
    }

    #[tokio::test]
    async fn relative_path_joins_base_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("downloads")).unwrap();
        let fs = TokioFileSystem::new();

        let path = resolve_output_path(
            &fs,
            Path::new("downloads"),
            dir.path(),
            &url("https://example.com/data/archive.zip"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(path, dir.path().join("downloads").join("archive.zip"));
    }

    #[tokio::test]
    async fn directory_destination_without_derivable_name_fails() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();

        let err = resolve_output_path(
            &fs,
            dir.path(),
            Path::new("."),
            &url("https://example.com/data/"),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidDestination { .. }));
    }
}
