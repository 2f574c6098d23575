//! Remote metadata probe: size, range support, and suggested filename.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{ACCEPT_RANGES, CONTENT_DISPOSITION, CONTENT_LENGTH, HeaderMap};
use reqwest::{Client, Url};

use crate::error::Result;

static UTF8_FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)filename\*=UTF-8''([\w%\-.]+)(?:; ?|$)").expect("valid regex")
});

/// Metadata about a remote file, derived once per download attempt from
/// the probe response headers. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileInfo {
    /// Total size reported by `content-length`. `None` when the header is
    /// absent or unparseable, which is distinct from a zero-byte file.
    pub total_size: Option<u64>,
    /// True when the size is known and the remote advertises byte-range
    /// support (`accept-ranges: bytes`).
    pub supports_resume: bool,
    /// Server-suggested filename from `content-disposition`, only
    /// extracted when the remote supports resume.
    pub suggested_filename: Option<String>,
}

impl RemoteFileInfo {
    /// Derives remote file metadata from probe response headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let total_size = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let supports_resume = total_size.is_some()
            && headers
                .get(ACCEPT_RANGES)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "bytes");

        let suggested_filename = if supports_resume {
            headers
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .and_then(disposition_filename)
        } else {
            None
        };

        Self {
            total_size,
            supports_resume,
            suggested_filename,
        }
    }
}

/// Issues a HEAD request to `url` with the given headers and derives
/// [`RemoteFileInfo`] from the response.
///
/// # Errors
///
/// Returns [`Error::Http`](crate::Error::Http) if the request fails or the
/// server answers with a non-success status.
pub async fn probe(client: &Client, url: Url, headers: &HeaderMap) -> Result<RemoteFileInfo> {
    let response = client
        .head(url)
        .headers(headers.clone())
        .send()
        .await?
        .error_for_status()?;

    let info = RemoteFileInfo::from_headers(response.headers());
    log::debug!(
        "probe: size={:?} resume={} filename={:?}",
        info.total_size,
        info.supports_resume,
        info.suggested_filename
    );
    Ok(info)
}

/// Extracts a filename from a `content-disposition` header value.
///
/// Tries the RFC 5987 `filename*=UTF-8''…` form first (percent-decoded),
/// then falls back to the plain `filename=` form, with or without quotes.
fn disposition_filename(disposition: &str) -> Option<String> {
    if let Some(caps) = UTF8_FILENAME_RE.captures(disposition)
        && let Ok(decoded) = urlencoding::decode(&caps[1])
    {
        return Some(decoded.into_owned());
    }

    let lower = disposition.to_ascii_lowercase();
    let start = lower.find("filename=")?;
    let value = disposition[start + "filename=".len()..]
        .split(';')
        .next()?
        .trim();
    let name = value.trim_matches(|c| c == '"' || c == '\'');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
