//! tug-dl - resumable HTTP file downloads on top of reqwest.
//!
//! This library adds a resumable-download operation to a plain
//! [`reqwest::Client`]: it probes the remote for size and byte-range
//! support, decides whether to resume, restart, or skip, negotiates the
//! range header, streams the body to disk, and reports merged progress
//! that accounts for bytes already downloaded by earlier attempts.
//!
//! # Example
//!
//! ```no_run
//! use tug_dl::{DownloadOptions, Downloader, RequestConfig};
//!
//! # async fn example() -> tug_dl::Result<()> {
//! let client = reqwest::Client::new();
//! let downloader = Downloader::new(client);
//!
//! let url = "https://example.com/data/archive.zip".parse().unwrap();
//! downloader
//!     .download(url, "downloads", RequestConfig::default(), DownloadOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dest;
pub mod download;
pub mod error;
pub mod format;
pub mod fs;
pub mod probe;
pub mod progress;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use config::{DownloadOptions, RequestConfig};
pub use dest::resolve_output_path;
pub use download::Downloader;
pub use error::{Error, Result};
pub use format::{format_bytes, format_duration};
pub use fs::{FileSystem, TokioFileSystem};
pub use probe::{RemoteFileInfo, probe};
pub use progress::{NoProgress, NullSink, ProgressEvent, ProgressObserver, ProgressSink};

// Re-export reqwest types used in the public API
pub use reqwest::{Client, Url};
