//! Core download orchestration: the resume-vs-restart decision, range
//! negotiation, and the streaming transfer loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderValue, RANGE};
use reqwest::{Client, Url};
use tokio::io::AsyncWriteExt;

use crate::config::{DownloadOptions, RequestConfig};
use crate::dest::resolve_output_path;
use crate::error::{Error, Result};
use crate::fs::{FileSystem, TokioFileSystem};
use crate::probe::{RemoteFileInfo, probe};
use crate::progress::{NullSink, ProgressEvent, ProgressObserver, ProgressSink, RateTracker};

/// What to do with a single download attempt, decided after probing the
/// remote and statting the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    /// Local data already covers the remote size; nothing to transfer.
    Skip,
    /// Transfer the remainder, appending from the given byte offset.
    Resume { offset: u64 },
    /// Transfer the whole file from offset 0, truncating local data.
    Restart,
}

/// Decides between skipping, resuming, and restarting.
///
/// An unknown remote size never short-circuits and never supports
/// resuming. Requesting a resume for partial data the remote cannot serve
/// by range is an error, not a silent restart.
fn plan_attempt(
    info: &RemoteFileInfo,
    local_size: u64,
    resume_if_possible: bool,
    path: &Path,
) -> Result<Plan> {
    if let Some(total) = info.total_size
        && local_size >= total
    {
        return Ok(Plan::Skip);
    }

    if resume_if_possible && local_size > 0 {
        if !info.supports_resume {
            return Err(Error::ResumeUnsupported {
                path: path.to_path_buf(),
            });
        }
        return Ok(Plan::Resume { offset: local_size });
    }

    Ok(Plan::Restart)
}

/// Resumable HTTP downloader built around a shared [`reqwest::Client`].
///
/// The client's own configuration (TLS, redirects, timeouts) passes
/// through untouched; this type only adds the resume decision, range
/// negotiation, and progress accounting on top.
pub struct Downloader<F: FileSystem = TokioFileSystem> {
    client: Client,
    base_dir: PathBuf,
    fs: F,
    sink: Arc<dyn ProgressSink>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl Downloader<TokioFileSystem> {
    /// Creates a new downloader with the default file system.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_fs(client, TokioFileSystem)
    }
}

impl<F: FileSystem> Downloader<F> {
    /// Creates a new downloader with a custom file system implementation.
    #[must_use]
    pub fn with_fs(client: Client, fs: F) -> Self {
        Self {
            client,
            base_dir: PathBuf::from("."),
            fs,
            sink: Arc::new(NullSink),
            observer: None,
        }
    }

    /// Sets the base directory that relative destination paths resolve
    /// against. Defaults to the process working directory (`.`).
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Sets the progress sink driven when `show_progress` is enabled.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Installs an observer invoked with merged progress events.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns a reference to the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Downloads `url` to `output_path`, resuming existing partial data
    /// when the caller allows it and the remote supports byte ranges.
    ///
    /// If the local file already covers the remote size, the call
    /// completes without issuing a transfer request. A failed attempt may
    /// leave a partial file on disk for a later call to resume.
    ///
    /// # Errors
    ///
    /// - [`Error::ResumeUnsupported`] when partial data exists, resuming
    ///   was requested, and the remote does not advertise byte ranges.
    /// - [`Error::InvalidDestination`] when the destination directory does
    ///   not exist.
    /// - [`Error::Http`] for probe or transfer failures, including
    ///   non-success statuses.
    /// - [`Error::Io`] for destination file failures.
    pub async fn download(
        &self,
        url: Url,
        output_path: impl AsRef<Path>,
        request: RequestConfig,
        options: DownloadOptions,
    ) -> Result<()> {
        let info = probe(&self.client, url.clone(), &request.headers).await?;

        let path = resolve_output_path(
            &self.fs,
            output_path.as_ref(),
            &self.base_dir,
            &url,
            info.suggested_filename.as_deref(),
        )
        .await?;
        let label = file_label(&path);

        let local_size = self.fs.file_size(&path).await.unwrap_or(0);

        match plan_attempt(&info, local_size, options.resume_if_possible, &path)? {
            Plan::Skip => {
                log::info!("{label}: already complete ({local_size} bytes), skipping transfer");
                let event = ProgressEvent::completed(local_size, info.total_size);
                if options.show_progress {
                    self.sink.update(&label, &event);
                    self.sink.finish(&label);
                }
                if let Some(observer) = &self.observer {
                    observer.on_complete(&label, &event);
                }
                Ok(())
            }
            plan => {
                self.transfer(url, &path, &label, request, options, &info, plan)
                    .await
            }
        }
    }

    /// Issues the streaming request and pipes the body into the
    /// destination file, emitting merged progress along the way.
    #[allow(clippy::too_many_arguments)]
    async fn transfer(
        &self,
        url: Url,
        path: &Path,
        label: &str,
        request: RequestConfig,
        options: DownloadOptions,
        info: &RemoteFileInfo,
        plan: Plan,
    ) -> Result<()> {
        let (prior, append) = match plan {
            Plan::Resume { offset } => (offset, true),
            _ => (0, false),
        };

        let mut headers = request.headers;
        if let (Plan::Resume { offset }, Some(total)) = (plan, info.total_size) {
            // plan_attempt only resumes below a known total, so total >= 1.
            let range = format!("bytes={}-{}", offset, total - 1);
            log::debug!("{label}: resuming with range {range}");
            headers.insert(
                RANGE,
                HeaderValue::from_str(&range).expect("range value is valid ascii"),
            );
        }

        let response = self
            .client
            .request(request.method, url)
            .headers(headers)
            .send()
            .await?
            .error_for_status()?;

        // Expected size of this transfer alone: the response's own length,
        // falling back to the probe's remainder estimate.
        let (transfer_total, estimated) = match response.content_length() {
            Some(len) => (Some(len), false),
            None => (info.total_size.map(|t| t.saturating_sub(prior)), true),
        };

        if let Some(observer) = &self.observer {
            let event = ProgressEvent::merged(prior, 0, transfer_total, estimated, 0);
            observer.on_start(label, &event);
        }

        // The handle is scoped to this call: dropped (closed) on every
        // early return, flushed before the success path returns.
        let mut file = self.fs.open_write(path, append).await?;
        let mut stream = response.bytes_stream();
        let mut rate = RateTracker::new();
        let mut received: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            let event = ProgressEvent::merged(
                prior,
                received,
                transfer_total,
                estimated,
                rate.record(chunk.len() as u64),
            );
            if options.show_progress {
                self.sink.update(label, &event);
            }
            if let Some(observer) = &self.observer {
                observer.on_chunk(label, &event);
            }
        }

        file.flush().await?;
        drop(file);

        let loaded = prior.saturating_add(received);
        let event = ProgressEvent::completed(loaded, transfer_total.map(|t| prior.saturating_add(t)));
        if options.show_progress {
            self.sink.finish(label);
        }
        if let Some(observer) = &self.observer {
            observer.on_complete(label, &event);
        }
        log::info!("{label}: downloaded {received} bytes ({loaded} total on disk)");
        Ok(())
    }
}

/// Display label for a destination: the file name, or the whole path when
/// it has none.
fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
