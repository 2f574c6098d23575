//! CLI mode for tug - command-line interface for resumable HTTP downloads.

mod progress;

use std::env;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::Url;
use reqwest::header::{HeaderName, HeaderValue};

use crate::{
    DownloadOptions, Downloader, ProgressEvent, ProgressObserver, RequestConfig, format_bytes,
    format_duration,
};

pub use progress::TermSink;

/// Parsed command-line arguments.
struct Args {
    url: String,
    output: String,
    base_dir: String,
    resume: bool,
    quiet: bool,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl Args {
    /// Parses arguments in the order given, flags and positionals mixed.
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut url = None;
        let mut output = None;
        let mut base_dir = ".".to_string();
        let mut resume = true;
        let mut quiet = false;
        let mut headers = Vec::new();

        let args: Vec<String> = args.collect();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--no-resume" => resume = false,
                "-q" | "--quiet" => quiet = true,
                "-d" | "--dir" => {
                    i += 1;
                    base_dir = args
                        .get(i)
                        .ok_or("--dir requires a value")?
                        .clone();
                }
                "-H" | "--header" => {
                    i += 1;
                    let raw = args.get(i).ok_or("--header requires a value")?;
                    headers.push(parse_header(raw)?);
                }
                flag if flag.starts_with('-') => {
                    return Err(format!("unknown option: {flag}"));
                }
                positional => {
                    if url.is_none() {
                        url = Some(positional.to_string());
                    } else if output.is_none() {
                        output = Some(positional.to_string());
                    } else {
                        return Err(format!("unexpected argument: {positional}"));
                    }
                }
            }
            i += 1;
        }

        Ok(Self {
            url: url.ok_or("a URL is required")?,
            output: output.unwrap_or_else(|| ".".to_string()),
            base_dir,
            resume,
            quiet,
            headers,
        })
    }
}

/// Parses a `Name: value` header argument.
fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header (expected 'Name: value'): {raw}"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| format!("invalid header name: {e}"))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|e| format!("invalid header value: {e}"))?;
    Ok((name, value))
}

/// Builds a configured HTTP client for downloads.
fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(60))
        .pool_max_idle_per_host(8)
        .tcp_keepalive(Duration::from_secs(30))
        .build()
}

/// Observer that captures whether a transfer ran and its final state, for
/// the completion summary.
#[derive(Default)]
struct Summary {
    started: Mutex<bool>,
    completed: Mutex<Option<(String, ProgressEvent)>>,
}

impl ProgressObserver for Summary {
    fn on_start(&self, _name: &str, _event: &ProgressEvent) {
        *self.started.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = true;
    }

    fn on_complete(&self, name: &str, event: &ProgressEvent) {
        *self
            .completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) =
            Some((name.to_string(), *event));
    }
}

/// Runs the CLI download mode.
///
/// # Errors
///
/// Returns an error if the download fails.
pub async fn run() -> crate::Result<()> {
    env_logger::init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("Error: {msg}");
            std::process::exit(2);
        }
    };

    let url = match Url::parse(&args.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: invalid URL '{}': {e}", args.url);
            std::process::exit(2);
        }
    };

    let client = build_http_client()?;
    let summary = Arc::new(Summary::default());
    let downloader = Downloader::new(client)
        .with_base_dir(&args.base_dir)
        .with_sink(Arc::new(TermSink::new()))
        .with_observer(Arc::clone(&summary) as Arc<dyn ProgressObserver>);

    let mut request = RequestConfig::new();
    for (name, value) in args.headers {
        request = request.with_header(name, value);
    }

    let options = DownloadOptions::new()
        .with_resume_if_possible(args.resume)
        .with_show_progress(!args.quiet);

    let started_at = Instant::now();
    downloader
        .download(url, &args.output, request, options)
        .await?;

    let transferred = *summary
        .started
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let completed = summary
        .completed
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .take();

    if let Some((label, event)) = completed {
        if transferred {
            println!(
                "{label} - {} in {}",
                format_bytes(event.bytes_loaded),
                format_duration(started_at.elapsed()),
            );
        } else {
            println!("{label}: already downloaded.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(ToString::to_string))
    }

    #[test]
    fn parse_url_only() {
        let args = parse(&["https://example.com/a.bin"]).unwrap();
        assert_eq!(args.url, "https://example.com/a.bin");
        assert_eq!(args.output, ".");
        assert!(args.resume);
        assert!(!args.quiet);
    }

    #[test]
    fn parse_url_and_output() {
        let args = parse(&["https://example.com/a.bin", "out/a.bin"]).unwrap();
        assert_eq!(args.output, "out/a.bin");
    }

    #[test]
    fn parse_flags() {
        let args = parse(&[
            "--no-resume",
            "-q",
            "-d",
            "/tmp",
            "https://example.com/a.bin",
        ])
        .unwrap();
        assert!(!args.resume);
        assert!(args.quiet);
        assert_eq!(args.base_dir, "/tmp");
    }

    #[test]
    fn parse_headers() {
        let args = parse(&[
            "-H",
            "Authorization: Bearer token",
            "https://example.com/a.bin",
        ])
        .unwrap();
        assert_eq!(args.headers.len(), 1);
        assert_eq!(args.headers[0].0.as_str(), "authorization");
        assert_eq!(args.headers[0].1, "Bearer token");
    }

    #[test]
    fn parse_rejects_missing_url() {
        assert!(parse(&["--quiet"]).is_err());
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        assert!(parse(&["--bogus", "https://example.com/a.bin"]).is_err());
    }

    #[test]
    fn parse_rejects_bad_header() {
        assert!(parse(&["-H", "no-colon", "https://example.com/a.bin"]).is_err());
    }
}
