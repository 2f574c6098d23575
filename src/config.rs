//! Configuration types for download operations.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Caller-controlled portions of the transfer request.
///
/// The orchestrator owns the request URL, the streaming response mode, and
/// the injected range header; none of those are settable here, so internal
/// values winning over caller input is structural rather than a runtime
/// merge rule. Caller headers are preserved and extended.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// HTTP method for the transfer request. Defaults to GET.
    pub method: Method,
    /// Extra headers sent on both the probe and the transfer request.
    pub headers: HeaderMap,
}

impl RequestConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method for the transfer request.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a header sent on both the probe and the transfer request.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Options controlling resume and progress behavior for a download.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    /// Whether to resume from existing partial data when the remote
    /// supports byte ranges.
    pub resume_if_possible: bool,
    /// Whether to drive the configured progress sink during the transfer.
    pub show_progress: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            resume_if_possible: true,
            show_progress: false,
        }
    }
}

impl DownloadOptions {
    /// Creates new options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to resume from existing partial data.
    #[must_use]
    pub const fn with_resume_if_possible(mut self, resume: bool) -> Self {
        self.resume_if_possible = resume;
        self
    }

    /// Sets whether to drive the configured progress sink.
    #[must_use]
    pub const fn with_show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::USER_AGENT;

    #[test]
    fn default_options() {
        let options = DownloadOptions::default();
        assert!(options.resume_if_possible);
        assert!(!options.show_progress);
    }

    #[test]
    fn options_builder() {
        let options = DownloadOptions::new()
            .with_resume_if_possible(false)
            .with_show_progress(true);

        assert!(!options.resume_if_possible);
        assert!(options.show_progress);
    }

    #[test]
    fn default_request_config_is_get() {
        let config = RequestConfig::default();
        assert_eq!(config.method, Method::GET);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn request_config_builder() {
        let config = RequestConfig::new()
            .with_method(Method::POST)
            .with_header(USER_AGENT, HeaderValue::from_static("tug/0.1"));

        assert_eq!(config.method, Method::POST);
        assert_eq!(config.headers.get(USER_AGENT).unwrap(), "tug/0.1");
    }
}
