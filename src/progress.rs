//! Progress events, observer and sink traits, and transfer rate tracking.

use std::time::Instant;

/// A merged progress notification for a single download attempt.
///
/// Byte counts include data already on disk before the attempt started, so
/// a resumed transfer reports totals for the whole file rather than just
/// the remainder being fetched.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    /// Expected final size in bytes, when known.
    pub bytes_total: Option<u64>,
    /// Bytes accounted for so far: prior local data plus the current
    /// transfer.
    pub bytes_loaded: u64,
    /// Completion fraction in `[0, 1]`, when the total is known.
    pub fraction: Option<f64>,
    /// Observed transfer rate in bytes per second over the current
    /// transfer.
    pub rate: u64,
    /// True when the total comes from probe metadata rather than the
    /// transfer response itself.
    pub estimated: bool,
}

impl ProgressEvent {
    /// Builds an event merging prior on-disk bytes with the current
    /// transfer's counters.
    ///
    /// `transfer_total` is the expected size of the current transfer alone
    /// (the remainder when resuming). The fraction is clamped to `[0, 1]`
    /// so servers that deliver more bytes than advertised never push the
    /// reported completion past 100%.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn merged(
        prior: u64,
        received: u64,
        transfer_total: Option<u64>,
        estimated: bool,
        rate: u64,
    ) -> Self {
        let bytes_loaded = prior.saturating_add(received);
        let bytes_total = transfer_total.map(|t| prior.saturating_add(t));
        let fraction = bytes_total.map(|total| {
            if total == 0 {
                1.0
            } else {
                (bytes_loaded as f64 / total as f64).clamp(0.0, 1.0)
            }
        });
        Self {
            bytes_total,
            bytes_loaded,
            fraction,
            rate,
            estimated,
        }
    }

    /// Builds the terminal event for a finished (or already-complete)
    /// download.
    #[must_use]
    pub fn completed(bytes_loaded: u64, bytes_total: Option<u64>) -> Self {
        Self {
            bytes_total,
            bytes_loaded,
            fraction: Some(1.0),
            rate: 0,
            estimated: false,
        }
    }
}

/// Trait for receiving download progress updates.
///
/// Implement this trait to observe download operations. All methods have
/// default no-op implementations for convenience.
pub trait ProgressObserver: Send + Sync {
    /// Called once after probe and path resolution, before any transfer.
    fn on_start(&self, _name: &str, _event: &ProgressEvent) {}

    /// Called for every chunk received, with merged byte counts.
    fn on_chunk(&self, _name: &str, _event: &ProgressEvent) {}

    /// Called when the attempt completes, including the no-transfer
    /// short-circuit for already-complete files.
    fn on_complete(&self, _name: &str, _event: &ProgressEvent) {}
}

/// A null observer that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// A rendering target for user-facing progress display.
///
/// One implementation rewrites a terminal line in place; a structured log
/// line or a test capture are others. The orchestrator drives the sink
/// only when `show_progress` is enabled.
pub trait ProgressSink: Send + Sync {
    /// Updates the display for the file identified by `label`.
    fn update(&self, label: &str, event: &ProgressEvent);

    /// Completes the display for the file identified by `label`.
    fn finish(&self, label: &str);
}

/// A sink that renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&self, _label: &str, _event: &ProgressEvent) {}
    fn finish(&self, _label: &str) {}
}

/// Tracks the observed transfer rate over a single streaming transfer.
pub(crate) struct RateTracker {
    started: Instant,
    transferred: u64,
}

impl RateTracker {
    pub(crate) fn new() -> Self {
        Self {
            started: Instant::now(),
            transferred: 0,
        }
    }

    /// Records received bytes and returns the average rate so far in bytes
    /// per second.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn record(&mut self, bytes: u64) -> u64 {
        self.transferred = self.transferred.saturating_add(bytes);
        let secs = self.started.elapsed().as_secs_f64();
        if secs > 0.0 {
            (self.transferred as f64 / secs) as u64
        } else {
            0
        }
    }
}
