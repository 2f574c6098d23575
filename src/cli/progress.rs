//! Terminal progress rendering for CLI downloads.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use crate::progress::{ProgressEvent, ProgressSink};

/// Renders a single in-place-updating progress line on the terminal,
/// labeled with the destination filename.
#[derive(Default)]
pub struct TermSink {
    bar: Mutex<Option<ProgressBar>>,
}

impl TermSink {
    /// Creates a new terminal sink with no active progress line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Creates a progress bar for a download of known size.
fn make_bar(total: u64, name: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40.cyan/blue}] {percent:>3}% {bytes}/{total_bytes} @ {bytes_per_sec}",
        )
        .expect("progress template is valid")
        .progress_chars("━━╌"),
    );
    bar.set_message(name.to_string());
    bar
}

/// Creates a spinner-style bar for a download of unknown size.
fn make_unbounded_bar(name: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {bytes} @ {bytes_per_sec}")
            .expect("progress template is valid"),
    );
    bar.set_message(name.to_string());
    bar
}

impl ProgressSink for TermSink {
    fn update(&self, label: &str, event: &ProgressEvent) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        let bar = guard.get_or_insert_with(|| match event.bytes_total {
            Some(total) => make_bar(total, label),
            None => make_unbounded_bar(label),
        });
        // Growing the length alongside the position caps the rendered
        // percentage at 100 even when the server over-delivers.
        if let Some(total) = event.bytes_total {
            bar.set_length(total.max(event.bytes_loaded));
        }
        bar.set_position(event.bytes_loaded);
    }

    fn finish(&self, _label: &str) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = guard.take() {
            bar.finish_and_clear();
        }
    }
}
