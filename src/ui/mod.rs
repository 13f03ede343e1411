//! UI/Progress presentation layer
//!
//! This module handles:
//! - Status lines for the fetch pipeline (see [`display`])
//! - Extraction progress bars using indicatif
//!
//! Extraction runs on a worker pool, so [`ProgressReporter`] takes `&self`
//! and implementations must be shareable across threads.

pub mod display;

pub use display::{ConsoleStatus, StatusReporter};

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for archive extraction
pub trait ProgressReporter: Send + Sync {
    /// Start a run over `total` archives
    fn start(&self, total: u64);

    /// Mark one archive as finished
    fn inc(&self, archive_name: &str);

    fn finish(&self);

    /// Abandon on error
    fn abandon(&self);
}

/// Interactive progress reporter with a visual progress bar
pub struct InteractiveProgressReporter {
    pb: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::hidden();
        pb.set_style(style);
        Self { pb }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&self, total: u64) {
        self.pb.set_length(total);
        self.pb.set_position(0);
        self.pb
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn inc(&self, archive_name: &str) {
        // Truncate long names for display
        let display_name = if archive_name.len() > 50 {
            let tail = archive_name
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| archive_name.len() - i <= 47)
                .unwrap_or(0);
            format!("...{}", &archive_name[tail..])
        } else {
            archive_name.to_string()
        };
        self.pb.set_message(display_name);
        self.pb.inc(1);
    }

    fn finish(&self) {
        self.pb.finish_and_clear();
    }

    fn abandon(&self) {
        self.pb.abandon();
    }
}

/// Silent progress reporter
///
/// No-op implementation used when output is not a terminal and in tests.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&self, _total: u64) {}

    fn inc(&self, _archive_name: &str) {}

    fn finish(&self) {}

    fn abandon(&self) {}
}

/// Pick a reporter for the current stderr
pub fn progress_reporter() -> Box<dyn ProgressReporter> {
    if console::Term::stderr().is_term() {
        Box::new(InteractiveProgressReporter::new())
    } else {
        Box::new(SilentProgressReporter)
    }
}
