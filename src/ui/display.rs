//! Status lines printed while fetching the cache

use console::Style;

/// Sink for human-readable status text
pub trait StatusReporter: Send + Sync {
    /// Section header for a pipeline stage
    fn step(&self, title: &str);

    /// Progress line (green)
    fn info(&self, message: &str);

    /// Something the user should act on (yellow)
    fn notice(&self, message: &str);

    /// Uncoloured text
    fn plain(&self, message: &str);
}

/// Prints status lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleStatus;

impl StatusReporter for ConsoleStatus {
    fn step(&self, title: &str) {
        println!(
            "{} {}",
            Style::new().bold().green().apply_to("==>"),
            Style::new().bold().apply_to(title)
        );
    }

    fn info(&self, message: &str) {
        println!("{}", Style::new().green().apply_to(message));
    }

    fn notice(&self, message: &str) {
        println!("{}", Style::new().yellow().apply_to(message));
    }

    fn plain(&self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
pub use recording::{Line, RecordingStatus};
