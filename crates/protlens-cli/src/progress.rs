//! Progress indicators for CLI operations
//!
//! Provides the spinner shown while a search is loading.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // Template is a literal; a parse failure falls back to the default style.
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Loading indicator that stays up for a trailing delay after the work ends
///
/// Drawn on stderr, and only when stderr is a terminal, so piped output is
/// never interleaved with spinner frames.
pub struct LoadingOverlay {
    spinner: ProgressBar,
    trailing: Duration,
}

impl LoadingOverlay {
    pub fn start(message: &str, trailing: Duration) -> Self {
        let spinner = if io::stderr().is_terminal() {
            create_spinner(message)
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };
        Self { spinner, trailing }
    }

    /// Keep the indicator up for the trailing delay, then clear it
    pub async fn finish(self) {
        if !self.spinner.is_hidden() && !self.trailing.is_zero() {
            tokio::time::sleep(self.trailing).await;
        }
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("Searching...");
        assert!(!pb.is_finished());
        pb.finish();
        assert!(pb.is_finished());
    }

    #[tokio::test]
    async fn test_overlay_finish_clears() {
        let overlay = LoadingOverlay::start("Searching...", Duration::from_millis(10));
        assert_eq!(overlay.trailing, Duration::from_millis(10));
        overlay.finish().await;
    }
}
