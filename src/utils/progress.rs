use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a chat-completion call is in flight.
pub struct CallSpinner {
    progress_bar: ProgressBar,
}

impl CallSpinner {
    pub fn new(enabled: bool) -> Self {
        let progress_bar = if enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
            progress_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }

        Self { progress_bar }
    }

    pub fn start(&self, message: &str) {
        self.progress_bar.set_message(message.to_string());
        self.progress_bar.enable_steady_tick(Duration::from_millis(120));
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for CallSpinner {
    fn drop(&mut self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }
}
