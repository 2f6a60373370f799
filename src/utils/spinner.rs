use crate::utils::logger::{LogLevel, Logger};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::Cell;
use std::time::Duration;

pub struct Spinner {
    bar: ProgressBar,
    active: Cell<bool>,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(80));

        Spinner {
            bar,
            active: Cell::new(true),
        }
    }

    pub fn succeed(&self, message: impl Into<String>) {
        self.finish_with(LogLevel::Success, message.into());
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.finish_with(LogLevel::Error, message.into());
    }

    fn finish_with(&self, level: LogLevel, message: String) {
        if self.active.replace(false) {
            self.bar.finish_and_clear();
            Logger::new().log_message(level, &message);
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if self.active.replace(false) {
            self.bar.abandon();
        }
    }
}

/// Runs `action` behind a spinner, logging its outcome once it settles.
pub fn run_step<T, F, S>(start_message: &str, on_success: S, action: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, String>,
    S: FnOnce(&T) -> String,
{
    let spinner = Spinner::new(start_message);
    match action() {
        Ok(value) => {
            spinner.succeed(on_success(&value));
            Ok(value)
        }
        Err(err) => {
            spinner.fail(err.clone());
            Err(err)
        }
    }
}
