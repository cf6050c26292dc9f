//! Spinner shown on stderr while a scan runs

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Simple spinner for standalone operations; hidden when stderr is not a terminal
pub fn create_spinner(message: &str) -> ProgressBar {
    if !Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Finish spinner with error and clear
pub fn complete_spinner_error(spinner: ProgressBar, message: &str) {
    spinner.finish_with_message(format!("✗ {message}"));
}

/// Clear spinner completely without leaving any message
pub fn complete_spinner_and_clear(spinner: ProgressBar) {
    spinner.finish_and_clear();
}
