//! Spinner helpers over indicatif. Spinners draw to stderr.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✓";

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICKS)
}

/// Start a spinner showing `msg`.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner()
        .with_style(style("  {spinner:.cyan} {msg}"))
        .with_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stop the spinner and leave `msg` behind a check mark.
pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(style("  {spinner:.green} {msg}"));
    pb.finish_with_message(msg.to_string());
}

/// Remove a spinner whose operation failed.
pub fn abandon(pb: &ProgressBar) {
    pb.finish_and_clear();
}
