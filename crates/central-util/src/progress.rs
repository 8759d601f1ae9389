//! Terminal status output. Everything goes to stderr so `--format json`
//! output on stdout stays machine-readable.

use std::io::Write;
use std::time::{Duration, Instant};

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Width the status label is right-aligned to.
pub const LABEL_WIDTH: usize = 12;

/// Colour of a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Something was written or finished (green).
    Done,
    /// Informational only (cyan).
    Info,
    Warn,
    Error,
}

impl Tone {
    fn style(self) -> Style {
        let style = Style::new().bold();
        match self {
            Tone::Done => style.green(),
            Tone::Info => style.cyan(),
            Tone::Warn => style.yellow(),
            Tone::Error => style.red(),
        }
    }
}

/// Render a status line: `       Saved central-publisher.toml`.
pub fn format_status(tone: Tone, label: &str, message: &str) -> String {
    format!(
        "{:>width$} {message}",
        tone.style().apply_to(label),
        width = LABEL_WIDTH
    )
}

pub fn status(label: &str, message: &str) {
    emit(Tone::Done, label, message);
}

pub fn status_info(label: &str, message: &str) {
    emit(Tone::Info, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(Tone::Warn, label, message);
}

pub fn status_error(label: &str, message: &str) {
    emit(Tone::Error, label, message);
}

fn emit(tone: Tone, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", format_status(tone, label, message));
}

/// `0.42s` below a minute, `1m 05s` above.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// A spinner for one indeterminate step, timed from creation.
pub struct Step {
    bar: ProgressBar,
    label: &'static str,
    started: Instant,
}

/// Start a step. The spinner only draws when stderr is a terminal.
pub fn step(label: &'static str, message: &str) -> Step {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    Step {
        bar,
        label,
        started: Instant::now(),
    }
}

impl Step {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Clear the spinner and print `{label} {summary} in {elapsed}`.
    pub fn finish(self, summary: &str) -> Duration {
        let elapsed = self.elapsed();
        self.bar.finish_and_clear();
        status(
            self.label,
            &format!("{summary} in {}", format_elapsed(elapsed)),
        );
        elapsed
    }

    /// Clear the spinner without a summary, for a step that failed.
    pub fn abandon(self) {
        self.bar.finish_and_clear();
    }
}
