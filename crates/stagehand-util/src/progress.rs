//! Terminal status lines and progress indicators. Everything goes to stderr
//! so stdout stays free for repository ids and listings.

use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Copy)]
enum Tone {
    Action,
    Info,
    Warn,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Action => Style::new().green().bold(),
            Tone::Info => Style::new().cyan().bold(),
            Tone::Warn => Style::new().yellow().bold(),
        }
    }
}

fn print_status(tone: Tone, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        tone.style().apply_to(label)
    );
}

/// Print a Cargo-style status line: `    Uploaded 8 files to comexample-1001`
pub fn status(label: &str, message: &str) {
    print_status(Tone::Action, label, message);
}

/// Like [`status`] but in cyan, for informational lines.
pub fn status_info(label: &str, message: &str) {
    print_status(Tone::Info, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    print_status(Tone::Warn, label, message);
}

/// Determinate bar over the files of an upload.
///
/// The total is only known once the first file is reported, so the bar is
/// created lazily.
#[derive(Default)]
pub struct TransferBar {
    bar: Option<ProgressBar>,
}

impl TransferBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished file out of `total`.
    pub fn advance(&mut self, total: usize, path: &str) {
        let bar = self.bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        });
        bar.set_message(path.to_string());
        bar.inc(1);
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Spinner for a repository close, ticked once per poll rather than on a
/// timer so a stalled server shows as a stalled spinner.
pub struct PollSpinner {
    spinner: ProgressBar,
    subject: String,
}

impl PollSpinner {
    pub fn new(subject: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Waiting for {subject} to close..."));
        Self {
            spinner,
            subject: subject.to_string(),
        }
    }

    /// Report poll `attempt` (one-based) and the state the server returned.
    pub fn poll(&self, attempt: u32, max_attempts: Option<u32>, state: &str) {
        let limit = max_attempts.map(|m| format!("/{m}")).unwrap_or_default();
        self.spinner.set_message(format!(
            "Waiting for {} to close (poll {attempt}{limit}, {state})",
            self.subject
        ));
        self.spinner.tick();
    }

    pub fn finish(self) {
        self.spinner.finish_and_clear();
    }
}
