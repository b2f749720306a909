use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress contract for the pipeline: one `begin` per phase, exactly one
/// `tick` per completed target regardless of outcome. Implementations must
/// be callable from concurrent workers.
pub trait ProgressSink: Send + Sync {
    fn begin(&self, phase: &str, total: u64);
    fn tick(&self);
    fn finish(&self);
}

/// Terminal progress bar. Replaced per phase so the bar length matches the
/// phase population.
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalProgress {
    fn begin(&self, phase: &str, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:20}] {percent}% {eta}")
                .expect("valid progress template")
                .progress_chars("=> "),
        );
        bar.set_message(phase.to_string());
        *self.bar.lock().expect("progress lock") = Some(bar);
    }

    fn tick(&self) {
        if let Some(bar) = self.bar.lock().expect("progress lock").as_ref() {
            bar.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().expect("progress lock").take() {
            bar.finish();
        }
    }
}

/// Silent sink for library callers that don't want terminal output.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&self, _phase: &str, _total: u64) {}
    fn tick(&self) {}
    fn finish(&self) {}
}
