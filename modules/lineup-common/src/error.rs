use thiserror::Error;

/// Error taxonomy for a scan run.
///
/// `Config` is fatal and surfaces before any concurrent work begins.
/// Everything else is contained at the single-target level: recorded as a
/// per-target status, counted toward progress, never allowed to abort a
/// phase. There is no retry policy anywhere — a failed target is final for
/// that phase.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication required (401), skipping")]
    AuthWalled,

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// True for errors that abort the run rather than a single target.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::Config(_))
    }
}
