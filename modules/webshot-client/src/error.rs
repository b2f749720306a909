use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebshotError>;

#[derive(Debug, Error)]
pub enum WebshotError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to launch engine: {0}")]
    Spawn(String),

    #[error("Engine stream error: {0}")]
    Stream(String),

    #[error("Engine exited with {status}: {stderr}")]
    Engine { status: i32, stderr: String },

    #[error("Engine produced no image data")]
    EmptyCapture,

    #[error("Render timed out after {ms}ms")]
    Timeout { ms: u64 },
}
