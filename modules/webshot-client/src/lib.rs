//! Client for an external screenshot rendering engine.
//!
//! The engine is an executable that takes a URL plus viewport flags and
//! writes PNG bytes to stdout. It is known to interleave error text into
//! the data stream on partial failures, so every chunk is filtered before
//! being accumulated; a capture either completes whole or fails — a
//! partial image is never returned.

pub mod error;

pub use error::{Result, WebshotError};

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Rendering parameters for one engine invocation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub engine_path: String,
    pub width: u32,
    pub height: u32,
    pub user_agent: String,
    pub timeout: Duration,
}

pub struct WebshotClient {
    opts: RenderOptions,
}

impl WebshotClient {
    pub fn new(opts: RenderOptions) -> Self {
        Self { opts }
    }

    /// Render `url` to PNG bytes. The URL must already be resolved — the
    /// engine follows no redirects. The whole call, spawn through stream
    /// drain, runs under one timeout; on expiry the engine process is
    /// killed and no bytes are returned.
    pub async fn capture(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = url::Url::parse(url).map_err(|e| WebshotError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(WebshotError::InvalidUrl(format!(
                "only http/https URLs are allowed, got: {}",
                parsed.scheme()
            )));
        }

        debug!(url, engine = self.opts.engine_path.as_str(), "Launching render engine");

        let mut child = Command::new(&self.opts.engine_path)
            .arg("--width")
            .arg(self.opts.width.to_string())
            .arg("--height")
            .arg(self.opts.height.to_string())
            .arg("--user-agent")
            .arg(&self.opts.user_agent)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WebshotError::Spawn(e.to_string()))?;

        let timeout = self.opts.timeout;
        match tokio::time::timeout(timeout, drain_capture(&mut child, url)).await {
            Ok(result) => result,
            Err(_) => {
                // kill_on_drop reaps the engine once `child` goes out of scope
                warn!(url, ms = timeout.as_millis() as u64, "Render timed out");
                Err(WebshotError::Timeout {
                    ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}

/// Read the engine's stdout to completion, dropping error-text chunks,
/// then check the exit status. Returns the accumulated image only when the
/// engine exits cleanly and produced data.
///
/// Both pipes drain concurrently: engines are stderr-noisy, and a full
/// stderr pipe buffer would block the engine before stdout ever closes.
async fn drain_capture(child: &mut tokio::process::Child, url: &str) -> Result<Vec<u8>> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| WebshotError::Stream("stdout not captured".into()))?;
    let stderr = child.stderr.take();

    let stdout_fut = async {
        let mut image = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stdout
                .read(&mut buf)
                .await
                .map_err(|e| WebshotError::Stream(e.to_string()))?;
            if n == 0 {
                break;
            }
            let chunk = &buf[..n];
            if is_error_chunk(chunk) {
                warn!(url, bytes = n, "Discarding engine error chunk from data stream");
                continue;
            }
            image.extend_from_slice(chunk);
        }
        Ok::<Vec<u8>, WebshotError>(image)
    };

    let stderr_fut = async {
        let mut text = String::new();
        if let Some(mut pipe) = stderr {
            let _ = pipe.read_to_string(&mut text).await;
        }
        text
    };

    let (image, stderr_text) = tokio::join!(stdout_fut, stderr_fut);
    let image = image?;

    let status = child
        .wait()
        .await
        .map_err(|e| WebshotError::Stream(e.to_string()))?;

    if !status.success() {
        return Err(WebshotError::Engine {
            status: status.code().unwrap_or(-1),
            stderr: stderr_text.trim().to_string(),
        });
    }
    if image.is_empty() {
        return Err(WebshotError::EmptyCapture);
    }

    debug!(url, bytes = image.len(), "Capture complete");
    Ok(image)
}

/// The engine sometimes writes its own error text into the image stream.
/// Real PNG data is not valid UTF-8 past the first few bytes, so a chunk
/// that decodes cleanly and carries an error marker is engine noise, not
/// image data.
fn is_error_chunk(chunk: &[u8]) -> bool {
    match std::str::from_utf8(chunk) {
        Ok(text) => text.contains("Error") || text.contains("FATAL"),
        Err(_) => false,
    }
}
