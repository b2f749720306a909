use async_trait::async_trait;
use tracing::info;

use lineup_common::{ScanConfig, ScanError};
use webshot_client::{RenderOptions, WebshotClient};

#[async_trait]
pub trait ScreenshotRenderer: Send + Sync {
    /// Render an already-resolved URL to PNG bytes. Any engine error,
    /// timeout, or stream failure is a `Render` error for that target
    /// only — never a partial image.
    async fn render(&self, resolved_url: &str) -> Result<Vec<u8>, ScanError>;
}

/// Renderer backed by the external webshot engine.
pub struct WebshotRenderer {
    client: WebshotClient,
}

impl WebshotRenderer {
    pub fn new(config: &ScanConfig) -> Self {
        info!(
            engine = config.engine_path.as_str(),
            width = config.viewport_width,
            height = config.viewport_height,
            "Using webshot renderer"
        );
        Self {
            client: WebshotClient::new(RenderOptions {
                engine_path: config.engine_path.clone(),
                width: config.viewport_width,
                height: config.viewport_height,
                user_agent: config.user_agent.clone(),
                timeout: config.timeout,
            }),
        }
    }
}

#[async_trait]
impl ScreenshotRenderer for WebshotRenderer {
    async fn render(&self, resolved_url: &str) -> Result<Vec<u8>, ScanError> {
        self.client
            .capture(resolved_url)
            .await
            .map_err(|e| ScanError::Render(e.to_string()))
    }
}
