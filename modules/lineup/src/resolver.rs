use async_trait::async_trait;
use tracing::{debug, info};

use lineup_common::{ScanConfig, ScanError};

/// Outcome of resolving one URL: where it actually landed, and the body to
/// classify.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub resolved_url: String,
    pub hostname: String,
    pub body: String,
}

#[async_trait]
pub trait PageResolver: Send + Sync {
    /// Issue exactly one request for `url`, following redirects, and return
    /// the final URL and body. 401 responses map to `AuthWalled` — an
    /// auth-walled page gains nothing from classification or a screenshot.
    /// No retries: failures are expected and cheap to skip at scale.
    async fn resolve(&self, url: &str) -> Result<Resolution, ScanError>;
}

/// reqwest-backed resolver. The client is built once per run: redirects
/// followed transparently, certificate validation relaxed unless the
/// strict flag is set, per-request timeout from config.
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.strict_tls)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ScanError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageResolver for HttpResolver {
    async fn resolve(&self, url: &str) -> Result<Resolution, ScanError> {
        debug!(url, "Resolving");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            info!(url, "401 response, skipping");
            return Err(ScanError::AuthWalled);
        }

        // Non-401 error statuses still resolve: an error page is
        // classifiable and screenshottable.
        let final_url = response.url().clone();
        let hostname = final_url.host_str().unwrap_or_default().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        debug!(url, resolved = final_url.as_str(), bytes = body.len(), "Resolved");

        Ok(Resolution {
            resolved_url: final_url.to_string(),
            hostname,
            body,
        })
    }
}
