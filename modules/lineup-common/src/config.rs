use std::time::Duration;

use crate::error::ScanError;

/// Default User-Agent presented to target sites and the rendering engine.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Scan configuration, constructed once at startup from CLI flags and passed
/// by reference into each component. No ambient global reads.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Max in-flight fetches during the profile phase.
    pub concurrency: usize,
    /// Max in-flight engine processes during the screenshot phase.
    /// Rendering is far heavier than a fetch, so this defaults lower.
    pub render_concurrency: usize,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Path to the external rendering engine executable.
    pub engine_path: String,
    /// Per-call timeout, applied independently to every fetch and render.
    pub timeout: Duration,
    /// Target sites routinely carry invalid certificates; validation is
    /// opt-in rather than opt-out.
    pub strict_tls: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            render_concurrency: 4,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width: 1280,
            viewport_height: 800,
            engine_path: "webshot".to_string(),
            timeout: Duration::from_millis(10_000),
            strict_tls: false,
        }
    }
}

impl ScanConfig {
    /// Reject configurations that cannot drive the pipeline. Called before
    /// any network activity starts.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::Config("concurrency must be greater than zero".into()));
        }
        if self.render_concurrency == 0 {
            return Err(ScanError::Config(
                "render concurrency must be greater than zero".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::Config("timeout must be greater than zero".into()));
        }
        if self.engine_path.is_empty() {
            return Err(ScanError::Config("engine path must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config = ScanConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }

    #[test]
    fn zero_render_concurrency_rejected() {
        let config = ScanConfig {
            render_concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = ScanConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }
}
