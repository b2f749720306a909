//! Two-phase profile-then-screenshot pipeline.
//!
//! Phase 1 resolves and classifies every input URL under one concurrency
//! bound. Phase 2 starts only after phase 1 fully drains and renders only
//! the targets that profiled successfully, under a (lower) bound of its
//! own — expensive rendering is never spent on targets that failed the
//! cheap fetch. No individual failure aborts a phase; the only fatal error
//! is a bad configuration, rejected before any work starts.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use lineup_common::{ScanConfig, ScanError, Target};

use crate::classifier::Classifier;
use crate::progress::ProgressSink;
use crate::renderer::ScreenshotRenderer;
use crate::resolver::PageResolver;

pub struct Pipeline {
    resolver: Arc<dyn PageResolver>,
    renderer: Arc<dyn ScreenshotRenderer>,
    classifier: Classifier,
    config: ScanConfig,
}

impl Pipeline {
    pub fn new(
        resolver: Arc<dyn PageResolver>,
        renderer: Arc<dyn ScreenshotRenderer>,
        config: ScanConfig,
    ) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self {
            resolver,
            renderer,
            classifier: Classifier::new(),
            config,
        })
    }

    /// Drive both phases to completion and return the full target
    /// collection — including skipped and failed targets, for reporting.
    /// Order follows completion order, not input order; the report is
    /// explicitly sortable.
    pub async fn run(&self, urls: Vec<String>, progress: &dyn ProgressSink) -> Vec<Target> {
        let total = urls.len();
        info!(urls = total, concurrency = self.config.concurrency, "Profile phase starting");
        progress.begin("profile", total as u64);

        let resolver = &self.resolver;
        let classifier = &self.classifier;
        let targets: Vec<Target> = stream::iter(urls.into_iter().map(|url| async move {
            let mut target = Target::new(&url);
            match resolver.resolve(&url).await {
                Ok(page) => {
                    let profile = classifier.classify(&page.body);
                    target.record_profile(
                        page.resolved_url,
                        page.hostname,
                        profile.interest_score,
                        profile.has_login_indicator,
                    );
                }
                Err(e) => {
                    warn!(url, error = %e, "Profile failed");
                    target.record_profile_failure(&e);
                }
            }
            progress.tick();
            target
        }))
        .buffer_unordered(self.config.concurrency)
        .collect()
        .await;

        progress.finish();

        let (eligible, mut finished): (Vec<Target>, Vec<Target>) =
            targets.into_iter().partition(Target::profiled);

        info!(
            eligible = eligible.len(),
            skipped = finished.len(),
            "Profile phase drained"
        );

        if eligible.is_empty() {
            return finished;
        }

        info!(
            targets = eligible.len(),
            concurrency = self.config.render_concurrency,
            "Screenshot phase starting"
        );
        progress.begin("screenshot", eligible.len() as u64);

        let renderer = &self.renderer;
        let captured: Vec<Target> = stream::iter(eligible.into_iter().map(|mut target| async move {
            // Eligible targets always carry a resolved URL.
            let url = target
                .resolved_url
                .clone()
                .unwrap_or_else(|| target.requested_url.clone());
            match renderer.render(&url).await {
                Ok(image) => target.record_capture(image),
                Err(e) => {
                    warn!(url, error = %e, "Capture failed");
                    target.record_capture_failure(&e);
                }
            }
            progress.tick();
            target
        }))
        .buffer_unordered(self.config.render_concurrency)
        .collect()
        .await;

        progress.finish();

        finished.extend(captured);
        info!(targets = finished.len(), "Screenshot phase drained");
        finished
    }
}
