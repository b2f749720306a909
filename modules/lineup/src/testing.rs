// Test mocks for the pipeline's trait boundaries.
//
// - MockResolver (PageResolver) — HashMap-based URL → scripted response
// - MockRenderer (ScreenshotRenderer) — HashMap-based URL → image bytes
// - CountingProgress (ProgressSink) — records begins and per-phase ticks
//
// Deterministic tests with no network and no engine process.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use lineup_common::ScanError;

use crate::progress::ProgressSink;
use crate::renderer::ScreenshotRenderer;
use crate::resolver::{PageResolver, Resolution};

// ---------------------------------------------------------------------------
// MockResolver
// ---------------------------------------------------------------------------

enum Scripted {
    Page { resolved_url: String, body: String },
    AuthWalled,
    TransportError(String),
}

/// Scripted resolver. Returns a transport error for unregistered URLs.
/// Builder pattern: `.on_page()`, `.on_redirect()`, `.on_auth_walled()`,
/// `.on_transport_error()`.
pub struct MockResolver {
    responses: HashMap<String, Scripted>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    pub fn on_page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Scripted::Page {
                resolved_url: url.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn on_redirect(mut self, url: &str, resolved_url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Scripted::Page {
                resolved_url: resolved_url.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn on_auth_walled(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Scripted::AuthWalled);
        self
    }

    pub fn on_transport_error(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Scripted::TransportError(message.to_string()));
        self
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageResolver for MockResolver {
    async fn resolve(&self, url: &str) -> Result<Resolution, ScanError> {
        match self.responses.get(url) {
            Some(Scripted::Page { resolved_url, body }) => {
                let hostname = url::Url::parse(resolved_url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_default();
                Ok(Resolution {
                    resolved_url: resolved_url.clone(),
                    hostname,
                    body: body.clone(),
                })
            }
            Some(Scripted::AuthWalled) => Err(ScanError::AuthWalled),
            Some(Scripted::TransportError(msg)) => Err(ScanError::Transport(msg.clone())),
            None => Err(ScanError::Transport(format!(
                "MockResolver: no response registered for {url}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// Scripted renderer keyed by resolved URL. Returns a render error for
/// unregistered URLs and for URLs explicitly marked as failing.
pub struct MockRenderer {
    captures: HashMap<String, Vec<u8>>,
    failures: HashSet<String>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            captures: HashMap::new(),
            failures: HashSet::new(),
        }
    }

    pub fn on_capture(mut self, resolved_url: &str, image: &[u8]) -> Self {
        self.captures.insert(resolved_url.to_string(), image.to_vec());
        self
    }

    pub fn on_failure(mut self, resolved_url: &str) -> Self {
        self.failures.insert(resolved_url.to_string());
        self
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenshotRenderer for MockRenderer {
    async fn render(&self, resolved_url: &str) -> Result<Vec<u8>, ScanError> {
        if self.failures.contains(resolved_url) {
            return Err(ScanError::Render("engine crashed".into()));
        }
        self.captures.get(resolved_url).cloned().ok_or_else(|| {
            ScanError::Render(format!(
                "MockRenderer: no capture registered for {resolved_url}"
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// CountingProgress
// ---------------------------------------------------------------------------

/// Records every `begin` and counts ticks per phase, so tests can assert
/// the exactly-one-tick-per-target contract.
pub struct CountingProgress {
    phases: Mutex<Vec<(String, u64)>>,
    ticks: Mutex<Vec<AtomicUsize>>,
}

impl CountingProgress {
    pub fn new() -> Self {
        Self {
            phases: Mutex::new(Vec::new()),
            ticks: Mutex::new(Vec::new()),
        }
    }

    /// (phase name, announced total) in begin order.
    pub fn phases(&self) -> Vec<(String, u64)> {
        self.phases.lock().unwrap().clone()
    }

    /// Tick count for the nth begun phase.
    pub fn ticks(&self, phase_index: usize) -> usize {
        self.ticks.lock().unwrap()[phase_index].load(Ordering::SeqCst)
    }
}

impl Default for CountingProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for CountingProgress {
    fn begin(&self, phase: &str, total: u64) {
        self.phases.lock().unwrap().push((phase.to_string(), total));
        self.ticks.lock().unwrap().push(AtomicUsize::new(0));
    }

    fn tick(&self) {
        let ticks = self.ticks.lock().unwrap();
        if let Some(current) = ticks.last() {
            current.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn finish(&self) {}
}
