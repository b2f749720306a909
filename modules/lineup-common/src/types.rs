use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Per-phase outcome for a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Pending,
    Succeeded,
    Failed,
}

/// One input URL and everything accumulated about it across both pipeline
/// phases. Constructed once per input line, mutated in place by exactly one
/// worker per phase, immutable once the run completes.
///
/// Failed and skipped targets are always carried through to the report,
/// visibly marked — they are never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// The URL as given in the input file, verbatim.
    pub requested_url: String,
    /// Final URL after redirects; equals `requested_url` when no redirect
    /// occurred. Empty until the profile phase succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Sum of per-pattern match counts; 0 when no classification ran.
    pub interest_score: u32,
    pub has_login_indicator: bool,
    /// Raw PNG bytes, base64 in JSON. Absent until the capture succeeds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "imageBase64",
        with = "base64_bytes"
    )]
    pub image: Option<Vec<u8>>,
    /// SHA-256 hex of `image`; equal checksums mean visual duplicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_checksum: Option<String>,
    #[serde(rename = "phase1Status")]
    pub profile_status: PhaseStatus,
    #[serde(rename = "phase2Status")]
    pub capture_status: PhaseStatus,
    /// Human-readable reason for the first failed phase, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl Target {
    pub fn new(requested_url: impl Into<String>) -> Self {
        Self {
            requested_url: requested_url.into(),
            resolved_url: None,
            hostname: None,
            interest_score: 0,
            has_login_indicator: false,
            image: None,
            image_checksum: None,
            profile_status: PhaseStatus::Pending,
            capture_status: PhaseStatus::Pending,
            failure: None,
        }
    }

    /// Record a successful profile: resolved URL, hostname, classification.
    pub fn record_profile(
        &mut self,
        resolved_url: String,
        hostname: String,
        interest_score: u32,
        has_login_indicator: bool,
    ) {
        self.resolved_url = Some(resolved_url);
        self.hostname = Some(hostname);
        self.interest_score = interest_score;
        self.has_login_indicator = has_login_indicator;
        self.profile_status = PhaseStatus::Succeeded;
    }

    pub fn record_profile_failure(&mut self, err: &ScanError) {
        self.profile_status = PhaseStatus::Failed;
        self.failure = Some(err.to_string());
    }

    pub fn record_capture(&mut self, image: Vec<u8>) {
        self.image = Some(image);
        self.capture_status = PhaseStatus::Succeeded;
    }

    pub fn record_capture_failure(&mut self, err: &ScanError) {
        self.image = None;
        self.image_checksum = None;
        self.capture_status = PhaseStatus::Failed;
        self.failure = Some(err.to_string());
    }

    /// Eligible for the screenshot phase.
    pub fn profiled(&self) -> bool {
        self.profile_status == PhaseStatus::Succeeded
    }
}

/// Serde adapter: Option<Vec<u8>> as a base64 string field.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => STANDARD
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
