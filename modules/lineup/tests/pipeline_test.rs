// End-to-end pipeline behavior over mocked resolver/renderer boundaries:
// failure isolation, phase narrowing, the progress contract, and checksum
// grouping. No network, no engine process.

use std::sync::Arc;

use lineup::pipeline::Pipeline;
use lineup::report;
use lineup::testing::{CountingProgress, MockRenderer, MockResolver};
use lineup_common::{PhaseStatus, ScanConfig, Target};

const LOGIN_PAGE: &str = r#"<html><body>
<p>Please log in to continue</p>
<form action="/session" method="post">
<input name="user"><input name="pass" type="password">
</form>
</body></html>"#;

fn pipeline(resolver: MockResolver, renderer: MockRenderer) -> Pipeline {
    Pipeline::new(
        Arc::new(resolver),
        Arc::new(renderer),
        ScanConfig::default(),
    )
    .unwrap()
}

fn find<'a>(targets: &'a [Target], requested: &str) -> &'a Target {
    targets
        .iter()
        .find(|t| t.requested_url == requested)
        .unwrap_or_else(|| panic!("no target for {requested}"))
}

#[tokio::test]
async fn mixed_outcomes_are_isolated_per_target() {
    // One 401, one login page that renders, one fetch that dies.
    let resolver = MockResolver::new()
        .on_auth_walled("http://walled.example.com")
        .on_page("http://login.example.com", LOGIN_PAGE)
        .on_transport_error("http://dead.example.com", "connection timed out");
    let renderer = MockRenderer::new().on_capture("http://login.example.com", b"png-bytes");

    let progress = CountingProgress::new();
    let targets = pipeline(resolver, renderer)
        .run(
            vec![
                "http://walled.example.com".into(),
                "http://login.example.com".into(),
                "http://dead.example.com".into(),
            ],
            &progress,
        )
        .await;

    assert_eq!(targets.len(), 3);

    let walled = find(&targets, "http://walled.example.com");
    assert_eq!(walled.profile_status, PhaseStatus::Failed);
    assert_eq!(walled.capture_status, PhaseStatus::Pending);
    assert!(walled.failure.as_deref().unwrap().contains("401"));

    let login = find(&targets, "http://login.example.com");
    assert_eq!(login.profile_status, PhaseStatus::Succeeded);
    assert_eq!(login.capture_status, PhaseStatus::Succeeded);
    assert!(login.interest_score >= 2);
    assert!(login.has_login_indicator);
    assert_eq!(login.image.as_deref(), Some(b"png-bytes".as_ref()));

    let dead = find(&targets, "http://dead.example.com");
    assert_eq!(dead.profile_status, PhaseStatus::Failed);
    assert_eq!(dead.capture_status, PhaseStatus::Pending);
    assert!(dead.failure.as_deref().unwrap().contains("timed out"));
}

#[tokio::test]
async fn progress_ticks_once_per_target_per_phase() {
    let resolver = MockResolver::new()
        .on_page("http://a.example.com", "<form></form>")
        .on_page("http://b.example.com", "plain")
        .on_transport_error("http://c.example.com", "refused");
    let renderer = MockRenderer::new()
        .on_capture("http://a.example.com", b"a")
        .on_capture("http://b.example.com", b"b");

    let progress = CountingProgress::new();
    pipeline(resolver, renderer)
        .run(
            vec![
                "http://a.example.com".into(),
                "http://b.example.com".into(),
                "http://c.example.com".into(),
            ],
            &progress,
        )
        .await;

    let phases = progress.phases();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0], ("profile".to_string(), 3));
    // Phase 2 population is exactly the profiled subset.
    assert_eq!(phases[1], ("screenshot".to_string(), 2));
    assert_eq!(progress.ticks(0), 3);
    assert_eq!(progress.ticks(1), 2);
}

#[tokio::test]
async fn screenshot_phase_skipped_when_nothing_profiles() {
    let resolver = MockResolver::new()
        .on_auth_walled("http://x.example.com")
        .on_transport_error("http://y.example.com", "dns failure");
    let renderer = MockRenderer::new();

    let progress = CountingProgress::new();
    let targets = pipeline(resolver, renderer)
        .run(
            vec!["http://x.example.com".into(), "http://y.example.com".into()],
            &progress,
        )
        .await;

    assert_eq!(targets.len(), 2);
    assert_eq!(progress.phases().len(), 1);
    assert!(targets.iter().all(|t| t.capture_status == PhaseStatus::Pending));
}

#[tokio::test]
async fn render_failure_leaves_a_reportable_placeholder() {
    let resolver = MockResolver::new()
        .on_page("http://ok.example.com", "<a href=\"/\">home</a>")
        .on_page("http://broken.example.com", "<a href=\"/\">home</a>");
    let renderer = MockRenderer::new()
        .on_capture("http://ok.example.com", b"image")
        .on_failure("http://broken.example.com");

    let progress = CountingProgress::new();
    let mut targets = pipeline(resolver, renderer)
        .run(
            vec!["http://ok.example.com".into(), "http://broken.example.com".into()],
            &progress,
        )
        .await;

    report::checksum_targets(&mut targets);

    let broken = find(&targets, "http://broken.example.com");
    assert_eq!(broken.profile_status, PhaseStatus::Succeeded);
    assert_eq!(broken.capture_status, PhaseStatus::Failed);
    assert!(broken.image.is_none());
    assert!(broken.image_checksum.is_none());

    // Both phases counted the broken target toward progress.
    assert_eq!(progress.ticks(0), 2);
    assert_eq!(progress.ticks(1), 2);
}

#[tokio::test]
async fn redirects_resolve_before_rendering() {
    let resolver = MockResolver::new().on_redirect(
        "http://short.example.com",
        "https://long.example.com/landing",
        "<form></form>",
    );
    // The renderer only knows the resolved URL — rendering the requested
    // URL would miss the redirect.
    let renderer = MockRenderer::new().on_capture("https://long.example.com/landing", b"img");

    let progress = CountingProgress::new();
    let targets = pipeline(resolver, renderer)
        .run(vec!["http://short.example.com".into()], &progress)
        .await;

    let t = &targets[0];
    assert_eq!(t.resolved_url.as_deref(), Some("https://long.example.com/landing"));
    assert_eq!(t.hostname.as_deref(), Some("long.example.com"));
    assert_eq!(t.capture_status, PhaseStatus::Succeeded);
}

#[tokio::test]
async fn identical_renders_share_a_checksum() {
    let resolver = MockResolver::new()
        .on_page("http://one.example.com", "x")
        .on_page("http://two.example.com", "y")
        .on_page("http://three.example.com", "z");
    let renderer = MockRenderer::new()
        .on_capture("http://one.example.com", b"parked-domain-page")
        .on_capture("http://two.example.com", b"parked-domain-page")
        .on_capture("http://three.example.com", b"real-content");

    let progress = CountingProgress::new();
    let mut targets = pipeline(resolver, renderer)
        .run(
            vec![
                "http://one.example.com".into(),
                "http://two.example.com".into(),
                "http://three.example.com".into(),
            ],
            &progress,
        )
        .await;

    report::checksum_targets(&mut targets);

    let one = find(&targets, "http://one.example.com");
    let two = find(&targets, "http://two.example.com");
    let three = find(&targets, "http://three.example.com");
    assert_eq!(one.image_checksum, two.image_checksum);
    assert_ne!(one.image_checksum, three.image_checksum);
    assert!(one.image_checksum.is_some());
}

#[tokio::test]
async fn full_run_serializes_and_round_trips() {
    let resolver = MockResolver::new()
        .on_page("http://page.example.com", LOGIN_PAGE)
        .on_auth_walled("http://walled.example.com");
    let renderer = MockRenderer::new().on_capture("http://page.example.com", b"png");

    let progress = CountingProgress::new();
    let mut targets = pipeline(resolver, renderer)
        .run(
            vec!["http://page.example.com".into(), "http://walled.example.com".into()],
            &progress,
        )
        .await;

    report::checksum_targets(&mut targets);
    let json = report::build_json(&targets).unwrap();
    let back: Vec<Target> = serde_json::from_str(&json).unwrap();

    assert_eq!(back.len(), targets.len());
    for (a, b) in back.iter().zip(targets.iter()) {
        assert_eq!(a.requested_url, b.requested_url);
        assert_eq!(a.profile_status, b.profile_status);
        assert_eq!(a.capture_status, b.capture_status);
        assert_eq!(a.interest_score, b.interest_score);
        assert_eq!(a.image, b.image);
        assert_eq!(a.image_checksum, b.image_checksum);
    }
}

#[tokio::test]
async fn invalid_config_rejected_before_any_work() {
    let config = ScanConfig {
        concurrency: 0,
        ..Default::default()
    };
    let result = Pipeline::new(
        Arc::new(MockResolver::new()),
        Arc::new(MockRenderer::new()),
        config,
    );
    assert!(result.is_err());
}
