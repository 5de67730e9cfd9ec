// Integration tests for the Console session lifecycle using wiremock.
//
// The stream endpoint serves a canned SSE body; the reconnect loop may
// replay it, which doubles as coverage for merge idempotence.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vigil_core::{
    Console, ConsoleConfig, CoreError, ReviewOutcome, SessionState, Severity, SeverityFilter,
    StatusFilter, TriageView,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn console_for(server: &MockServer) -> Console {
    let config = ConsoleConfig {
        url: url::Url::parse(&server.uri()).unwrap(),
        ..ConsoleConfig::default()
    };
    Console::new(config).unwrap()
}

fn bulk_events() -> serde_json::Value {
    json!([
        {
            "id": "1",
            "video_id": "vid1",
            "event_type": "fight_detected",
            "event_description": "fight near entrance",
            "confidence": 0.82,
            "status": "pending",
            "severity": "high",
            "timestamp_start": 42.0
        },
        {
            "id": "2",
            "video_id": "vid1",
            "event_type": "fight_detected",
            "event_description": "fight near entrance",
            "confidence": 0.82,
            "status": "pending",
            "severity": "high",
            "timestamp_start": 42.0
        },
        {
            "id": "3",
            "video_id": "vid1",
            "event_type": "loitering",
            "event_description": "person lingering by the gate",
            "confidence": 0.55,
            "status": "pending",
            "timestamp_start": 90.0
        }
    ])
}

async fn mount_bulk_fetch(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulk_events()))
        .mount(server)
        .await;
}

/// Serve one SSE frame then close; reconnects replay the same frame.
async fn mount_stream(server: &MockServer, frame: &str) {
    Mock::given(method("GET"))
        .and(path("/api/events/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(frame.as_bytes().to_vec(), "text/event-stream")
                .set_delay(Duration::from_millis(50)),
        )
        .mount(server)
        .await;
}

// ── Activation ──────────────────────────────────────────────────────

#[tokio::test]
async fn activate_seeds_a_deduped_alert_set() {
    let server = MockServer::start().await;
    mount_bulk_fetch(&server).await;
    mount_stream(&server, "").await;

    let console = console_for(&server).await;
    console.activate("vid1").await.unwrap();

    // Duplicate fingerprint collapsed; first-seen id wins.
    let snapshot = console.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].id, "1");
    assert_eq!(snapshot[1].id, "3");

    assert_eq!(
        *console.session_state().borrow(),
        SessionState::Live { video_id: "vid1".into() }
    );
    assert_eq!(console.session().last_video_id().as_deref(), Some("vid1"));

    console.deactivate().await;
    assert!(console.snapshot().is_empty());
    assert_eq!(*console.session_state().borrow(), SessionState::Inactive);
}

#[tokio::test]
async fn failed_bulk_fetch_leaves_the_set_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .mount(&server)
        .await;

    let console = console_for(&server).await;
    let err = console.activate("vid1").await.unwrap_err();

    assert!(matches!(err, CoreError::Api { .. }));
    assert!(console.snapshot().is_empty());
    assert_eq!(*console.session_state().borrow(), SessionState::Failed);
}

#[tokio::test]
async fn push_event_merges_into_the_live_set() {
    let server = MockServer::start().await;
    mount_bulk_fetch(&server).await;
    mount_stream(
        &server,
        concat!(
            "event: alert\n",
            "data: {\"id\":\"9\",\"video_id\":\"vid1\",",
            "\"event_type\":\"fire_detected\",",
            "\"event_description\":\"smoke rising\",",
            "\"confidence\":0.9,\"timestamp_start\":120.0}\n",
            "\n"
        ),
    )
    .await;

    let console = console_for(&server).await;
    let mut merged = console.merged_alerts();
    console.activate("vid1").await.unwrap();

    let alert = tokio::time::timeout(Duration::from_secs(5), merged.recv())
        .await
        .expect("push event within the timeout")
        .expect("merge loop alive");

    assert_eq!(alert.id, "9");
    assert_eq!(alert.kind, "Fire Detected");
    assert!(console.store().contains_id("9"));

    console.deactivate().await;
}

// ── Review lifecycle ────────────────────────────────────────────────

#[tokio::test]
async fn confirm_resolves_the_alert_out_of_the_set() {
    let server = MockServer::start().await;
    mount_bulk_fetch(&server).await;
    mount_stream(&server, "").await;

    Mock::given(method("POST"))
        .and(path("/api/events/1/review"))
        .and(body_json(json!({"status": "confirmed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "video_id": "vid1",
            "event_type": "fight_detected",
            "event_description": "fight near entrance",
            "status": "confirmed",
            "confidence": 0.82,
            "timestamp_start": 42.0
        })))
        .mount(&server)
        .await;

    let console = console_for(&server).await;
    console.activate("vid1").await.unwrap();
    assert!(console.store().contains_id("1"));

    let resolved = console.confirm("1").await.unwrap();
    assert_eq!(resolved.id, "1");
    assert!(!console.store().contains_id("1"));
    assert_eq!(console.store().len(), 1);

    console.deactivate().await;
}

#[tokio::test]
async fn failed_dismiss_leaves_membership_unchanged() {
    let server = MockServer::start().await;
    mount_bulk_fetch(&server).await;
    mount_stream(&server, "").await;

    Mock::given(method("POST"))
        .and(path("/api/events/3/review"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Event not found"})),
        )
        .mount(&server)
        .await;

    let console = console_for(&server).await;
    console.activate("vid1").await.unwrap();

    let err = console.dismiss("3").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(console.store().contains_id("3"), "failed review must not touch local state");
    assert_eq!(console.store().len(), 2);

    console.deactivate().await;
}

#[tokio::test]
async fn submit_review_maps_the_verdict_to_a_disposition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/events/7/review"))
        .and(body_json(json!({
            "status": "dismissed",
            "severity": "low",
            "reviewer_notes": "camera glare, not a fight"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "7",
            "event_type": "fight_detected",
            "status": "dismissed",
            "timestamp_start": 12.0
        })))
        .mount(&server)
        .await;

    let console = console_for(&server).await;
    let resolved = console
        .submit_review(
            "7",
            &ReviewOutcome {
                was_correct: false,
                severity: Some(Severity::Low),
                notes: Some("camera glare, not a fight".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(resolved.id, "7");
}

// ── Ranked reads & search cache ─────────────────────────────────────

#[tokio::test]
async fn triage_view_ranks_the_live_set() {
    let server = MockServer::start().await;
    mount_bulk_fetch(&server).await;
    mount_stream(&server, "").await;

    let console = console_for(&server).await;
    console.activate("vid1").await.unwrap();

    // "person lingering" carries a human keyword, so the loitering alert
    // outranks the higher-severity fight.
    let view = console.triage_view(&SeverityFilter::All, &StatusFilter::All);
    match view {
        TriageView::Ranked(alerts) => {
            assert_eq!(alerts[0].id, "3");
            assert_eq!(alerts[1].id, "1");
        }
        other => panic!("expected ranked view, got {other:?}"),
    }

    // No LOW alerts exist, which is distinct from an empty set.
    let view = console.triage_view(
        &SeverityFilter::Only(Severity::Low),
        &StatusFilter::All,
    );
    assert_eq!(view, TriageView::NoMatches { total: 2 });

    console.deactivate().await;
}

#[tokio::test]
async fn ask_search_caches_the_answer_per_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "At 1:28 two people were arguing near the gate.",
            "results": [
                {
                    "event_type": "Context",
                    "event_description": "two people arguing",
                    "status": "context",
                    "timestamp_start": 88.0,
                    "confidence": 1.0
                }
            ]
        })))
        .mount(&server)
        .await;

    let console = console_for(&server).await;
    let outcome = console
        .search(&vigil_api::models::SearchRequest {
            query: Some("what happened at 1:30".into()),
            video_id: Some("vid1".into()),
            mode: Some(vigil_api::models::SearchMode::Ask),
            limit: Some(8),
            ..vigil_api::models::SearchRequest::default()
        })
        .await
        .unwrap();

    assert!(outcome.answer.starts_with("At 1:28"));
    assert_eq!(outcome.rows.len(), 1);
    assert!(outcome.rows[0].is_context);

    let cached = console.cached_ask("vid1").expect("cached after ask search");
    assert_eq!(cached.query, "what happened at 1:30");
    assert_eq!(cached.answer, outcome.answer);
    assert!(console.cached_ask("vid2").is_none());
}
