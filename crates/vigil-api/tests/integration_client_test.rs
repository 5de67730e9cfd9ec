// Integration tests for `ConsoleClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vigil_api::models::{
    AnalyticsQuery, EventQuery, ReviewDisposition, ReviewRequest, SearchMode, SearchRequest,
    StartMonitoring,
};
use vigil_api::transport::TransportConfig;
use vigil_api::{ConsoleClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ConsoleClient) {
    let server = MockServer::start().await;
    let base = url::Url::parse(&server.uri()).unwrap();
    let client = ConsoleClient::new(base, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_events_with_filters() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "id": "ev1",
            "video_id": "vid1",
            "event_type": "fight_detected",
            "event_description": "fight near entrance",
            "confidence": 0.82,
            "status": "pending",
            "severity": "high",
            "timestamp_start": 42.0
        },
        {
            "id": "ev2",
            "video_id": "vid1",
            "event_type": "loitering",
            "confidence": 0.55,
            "status": "pending",
            "timestamp_start": 90.0
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(query_param("video_id", "vid1"))
        .and(query_param("status", "pending"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let events = client
        .list_events(&EventQuery {
            status: Some("pending".into()),
            video_id: Some("vid1".into()),
            limit: Some(100),
            ..EventQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_id(), Some("ev1"));
    assert_eq!(events[0].event_type.as_deref(), Some("fight_detected"));
    assert_eq!(events[0].confidence, Some(0.82));
    assert_eq!(events[1].event_id(), Some("ev2"));
}

#[tokio::test]
async fn test_review_event_sends_disposition() {
    let (server, client) = setup().await;

    let expected_body = json!({
        "status": "confirmed",
        "severity": "High",
        "reviewer_notes": "verified on playback"
    });

    let response = json!({
        "id": "ev1",
        "event_type": "fight_detected",
        "status": "confirmed",
        "severity": "High",
        "reviewer_notes": "verified on playback"
    });

    Mock::given(method("POST"))
        .and(path("/api/events/ev1/review"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .mount(&server)
        .await;

    let updated = client
        .review_event(
            "ev1",
            &ReviewRequest {
                status: ReviewDisposition::Confirmed,
                severity: Some("High".into()),
                reviewer_notes: Some("verified on playback".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status.as_deref(), Some("confirmed"));
    assert_eq!(updated.reviewer_notes.as_deref(), Some("verified on playback"));
}

#[tokio::test]
async fn test_search_ask_mode() {
    let (server, client) = setup().await;

    let response = json!({
        "answer": "Most relevant moments near 1:30: 1:28 -- two people arguing",
        "results": [
            {
                "id": "ctx1",
                "event_type": "Context",
                "event_description": "two people arguing",
                "status": "context",
                "timestamp_start": 88.0,
                "confidence": 1.0
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({
            "query": "what happened at 1:30",
            "video_id": "vid1",
            "mode": "ask",
            "limit": 8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .mount(&server)
        .await;

    let result = client
        .search(&SearchRequest {
            query: Some("what happened at 1:30".into()),
            video_id: Some("vid1".into()),
            mode: Some(SearchMode::Ask),
            limit: Some(8),
            ..SearchRequest::default()
        })
        .await
        .unwrap();

    assert!(result.answer.starts_with("Most relevant moments"));
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].status.as_deref(), Some("context"));
}

#[tokio::test]
async fn test_analytics_date_params() {
    let (server, client) = setup().await;

    let response = json!({
        "summary": {
            "totalEvents": 40, "confirmed": 12, "dismissed": 8,
            "aiAccuracy": 60, "avgConfidence": 77
        },
        "eventStats": [
            {"eventType": "Fight Detected", "count": 25, "confirmed": 9, "accuracy": 64},
            {"eventType": "Loitering", "count": 15, "confirmed": 3, "accuracy": 50}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .and(query_param("from_date", "2026-02-01"))
        .and(query_param("to_date", "2026-02-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .mount(&server)
        .await;

    let report = client
        .analytics(&AnalyticsQuery {
            from_date: chrono::NaiveDate::from_ymd_opt(2026, 2, 1),
            to_date: chrono::NaiveDate::from_ymd_opt(2026, 2, 10),
            video_id: None,
        })
        .await
        .unwrap();

    assert_eq!(report.summary.total_events, 40);
    assert_eq!(report.event_stats.len(), 2);
    assert_eq!(report.event_stats[0].event_type, "Fight Detected");
}

#[tokio::test]
async fn test_video_and_processing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/videos/vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "vid1",
            "filename": "abc_entrance.mp4",
            "original_name": "entrance.mp4",
            "use_case": "campus-safety",
            "status": "processing",
            "chunk_count": 10,
            "chunks_processed": 4,
            "duration_seconds": 300.0,
            "source_url": "/api/videos/vid1/source"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/videos/vid1/processing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "progress": 40.0,
            "chunksAnalyzed": 4,
            "totalChunks": 10,
            "failedChunks": 1
        })))
        .mount(&server)
        .await;

    let video = client.video("vid1").await.unwrap();
    assert_eq!(video.id, "vid1");
    assert_eq!(video.use_case.as_deref(), Some("campus-safety"));
    assert_eq!(video.chunks_processed, Some(4));

    let processing = client.processing("vid1").await.unwrap();
    assert!((processing.progress - 40.0).abs() < f64::EPSILON);
    assert_eq!(processing.total_chunks, 10);
    assert_eq!(processing.failed_chunks, 1);
}

#[tokio::test]
async fn test_start_and_stop_monitoring() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/start-monitoring"))
        .and(body_json(json!({
            "video_id": "vid1",
            "use_case": "campus-safety",
            "chunk_duration_seconds": 30
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "started", "video_id": "vid1"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/stop-monitoring"))
        .and(query_param("video_id", "vid1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "stopped", "video_id": "vid1"})),
        )
        .mount(&server)
        .await;

    let started = client
        .start_monitoring(&StartMonitoring {
            video_id: "vid1".into(),
            use_case: Some("campus-safety".into()),
            chunk_duration_seconds: Some(30),
        })
        .await
        .unwrap();
    assert_eq!(started.status, "started");

    let stopped = client.stop_monitoring("vid1").await.unwrap();
    assert_eq!(stopped.status, "stopped");
}

#[tokio::test]
async fn test_upload_video_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video_id": "vid9",
            "filename": "abcd_clip.mp4",
            "use_case": "campus-safety",
            "status": "uploaded"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("clip.mp4");
    std::fs::write(&file_path, b"not really mp4 bytes").unwrap();

    let receipt = client
        .upload_video(&file_path, "campus-safety")
        .await
        .unwrap();

    assert_eq!(receipt.video_id, "vid9");
    assert_eq!(receipt.status, "uploaded");
}

#[tokio::test]
async fn test_use_cases_and_health() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/use-cases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "key": "campus-safety",
                "name": "Campus Safety",
                "events": ["fight_detected", "medical_emergency"],
                "context": "Monitor campus common areas."
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let catalog = client.use_cases().await.unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].key, "campus-safety");
    assert_eq!(catalog[0].events.len(), 2);

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_404_event_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/events/missing/review"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Event not found"})),
        )
        .mount(&server)
        .await;

    let result = client
        .review_event(
            "missing",
            &ReviewRequest {
                status: ReviewDisposition::Dismissed,
                severity: None,
                reviewer_notes: None,
            },
        )
        .await;

    let err = result.unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::Api {
            status,
            ref message,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Event not found");
        }
        other => panic!("expected Api 404 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_409_monitoring_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/start-monitoring"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"detail": "Monitoring already started"})),
        )
        .mount(&server)
        .await;

    let result = client
        .start_monitoring(&StartMonitoring {
            video_id: "vid1".into(),
            use_case: None,
            chunk_duration_seconds: None,
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.is_conflict());
    match err {
        Error::Api { status, .. } => assert_eq!(status, 409),
        other => panic!("expected Api 409 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_events(&EventQuery::default()).await;

    match result {
        Err(Error::Api { status, .. }) => assert_eq!(status, 500),
        other => panic!("expected Api 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_events(&EventQuery::default()).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
