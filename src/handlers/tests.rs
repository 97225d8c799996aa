use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::{Config, StoreBackend};
use crate::logic::catalog::CATALOG;
use crate::logic::classifier::ClassifierRules;
use crate::models::{ClassificationRecord, CropType, NewClassification, Severity};
use crate::store::{HistoryStore, MemoryHistoryStore, StoreError};
use crate::{create_router, AppState};

fn memory_state() -> (AppState, Arc<MemoryHistoryStore>) {
    let store = Arc::new(MemoryHistoryStore::new());
    let config = Config {
        store_backend: StoreBackend::Memory,
        ..Config::default()
    };
    (AppState::new(config, store.clone()), store)
}

fn image(len: usize) -> String {
    format!("data:image/jpeg;base64,{}", "A".repeat(len))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Forwarded-For", "203.0.113.5")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn seeded_scan(session: &str) -> NewClassification {
    NewClassification {
        crop_type: CropType::Potato,
        disease_name: "Early Blight".to_string(),
        confidence_level: 85.0,
        severity: Severity::Medium,
        recommendations: vec![],
        causes: vec![],
        resources: vec![],
        image_data: image(10),
        session_id: Some(session.to_string()),
        ip_hash: None,
    }
}

// ============================================================================
// CLASSIFY
// ============================================================================

#[tokio::test]
async fn test_classify_success() {
    let (state, store) = memory_state();
    let request = post_json(
        "/classify",
        json!({ "imageData": image(5_000), "cropType": "Tomato", "sessionId": "sess-1" }),
    );

    let (status, body) = send(create_router(state), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cropType"], "Tomato");
    assert!(body["id"].is_string());
    assert!(body["timestamp"].is_string());

    let name = body["disease"].as_str().unwrap();
    let profile = CATALOG.iter().find(|p| p.name == name).unwrap();
    assert_eq!(body["severity"], profile.severity.as_str());
    assert_eq!(body["causes"].as_array().unwrap().len(), profile.causes.len());

    let confidence = body["confidence"].as_f64().unwrap();
    assert!((70.0..=96.0).contains(&confidence));

    let stored = store.list_by_session("sess-1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].image_data.len(), 1_000);
    assert_eq!(stored[0].ip_hash.as_deref().map(str::len), Some(64));
    assert!(body.get("ipHash").is_none());
}

#[tokio::test]
async fn test_classify_missing_image() {
    let (state, store) = memory_state();

    let (status, body) = send(create_router(state.clone()), post_json("/classify", json!({ "cropType": "Corn" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Image data is required");

    let (status, _) = send(create_router(state), post_json("/classify", json!({ "imageData": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_classify_invalid_image() {
    let (state, store) = memory_state();
    let cases = [
        json!({ "imageData": image(10) }),
        json!({ "imageData": "B".repeat(500) }),
        json!({ "imageData": 12345 }),
        json!({ "imageData": [image(500)] }),
    ];

    for case in cases {
        let (status, body) = send(create_router(state.clone()), post_json("/classify", case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid image data format or size");
    }
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_classify_malformed_body() {
    let (state, _) = memory_state();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(create_router(state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_crop_becomes_other() {
    let (state, _) = memory_state();

    for crop in [json!("Banana"), json!(42), Value::Null] {
        let request = post_json("/classify", json!({ "imageData": image(200), "cropType": crop }));
        let (status, body) = send(create_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cropType"], "Other");
    }
}

#[tokio::test]
async fn test_rate_limit_denies_eleventh_scan() {
    let (state, store) = memory_state();
    for _ in 0..10 {
        store.insert_at(seeded_scan("busy"), Utc::now() - Duration::minutes(1));
    }

    let request = post_json("/classify", json!({ "imageData": image(200), "sessionId": "busy" }));
    let (status, body) = send(create_router(state.clone()), request).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().starts_with("Rate limit exceeded"));
    assert_eq!(store.len(), 10);

    // Anonymous scans skip the limiter
    let request = post_json("/classify", json!({ "imageData": image(200) }));
    let (status, _) = send(create_router(state), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_ignores_old_scans() {
    let (state, store) = memory_state();
    for _ in 0..10 {
        store.insert_at(seeded_scan("returning"), Utc::now() - Duration::minutes(6));
    }

    let request = post_json("/classify", json!({ "imageData": image(200), "sessionId": "returning" }));
    let (status, _) = send(create_router(state), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_low_confidence_is_not_persisted() {
    let (mut state, store) = memory_state();
    state.classifier = ClassifierRules {
        healthy_bias: 0.0,
        disease_jitter: (-40.0, -30.0),
        disease_clamp: (0.0, 93.0),
        ..ClassifierRules::default()
    };

    let request = post_json("/classify", json!({ "imageData": image(200), "sessionId": "s" }));
    let (status, body) = send(create_router(state), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["lowConfidence"], true);
    assert_eq!(store.len(), 0);
}

struct FailingStore;

#[async_trait]
impl HistoryStore for FailingStore {
    async fn insert(&self, _new: NewClassification) -> Result<ClassificationRecord, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn count_since(&self, _session_id: &str, _since: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(0)
    }

    async fn list_by_session(&self, _session_id: &str) -> Result<Vec<ClassificationRecord>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn delete_by_session(&self, _session_id: &str) -> Result<u64, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn test_store_failure_is_500_with_message() {
    let state = AppState::new(Config::default(), Arc::new(FailingStore));

    let request = post_json("/classify", json!({ "imageData": image(200) }));
    let (status, body) = send(create_router(state.clone()), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], sqlx::Error::PoolTimedOut.to_string());

    let (status, _) = send(create_router(state), get("/history?sessionId=x")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// HISTORY
// ============================================================================

#[tokio::test]
async fn test_classify_then_list_round_trip() {
    let (state, _) = memory_state();

    let request = post_json("/classify", json!({ "imageData": image(300), "cropType": "Pepper", "sessionId": "rt" }));
    let (status, scan) = send(create_router(state.clone()), request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(create_router(state), get("/history?sessionId=rt")).await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);

    let row = &data[0];
    assert_eq!(row["id"], scan["id"]);
    assert_eq!(row["disease_name"], scan["disease"]);
    assert_eq!(row["severity"], scan["severity"]);
    assert_eq!(row["confidence_level"], scan["confidence"]);
    assert_eq!(row["recommendations"], scan["recommendations"]);
    assert_eq!(row["causes"], scan["causes"]);
    assert_eq!(row["resources"], scan["resources"]);
    assert_eq!(row["crop_type"], "Pepper");
    assert!(row.get("ip_hash").is_none());
    assert!(row.get("image_data").is_none());
}

#[tokio::test]
async fn test_list_requires_session() {
    let (state, _) = memory_state();

    let (status, body) = send(create_router(state.clone()), get("/history")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Session ID is required");

    let (status, _) = send(create_router(state), get("/history?sessionId=x&sort=sideways")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_sorted_by_severity() {
    let (state, store) = memory_state();
    let now = Utc::now();
    for (disease, severity) in [
        ("Leaf Spot", Severity::Low),
        ("Late Blight", Severity::Critical),
        ("Mosaic Virus", Severity::High),
    ] {
        let mut scan = seeded_scan("sorted");
        scan.disease_name = disease.to_string();
        scan.severity = severity;
        store.insert_at(scan, now);
    }

    let (status, body) = send(create_router(state), get("/history?sessionId=sorted&sort=severity")).await;
    assert_eq!(status, StatusCode::OK);

    let order: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["severity"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(order, vec!["Critical", "High", "Low"]);
}

#[tokio::test]
async fn test_clear_only_removes_own_session() {
    let (state, store) = memory_state();
    for _ in 0..3 {
        store.insert_at(seeded_scan("a"), Utc::now());
    }
    store.insert_at(seeded_scan("b"), Utc::now());

    let (status, body) = send(create_router(state.clone()), post_json("/history/clear", json!({ "sessionId": "a" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"], 3);

    // Idempotent
    let (status, body) = send(create_router(state.clone()), post_json("/history/clear", json!({ "sessionId": "a" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 0);

    let (_, body) = send(create_router(state), get("/history?sessionId=b")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_id_bound_matches_history_routes() {
    let (state, store) = memory_state();

    let longest = "s".repeat(128);
    let request = post_json("/classify", json!({ "imageData": image(200), "sessionId": longest }));
    let (status, _) = send(create_router(state.clone()), request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(create_router(state.clone()), get(&format!("/history?sessionId={}", longest))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let overlong = "s".repeat(129);
    let request = post_json("/classify", json!({ "imageData": image(200), "sessionId": overlong }));
    let (status, body) = send(create_router(state.clone()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Session ID must be 1-128 characters");
    assert_eq!(store.len(), 1);

    let (status, _) = send(create_router(state), get(&format!("/history?sessionId={}", overlong))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_rejects_empty_session() {
    let (state, _) = memory_state();

    let (status, body) = send(create_router(state.clone()), post_json("/history/clear", json!({ "sessionId": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Session ID must be 1-128 characters");

    let (status, _) = send(create_router(state), post_json("/history/clear", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// CORS / HEALTH
// ============================================================================

#[tokio::test]
async fn test_bare_options_is_empty_ok() {
    let (state, _) = memory_state();

    for uri in ["/classify", "/history", "/history/clear"] {
        let request = Request::builder().method(Method::OPTIONS).uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(create_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.is_null());
    }
}

#[tokio::test]
async fn test_cors_preflight_is_permissive() {
    let (state, _) = memory_state();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/classify")
        .header(header::ORIGIN, "https://crops.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = create_router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let (state, _) = memory_state();
    let (status, body) = send(create_router(state), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "memory");
    assert_eq!(body["store"]["reachable"], true);
    assert!(body["store"].get("error").is_none());
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let state = AppState::new(Config::default(), Arc::new(FailingStore));
    let (status, body) = send(create_router(state), get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"]["backend"], "postgres");
    assert_eq!(body["store"]["reachable"], false);
    assert_eq!(body["store"]["error"], sqlx::Error::PoolClosed.to_string());
}
