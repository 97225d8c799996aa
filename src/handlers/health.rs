//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    store: StoreHealth,
    timestamp: i64,
}

#[derive(Serialize)]
pub struct StoreHealth {
    backend: &'static str,
    reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Liveness plus a round trip to the history store. Unreachable store → 503.
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let error = match state.store.ping().await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!("Health check: {} store unreachable: {}", state.store_kind, e);
            Some(e.to_string())
        }
    };

    let (status, code) = match error {
        None => ("healthy", StatusCode::OK),
        Some(_) => ("degraded", StatusCode::SERVICE_UNAVAILABLE),
    };

    let store = StoreHealth {
        backend: state.store_kind,
        reachable: error.is_none(),
        error,
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store,
            timestamp: chrono::Utc::now().timestamp(),
        }),
    )
}
