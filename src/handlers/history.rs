//! History handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::{AppState, AppResult, AppError};
use crate::middleware::extract::{AppJson, AppQuery};
use crate::models::{ClearHistoryRequest, ClearHistoryResponse, HistoryQuery, HistoryResponse};

/// List a session's scans
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HistoryQuery>,
) -> AppResult<Json<HistoryResponse>> {
    query.validate()?;
    let session_id = required_session(query.session_id)?;

    let mut data = state.store.list_by_session(&session_id).await?;
    if let Some(sort) = query.sort {
        sort.apply(&mut data);
    }

    Ok(Json(HistoryResponse { data }))
}

/// Delete every scan of a session
pub async fn clear(
    State(state): State<AppState>,
    AppJson(req): AppJson<ClearHistoryRequest>,
) -> AppResult<Json<ClearHistoryResponse>> {
    req.validate()?;
    let session_id = required_session(req.session_id)?;

    let deleted = state.store.delete_by_session(&session_id).await?;

    tracing::info!("Cleared {} scans for session {}", deleted, session_id);

    Ok(Json(ClearHistoryResponse {
        success: true,
        deleted,
    }))
}

fn required_session(session_id: Option<String>) -> AppResult<String> {
    session_id.ok_or_else(|| AppError::ValidationError("Session ID is required".to_string()))
}
