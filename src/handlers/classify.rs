//! Classification handler

use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::{AppState, AppResult, AppError};
use crate::logic::{classifier, validate};
use crate::middleware::client::ClientOrigin;
use crate::middleware::extract::AppJson;
use crate::models::{ClassificationResult, ClassifyRequest};

/// Classify an uploaded crop photo and record the result
pub async fn classify(
    State(state): State<AppState>,
    origin: ClientOrigin,
    AppJson(req): AppJson<ClassifyRequest>,
) -> AppResult<Json<ClassificationResult>> {
    let payload = validate::image_payload(req.image_data.as_ref())
        .ok_or_else(|| AppError::ValidationError("Image data is required".to_string()))?;

    let image_data = match payload.as_str() {
        Some(data) if validate::validate_image_data(payload) => data,
        _ => {
            return Err(AppError::ValidationError(
                "Invalid image data format or size".to_string(),
            ))
        }
    };

    // Same session id bound as the history routes
    req.validate()?;

    let crop_type = validate::sanitize_crop_value(req.crop_type.as_ref());
    let session_id = req.session_id.filter(|s| !s.is_empty());

    // Anonymous callers are not rate limited
    if let Some(session) = session_id.as_deref() {
        if !state.limiter.check(state.store.as_ref(), session, Utc::now()).await? {
            return Err(AppError::RateLimited);
        }
    }

    let verdict = {
        let mut rng = rand::thread_rng();
        classifier::classify_with_rules(crop_type, &mut rng, &state.classifier)
    };

    let Some(verdict) = verdict else {
        tracing::info!("Low-confidence scan rejected for {}", crop_type);
        return Err(AppError::LowConfidence);
    };

    let new = verdict.to_new_classification(
        crop_type,
        validate::image_audit_prefix(image_data, state.config.image_audit_prefix),
        session_id,
        origin.ip_hash(),
    );

    let record = state.store.insert(new).await?;

    tracing::info!(
        "Scan {} ({}): {} at {:.1}%",
        record.id, record.crop_type, record.disease_name, record.confidence_level
    );

    Ok(Json(ClassificationResult::from(&record)))
}
