//! Classification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::crop::{CropType, Severity};

/// Product or reference link attached to a diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// A stored scan result. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRecord {
    pub id: Uuid,
    pub crop_type: CropType,
    pub disease_name: String,
    pub confidence_level: f64,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub causes: Vec<String>,
    pub resources: Vec<Resource>,
    pub session_id: Option<String>,
    #[serde(skip_serializing)]
    pub image_data: String,
    #[serde(skip_serializing)]
    pub ip_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; `id` and `created_at` are assigned by the store
#[derive(Debug, Clone)]
pub struct NewClassification {
    pub crop_type: CropType,
    pub disease_name: String,
    pub confidence_level: f64,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub causes: Vec<String>,
    pub resources: Vec<Resource>,
    pub image_data: String,
    pub session_id: Option<String>,
    pub ip_hash: Option<String>,
}

impl NewClassification {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> ClassificationRecord {
        ClassificationRecord {
            id,
            crop_type: self.crop_type,
            disease_name: self.disease_name,
            confidence_level: self.confidence_level,
            severity: self.severity,
            recommendations: self.recommendations,
            causes: self.causes,
            resources: self.resources,
            session_id: self.session_id,
            image_data: self.image_data,
            ip_hash: self.ip_hash,
            created_at,
        }
    }
}

/// Body of `POST /classify`.
///
/// `imageData` and `cropType` stay untyped so that wrong JSON types are
/// reported by the validator instead of the JSON extractor. An empty
/// `sessionId` means anonymous, so only the upper bound applies here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub image_data: Option<serde_json::Value>,
    pub crop_type: Option<serde_json::Value>,
    #[validate(length(max = 128, message = "Session ID must be 1-128 characters"))]
    pub session_id: Option<String>,
}

/// Client-visible view of a fresh classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub id: Uuid,
    pub disease: String,
    pub confidence: f64,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub causes: Vec<String>,
    pub resources: Vec<Resource>,
    pub crop_type: CropType,
    pub timestamp: DateTime<Utc>,
}

impl From<&ClassificationRecord> for ClassificationResult {
    fn from(record: &ClassificationRecord) -> Self {
        Self {
            id: record.id,
            disease: record.disease_name.clone(),
            confidence: record.confidence_level,
            severity: record.severity,
            recommendations: record.recommendations.clone(),
            causes: record.causes.clone(),
            resources: record.resources.clone(),
            crop_type: record.crop_type,
            timestamp: record.created_at,
        }
    }
}

/// History ordering options offered by the history view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistorySort {
    DateDesc,
    DateAsc,
    ConfidenceDesc,
    ConfidenceAsc,
    /// Most severe first
    Severity,
}

impl HistorySort {
    pub fn apply(&self, records: &mut [ClassificationRecord]) {
        match self {
            HistorySort::DateDesc => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            HistorySort::DateAsc => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            HistorySort::ConfidenceDesc => {
                records.sort_by(|a, b| b.confidence_level.total_cmp(&a.confidence_level))
            }
            HistorySort::ConfidenceAsc => {
                records.sort_by(|a, b| a.confidence_level.total_cmp(&b.confidence_level))
            }
            HistorySort::Severity => records.sort_by(|a, b| b.severity.cmp(&a.severity)),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[validate(
        required(message = "Session ID is required"),
        length(min = 1, max = 128, message = "Session ID must be 1-128 characters")
    )]
    pub session_id: Option<String>,
    pub sort: Option<HistorySort>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<ClassificationRecord>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryRequest {
    #[validate(
        required(message = "Session ID is required"),
        length(min = 1, max = 128, message = "Session ID must be 1-128 characters")
    )]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub deleted: u64,
}
