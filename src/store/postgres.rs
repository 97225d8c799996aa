//! PostgreSQL history store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{HistoryStore, StoreError};
use crate::models::{ClassificationRecord, NewClassification, Resource};

/// Row shape of `disease_classifications`
#[derive(Debug, FromRow)]
struct ClassificationRow {
    id: Uuid,
    crop_type: String,
    disease_name: String,
    confidence_level: f64,
    severity: String,
    recommendations: Vec<String>,
    causes: Vec<String>,
    resources: Json<Vec<Resource>>,
    image_data: String,
    session_id: Option<String>,
    ip_hash: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClassificationRow> for ClassificationRecord {
    type Error = StoreError;

    fn try_from(row: ClassificationRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt { id: row.id, reason };

        Ok(ClassificationRecord {
            id: row.id,
            crop_type: row.crop_type.parse().map_err(corrupt)?,
            severity: row.severity.parse().map_err(corrupt)?,
            disease_name: row.disease_name,
            confidence_level: row.confidence_level,
            recommendations: row.recommendations,
            causes: row.causes,
            resources: row.resources.0,
            image_data: row.image_data,
            session_id: row.session_id,
            ip_hash: row.ip_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, new: NewClassification) -> Result<ClassificationRecord, StoreError> {
        let row = sqlx::query_as::<_, ClassificationRow>(
            r#"
            INSERT INTO disease_classifications
                (crop_type, disease_name, confidence_level, severity, recommendations, causes, resources, image_data, session_id, ip_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#
        )
        .bind(new.crop_type.as_str())
        .bind(&new.disease_name)
        .bind(new.confidence_level)
        .bind(new.severity.as_str())
        .bind(&new.recommendations)
        .bind(&new.causes)
        .bind(Json(&new.resources))
        .bind(&new.image_data)
        .bind(&new.session_id)
        .bind(&new.ip_hash)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn count_since(&self, session_id: &str, since: DateTime<Utc>) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM disease_classifications
            WHERE session_id = $1 AND created_at >= $2
            "#
        )
        .bind(session_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ClassificationRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ClassificationRow>(
            "SELECT * FROM disease_classifications WHERE session_id = $1"
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ClassificationRecord::try_from).collect()
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM disease_classifications WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
