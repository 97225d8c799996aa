//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Simple query protocol: the schema holds several statements
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Scan history (append-only; removed only by session clear)
CREATE TABLE IF NOT EXISTS disease_classifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    crop_type VARCHAR(20) NOT NULL,
    disease_name VARCHAR(100) NOT NULL,
    confidence_level DOUBLE PRECISION NOT NULL CHECK (confidence_level BETWEEN 0 AND 100),
    severity VARCHAR(20) NOT NULL,
    recommendations TEXT[] NOT NULL DEFAULT '{}',
    causes TEXT[] NOT NULL DEFAULT '{}',
    resources JSONB NOT NULL DEFAULT '[]',
    image_data TEXT NOT NULL,
    session_id VARCHAR(128),
    ip_hash VARCHAR(64),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_classifications_session_created
    ON disease_classifications(session_id, created_at);
"#;
