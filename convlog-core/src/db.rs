use crate::config::ConvlogConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn create_pool(config: &ConvlogConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url())
        .await
}

pub async fn health_check(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}

/// Create the `conversation_logs` table and its lookup indexes if absent.
/// Called once at server startup; there is no migration tooling.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversation_logs (
            id BIGSERIAL PRIMARY KEY,
            conversation_id TEXT NOT NULL,
            user_id TEXT,
            content TEXT NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
            message_metadata JSONB
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_conversation_logs_conversation_id
         ON conversation_logs (conversation_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_conversation_logs_user_id
         ON conversation_logs (user_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
