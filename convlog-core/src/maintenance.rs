//! Destructive offline maintenance.
//!
//! Only operator tooling (`convlog-cli`) imports this module; the HTTP
//! server crate must never reference it, which keeps the flush unroutable
//! from the public API.

use sqlx::PgPool;

use crate::error::ConvlogError;

/// Delete every conversation log row, irreversibly. Returns the number of
/// rows removed. Runs as a single bulk delete in one transaction; a failure
/// rolls back and leaves the store unchanged.
pub async fn flush_all(pool: &PgPool) -> Result<u64, ConvlogError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM conversation_logs")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Flushed conversation logs, {} rows deleted", result.rows_affected());

    Ok(result.rows_affected())
}
