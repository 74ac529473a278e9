use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One stored message/transcript event tied to a conversation and optional user.
///
/// The metadata column is named `message_metadata` in the schema; queries
/// alias it to `metadata` so the model and the wire format agree.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationLog {
    pub id: i64,
    pub conversation_id: String,
    pub user_id: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}

/// Insert payload for [`ConversationLog`]. `id` is assigned by the store;
/// `timestamp` defaults to UTC now when not supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversationLog {
    pub conversation_id: String,
    pub user_id: Option<String>,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

/// Per-UTC-calendar-day record count for the weekly report.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}
