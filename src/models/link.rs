use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single shortened link. Timestamps are UNIX epoch seconds;
/// `last_clicked` stays `None` until the first resolution.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub total_clicks: i64,
    pub last_clicked: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub target_url: String,
    pub code: Option<String>,
}
