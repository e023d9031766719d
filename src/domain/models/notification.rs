use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub booking_id: String,
    pub kind: String, // "BOOKING_REQUESTED" or "STATUS_CHANGED"
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: String, booking_id: String, kind: &str, message: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            booking_id,
            kind: kind.to_string(),
            message,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
