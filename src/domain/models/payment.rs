use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount_cents: i64,
    pub status: String, // "PENDING", "COMPLETED", "REFUNDED"
    pub provider_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(booking_id: String, amount_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id,
            amount_cents,
            status: "PENDING".to_string(),
            provider_ref: None,
            created_at: Utc::now(),
        }
    }
}
