use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-property, per-date record taking precedence over the default
/// price/availability for that single date. Unique on (property_id, date).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityOverride {
    pub id: String,
    pub property_id: String,
    pub date: NaiveDate,
    pub is_available: bool,
    pub price_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityOverride {
    pub fn new(property_id: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            property_id,
            date,
            is_available: true,
            price_cents: None,
            created_at: Utc::now(),
        }
    }
}
