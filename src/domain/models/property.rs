use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: String,
    pub host_id: String,
    pub manager_id: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub timezone: String,
    pub nightly_price_cents: i64,
    pub cleaning_fee_cents: Option<i64>,
    pub service_fee_cents: Option<i64>,
    pub max_guests: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewPropertyParams {
    pub host_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub timezone: String,
    pub nightly_price_cents: i64,
    pub cleaning_fee_cents: Option<i64>,
    pub service_fee_cents: Option<i64>,
    pub max_guests: i32,
}

impl Property {
    pub fn new(params: NewPropertyParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            host_id: params.host_id,
            manager_id: None,
            title: params.title,
            description: params.description,
            location: params.location,
            timezone: params.timezone,
            nightly_price_cents: params.nightly_price_cents,
            cleaning_fee_cents: params.cleaning_fee_cents,
            service_fee_cents: params.service_fee_cents,
            max_guests: params.max_guests,
            is_published: false,
            created_at: Utc::now(),
        }
    }

    /// True when `user_id` is the owner or the delegated manager.
    pub fn is_managed_by(&self, user_id: &str) -> bool {
        self.host_id == user_id || self.manager_id.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PropertyImage {
    pub id: String,
    pub property_id: String,
    pub url: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl PropertyImage {
    pub fn new(property_id: String, url: String, position: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            property_id,
            url,
            position,
            created_at: Utc::now(),
        }
    }
}
