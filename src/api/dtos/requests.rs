use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub timezone: String,
    pub nightly_price_cents: i64,
    pub cleaning_fee_cents: Option<i64>,
    pub service_fee_cents: Option<i64>,
    pub max_guests: i32,
}

#[derive(Deserialize)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub nightly_price_cents: Option<i64>,
    pub cleaning_fee_cents: Option<i64>,
    pub service_fee_cents: Option<i64>,
    pub max_guests: Option<i32>,
    pub is_published: Option<bool>,
    pub manager_id: Option<String>,
}

#[derive(Deserialize)]
pub struct OverrideRequest {
    pub date: NaiveDate,
    pub is_available: bool,
    pub price_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct AddImageRequest {
    pub url: String,
    pub position: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: i32,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub booking_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct AssistantRequest {
    pub question: String,
}
