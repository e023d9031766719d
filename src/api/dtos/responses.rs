use serde::Serialize;
use crate::domain::models::{booking::Booking, payment::Payment, property::Property};
use crate::domain::services::availability::DayAvailability;

#[derive(Serialize)]
pub struct BookingDetailResponse {
    pub booking: Booking,
    pub property: Property,
    pub payments: Vec<Payment>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub property_id: String,
    pub days: Vec<DayAvailability>,
}

#[derive(Serialize)]
pub struct AssistantResponse {
    pub answer: String,
}
