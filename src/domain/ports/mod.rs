use crate::domain::models::{
    user::User, property::{Property, PropertyImage}, booking::Booking,
    availability_override::AvailabilityOverride, payment::Payment, job::Job,
    notification::Notification, review::Review, auth::RefreshTokenRecord,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, property: &Property) -> Result<Property, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError>;
    async fn list_published(&self) -> Result<Vec<Property>, AppError>;
    async fn list_by_host(&self, host_id: &str) -> Result<Vec<Property>, AppError>;
    async fn update(&self, property: &Property) -> Result<Property, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    async fn add_image(&self, image: &PropertyImage) -> Result<PropertyImage, AppError>;
    async fn list_images(&self, property_id: &str) -> Result<Vec<PropertyImage>, AppError>;
    async fn delete_image(&self, property_id: &str, image_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AvailabilityOverrideRepository: Send + Sync {
    async fn upsert(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError>;
    async fn list_by_range(&self, property_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError>;
    async fn delete(&self, property_id: &str, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists booking + payment + outbox jobs as one transaction. The
    /// insert is guarded against concurrently created overlapping bookings;
    /// a suppressed insert surfaces as `AppError::Conflict`.
    async fn create_with_payment(&self, booking: &Booking, payment: &Payment, jobs: Vec<Job>) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_guest(&self, guest_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_property(&self, property_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    /// Bookings in PENDING or CONFIRMED whose occupied range overlaps
    /// `[check_in, check_out)`.
    async fn list_active_by_range(&self, property_id: &str, check_in: NaiveDate, check_out: NaiveDate) -> Result<Vec<Booking>, AppError>;
    /// Applies a status change plus its payment/outbox side effects in one
    /// transaction.
    async fn transition(&self, booking_id: &str, new_status: &str, payment_status: Option<&str>, jobs: Vec<Job>) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<Payment>, AppError>;
    async fn set_provider_ref(&self, payment_id: &str, provider_ref: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, user_id: &str, id: &str) -> Result<Notification, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review, AppError>;
    async fn list_by_property(&self, property_id: &str) -> Result<Vec<Review>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Returns the provider's charge reference.
    async fn capture(&self, payment: &Payment) -> Result<String, AppError>;
    async fn refund(&self, payment: &Payment) -> Result<(), AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError>;
}
