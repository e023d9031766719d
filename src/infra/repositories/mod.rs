pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_property_repo;
pub mod sqlite_override_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_job_repo;
pub mod sqlite_review_repo;

pub mod postgres_user_repo;
pub mod postgres_auth_repo;
pub mod postgres_property_repo;
pub mod postgres_override_repo;
pub mod postgres_booking_repo;
pub mod postgres_payment_repo;
pub mod postgres_notification_repo;
pub mod postgres_job_repo;
pub mod postgres_review_repo;
