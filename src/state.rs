use std::sync::Arc;
use crate::domain::ports::{
    UserRepository, AuthRepository, PropertyRepository, AvailabilityOverrideRepository,
    BookingRepository, PaymentRepository, NotificationRepository, JobRepository,
    ReviewRepository, EmailService, PaymentGateway, LlmService,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub property_repo: Arc<dyn PropertyRepository>,
    pub override_repo: Arc<dyn AvailabilityOverrideRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub llm_service: Arc<dyn LlmService>,
    pub templates: Arc<Tera>,
}
