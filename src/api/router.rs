use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{assistant, auth, availability, booking, health, notification, property, review};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Listings
        .route("/api/v1/properties", get(property::list_properties).post(property::create_property))
        .route("/api/v1/my/properties", get(property::list_my_properties))
        .route("/api/v1/properties/{property_id}", get(property::get_property).put(property::update_property).delete(property::delete_property))
        .route("/api/v1/properties/{property_id}/images", get(property::list_images).post(property::add_image))
        .route("/api/v1/properties/{property_id}/images/{image_id}", delete(property::delete_image))

        // Calendar & Overrides
        .route("/api/v1/properties/{property_id}/availability", get(availability::get_calendar))
        .route("/api/v1/properties/{property_id}/overrides", get(availability::list_overrides).post(availability::upsert_override))
        .route("/api/v1/properties/{property_id}/overrides/{date}", delete(availability::delete_override))

        // Bookings
        .route("/api/v1/properties/{property_id}/bookings", get(booking::list_property_bookings).post(booking::create_booking))
        .route("/api/v1/my/bookings", get(booking::list_my_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/status", put(booking::update_booking_status))
        .route("/api/v1/admin/bookings", get(booking::list_all_bookings))

        // Notifications
        .route("/api/v1/my/notifications", get(notification::list_my_notifications))
        .route("/api/v1/notifications/{notification_id}/read", post(notification::mark_read))

        // Reviews
        .route("/api/v1/properties/{property_id}/reviews", get(review::list_reviews).post(review::create_review))

        // Assistant
        .route("/api/v1/properties/{property_id}/assistant", post(assistant::ask_assistant))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
