use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateReviewRequest;
use crate::domain::models::review::Review;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("rating must be between 1 and 5".into()));
    }

    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    let booking = state.booking_repo.find_by_id(&payload.booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.guest_id != user.id {
        return Err(AppError::Forbidden("Only the guest of the stay can review it".into()));
    }
    if booking.property_id != property.id {
        return Err(AppError::Validation("Booking does not belong to this property".into()));
    }
    if booking.status != "COMPLETED" {
        return Err(AppError::Validation("Only completed stays can be reviewed".into()));
    }

    let review = Review::new(property.id, booking.id, user.id, payload.rating, payload.comment);
    let created = state.review_repo.create(&review).await?;
    info!("Review created: {} for property {}", created.id, created.property_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    let reviews = state.review_repo.list_by_property(&property.id).await?;
    Ok(Json(reviews))
}
