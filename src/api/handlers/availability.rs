use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::OverrideRequest, responses::CalendarResponse};
use crate::domain::models::availability_override::AvailabilityOverride;
use crate::domain::services::availability::build_calendar;
use crate::error::AppError;
use std::sync::Arc;
use std::collections::HashMap;
use chrono::NaiveDate;
use tracing::info;

/// Public per-date calendar for `[start_date, end_date]`.
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    let start_str = params.get("start_date").ok_or(AppError::Validation("start_date required".into()))?;
    let end_str = params.get("end_date").ok_or(AppError::Validation("end_date required".into()))?;

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start_date".into()))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end_date".into()))?;

    if end < start {
        return Err(AppError::Validation("end_date must not be before start_date".into()));
    }
    if (end - start).num_days() > 366 {
        return Err(AppError::Validation("Date range too large (max one year)".into()));
    }

    // The display range is inclusive, so bookings overlapping [start, end+1)
    // are the ones touching it.
    let bookings = state.booking_repo
        .list_active_by_range(&property.id, start, end + chrono::Duration::days(1))
        .await?;
    let overrides = state.override_repo.list_by_range(&property.id, start, end).await?;

    let days = build_calendar(&property, &bookings, &overrides, start, end);

    Ok(Json(CalendarResponse {
        property_id: property.id,
        days,
    }))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }
    if payload.price_cents.is_some_and(|p| p <= 0) {
        return Err(AppError::Validation("price_cents must be positive".into()));
    }

    let mut entity = AvailabilityOverride::new(property.id, payload.date);
    entity.is_available = payload.is_available;
    entity.price_cents = payload.price_cents;

    let saved = state.override_repo.upsert(&entity).await?;
    info!("Override upserted: property {} date {}", saved.property_id, saved.date);
    Ok(Json(saved))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }

    // Stored dates compare as ISO text, so the open-ended defaults stay
    // within four-digit years.
    let start = match params.get("start_date") {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid start_date".into()))?,
        None => NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
    };
    let end = match params.get("end_date") {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid end_date".into()))?,
        None => NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
    };

    let overrides = state.override_repo.list_by_range(&property.id, start, end).await?;
    Ok(Json(overrides))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((property_id, date)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }

    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date".into()))?;

    state.override_repo.delete(&property.id, date).await?;
    info!("Override deleted: property {} date {}", property.id, date);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
