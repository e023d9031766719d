use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::dtos::requests::{AddImageRequest, CreatePropertyRequest, UpdatePropertyRequest};
use crate::domain::models::property::{NewPropertyParams, Property, PropertyImage};
use crate::domain::models::user::ROLE_GUEST;
use crate::error::AppError;
use std::sync::Arc;
use chrono_tz::Tz;
use tracing::info;

pub async fn create_property(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreatePropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if user.role == ROLE_GUEST {
        return Err(AppError::Forbidden("Only hosts can create listings".into()));
    }
    if payload.nightly_price_cents <= 0 {
        return Err(AppError::Validation("nightly_price_cents must be positive".into()));
    }
    if payload.max_guests <= 0 {
        return Err(AppError::Validation("max_guests must be positive".into()));
    }
    if payload.timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Invalid timezone".into()));
    }

    let property = Property::new(NewPropertyParams {
        host_id: user.id,
        title: payload.title,
        description: payload.description,
        location: payload.location,
        timezone: payload.timezone,
        nightly_price_cents: payload.nightly_price_cents,
        cleaning_fee_cents: payload.cleaning_fee_cents,
        service_fee_cents: payload.service_fee_cents,
        max_guests: payload.max_guests,
    });

    let created = state.property_repo.create(&property).await?;
    info!("Property created: {} by host {}", created.id, created.host_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let properties = state.property_repo.list_published().await?;
    Ok(Json(properties))
}

pub async fn list_my_properties(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let properties = state.property_repo.list_by_host(&user.id).await?;
    Ok(Json(properties))
}

pub async fn get_property(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    // Unpublished listings are only visible to their host side and admins.
    if !property.is_published {
        let visible = maybe_user
            .as_ref()
            .is_some_and(|u| u.is_admin() || property.is_managed_by(&u.id));
        if !visible {
            return Err(AppError::NotFound("Property not found".into()));
        }
    }

    let images = state.property_repo.list_images(&property.id).await?;

    let mut body = serde_json::to_value(&property).map_err(|_| AppError::Internal)?;
    body["images"] = serde_json::to_value(&images).map_err(|_| AppError::Internal)?;
    Ok(Json(body))
}

pub async fn update_property(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<UpdatePropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }

    if let Some(val) = payload.title { property.title = val; }
    if let Some(val) = payload.description { property.description = val; }
    if let Some(val) = payload.location { property.location = val; }
    if let Some(val) = payload.timezone {
        if val.parse::<Tz>().is_err() {
            return Err(AppError::Validation("Invalid timezone".into()));
        }
        property.timezone = val;
    }
    if let Some(val) = payload.nightly_price_cents {
        if val <= 0 {
            return Err(AppError::Validation("nightly_price_cents must be positive".into()));
        }
        property.nightly_price_cents = val;
    }
    if let Some(val) = payload.cleaning_fee_cents { property.cleaning_fee_cents = Some(val); }
    if let Some(val) = payload.service_fee_cents { property.service_fee_cents = Some(val); }
    if let Some(val) = payload.max_guests {
        if val <= 0 {
            return Err(AppError::Validation("max_guests must be positive".into()));
        }
        property.max_guests = val;
    }
    if let Some(val) = payload.is_published { property.is_published = val; }
    if let Some(val) = payload.manager_id {
        // Only the owner may delegate management; empty string clears it.
        if property.host_id != user.id && !user.is_admin() {
            return Err(AppError::Forbidden("Only the owner can change the manager".into()));
        }
        if val.is_empty() {
            property.manager_id = None;
        } else {
            let manager = state.user_repo.find_by_id(&val).await?
                .ok_or(AppError::NotFound("Manager user not found".into()))?;
            if manager.role == ROLE_GUEST {
                return Err(AppError::Validation("Manager must have the HOST role".into()));
            }
            property.manager_id = Some(val);
        }
    }

    let updated = state.property_repo.update(&property).await?;
    info!("Property updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && property.host_id != user.id {
        return Err(AppError::Forbidden("Not your listing".into()));
    }

    state.property_repo.delete(&property.id).await?;
    info!("Property deleted: {}", property.id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn add_image(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<AddImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }
    if !payload.url.starts_with("http://") && !payload.url.starts_with("https://") {
        return Err(AppError::Validation("Image url must be absolute".into()));
    }

    let image = PropertyImage::new(property.id, payload.url, payload.position.unwrap_or(0));
    let created = state.property_repo.add_image(&image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    let images = state.property_repo.list_images(&property.id).await?;
    Ok(Json(images))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((property_id, image_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }

    state.property_repo.delete_image(&property.id, &image_id).await?;
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
