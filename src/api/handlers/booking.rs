use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::{CreateBookingRequest, UpdateBookingStatusRequest}, responses::BookingDetailResponse};
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::models::job::Job;
use crate::domain::models::payment::Payment;
use crate::domain::services::availability::{first_blocked_date, has_overlap, total_cents};
use crate::domain::services::lifecycle::{self, Actor, BookingStatus};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

fn today_in(timezone: &str) -> NaiveDate {
    let tz: Tz = timezone.parse().unwrap_or(chrono_tz::UTC);
    Utc::now().with_timezone(&tz).date_naive()
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: Starting for property {}", property_id);

    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !property.is_published {
        return Err(AppError::Validation("Property is not open for booking".into()));
    }
    if property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Hosts cannot book their own listing".into()));
    }
    if payload.check_out <= payload.check_in {
        return Err(AppError::Validation("check_out must be after check_in".into()));
    }
    if payload.check_in < today_in(&property.timezone) {
        return Err(AppError::Validation("check_in must not be in the past".into()));
    }
    if payload.guest_count <= 0 || payload.guest_count > property.max_guests {
        return Err(AppError::Validation(format!(
            "guest_count must be between 1 and {}", property.max_guests
        )));
    }

    let existing = state.booking_repo
        .list_active_by_range(&property.id, payload.check_in, payload.check_out)
        .await?;
    if has_overlap(&existing, payload.check_in, payload.check_out) {
        return Err(AppError::Conflict("Requested dates are unavailable".into()));
    }

    let overrides = state.override_repo
        .list_by_range(&property.id, payload.check_in, payload.check_out)
        .await?;
    if let Some(date) = first_blocked_date(&overrides, payload.check_in, payload.check_out) {
        warn!("Booking rejected: date {} is blocked by the host", date);
        return Err(AppError::Conflict("Requested dates are unavailable".into()));
    }

    let total = total_cents(&property, &overrides, payload.check_in, payload.check_out);

    let booking = Booking::new(NewBookingParams {
        property_id: property.id.clone(),
        guest_id: user.id.clone(),
        check_in: payload.check_in,
        check_out: payload.check_out,
        guest_count: payload.guest_count,
        total_cents: total,
    });
    let payment = Payment::new(booking.id.clone(), total);
    let job = Job::new("BOOKING_REQUESTED", booking.id.clone(), property.host_id.clone(), Utc::now());

    info!("create_booking: Inserting booking into DB...");
    let created = state.booking_repo.create_with_payment(&booking, &payment, vec![job]).await?;
    info!("Booking requested: {} for property {} ({} nights, {} cents)",
        created.id, property.id, created.nights(), created.total_cents);

    let payments = state.payment_repo.list_by_booking(&created.id).await?;

    Ok((StatusCode::CREATED, Json(BookingDetailResponse {
        booking: created,
        property,
        payments,
    })))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_guest(&user.id).await?;
    Ok(Json(bookings))
}

pub async fn list_property_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(property_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !user.is_admin() && !property.is_managed_by(&user.id) {
        return Err(AppError::Forbidden("Not your listing".into()));
    }

    let bookings = state.booking_repo.list_by_property(&property.id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let property = state.property_repo.find_by_id(&booking.property_id).await?
        .ok_or(AppError::Internal)?;

    if lifecycle::resolve_actor(&user, &booking, &property).is_none() {
        return Err(AppError::Forbidden("You are not involved in this booking".into()));
    }

    let payments = state.payment_repo.list_by_booking(&booking.id).await?;

    Ok(Json(BookingDetailResponse { booking, property, payments }))
}

pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin only".into()));
    }
    let bookings = state.booking_repo.list_all().await?;
    Ok(Json(bookings))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let next = BookingStatus::parse(&payload.status)
        .ok_or(AppError::Validation(format!("Unknown status '{}'", payload.status)))?;

    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    let property = state.property_repo.find_by_id(&booking.property_id).await?
        .ok_or(AppError::Internal)?;

    let current = BookingStatus::parse(&booking.status)
        .ok_or(AppError::InternalWithMsg(format!("Corrupt booking status '{}'", booking.status)))?;

    let actor = lifecycle::resolve_actor(&user, &booking, &property)
        .ok_or(AppError::Forbidden("You are not involved in this booking".into()))?;

    lifecycle::authorize_transition(current, next, actor)?;

    if current == BookingStatus::Confirmed && next == BookingStatus::Completed
        && today_in(&property.timezone) < booking.check_out {
        return Err(AppError::Validation("Cannot complete a booking before its checkout date".into()));
    }

    // Counterparty gets notified: guest-initiated changes go to the host,
    // everything else to the guest.
    let recipient = if actor == Actor::Guest {
        property.host_id.clone()
    } else {
        booking.guest_id.clone()
    };
    let job = Job::new(
        &format!("STATUS_CHANGED:{}", next.as_str()),
        booking.id.clone(),
        recipient,
        Utc::now(),
    );

    let updated = state.booking_repo
        .transition(&booking.id, next.as_str(), lifecycle::payment_status_for(next), vec![job])
        .await?;

    info!("Booking {} moved {} -> {}", updated.id, current.as_str(), next.as_str());

    // Provider calls are best-effort; the stored state is already authoritative.
    let payments = state.payment_repo.list_by_booking(&updated.id).await?;
    match next {
        BookingStatus::Confirmed => {
            for p in &payments {
                match state.payment_gateway.capture(p).await {
                    Ok(charge_ref) => {
                        if let Err(e) = state.payment_repo.set_provider_ref(&p.id, &charge_ref).await {
                            warn!("Failed to store provider ref for payment {}: {:?}", p.id, e);
                        }
                    }
                    Err(e) => warn!("Payment capture failed for {}: {:?}", p.id, e),
                }
            }
        }
        BookingStatus::Cancelled | BookingStatus::Rejected => {
            for p in &payments {
                if let Err(e) = state.payment_gateway.refund(p).await {
                    warn!("Payment refund failed for {}: {:?}", p.id, e);
                }
            }
        }
        _ => {}
    }

    Ok(Json(updated))
}
