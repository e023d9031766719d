use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::domain::models::job::Job;
use crate::domain::models::notification::Notification;
use crate::error::AppError;
use crate::state::AppState;

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        if let Err(e) = run_pending_jobs(&state).await {
            error!("Failed to fetch pending jobs: {:?}", e);
        }
        sleep(Duration::from_secs(5)).await;
    }
}

/// One drain pass over the outbox. Delivery failures mark the job FAILED and
/// are otherwise swallowed; a booking state change must never be held
/// hostage by a notification.
pub async fn run_pending_jobs(state: &Arc<AppState>) -> Result<usize, AppError> {
    let jobs = state.job_repo.find_pending(10).await?;
    let count = jobs.len();

    for job in jobs {
        let span = info_span!(
            "background_job",
            job_id = %job.id,
            job_type = %job.job_type,
        );

        async {
            info!("Processing job: {}", job.job_type);
            match process_job(state, &job).await {
                Ok(_) => {
                    info!("Job completed successfully");
                    if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                        error!("Failed to mark job as completed: {:?}", e);
                    }
                },
                Err(e) => {
                    let err_msg = format!("{}", e);
                    error!("Job failed with error: {}", err_msg);
                    if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                        error!("Failed to mark job as failed: {:?}", up_err);
                    }
                }
            }
        }
            .instrument(span)
            .await;
    }

    Ok(count)
}

fn format_usd(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    let booking_id = &job.payload.booking_id;
    let recipient_id = &job.payload.recipient_id;

    let booking = state.booking_repo.find_by_id(booking_id).await?
        .ok_or(AppError::NotFound(format!("Booking {} not found", booking_id)))?;
    let property = state.property_repo.find_by_id(&booking.property_id).await?
        .ok_or(AppError::NotFound(format!("Property {} not found", booking.property_id)))?;
    let recipient = state.user_repo.find_by_id(recipient_id).await?
        .ok_or(AppError::NotFound(format!("User {} not found", recipient_id)))?;
    let guest = state.user_repo.find_by_id(&booking.guest_id).await?
        .ok_or(AppError::NotFound(format!("User {} not found", booking.guest_id)))?;

    let (kind, template, subject, message) = if job.job_type == "BOOKING_REQUESTED" {
        (
            "BOOKING_REQUESTED",
            "booking_requested.html",
            format!("New booking request for {}", property.title),
            format!(
                "{} requested {} to {} at {} ({} guests, {})",
                guest.display_name, booking.check_in, booking.check_out,
                property.title, booking.guest_count, format_usd(booking.total_cents)
            ),
        )
    } else if let Some(status) = job.job_type.strip_prefix("STATUS_CHANGED:") {
        (
            "STATUS_CHANGED",
            "status_changed.html",
            format!("Booking {} for {}", status.to_lowercase(), property.title),
            format!(
                "Booking for {} ({} to {}) is now {}",
                property.title, booking.check_in, booking.check_out, status
            ),
        )
    } else {
        return Err(AppError::InternalWithMsg(format!("Unknown job type {}", job.job_type)));
    };

    state.notification_repo
        .create(&Notification::new(recipient.id.clone(), booking.id.clone(), kind, message))
        .await?;

    let mut context = tera::Context::new();
    context.insert("recipient_name", &recipient.display_name);
    context.insert("guest_name", &guest.display_name);
    context.insert("property_title", &property.title);
    context.insert("location", &property.location);
    context.insert("check_in", &booking.check_in.to_string());
    context.insert("check_out", &booking.check_out.to_string());
    context.insert("nights", &booking.nights());
    context.insert("guest_count", &booking.guest_count);
    context.insert("total", &format_usd(booking.total_cents));
    context.insert("status", &booking.status);
    context.insert("booking_url", &format!("{}/bookings/{}", state.config.frontend_url, booking.id));

    let html = state.templates.render(template, &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

    info!("Sending notification email to {}", recipient.email);
    state.email_service.send(&recipient.email, &subject, &html).await?;

    Ok(())
}
