use crate::domain::{models::{booking::Booking, job::Job, payment::Payment}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_with_payment(&self, booking: &Booking, payment: &Payment, jobs: Vec<Job>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Guarded insert: the row only lands if no PENDING/CONFIRMED booking
        // overlaps [check_in, check_out) at commit time. A suppressed insert
        // is the canonical conflict signal, not just the pre-check.
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, property_id, guest_id, check_in, check_out, guest_count, total_cents, status, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE property_id = ?
                   AND status IN ('PENDING', 'CONFIRMED')
                   AND check_in < ? AND check_out > ?
             )
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.property_id).bind(&booking.guest_id)
            .bind(booking.check_in).bind(booking.check_out).bind(booking.guest_count)
            .bind(booking.total_cents).bind(&booking.status).bind(booking.created_at)
            .bind(&booking.property_id).bind(booking.check_out).bind(booking.check_in)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Requested dates are unavailable".to_string()))?;

        sqlx::query(
            "INSERT INTO payments (id, booking_id, amount_cents, status, provider_ref, created_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
            .bind(&payment.id).bind(&payment.booking_id).bind(payment.amount_cents)
            .bind(&payment.status).bind(&payment.provider_ref).bind(payment.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        for job in jobs {
            sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
                .bind(&job.status).bind(&job.error_message).bind(job.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_guest(&self, guest_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE guest_id = ? ORDER BY check_in ASC")
            .bind(guest_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_property(&self, property_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE property_id = ? ORDER BY check_in ASC")
            .bind(property_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_active_by_range(&self, property_id: &str, check_in: NaiveDate, check_out: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE property_id = ? AND status IN ('PENDING', 'CONFIRMED') AND check_in < ? AND check_out > ?"
        )
            .bind(property_id).bind(check_out).bind(check_in)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn transition(&self, booking_id: &str, new_status: &str, payment_status: Option<&str>, jobs: Vec<Job>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ? WHERE id = ? RETURNING *"
        )
            .bind(new_status).bind(booking_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Booking not found".to_string()))?;

        if let Some(ps) = payment_status {
            sqlx::query("UPDATE payments SET status = ? WHERE booking_id = ? AND status != 'REFUNDED'")
                .bind(ps).bind(booking_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        for job in jobs {
            sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
                .bind(&job.status).bind(&job.error_message).bind(job.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
