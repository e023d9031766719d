use crate::domain::{models::payment::Payment, ports::PaymentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPaymentRepo {
    pool: PgPool,
}

impl PostgresPaymentRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepo {
    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE booking_id = $1 ORDER BY created_at ASC")
            .bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_provider_ref(&self, payment_id: &str, provider_ref: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE payments SET provider_ref = $1 WHERE id = $2")
            .bind(provider_ref).bind(payment_id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
