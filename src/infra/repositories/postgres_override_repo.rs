use crate::domain::{models::availability_override::AvailabilityOverride, ports::AvailabilityOverrideRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresOverrideRepo {
    pool: PgPool,
}

impl PostgresOverrideRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl AvailabilityOverrideRepository for PostgresOverrideRepo {
    async fn upsert(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            r#"INSERT INTO availability_overrides (id, property_id, date, is_available, price_cents, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT(property_id, date) DO UPDATE SET
               is_available=excluded.is_available,
               price_cents=excluded.price_cents
               RETURNING *"#
        )
            .bind(&entity.id)
            .bind(&entity.property_id)
            .bind(entity.date)
            .bind(entity.is_available)
            .bind(entity.price_cents)
            .bind(entity.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, property_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "SELECT * FROM availability_overrides WHERE property_id = $1 AND date >= $2 AND date <= $3"
        )
            .bind(property_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, property_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM availability_overrides WHERE property_id = $1 AND date = $2")
            .bind(property_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Override not found".into()));
        }
        Ok(())
    }
}
