use crate::domain::{models::review::Review, ports::ReviewRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresReviewRepo {
    pool: PgPool,
}

impl PostgresReviewRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepo {
    async fn create(&self, review: &Review) -> Result<Review, AppError> {
        // UNIQUE(booking_id) turns a second review into a 409 at the
        // error-mapping layer.
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, property_id, booking_id, guest_id, rating, comment, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&review.id).bind(&review.property_id).bind(&review.booking_id)
            .bind(&review.guest_id).bind(review.rating).bind(&review.comment)
            .bind(review.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_property(&self, property_id: &str) -> Result<Vec<Review>, AppError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE property_id = $1 ORDER BY created_at DESC")
            .bind(property_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
