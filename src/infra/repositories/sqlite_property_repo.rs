use crate::domain::{models::property::{Property, PropertyImage}, ports::PropertyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePropertyRepo {
    pool: SqlitePool,
}

impl SqlitePropertyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyRepository for SqlitePropertyRepo {
    async fn create(&self, property: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(
            "INSERT INTO properties (id, host_id, manager_id, title, description, location, timezone, nightly_price_cents, cleaning_fee_cents, service_fee_cents, max_guests, is_published, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&property.id).bind(&property.host_id).bind(&property.manager_id)
            .bind(&property.title).bind(&property.description).bind(&property.location)
            .bind(&property.timezone).bind(property.nightly_price_cents)
            .bind(property.cleaning_fee_cents).bind(property.service_fee_cents)
            .bind(property.max_guests).bind(property.is_published).bind(property.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_published(&self) -> Result<Vec<Property>, AppError> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE is_published = TRUE ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_host(&self, host_id: &str) -> Result<Vec<Property>, AppError> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE host_id = ? OR manager_id = ? ORDER BY created_at DESC")
            .bind(host_id).bind(host_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, property: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(
            "UPDATE properties SET manager_id=?, title=?, description=?, location=?, timezone=?, nightly_price_cents=?, cleaning_fee_cents=?, service_fee_cents=?, max_guests=?, is_published=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&property.manager_id).bind(&property.title).bind(&property.description)
            .bind(&property.location).bind(&property.timezone).bind(property.nightly_price_cents)
            .bind(property.cleaning_fee_cents).bind(property.service_fee_cents)
            .bind(property.max_guests).bind(property.is_published)
            .bind(&property.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Property not found".into()));
        }
        Ok(())
    }

    async fn add_image(&self, image: &PropertyImage) -> Result<PropertyImage, AppError> {
        sqlx::query_as::<_, PropertyImage>(
            "INSERT INTO property_images (id, property_id, url, position, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&image.id).bind(&image.property_id).bind(&image.url)
            .bind(image.position).bind(image.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_images(&self, property_id: &str) -> Result<Vec<PropertyImage>, AppError> {
        sqlx::query_as::<_, PropertyImage>("SELECT * FROM property_images WHERE property_id = ? ORDER BY position ASC")
            .bind(property_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_image(&self, property_id: &str, image_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM property_images WHERE id = ? AND property_id = ?")
            .bind(image_id).bind(property_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Image not found".into()));
        }
        Ok(())
    }
}
