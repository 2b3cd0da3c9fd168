//! Sighting repository for database operations
//!
//! All reads and writes filter on `deleted_at IS NULL`, so a
//! soft-deleted sighting behaves exactly like one that never existed.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::sighting::Sighting;

/// Sighting repository
#[derive(Clone)]
pub struct SightingRepository {
    pool: PgPool,
}

impl SightingRepository {
    /// Create a new sighting repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new sighting owned by `user_id`
    ///
    /// The sighted-at timestamp is stamped server-side at insert time.
    pub async fn create(
        &self,
        user_id: Uuid,
        animal_name: &str,
        location: &str,
        photo_url: Option<&str>,
    ) -> Result<Sighting> {
        let sighting = sqlx::query_as::<_, Sighting>(
            r#"
            INSERT INTO sightings (id, user_id, animal_name, location, timestamp_sighted, photo_url)
            VALUES ($1, $2, $3, $4, NOW(), $5)
            RETURNING id, user_id, animal_name, location, timestamp_sighted,
                      photo_url, created_at, updated_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(animal_name)
        .bind(location)
        .bind(photo_url)
        .fetch_one(&self.pool)
        .await?;

        info!(sighting_id = %sighting.id, user_id = %user_id, "Recorded sighting");
        Ok(sighting)
    }

    /// List a user's sightings, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Sighting>> {
        let sightings = sqlx::query_as::<_, Sighting>(
            r#"
            SELECT id, user_id, animal_name, location, timestamp_sighted,
                   photo_url, created_at, updated_at, deleted_at
            FROM sightings
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sightings)
    }

    /// Fetch a sighting by id regardless of owner
    ///
    /// The caller decides between 404 and 403 from the returned row.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Sighting>> {
        let sighting = sqlx::query_as::<_, Sighting>(
            r#"
            SELECT id, user_id, animal_name, location, timestamp_sighted,
                   photo_url, created_at, updated_at, deleted_at
            FROM sightings
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sighting)
    }

    /// Write back a merged sighting; returns None when the row vanished
    pub async fn update(
        &self,
        id: Uuid,
        animal_name: &str,
        location: &str,
        photo_url: Option<&str>,
    ) -> Result<Option<Sighting>> {
        let sighting = sqlx::query_as::<_, Sighting>(
            r#"
            UPDATE sightings
            SET animal_name = $2, location = $3, photo_url = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, animal_name, location, timestamp_sighted,
                      photo_url, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(animal_name)
        .bind(location)
        .bind(photo_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sighting)
    }

    /// Soft-delete a sighting; false when it was already gone
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sightings
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
