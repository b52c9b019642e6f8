use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// A named grouping key for uploaded images, unique per user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: Uuid,
    pub name: String,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
}

/// An already-hosted image URL inside an album. Upload-to-storage happens
/// elsewhere; this service only records the URL.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub album_id: Uuid,
    pub url: String,
    pub uploader: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Album {
    pub async fn find_owned_by_name(
        pool: &PgPool,
        creator: Uuid,
        name: &str,
    ) -> Result<Option<Album>, DatabaseError> {
        let album =
            sqlx::query_as::<_, Album>("SELECT * FROM albums WHERE creator = $1 AND name = $2")
                .bind(creator)
                .bind(name)
                .fetch_optional(pool)
                .await?;

        Ok(album)
    }

    pub async fn list_owned(pool: &PgPool, creator: Uuid) -> Result<Vec<Album>, DatabaseError> {
        let albums = sqlx::query_as::<_, Album>(
            "SELECT * FROM albums WHERE creator = $1 ORDER BY created_at",
        )
        .bind(creator)
        .fetch_all(pool)
        .await?;

        Ok(albums)
    }

    /// Get or create the caller's album with this name. Two concurrent
    /// first uploads race on the (creator, name) unique constraint; the
    /// loser retries the lookup via ON CONFLICT DO NOTHING + re-select.
    pub async fn find_or_create(
        pool: &PgPool,
        creator: Uuid,
        name: &str,
    ) -> Result<Album, DatabaseError> {
        sqlx::query(
            "INSERT INTO albums (id, name, creator)
             VALUES ($1, $2, $3)
             ON CONFLICT (creator, name) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(creator)
        .execute(pool)
        .await?;

        Self::find_owned_by_name(pool, creator, name)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("album '{}' not found", name)))
    }
}

impl Image {
    pub async fn list_for_album(
        pool: &PgPool,
        album_id: Uuid,
    ) -> Result<Vec<Image>, DatabaseError> {
        let images = sqlx::query_as::<_, Image>(
            "SELECT * FROM images WHERE album_id = $1 ORDER BY created_at",
        )
        .bind(album_id)
        .fetch_all(pool)
        .await?;

        Ok(images)
    }

    pub async fn insert_many(
        pool: &PgPool,
        album_id: Uuid,
        uploader: Uuid,
        urls: &[String],
    ) -> Result<(), DatabaseError> {
        for url in urls {
            sqlx::query(
                "INSERT INTO images (id, album_id, url, uploader)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(album_id)
            .bind(url)
            .bind(uploader)
            .execute(pool)
            .await?;
        }

        Ok(())
    }
}
