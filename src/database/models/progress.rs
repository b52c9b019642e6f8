use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// A numbered daily log record. `content` is an append-ordered list of
/// free-text bullets; the client edits locally and overwrites the whole list.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: Uuid,
    pub day_number: i32,
    pub title: String,
    pub description: String,
    pub content: Vec<String>,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field merge for PUT. `content`, when present, replaces the stored list
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct ProgressChanges {
    pub day_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<Vec<String>>,
}

impl ProgressEntry {
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        creator: Uuid,
    ) -> Result<Option<ProgressEntry>, DatabaseError> {
        let entry = sqlx::query_as::<_, ProgressEntry>(
            "SELECT * FROM progress WHERE id = $1 AND creator = $2",
        )
        .bind(id)
        .bind(creator)
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    /// All entries for a user, day number ascending. Creation order breaks
    /// ties so repeated day numbers stay stable.
    pub async fn list_owned(
        pool: &PgPool,
        creator: Uuid,
    ) -> Result<Vec<ProgressEntry>, DatabaseError> {
        let entries = sqlx::query_as::<_, ProgressEntry>(
            "SELECT * FROM progress WHERE creator = $1 ORDER BY day_number, created_at",
        )
        .bind(creator)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    pub async fn insert(
        pool: &PgPool,
        creator: Uuid,
        day_number: i32,
        title: &str,
        description: &str,
    ) -> Result<ProgressEntry, DatabaseError> {
        let entry = sqlx::query_as::<_, ProgressEntry>(
            "INSERT INTO progress (id, day_number, title, description, creator)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(day_number)
        .bind(title)
        .bind(description)
        .bind(creator)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        creator: Uuid,
        changes: ProgressChanges,
    ) -> Result<Option<ProgressEntry>, DatabaseError> {
        let entry = sqlx::query_as::<_, ProgressEntry>(
            "UPDATE progress SET
                 day_number  = COALESCE($3, day_number),
                 title       = COALESCE($4, title),
                 description = COALESCE($5, description),
                 content     = COALESCE($6, content),
                 updated_at  = now()
             WHERE id = $1 AND creator = $2
             RETURNING *",
        )
        .bind(id)
        .bind(creator)
        .bind(changes.day_number)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.content)
        .fetch_optional(pool)
        .await?;

        Ok(entry)
    }

    pub async fn delete_owned(pool: &PgPool, id: Uuid, creator: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM progress WHERE id = $1 AND creator = $2")
            .bind(id)
            .bind(creator)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
