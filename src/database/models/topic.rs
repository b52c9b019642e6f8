use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// A titled free-text note section within a project. Stored as its own row
/// so a content edit touches exactly one topic and concurrent edits to
/// siblings cannot clobber each other.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Topic>, DatabaseError> {
        let topics = sqlx::query_as::<_, Topic>(
            "SELECT * FROM topics WHERE project_id = $1 ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(topics)
    }

    pub async fn insert(
        pool: &PgPool,
        project_id: Uuid,
        title: &str,
    ) -> Result<Topic, DatabaseError> {
        let topic = sqlx::query_as::<_, Topic>(
            "INSERT INTO topics (id, project_id, title)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(title)
        .fetch_one(pool)
        .await?;

        Ok(topic)
    }

    /// Overwrite one topic's content. Targeted row update; sibling topics
    /// are untouched.
    pub async fn set_content(
        pool: &PgPool,
        project_id: Uuid,
        topic_id: Uuid,
        content: &str,
    ) -> Result<Option<Topic>, DatabaseError> {
        let topic = sqlx::query_as::<_, Topic>(
            "UPDATE topics SET content = $3, updated_at = now()
             WHERE id = $2 AND project_id = $1
             RETURNING *",
        )
        .bind(project_id)
        .bind(topic_id)
        .bind(content)
        .fetch_optional(pool)
        .await?;

        Ok(topic)
    }

    pub async fn delete(
        pool: &PgPool,
        project_id: Uuid,
        topic_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM topics WHERE id = $2 AND project_id = $1")
            .bind(project_id)
            .bind(topic_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
