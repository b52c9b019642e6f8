use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Optional outbound links shown on a project page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

/// A project. Topics live in their own table (see `topic.rs`) and are
/// embedded into the detail response by the handler. `collaborators` is
/// carried in the schema but grants no access.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub links: Json<ProjectLinks>,
    pub collaborators: Vec<Uuid>,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub links: Option<ProjectLinks>,
}

impl Project {
    pub async fn find_owned(
        pool: &PgPool,
        id: Uuid,
        creator: Uuid,
    ) -> Result<Option<Project>, DatabaseError> {
        let project =
            sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1 AND creator = $2")
                .bind(id)
                .bind(creator)
                .fetch_optional(pool)
                .await?;

        Ok(project)
    }

    pub async fn list_owned(pool: &PgPool, creator: Uuid) -> Result<Vec<Project>, DatabaseError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE creator = $1 ORDER BY created_at",
        )
        .bind(creator)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    pub async fn insert(
        pool: &PgPool,
        creator: Uuid,
        name: &str,
        description: &str,
        links: ProjectLinks,
    ) -> Result<Project, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, name, description, links, creator)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(Json(links))
        .bind(creator)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    pub async fn update_owned(
        pool: &PgPool,
        id: Uuid,
        creator: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "UPDATE projects SET
                 name        = COALESCE($3, name),
                 description = COALESCE($4, description),
                 links       = COALESCE($5, links),
                 updated_at  = now()
             WHERE id = $1 AND creator = $2
             RETURNING *",
        )
        .bind(id)
        .bind(creator)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.links.map(Json))
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Delete the owned project; its topics go with it via the foreign-key
    /// cascade.
    pub async fn delete_owned(pool: &PgPool, id: Uuid, creator: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND creator = $2")
            .bind(id)
            .bind(creator)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
