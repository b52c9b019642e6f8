use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Declarative schema, applied statement by statement at startup. This is the
/// only schema management the service has; every statement must stay
/// re-runnable against an existing database.
const SCHEMA: &[&str] = &[
    // Task status state machine: todo -> in-progress -> done
    r#"
    DO $$ BEGIN
        CREATE TYPE task_status AS ENUM ('todo', 'in-progress', 'done');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        name          TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    // parent cascade walks the whole subtree on delete
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id          UUID PRIMARY KEY,
        title       TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status      task_status NOT NULL DEFAULT 'todo',
        due_date    TIMESTAMPTZ,
        creator     UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        parent      UUID REFERENCES tasks(id) ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS tasks_creator_parent_idx ON tasks (creator, parent)",
    r#"
    CREATE TABLE IF NOT EXISTS progress (
        id          UUID PRIMARY KEY,
        day_number  INT NOT NULL,
        title       TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        content     TEXT[] NOT NULL DEFAULT '{}',
        creator     UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS progress_creator_day_idx ON progress (creator, day_number)",
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id            UUID PRIMARY KEY,
        name          TEXT NOT NULL,
        description   TEXT NOT NULL DEFAULT '',
        links         JSONB NOT NULL DEFAULT '{}',
        collaborators UUID[] NOT NULL DEFAULT '{}',
        creator       UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS topics (
        id         UUID PRIMARY KEY,
        project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        title      TEXT NOT NULL,
        content    TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS topics_project_idx ON topics (project_id)",
    r#"
    CREATE TABLE IF NOT EXISTS albums (
        id         UUID PRIMARY KEY,
        name       TEXT NOT NULL,
        creator    UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (creator, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS images (
        id         UUID PRIMARY KEY,
        album_id   UUID NOT NULL REFERENCES albums(id) ON DELETE CASCADE,
        url        TEXT NOT NULL,
        uploader   UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS images_album_idx ON images (album_id, created_at)",
];

/// Apply the declarative schema. Safe to run on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_statement_is_rerunnable() {
        for statement in SCHEMA {
            let s = statement.trim_start();
            assert!(
                s.starts_with("CREATE TABLE IF NOT EXISTS")
                    || s.starts_with("CREATE INDEX IF NOT EXISTS")
                    || s.starts_with("DO $$"),
                "statement is not idempotent: {}",
                &s[..s.len().min(40)]
            );
        }
    }

    #[test]
    fn tables_cover_all_collections() {
        let joined = SCHEMA.join("\n");
        for table in ["users", "tasks", "progress", "projects", "topics", "albums", "images"] {
            assert!(
                joined.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)),
                "missing table: {}",
                table
            );
        }
    }
}
