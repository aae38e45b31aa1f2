//! Postgres-backed implementation of [`TodoStore`].
//!
//! Every operation is a single parameterized statement on a pooled
//! connection. The pool owns reconnection; a failed query surfaces as
//! [`Error::StorageUnavailable`] and leaves the pool usable for the next
//! request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quire::domain::{NewTodo, Todo, TodoChanges, TodoId};
use quire::ports::TodoStore;
use shared::config::DatabaseConfig;
use shared::{Error, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::info;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Row shape of the `todos` table.
#[derive(Debug, Clone, FromRow)]
struct DbTodo {
    id: i32,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<DbTodo> for Todo {
    fn from(row: DbTodo) -> Self {
        Self {
            id: row.id,
            title: row.title,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Opens the pool. Fails if the database cannot be reached.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        // Never log the options themselves; they carry the password.
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        info!(
            max_connections = config.max_connections,
            "PostgreSQL pool created"
        );
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent `CREATE TABLE IF NOT EXISTS`.
    pub async fn ensure_schema(&self) -> Result<()> {
        info!("Creating todos table if absent");
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        info!("Todos table created or already exists");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, DbTodo>(
            r#"
        SELECT id, title, completed, created_at
        FROM todos
        ORDER BY created_at DESC, id DESC
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo> {
        let row = sqlx::query_as::<_, DbTodo>(
            r#"
        INSERT INTO todos (title, completed)
        VALUES ($1, $2)
        RETURNING id, title, completed, created_at
        "#,
        )
        .bind(todo.title)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.into())
    }

    async fn update(&self, id: TodoId, changes: TodoChanges) -> Result<Option<Todo>> {
        let row = sqlx::query_as::<_, DbTodo>(
            r#"
        UPDATE todos
        SET title = $1, completed = $2
        WHERE id = $3
        RETURNING id, title, completed, created_at
        "#,
        )
        .bind(changes.title)
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Todo::from))
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn now(&self) -> Result<DateTime<Utc>> {
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }
}

/// `DB_URL` wins; otherwise the discrete host/port/database/user/password settings.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url)
            .map_err(|e| Error::Internal(format!("invalid DB_URL: {}", e)));
    }

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user);

    Ok(match &config.password {
        Some(password) => options.password(password),
        None => options,
    })
}

fn storage_error(err: sqlx::Error) -> Error {
    Error::StorageUnavailable(err.to_string())
}
