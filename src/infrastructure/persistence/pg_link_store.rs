//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// PostgreSQL-backed link store.
///
/// The database provides the serialization: uniqueness comes from the unique index on
/// `lower(code)`, and clicks are counted with a single `UPDATE ... RETURNING`, so concurrent
/// increments never overwrite each other.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    code: String,
    target: String,
    created_at: DateTime<Utc>,
    clicks: i64,
    last_clicked_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            code: row.code,
            target: row.target,
            created_at: row.created_at,
            clicks: u64::try_from(row.clicks).unwrap_or_default(),
            last_clicked_at: row.last_clicked_at,
        }
    }
}

const RETURNING: &str = "code, target, created_at, clicks, last_clicked_at";

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {RETURNING} FROM links WHERE lower(code) = lower($1)"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn insert(&self, link: Link) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (code, target, created_at, clicks, last_clicked_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {RETURNING}
            "#
        ))
        .bind(&link.code)
        .bind(&link.target)
        .bind(link.created_at)
        .bind(i64::try_from(link.clicks).unwrap_or(i64::MAX))
        .bind(link.last_clicked_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn increment_click(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET clicks = clicks + 1, last_clicked_at = $2
            WHERE lower(code) = lower($1)
            RETURNING {RETURNING}
            "#
        ))
        .bind(code)
        .bind(at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE lower(code) = lower($1)")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {RETURNING} FROM links ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
