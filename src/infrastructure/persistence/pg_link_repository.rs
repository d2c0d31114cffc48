//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkState, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, token, destination, state, click_count, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    token: String,
    destination: String,
    state: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for ShortLink {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let state = row.state.parse::<LinkState>().map_err(|reason| {
            AppError::internal(
                "Corrupt link row",
                json!({ "token": row.token, "reason": reason }),
            )
        })?;

        Ok(ShortLink {
            id: row.id,
            token: row.token,
            destination: row.destination,
            state,
            click_count: row.click_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All queries bind their parameters; tokens are expected in normalized
/// (lowercase) form.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_active_by_token(&self, token: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE token = $1 AND state = $2"
        ))
        .bind(token)
        .bind(LinkState::Active.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::try_from).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ShortLink::try_from).transpose()
    }

    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO links (token, destination, state) VALUES ($1, $2, $3) RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.token)
        .bind(&new_link.destination)
        .bind(LinkState::Active.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        ShortLink::try_from(row)
    }

    async fn set_state(&self, token: &str, state: LinkState) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET state = $2, updated_at = NOW()
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(state.as_str())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
