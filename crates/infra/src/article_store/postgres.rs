//! Postgres-backed article store.
//!
//! ## Schema
//!
//! One table, created on startup by [`PostgresArticleStore::ensure_schema`]:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS articles (
//!     id         BIGSERIAL PRIMARY KEY,
//!     title      TEXT NOT NULL,
//!     body       TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! Ids come from the `BIGSERIAL` sequence, so concurrent inserts never share one.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolClosed, PoolTimedOut, Io, Tls | `Unavailable` |
//! | Database, other | `Query` |
//! | Column decode failure / non-positive id | `CorruptRow` |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;

use blog_articles::{Article, ArticleId, NewArticle};

use super::{ArticleStore, StoreError};

const CREATE_ARTICLES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS articles (
        id         BIGSERIAL PRIMARY KEY,
        title      TEXT NOT NULL,
        body       TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Postgres-backed article store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresArticleStore {
    pool: Arc<PgPool>,
}

impl PostgresArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the `articles` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ARTICLES_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ArticleStore for PostgresArticleStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, created_at
            FROM articles
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_articles", e))?;

        rows.iter().map(article_from_row).collect()
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    async fn get(&self, id: ArticleId) -> Result<Option<Article>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, body, created_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_article", e))?;

        row.as_ref().map(article_from_row).transpose()
    }

    #[instrument(skip(self, article), err)]
    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO articles (title, body)
            VALUES ($1, $2)
            RETURNING id, title, body, created_at
            "#,
        )
        .bind(article.title())
        .bind(article.body())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_article", e))?;

        article_from_row(&row)
    }
}

fn article_from_row(row: &PgRow) -> Result<Article, StoreError> {
    let decode = |e: sqlx::Error| StoreError::CorruptRow(e.to_string());

    let id: i64 = row.try_get("id").map_err(decode)?;
    let title: String = row.try_get("title").map_err(decode)?;
    let body: String = row.try_get("body").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    let id = ArticleId::try_from(id).map_err(|e| StoreError::CorruptRow(e.to_string()))?;
    Ok(Article::restore(id, title, body, created_at))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {operation}: {e}")),
        sqlx::Error::Database(db_err) => {
            StoreError::Query(format!("database error in {operation}: {}", db_err.message()))
        }
        other => StoreError::Query(format!("sqlx error in {operation}: {other}")),
    }
}
