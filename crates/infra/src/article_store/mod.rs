//! Article persistence boundary.
//!
//! Handlers only ever talk to [`ArticleStore`]; which backend sits behind it is
//! decided once at startup. Backends own id assignment and must make it atomic
//! with the insert.

use std::sync::Arc;

use thiserror::Error;

use blog_articles::{Article, ArticleId, NewArticle};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryArticleStore;
pub use postgres::PostgresArticleStore;

/// Storage failure. Always unexpected from the caller's point of view.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    /// Every persisted article, in store order (ascending id for the bundled backends).
    async fn list(&self) -> Result<Vec<Article>, StoreError>;

    /// Look up one article; `Ok(None)` when the id was never issued.
    async fn get(&self, id: ArticleId) -> Result<Option<Article>, StoreError>;

    /// Persist a validated article and return it with its new id.
    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError>;
}

#[async_trait::async_trait]
impl<S> ArticleStore for Arc<S>
where
    S: ArticleStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        (**self).list().await
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError> {
        (**self).insert(article).await
    }
}
