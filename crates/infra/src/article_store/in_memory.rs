use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use blog_articles::{Article, ArticleId, NewArticle};

use super::{ArticleStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<ArticleId, Article>,
}

/// In-memory article store.
///
/// Intended for tests/dev. The id sequence and the rows share one lock, so an
/// id is handed out and its row written in a single critical section.
#[derive(Debug, Default)]
pub struct InMemoryArticleStore {
    table: RwLock<Table>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory article table lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let table = self.table.read().map_err(|_| poisoned())?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: ArticleId) -> Result<Option<Article>, StoreError> {
        let table = self.table.read().map_err(|_| poisoned())?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError> {
        let mut table = self.table.write().map_err(|_| poisoned())?;

        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("article id sequence exhausted".to_string()))?;
        let id = ArticleId::try_from(next).map_err(|e| StoreError::Query(e.to_string()))?;

        let stored = article.persisted(id, Utc::now());
        table.last_id = next;
        table.rows.insert(id, stored.clone());

        tracing::debug!(article_id = %id, "article inserted");
        Ok(stored)
    }
}
