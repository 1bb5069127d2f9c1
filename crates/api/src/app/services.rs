use std::sync::Arc;

use blog_infra::{ArticleStore, InMemoryArticleStore, PostgresArticleStore, StoreBackend, StoreError};

/// Shared, request-independent services handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    articles: Arc<dyn ArticleStore>,
}

impl AppServices {
    pub fn new(articles: Arc<dyn ArticleStore>) -> Self {
        Self { articles }
    }

    /// Services backed by a fresh in-memory store (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryArticleStore::new()))
    }

    pub fn articles(&self) -> &dyn ArticleStore {
        self.articles.as_ref()
    }
}

pub async fn build_services(backend: &StoreBackend) -> Result<AppServices, StoreError> {
    match backend {
        StoreBackend::InMemory => {
            tracing::warn!("using in-memory article store; data is lost on restart");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres { database_url } => {
            let store = PostgresArticleStore::connect(database_url).await?;
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
