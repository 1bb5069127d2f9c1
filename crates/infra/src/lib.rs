//! Infrastructure layer: article persistence and configuration.

pub mod article_store;
pub mod config;

pub use article_store::{ArticleStore, InMemoryArticleStore, PostgresArticleStore, StoreError};
pub use config::{AppConfig, ConfigError, StoreBackend};
