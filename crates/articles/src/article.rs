use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_core::{DomainError, Entity, RecordId};

use crate::validation::{self, ValidationErrors};

/// Article identifier, assigned by the store on insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub RecordId);

impl ArticleId {
    pub fn get(&self) -> i64 {
        self.0.get()
    }
}

impl core::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ArticleId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<RecordId>().map(Self)
    }
}

impl TryFrom<i64> for ArticleId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        RecordId::try_from(value).map(Self)
    }
}

/// An article that has not been persisted.
///
/// This is what the "new" form is rendered from and what a create request is
/// turned into after parameter filtering. It carries no id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Run the presence rules and, if they all pass, produce the value a
    /// store accepts for insertion.
    pub fn validate(&self) -> Result<NewArticle, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        validation::require_present(&mut errors, "title", self.title.as_deref());
        validation::require_present(&mut errors, "body", self.body.as_deref());

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewArticle {
            title: self.title.clone().unwrap_or_default(),
            body: self.body.clone().unwrap_or_default(),
        })
    }
}

/// A validated, not-yet-persisted article.
///
/// Only obtainable through [`ArticleDraft::validate`], so a store can never be
/// handed an article that breaks the presence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    title: String,
    body: String,
}

impl NewArticle {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Attach the store-assigned identity.
    pub fn persisted(self, id: ArticleId, created_at: DateTime<Utc>) -> Article {
        Article {
            id,
            title: self.title,
            body: self.body,
            created_at,
        }
    }
}

/// A persisted article. Always has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    id: ArticleId,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl Article {
    /// Rebuild an article from a stored row.
    pub fn restore(id: ArticleId, title: String, body: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            body,
            created_at,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for Article {
    type Id = ArticleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
