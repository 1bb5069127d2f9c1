use blog_articles::{Article, ArticleDraft};
use blog_core::Entity;

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn article_to_json(article: &Article) -> serde_json::Value {
    serde_json::json!({
        "id": article.id().get(),
        "title": article.title(),
        "body": article.body(),
        "created_at": article.created_at().to_rfc3339(),
    })
}

/// Form data for an unsaved article. `id` is always null.
pub fn draft_to_json(draft: &ArticleDraft) -> serde_json::Value {
    serde_json::json!({
        "id": null,
        "title": draft.title,
        "body": draft.body,
    })
}

/// Path of the show page for `article`.
pub fn article_path(article: &Article) -> String {
    format!("/articles/{}", article.id())
}
