use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use blog_articles::{article_params, ArticleDraft, ArticleId};
use blog_core::{DomainError, Entity};

use crate::app::extract::RawParams;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/new", get(new_article))
        .route("/:id", get(get_article))
}

pub async fn list_articles(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let articles = match services.articles().list().await {
        Ok(a) => a,
        Err(e) => return errors::store_error_to_response(e),
    };

    let items = articles.iter().map(dto::article_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_article(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let article_id: ArticleId = match id.parse() {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(%id, "unparsable article id");
            return errors::domain_error_to_response(e);
        }
    };

    match services.articles().get(article_id).await {
        Ok(Some(article)) => (StatusCode::OK, Json(dto::article_to_json(&article))).into_response(),
        Ok(None) => errors::domain_error_to_response(DomainError::not_found()),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn new_article() -> axum::response::Response {
    (StatusCode::OK, Json(dto::draft_to_json(&ArticleDraft::default()))).into_response()
}

pub async fn create_article(
    Extension(services): Extension<Arc<AppServices>>,
    RawParams(raw): RawParams,
) -> axum::response::Response {
    let draft = match article_params(&raw) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let new_article = match draft.validate() {
        Ok(v) => v,
        Err(validation) => {
            tracing::info!(fields = ?validation.fields(), "article rejected");
            return errors::validation_failed(&draft, &validation);
        }
    };

    let article = match services.articles().insert(new_article).await {
        Ok(a) => a,
        Err(e) => return errors::store_error_to_response(e),
    };

    tracing::info!(article_id = %article.id(), "article created");

    let location = dto::article_path(&article);
    (
        StatusCode::FOUND,
        [(header::LOCATION, location)],
        Json(serde_json::json!({ "id": article.id().get() })),
    )
        .into_response()
}
