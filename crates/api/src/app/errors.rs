use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use blog_articles::{ArticleDraft, ValidationErrors};
use blog_core::DomainError;
use blog_infra::StoreError;

use crate::app::dto;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        // An id that doesn't parse can never have been issued.
        DomainError::NotFound | DomainError::InvalidId(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        DomainError::ParameterMissing(_) => {
            json_error(StatusCode::BAD_REQUEST, "parameter_missing", err.to_string())
        }
        DomainError::InvalidParameter(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_body", err.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "article store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

/// 422 carrying what the "new" form needs to be shown again: the rejected
/// values and the reasons.
pub fn validation_failed(draft: &ArticleDraft, errors: &ValidationErrors) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "validation_error",
            "message": errors.to_string(),
            "article": dto::draft_to_json(draft),
            "errors": errors,
            "messages": errors.full_messages(),
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
