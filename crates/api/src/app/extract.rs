//! Raw request parameters.
//!
//! Handlers that filter their own input take [`RawParams`]: the request body as
//! an untyped JSON tree, whether it was sent as JSON or as an HTML form.

use axum::{
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::Response,
    Form, Json,
};
use serde_json::Value;

use blog_articles::nest_form_pairs;

use crate::app::errors;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

pub struct RawParams(pub Value);

#[axum::async_trait]
impl<S> FromRequest<S> for RawParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if mime == FORM_CONTENT_TYPE {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|rej| errors::json_error(rej.status(), "invalid_body", rej.body_text()))?;
            return nest_form_pairs(pairs)
                .map(Self)
                .map_err(errors::domain_error_to_response);
        }

        if mime == JSON_CONTENT_TYPE || mime.ends_with("+json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|rej| errors::json_error(rej.status(), "invalid_body", rej.body_text()))?;
            return Ok(Self(value));
        }

        Err(errors::json_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            format!("expected {JSON_CONTENT_TYPE} or {FORM_CONTENT_TYPE}"),
        ))
    }
}
