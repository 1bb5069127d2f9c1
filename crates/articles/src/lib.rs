//! Articles module (domain layer).
//!
//! - `article`: the entity, its unsaved draft and the validated insert value
//! - `validation`: presence rules and field-level errors
//! - `params`: the require/permit step applied to raw request parameters

pub mod article;
pub mod params;
pub mod validation;

pub use article::{Article, ArticleDraft, ArticleId, NewArticle};
pub use params::{article_params, nest_form_pairs, ARTICLE_PARAM, PERMITTED_FIELDS};
pub use validation::{FieldError, ValidationErrors};
