//! Request parameter filtering for article creation.
//!
//! Raw parameters arrive as a JSON tree (form bodies are folded into the same
//! shape by [`nest_form_pairs`]). Creation only ever sees the fields named in
//! [`PERMITTED_FIELDS`]; everything else is dropped before an
//! [`ArticleDraft`] is built, so attributes such as `id` can't be mass-assigned.

use serde_json::{Map, Value};

use blog_core::{DomainError, DomainResult};

use crate::article::ArticleDraft;

/// Top-level key the article attributes are nested under.
pub const ARTICLE_PARAM: &str = "article";

/// Attributes a client may set on create.
pub const PERMITTED_FIELDS: [&str; 2] = ["title", "body"];

/// Require the nested `article` object and permit only its allowed fields.
pub fn article_params(raw: &Value) -> DomainResult<ArticleDraft> {
    let nested = require(raw, ARTICLE_PARAM)?;
    Ok(permit(nested))
}

/// Fetch a required, non-empty object parameter.
pub fn require<'a>(raw: &'a Value, key: &str) -> DomainResult<&'a Map<String, Value>> {
    match raw.get(key) {
        Some(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(DomainError::parameter_missing(key)),
    }
}

/// Build a draft from the allow-listed scalar fields of `params`.
pub fn permit(params: &Map<String, Value>) -> ArticleDraft {
    for key in params.keys() {
        if !PERMITTED_FIELDS.contains(&key.as_str()) {
            tracing::debug!(param = %key, "unpermitted parameter");
        }
    }

    ArticleDraft {
        title: permitted_scalar(params, "title"),
        body: permitted_scalar(params, "body"),
    }
}

fn permitted_scalar(params: &Map<String, Value>, field: &str) -> Option<String> {
    match params.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => {
            tracing::debug!(param = field, "unpermitted non-scalar parameter");
            None
        }
    }
}

/// Deepest bracket nesting accepted in a form key, counting the leading name.
pub const MAX_FORM_KEY_DEPTH: usize = 8;

/// Fold flat `key=value` pairs into a nested JSON object.
///
/// `article[title]=Hi` becomes `{"article": {"title": "Hi"}}`. Keys that do not
/// follow the bracket convention (`a[`, `[x]`, `a[]`) are kept verbatim as
/// top-level keys. Later pairs win over earlier ones. A key nested deeper than
/// [`MAX_FORM_KEY_DEPTH`] rejects the whole body.
pub fn nest_form_pairs<I, K, V>(pairs: I) -> DomainResult<Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = Map::new();
    for (key, value) in pairs {
        let segments = split_form_key(key.as_ref())?;
        insert_nested(&mut root, &segments, Value::String(value.into()));
    }
    Ok(Value::Object(root))
}

fn split_form_key(key: &str) -> DomainResult<Vec<&str>> {
    let Some(open) = key.find('[') else {
        return Ok(vec![key]);
    };
    let (head, mut rest) = key.split_at(open);
    if head.is_empty() {
        return Ok(vec![key]);
    }

    let mut segments = vec![head];
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Ok(vec![key]);
        };
        let Some(close) = inner.find(']') else {
            return Ok(vec![key]);
        };
        let segment = &inner[..close];
        if segment.is_empty() {
            return Ok(vec![key]);
        }
        if segments.len() == MAX_FORM_KEY_DEPTH {
            return Err(DomainError::invalid_parameter(format!(
                "form key {head:?} is nested deeper than {MAX_FORM_KEY_DEPTH} levels"
            )));
        }
        segments.push(segment);
        rest = &inner[close + 1..];
    }
    Ok(segments)
}

fn insert_nested(root: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut map = root;
    for segment in parents {
        let entry = map
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Some(child) = entry.as_object_mut() else {
            return;
        };
        map = child;
    }
    map.insert((*last).to_string(), value);
}
