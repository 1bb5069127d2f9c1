//! Field-level validation errors.

use serde::Serialize;
use thiserror::Error;

pub const BLANK: &str = "can't be blank";

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    /// Human-readable message prefixed with the field name, e.g. "Title can't be blank".
    pub fn full_message(&self) -> String {
        format!("{} {}", humanize(self.field), self.message)
    }
}

/// All rule failures collected for one record, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize)]
#[error("{}", join_messages(.errors))]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(FieldError::full_message).collect::<Vec<_>>().join(", ")
}

/// Blank means absent, empty or whitespace-only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

pub(crate) fn require_present(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if is_blank(value) {
        errors.add(field, BLANK);
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
