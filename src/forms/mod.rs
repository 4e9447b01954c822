//! Form submissions and the sanitize/validate pipeline shared by them.
//!
//! Every submission goes through the same stages: fields are trimmed, length
//! rules are checked on the trimmed text, and only then is the text
//! HTML-escaped. Violations therefore echo what the user typed, while the
//! values handed on to the service are the escaped ones.

use serde::Serialize;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod categories;
pub mod items;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the offending form field.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
    /// Trimmed value as entered, before escaping.
    pub value: String,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.into(),
        }
    }

    /// Violation for a domain constraint that rejected `value`.
    pub fn from_constraint(error: &TypeConstraintError, value: impl Into<String>) -> Self {
        Self::new(error.field(), capitalize(&error.to_string()), value)
    }
}

/// Normalized form values together with the violations found while checking them.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized<T> {
    /// Trimmed and HTML-escaped values.
    pub values: T,
    /// Field violations ordered by field name; empty when the input is valid.
    pub violations: Vec<FieldViolation>,
}

impl<T> Sanitized<T> {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Escapes `&`, `<`, `>`, `"`, `'` and `/` as HTML entities.
pub fn escape(value: &str) -> String {
    tera::escape_html(value)
}

/// Flattens validator errors into violations, echoing the entered value via `value_of`.
pub(crate) fn violations_from<F>(errors: &ValidationErrors, value_of: F) -> Vec<FieldViolation>
where
    F: Fn(&str) -> String,
{
    let mut violations = Vec::new();
    for (field, errors) in errors.field_errors() {
        let field = field.to_string();
        for error in errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid.", capitalize(&field)));
            violations.push(FieldViolation::new(field.clone(), message, value_of(&field)));
        }
    }
    sort_violations(&mut violations);
    violations
}

pub(crate) fn sort_violations(violations: &mut [FieldViolation]) {
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
