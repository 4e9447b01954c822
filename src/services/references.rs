//! Reconciles an item's selected category identifiers with the stored categories.
//!
//! Identifiers arrive as form strings on submission and as typed ids when an
//! item is loaded, so both sides are compared in their trimmed decimal string
//! form.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryOption;
use crate::forms::FieldViolation;

/// Selected identifiers that do not match any stored category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown categories: {}", .0.join(", "))]
pub struct ReferenceInconsistency(pub Vec<String>);

impl From<ReferenceInconsistency> for FieldViolation {
    fn from(value: ReferenceInconsistency) -> Self {
        let unknown = value.0.join(", ");
        FieldViolation::new(
            "category",
            format!("Selected category does not exist: {unknown}."),
            unknown,
        )
    }
}

fn normalize(raw: &str) -> &str {
    raw.trim()
}

/// Annotates every category with whether it appears in `selected`.
///
/// The returned list keeps the order of `categories`; persisted categories are
/// not touched.
pub fn mark_selected(categories: &[Category], selected: &BTreeSet<String>) -> Vec<CategoryOption> {
    let selected: HashSet<&str> = selected.iter().map(|s| normalize(s)).collect();

    categories
        .iter()
        .map(|category| CategoryOption {
            id: category.id.get(),
            name: category.name.as_str().to_string(),
            url: category.url(),
            checked: selected.contains(category.id.to_string().as_str()),
        })
        .collect()
}

/// Resolves `selected` against `categories`, failing with every identifier
/// that has no matching category.
pub fn resolve_references(
    categories: &[Category],
    selected: &BTreeSet<String>,
) -> Result<Vec<CategoryId>, ReferenceInconsistency> {
    let mut resolved = Vec::new();
    let mut unknown = Vec::new();

    for raw in selected {
        let wanted = normalize(raw);
        match categories.iter().find(|c| c.id.to_string() == wanted) {
            Some(category) => resolved.push(category.id),
            None => unknown.push(wanted.to_string()),
        }
    }

    if unknown.is_empty() {
        resolved.sort();
        resolved.dedup();
        Ok(resolved)
    } else {
        Err(ReferenceInconsistency(unknown))
    }
}
