use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::CATALOG_ROOT;
use crate::domain::types::{CategoryDescription, CategoryId, CategoryName};

/// A group of items in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub description: CategoryDescription,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Canonical location of the category detail page.
    pub fn url(&self) -> String {
        category_url(self.id)
    }
}

/// Canonical location of the category detail page for `id`.
pub fn category_url(id: CategoryId) -> String {
    format!("{CATALOG_ROOT}/category/{id}")
}

/// Location of the category listing.
pub fn categories_url() -> String {
    format!("{CATALOG_ROOT}/categories")
}

/// Data required to insert a new [`Category`] or replace an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub description: CategoryDescription,
}
