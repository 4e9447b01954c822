use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::CATALOG_ROOT;
use crate::domain::types::{CategoryId, ItemDescription, ItemId, ItemName, ItemPrice, StockCount};

/// A stocked item. Categories are referenced by identifier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: ItemName,
    pub description: ItemDescription,
    pub categories: Vec<CategoryId>,
    pub price: ItemPrice,
    pub number_in_stock: StockCount,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Item {
    /// Canonical location of the item detail page.
    pub fn url(&self) -> String {
        item_url(self.id)
    }
}

/// Canonical location of the item detail page for `id`.
pub fn item_url(id: ItemId) -> String {
    format!("{CATALOG_ROOT}/item/{id}")
}

/// Location of the item listing.
pub fn items_url() -> String {
    format!("{CATALOG_ROOT}/items")
}

/// Information required to create a new [`Item`] or fully replace an existing one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewItem {
    pub name: ItemName,
    pub description: ItemDescription,
    pub categories: Vec<CategoryId>,
    pub price: ItemPrice,
    pub number_in_stock: StockCount,
}
