use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::item::{Item as DomainItem, NewItem as DomainNewItem};
use crate::domain::types::{
    CategoryId, ItemDescription, ItemName, ItemPrice, StockCount, TypeConstraintError,
};

/// Diesel model representing the `items` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::items)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub number_in_stock: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`Item`]. Category links are written separately.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub number_in_stock: i32,
    pub updated_at: NaiveDateTime,
}

/// Row of the `item_categories` link table.
#[derive(Debug, Clone, Copy, Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::item_categories)]
pub struct ItemCategory {
    pub item_id: i32,
    pub category_id: i32,
}

impl Item {
    /// Builds the domain entity from the row and its linked category ids.
    pub fn into_domain(self, category_ids: Vec<i32>) -> Result<DomainItem, TypeConstraintError> {
        let categories = category_ids
            .into_iter()
            .map(CategoryId::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DomainItem {
            id: self.id.try_into()?,
            name: ItemName::new(self.name)?,
            description: ItemDescription::new(self.description)?,
            categories,
            price: ItemPrice::new(self.price)?,
            number_in_stock: StockCount::new(self.number_in_stock)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl NewItem {
    /// Row values for `item`, stamped with `now`.
    pub fn stamped(item: &DomainNewItem, now: NaiveDateTime) -> Self {
        Self {
            name: item.name.as_str().to_string(),
            description: item.description.as_str().to_string(),
            price: item.price.get(),
            number_in_stock: item.number_in_stock.get(),
            updated_at: now,
        }
    }
}
