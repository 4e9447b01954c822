use serde::Serialize;

use crate::domain::item::Item;
use crate::dto::categories::CategoryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub number_in_stock: i32,
    pub url: String,
}

impl From<Item> for ItemDto {
    fn from(value: Item) -> Self {
        Self {
            id: value.id.get(),
            url: value.url(),
            name: value.name.into_inner(),
            description: value.description.into_inner(),
            price: value.price.get(),
            number_in_stock: value.number_in_stock.get(),
        }
    }
}

/// An item together with the categories it references that still exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetail {
    pub item: ItemDto,
    pub categories: Vec<CategoryDto>,
}
