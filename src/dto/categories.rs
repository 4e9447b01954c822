use serde::Serialize;

use crate::domain::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub url: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            url: value.url(),
            name: value.name.into_inner(),
            description: value.description.into_inner(),
        }
    }
}

/// A category offered as a checkbox on the item form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub checked: bool,
}
