use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::item::{Item, NewItem};
use crate::domain::types::{CategoryId, ItemId};

pub mod category;
pub mod item;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing items.
#[derive(Debug, Clone, Default)]
pub struct ItemListQuery {
    /// Restrict to items referencing this category.
    pub category_id: Option<CategoryId>,
}

impl ItemListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Number of stored categories.
    fn count_categories(&self) -> RepositoryResult<usize>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored record.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Replace name and description of a category. `None` when no row has `id`.
    fn update_category(
        &self,
        id: CategoryId,
        category: &NewCategory,
    ) -> RepositoryResult<Option<Category>>;
    /// Delete a category by id. Items referencing it are left untouched.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for item entities.
pub trait ItemReader {
    /// List items matching the supplied query, ordered by name.
    fn list_items(&self, query: ItemListQuery) -> RepositoryResult<Vec<Item>>;
    /// Retrieve an item by its identifier.
    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<Item>>;
    /// Number of stored items.
    fn count_items(&self) -> RepositoryResult<usize>;
}

/// Write operations for item entities and their category links.
pub trait ItemWriter {
    /// Persist a new item with its category links.
    fn create_item(&self, item: &NewItem) -> RepositoryResult<Item>;
    /// Fully replace an item, including its category links. `None` when no
    /// row has `id`.
    fn update_item(&self, id: ItemId, item: &NewItem) -> RepositoryResult<Option<Item>>;
    /// Delete an item and its category links.
    fn delete_item(&self, id: ItemId) -> RepositoryResult<usize>;
}
