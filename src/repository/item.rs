use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::item::{Item, NewItem};
use crate::domain::types::ItemId;
use crate::models::item::{Item as DbItem, ItemCategory, NewItem as DbNewItem};
use crate::repository::{DieselRepository, ItemListQuery, ItemReader, ItemWriter};

/// Category ids linked to each of `item_ids`, in ascending order.
fn load_links(
    conn: &mut SqliteConnection,
    item_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::item_categories;

    let links = item_categories::table
        .filter(item_categories::item_id.eq_any(item_ids))
        .order((item_categories::item_id, item_categories::category_id))
        .select(ItemCategory::as_select())
        .load(conn)?;

    let mut grouped: HashMap<i32, Vec<i32>> = HashMap::new();
    for link in links {
        grouped
            .entry(link.item_id)
            .or_default()
            .push(link.category_id);
    }
    Ok(grouped)
}

fn write_links(conn: &mut SqliteConnection, item_id: i32, item: &NewItem) -> QueryResult<usize> {
    use crate::schema::item_categories;

    let links = item
        .categories
        .iter()
        .map(|category_id| ItemCategory {
            item_id,
            category_id: category_id.get(),
        })
        .collect::<Vec<_>>();

    if links.is_empty() {
        return Ok(0);
    }

    diesel::insert_or_ignore_into(item_categories::table)
        .values(&links)
        .execute(conn)
}

/// Category ids as they read back from the link table.
fn linked_ids(item: &NewItem) -> Vec<i32> {
    let mut ids = item.categories.iter().map(|c| c.get()).collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn assemble(conn: &mut SqliteConnection, rows: Vec<DbItem>) -> RepositoryResult<Vec<Item>> {
    let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
    let mut links = load_links(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let category_ids = links.remove(&row.id).unwrap_or_default();
            row.into_domain(category_ids).map_err(RepositoryError::from)
        })
        .collect()
}

impl ItemReader for DieselRepository {
    fn list_items(&self, query: ItemListQuery) -> RepositoryResult<Vec<Item>> {
        use crate::schema::{item_categories, items};

        let mut conn = self.conn()?;

        let mut rows = items::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(category_id) = query.category_id {
            rows = rows.filter(
                items::id.eq_any(
                    item_categories::table
                        .filter(item_categories::category_id.eq(category_id.get()))
                        .select(item_categories::item_id),
                ),
            );
        }

        let rows = rows
            .order(items::name.asc())
            .select(DbItem::as_select())
            .load(&mut conn)?;

        assemble(&mut conn, rows)
    }

    fn get_item_by_id(&self, id: ItemId) -> RepositoryResult<Option<Item>> {
        use crate::schema::items;

        let mut conn = self.conn()?;

        let row = items::table
            .find(id.get())
            .select(DbItem::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(assemble(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn count_items(&self) -> RepositoryResult<usize> {
        use crate::schema::items;

        let mut conn = self.conn()?;
        let total = items::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl ItemWriter for DieselRepository {
    fn create_item(&self, item: &NewItem) -> RepositoryResult<Item> {
        use crate::schema::items;

        let mut conn = self.conn()?;
        let db_item = DbNewItem::stamped(item, Utc::now().naive_utc());

        let stored = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(items::table)
                .values(&db_item)
                .returning(DbItem::as_returning())
                .get_result(conn)?;
            write_links(conn, row.id, item)?;
            Ok(row)
        })?;

        Ok(stored.into_domain(linked_ids(item))?)
    }

    fn update_item(&self, id: ItemId, item: &NewItem) -> RepositoryResult<Option<Item>> {
        use crate::schema::{item_categories, items};

        let mut conn = self.conn()?;
        let db_item = DbNewItem::stamped(item, Utc::now().naive_utc());

        let stored = conn.transaction::<_, RepositoryError, _>(|conn| {
            let Some(row) = diesel::update(items::table.find(id.get()))
                .set(&db_item)
                .returning(DbItem::as_returning())
                .get_result(conn)
                .optional()?
            else {
                return Ok(None);
            };

            diesel::delete(item_categories::table.filter(item_categories::item_id.eq(row.id)))
                .execute(conn)?;
            write_links(conn, row.id, item)?;
            Ok(Some(row))
        })?;

        match stored {
            Some(row) => Ok(Some(row.into_domain(linked_ids(item))?)),
            None => Ok(None),
        }
    }

    fn delete_item(&self, id: ItemId) -> RepositoryResult<usize> {
        use crate::schema::{item_categories, items};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(item_categories::table.filter(item_categories::item_id.eq(id.get())))
                .execute(conn)?;
            Ok(diesel::delete(items::table.find(id.get())).execute(conn)?)
        })?;

        Ok(affected)
    }
}
