use chrono::Utc;
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order(categories::name.asc())
            .select(DbCategory::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.get())
            .select(DbCategory::as_select())
            .first(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }

    fn count_categories(&self) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let total = categories::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category = DbNewCategory::stamped(category, Utc::now().naive_utc());

        let stored = diesel::insert_into(categories::table)
            .values(&db_category)
            .returning(DbCategory::as_returning())
            .get_result(&mut conn)?;

        Ok(stored.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        category: &NewCategory,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category = DbNewCategory::stamped(category, Utc::now().naive_utc());

        let stored = diesel::update(categories::table.find(id.get()))
            .set(&db_category)
            .returning(DbCategory::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(stored.map(TryInto::try_into).transpose()?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::delete(categories::table.find(id.get())).execute(&mut conn)?;

        Ok(affected)
    }
}
