use serde::Serialize;

use crate::repository::{CategoryReader, ItemReader};

use super::{ServiceError, ServiceResult};

/// Aggregate counts shown on the catalog home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub item_count: usize,
    pub category_count: usize,
}

/// Core business logic for rendering the index page.
///
/// Counts both collections. Repository errors are translated into
/// `ServiceError` so that the HTTP route can remain a thin wrapper.
pub fn show_index<R>(repo: &R) -> ServiceResult<CatalogCounts>
where
    R: ItemReader + CategoryReader,
{
    let item_count = match repo.count_items() {
        Ok(count) => count,
        Err(e) => {
            log::error!("Failed to count items: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let category_count = match repo.count_categories() {
        Ok(count) => count,
        Err(e) => {
            log::error!("Failed to count categories: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(CatalogCounts {
        item_count,
        category_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::NewCategory;
    use crate::domain::types::{CategoryDescription, CategoryName};
    use crate::repository::CategoryWriter;
    use crate::repository::test::TestRepository;

    #[test]
    fn counts_both_collections() {
        let repo = TestRepository::default();
        repo.create_category(&NewCategory {
            name: CategoryName::new("Toy").unwrap(),
            description: CategoryDescription::new("Paper, wooden and plush toys.").unwrap(),
        })
        .unwrap();

        let counts = show_index(&repo).unwrap();

        assert_eq!(
            counts,
            CatalogCounts {
                item_count: 0,
                category_count: 1
            }
        );
    }

    #[test]
    fn repository_failure_is_internal() {
        let repo = TestRepository::failing();
        assert_eq!(show_index(&repo).unwrap_err(), ServiceError::Internal);
    }
}
