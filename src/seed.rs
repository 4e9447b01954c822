//! Sample catalog data used to populate a fresh database.

use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, NewCategory};
use crate::domain::item::{Item, NewItem};
use crate::domain::types::{
    CategoryDescription, CategoryName, ItemDescription, ItemName, ItemPrice, StockCount,
};
use crate::repository::{CategoryWriter, ItemWriter};

const CATEGORIES: [(&str, &str); 3] = [
    ("Toy", "Paper, wooden, rubber and plush toys."),
    (
        "Blanket",
        "Specially designed blankets for a full cat experience.",
    ),
    (
        "Scratching post",
        "Cardboard, wooden and rope ones, horizontal and vertical.",
    ),
];

/// Name, description, index into the created categories, price, stock.
const ITEMS: [(&str, &str, usize, f64, i32); 6] = [
    (
        "Gray mouse",
        "Little gray mouse is a must have for every cat household.",
        0,
        0.75,
        20,
    ),
    ("White mouse", "For sophisticated cats.", 0, 1.0, 20),
    (
        "Blue blanket",
        "Fluffiest blanket for sweetest dreams and longest purrs.",
        1,
        15.0,
        10,
    ),
    (
        "Heated blanket",
        "For those extra cold days. Almost no energy consumption.",
        1,
        75.0,
        5,
    ),
    (
        "Wave",
        "Wave shaped cardboard horizontal scratching post. Excellent for beginners.",
        2,
        5.0,
        50,
    ),
    (
        "Small castle",
        "Only the best for their highness. With 4 levels and 5 vertical scratching posts, your cats will surely enjoy every piece of it.",
        2,
        250.0,
        10,
    ),
];

/// Inserts the sample categories and returns them in insertion order.
pub fn create_categories<R>(repo: &R) -> RepositoryResult<Vec<Category>>
where
    R: CategoryWriter,
{
    let mut created = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = repo.create_category(&NewCategory {
            name: CategoryName::new(name)?,
            description: CategoryDescription::new(description)?,
        })?;
        log::info!("Added category: {name}");
        created.push(category);
    }
    Ok(created)
}

/// Inserts the sample items linked to `categories` as returned by
/// [`create_categories`]. An item whose category is missing from the slice
/// is stored without one.
pub fn create_items<R>(repo: &R, categories: &[Category]) -> RepositoryResult<Vec<Item>>
where
    R: ItemWriter,
{
    let mut created = Vec::with_capacity(ITEMS.len());
    for (name, description, category, price, number_in_stock) in ITEMS {
        let item = repo.create_item(&NewItem {
            name: ItemName::new(name)?,
            description: ItemDescription::new(description)?,
            categories: categories.get(category).map(|c| c.id).into_iter().collect(),
            price: ItemPrice::new(price)?,
            number_in_stock: StockCount::new(number_in_stock)?,
        })?;
        log::info!("Added item: {name}");
        created.push(item);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::TestRepository;

    #[test]
    fn items_reference_the_created_categories() {
        let repo = TestRepository::default();

        let categories = create_categories(&repo).unwrap();
        let items = create_items(&repo, &categories).unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].categories, vec![categories[0].id]);
        assert_eq!(items[5].categories, vec![categories[2].id]);
        assert_eq!(items[5].price, 250.0);
    }

    #[test]
    fn items_without_categories_are_still_created() {
        let repo = TestRepository::default();

        let items = create_items(&repo, &[]).unwrap();

        assert!(items.iter().all(|item| item.categories.is_empty()));
    }

    #[test]
    fn stops_at_the_first_repository_error() {
        let repo = TestRepository::failing();

        assert!(create_categories(&repo).is_err());
        assert_eq!(repo.writes(), 0);
    }
}
