use serde::Serialize;

use crate::domain::category::NewCategory;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryDto;
use crate::dto::items::ItemDto;
use crate::forms::FieldViolation;
use crate::forms::categories::{CategoryForm, CategoryValues};
use crate::repository::{CategoryReader, CategoryWriter, ItemListQuery, ItemReader};

use super::{ServiceError, ServiceResult, Submission};

pub const CREATE_TITLE: &str = "Create Category";
pub const UPDATE_TITLE: &str = "Update Category";

/// Everything the category form template needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFormView {
    pub title: &'static str,
    pub category: CategoryValues,
    pub errors: Vec<FieldViolation>,
}

/// A category and the items that reference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDetail {
    pub category: CategoryDto,
    pub items: Vec<ItemDto>,
}

fn parse_id(category_id: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)
}

/// Record to persist, or the values and violations to show again.
fn prepare(form: CategoryForm) -> Result<NewCategory, (CategoryValues, Vec<FieldViolation>)> {
    let sanitized = form.sanitize();
    if !sanitized.is_valid() {
        return Err((sanitized.values, sanitized.violations));
    }

    match sanitized.values.to_new_category() {
        Ok(new_category) => Ok(new_category),
        Err(violation) => Err((sanitized.values, vec![violation])),
    }
}

fn load_detail<R>(category_id: CategoryId, repo: &R) -> ServiceResult<Option<CategoryDetail>>
where
    R: CategoryReader + ItemReader,
{
    let category = match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => category,
        Ok(None) => return Ok(None),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let items = match repo.list_items(ItemListQuery::default().category(category_id)) {
        Ok(items) => items,
        Err(e) => {
            log::error!("Failed to list items of category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(Some(CategoryDetail {
        category: category.into(),
        items: items.into_iter().map(ItemDto::from).collect(),
    }))
}

/// All categories ordered by name.
pub fn show_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A single category with its items, or [`ServiceError::NotFound`].
pub fn show_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryDetail>
where
    R: CategoryReader + ItemReader,
{
    load_detail(parse_id(category_id)?, repo)?.ok_or(ServiceError::NotFound)
}

/// Empty form for a new category.
pub fn new_category_form() -> CategoryFormView {
    CategoryFormView {
        title: CREATE_TITLE,
        category: CategoryValues::default(),
        errors: vec![],
    }
}

/// Validates the submission and inserts the category when it is clean.
pub fn create_category<R>(
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<Submission<CategoryFormView>>
where
    R: CategoryWriter,
{
    let new_category = match prepare(form) {
        Ok(new_category) => new_category,
        Err((category, errors)) => {
            return Ok(Submission::Form(CategoryFormView {
                title: CREATE_TITLE,
                category,
                errors,
            }));
        }
    };

    match repo.create_category(&new_category) {
        Ok(category) => Ok(Submission::Committed {
            url: category.url(),
        }),
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Form pre-populated with the stored category.
pub fn edit_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryFormView>
where
    R: CategoryReader,
{
    let category_id = parse_id(category_id)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(CategoryFormView {
            title: UPDATE_TITLE,
            category: CategoryValues::from(&category),
            errors: vec![],
        }),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Validates the submission and replaces the stored category when it is clean.
///
/// The identifier always comes from the route; the category must exist.
pub fn update_category<R>(
    category_id: i32,
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<Submission<CategoryFormView>>
where
    R: CategoryReader + CategoryWriter,
{
    let category_id = parse_id(category_id)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let new_category = match prepare(form) {
        Ok(new_category) => new_category,
        Err((category, errors)) => {
            return Ok(Submission::Form(CategoryFormView {
                title: UPDATE_TITLE,
                category,
                errors,
            }));
        }
    };

    match repo.update_category(category_id, &new_category) {
        Ok(Some(category)) => Ok(Submission::Committed {
            url: category.url(),
        }),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Category shown on the delete confirmation page, `None` when it does not exist.
pub fn confirm_delete_category<R>(
    category_id: i32,
    repo: &R,
) -> ServiceResult<Option<CategoryDetail>>
where
    R: CategoryReader + ItemReader,
{
    match CategoryId::new(category_id) {
        Ok(category_id) => load_detail(category_id, repo),
        Err(_) => Ok(None),
    }
}

/// Deletes the category. A missing category is not an error; `Ok(false)` is
/// returned and the caller redirects to the listing as usual.
pub fn delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter,
{
    let Ok(category_id) = CategoryId::new(category_id) else {
        return Ok(false);
    };

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(false),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.delete_category(category_id) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::item::Item;
    use crate::domain::types::{
        CategoryDescription, CategoryName, ItemDescription, ItemId, ItemName, ItemPrice,
        StockCount,
    };
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn sample_category() -> Category {
        Category {
            id: CategoryId::new(1).unwrap(),
            name: CategoryName::new("Toy").unwrap(),
            description: CategoryDescription::new("Paper, wooden and plush toys.").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_item(categories: Vec<i32>) -> Item {
        Item {
            id: ItemId::new(10).unwrap(),
            name: ItemName::new("Gray mouse").unwrap(),
            description: ItemDescription::new("Little gray mouse.").unwrap(),
            categories: categories
                .into_iter()
                .map(|id| CategoryId::new(id).unwrap())
                .collect(),
            price: ItemPrice::new(0.75).unwrap(),
            number_in_stock: StockCount::new(20).unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn form(name: &str, description: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn invalid_create_rerenders_without_persisting() {
        let repo = TestRepository::default();

        let cases = [("ab", "long enough text"), ("Toys", "too short"), (" ", " ")];
        for (name, description) in cases {
            match create_category(form(name, description), &repo).unwrap() {
                Submission::Form(view) => {
                    assert_eq!(view.title, CREATE_TITLE);
                    assert!(!view.errors.is_empty());
                }
                other => panic!("expected form, got {other:?}"),
            }
        }

        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn invalid_create_names_the_failing_field_and_keeps_values() {
        let repo = TestRepository::default();

        let Submission::Form(view) =
            create_category(form(" Toys & co ", " short "), &repo).unwrap()
        else {
            panic!("expected form");
        };

        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "description");
        assert_eq!(view.category.name, "Toys &amp; co");
        assert_eq!(view.category.description, "short");
    }

    #[test]
    fn valid_create_stores_escaped_values_and_redirects() {
        let repo = TestRepository::default();

        let submission =
            create_category(form("  <Toys>  ", " Paper & wooden toys. "), &repo).unwrap();

        let Submission::Committed { url } = submission else {
            panic!("expected commit");
        };
        let stored = repo.stored_category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(url, "/catalog/category/1");
        assert_eq!(stored.name.as_str(), "&lt;Toys&gt;");
        assert_eq!(stored.description.as_str(), "Paper &amp; wooden toys.");
    }

    #[test]
    fn valid_update_keeps_identifier_from_route() {
        let repo = TestRepository::new(vec![sample_category()], vec![]);

        let submission =
            update_category(1, form("Blanket", "Blankets for a full cat experience."), &repo)
                .unwrap();

        assert_eq!(
            submission,
            Submission::Committed {
                url: "/catalog/category/1".to_string()
            }
        );
        let stored = repo.stored_category(CategoryId::new(1).unwrap()).unwrap();
        assert_eq!(stored.name.as_str(), "Blanket");
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let repo = TestRepository::new(vec![sample_category()], vec![]);
        let payload = form(" Scratching post ", "Cardboard, wooden & rope ones.");

        update_category(1, payload.clone(), &repo).unwrap();
        let first = repo.stored_category(CategoryId::new(1).unwrap()).unwrap();
        update_category(1, payload, &repo).unwrap();
        let second = repo.stored_category(CategoryId::new(1).unwrap()).unwrap();

        assert_eq!(first.name, second.name);
        assert_eq!(first.description, second.description);
        assert_eq!(second.description.as_str(), "Cardboard, wooden &amp; rope ones.");
    }

    #[test]
    fn invalid_update_rerenders_with_update_title() {
        let repo = TestRepository::new(vec![sample_category()], vec![]);

        let Submission::Form(view) = update_category(1, form("ab", "short"), &repo).unwrap()
        else {
            panic!("expected form");
        };

        assert_eq!(view.title, UPDATE_TITLE);
        assert_eq!(view.errors.len(), 2);
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn update_of_missing_category_is_not_found() {
        let repo = TestRepository::default();

        let err = update_category(5, form("Blanket", "Blankets for cats."), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn category_deleted_during_update_is_not_found() {
        let repo = TestRepository::new(vec![sample_category()], vec![]).deleting_before_update();

        let err = update_category(1, form("Blanket", "Blankets for cats."), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn name_too_long_once_escaped_rerenders_the_form() {
        let repo = TestRepository::default();
        let name = "&".repeat(100);

        let Submission::Form(view) =
            create_category(form(&name, "long enough description"), &repo).unwrap()
        else {
            panic!("expected form");
        };

        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "name");
        assert_eq!(view.errors[0].message, "Name must be at most 100 characters");
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn detail_of_missing_category_is_not_found() {
        let repo = TestRepository::default();

        assert_eq!(show_category(42, &repo).unwrap_err(), ServiceError::NotFound);
        assert_eq!(show_category(-1, &repo).unwrap_err(), ServiceError::NotFound);
        assert_eq!(edit_category(42, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn detail_lists_items_in_category() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_item(vec![1])]);

        let detail = show_category(1, &repo).unwrap();
        assert_eq!(detail.category.url, "/catalog/category/1");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].url, "/catalog/item/10");
    }

    #[test]
    fn deleting_missing_category_is_silent() {
        let repo = TestRepository::default();

        assert!(!delete_category(3, &repo).unwrap());
        assert!(confirm_delete_category(3, &repo).unwrap().is_none());
        assert!(confirm_delete_category(0, &repo).unwrap().is_none());
    }

    #[test]
    fn deleting_category_keeps_referencing_items() {
        let repo = TestRepository::new(vec![sample_category()], vec![sample_item(vec![1])]);

        assert!(delete_category(1, &repo).unwrap());
        assert!(repo.stored_category(CategoryId::new(1).unwrap()).is_none());
        assert!(repo.stored_item(ItemId::new(10).unwrap()).is_some());
    }

    #[test]
    fn persistence_failures_are_internal_errors() {
        let repo = TestRepository::failing();

        assert_eq!(show_categories(&repo).unwrap_err(), ServiceError::Internal);
        assert_eq!(
            create_category(form("Blanket", "Blankets for cats."), &repo).unwrap_err(),
            ServiceError::Internal
        );
    }
}
