use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::item::NewItem;
use crate::domain::types::ItemId;
use crate::dto::categories::{CategoryDto, CategoryOption};
use crate::dto::items::{ItemDetail, ItemDto};
use crate::forms::items::{ItemForm, ItemValues};
use crate::forms::{FieldViolation, Sanitized};
use crate::repository::{CategoryReader, ItemListQuery, ItemReader, ItemWriter};
use crate::services::references::{mark_selected, resolve_references};

use super::{ServiceError, ServiceResult, Submission};

pub const CREATE_TITLE: &str = "Create Item";
pub const UPDATE_TITLE: &str = "Update Item";

/// Everything the item form template needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFormView {
    pub title: &'static str,
    pub item: ItemValues,
    pub categories: Vec<CategoryOption>,
    pub errors: Vec<FieldViolation>,
}

fn parse_id(item_id: i32) -> ServiceResult<ItemId> {
    ItemId::new(item_id).map_err(|_| ServiceError::NotFound)
}

fn load_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })
}

fn ensure_item_exists<R>(item_id: ItemId, repo: &R) -> ServiceResult<()>
where
    R: ItemReader,
{
    match repo.get_item_by_id(item_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Record to persist, or the violations to show again.
///
/// Field rules run first; category references are resolved only for
/// otherwise clean submissions. `selected` holds the identifiers as entered,
/// so a violation echoes them unescaped.
fn prepare(
    sanitized: &Sanitized<ItemValues>,
    selected: &BTreeSet<String>,
    categories: &[Category],
) -> Result<NewItem, Vec<FieldViolation>> {
    if !sanitized.is_valid() {
        return Err(sanitized.violations.clone());
    }

    let references = resolve_references(categories, selected)
        .map_err(|e| vec![FieldViolation::from(e)])?;

    sanitized.values.to_new_item(references)
}

fn form_view(
    title: &'static str,
    item: ItemValues,
    categories: &[Category],
    errors: Vec<FieldViolation>,
) -> ItemFormView {
    ItemFormView {
        title,
        categories: mark_selected(categories, &item.category),
        item,
        errors,
    }
}

/// All items ordered by name.
pub fn show_items<R>(repo: &R) -> ServiceResult<Vec<ItemDto>>
where
    R: ItemReader,
{
    match repo.list_items(ItemListQuery::default()) {
        Ok(items) => Ok(items.into_iter().map(ItemDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list items: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// A single item with the categories it references, or [`ServiceError::NotFound`].
///
/// References to categories that no longer exist are left out.
pub fn show_item<R>(item_id: i32, repo: &R) -> ServiceResult<ItemDetail>
where
    R: ItemReader + CategoryReader,
{
    let item_id = parse_id(item_id)?;

    let item = match repo.get_item_by_id(item_id) {
        Ok(Some(item)) => item,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let categories = load_categories(repo)?
        .into_iter()
        .filter(|category| item.categories.contains(&category.id))
        .map(CategoryDto::from)
        .collect();

    Ok(ItemDetail {
        item: item.into(),
        categories,
    })
}

/// Empty form offering every category, none selected.
pub fn new_item_form<R>(repo: &R) -> ServiceResult<ItemFormView>
where
    R: CategoryReader,
{
    let categories = load_categories(repo)?;
    Ok(form_view(
        CREATE_TITLE,
        ItemValues::default(),
        &categories,
        vec![],
    ))
}

/// Validates the submission and inserts the item when it is clean.
pub fn create_item<R>(form: ItemForm, repo: &R) -> ServiceResult<Submission<ItemFormView>>
where
    R: CategoryReader + ItemWriter,
{
    let selected = form.selected_categories();
    let sanitized = form.sanitize();
    let categories = load_categories(repo)?;

    let new_item = match prepare(&sanitized, &selected, &categories) {
        Ok(new_item) => new_item,
        Err(errors) => {
            return Ok(Submission::Form(form_view(
                CREATE_TITLE,
                sanitized.values,
                &categories,
                errors,
            )));
        }
    };

    match repo.create_item(&new_item) {
        Ok(item) => Ok(Submission::Committed { url: item.url() }),
        Err(e) => {
            log::error!("Failed to create item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Form pre-populated with the stored item and its categories checked.
pub fn edit_item<R>(item_id: i32, repo: &R) -> ServiceResult<ItemFormView>
where
    R: ItemReader + CategoryReader,
{
    let item_id = parse_id(item_id)?;

    // The item and the category list do not depend on each other.
    let item = repo.get_item_by_id(item_id);
    let categories = load_categories(repo)?;

    match item {
        Ok(Some(item)) => Ok(form_view(
            UPDATE_TITLE,
            ItemValues::from(&item),
            &categories,
            vec![],
        )),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Validates the submission and fully replaces the stored item when it is clean.
///
/// The identifier always comes from the route; the item must exist.
pub fn update_item<R>(
    item_id: i32,
    form: ItemForm,
    repo: &R,
) -> ServiceResult<Submission<ItemFormView>>
where
    R: CategoryReader + ItemReader + ItemWriter,
{
    let item_id = parse_id(item_id)?;
    ensure_item_exists(item_id, repo)?;

    let selected = form.selected_categories();
    let sanitized = form.sanitize();
    let categories = load_categories(repo)?;

    let new_item = match prepare(&sanitized, &selected, &categories) {
        Ok(new_item) => new_item,
        Err(errors) => {
            return Ok(Submission::Form(form_view(
                UPDATE_TITLE,
                sanitized.values,
                &categories,
                errors,
            )));
        }
    };

    match repo.update_item(item_id, &new_item) {
        Ok(Some(item)) => Ok(Submission::Committed { url: item.url() }),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Item shown on the delete confirmation page, `None` when it does not exist.
pub fn confirm_delete_item<R>(item_id: i32, repo: &R) -> ServiceResult<Option<ItemDto>>
where
    R: ItemReader,
{
    let Ok(item_id) = ItemId::new(item_id) else {
        return Ok(None);
    };

    match repo.get_item_by_id(item_id) {
        Ok(item) => Ok(item.map(ItemDto::from)),
        Err(e) => {
            log::error!("Failed to get item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes the item. A missing item is not an error; `Ok(false)` is returned
/// and the caller redirects to the listing as usual.
pub fn delete_item<R>(item_id: i32, repo: &R) -> ServiceResult<bool>
where
    R: ItemReader + ItemWriter,
{
    let Ok(item_id) = ItemId::new(item_id) else {
        return Ok(false);
    };

    match ensure_item_exists(item_id, repo) {
        Ok(()) => {}
        Err(ServiceError::NotFound) => return Ok(false),
        Err(e) => return Err(e),
    }

    match repo.delete_item(item_id) {
        Ok(affected) => Ok(affected > 0),
        Err(e) => {
            log::error!("Failed to delete item: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Item;
    use crate::domain::types::{
        CategoryDescription, CategoryId, CategoryName, ItemDescription, ItemName, ItemPrice,
        StockCount,
    };
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn checked_categories(view: &ItemFormView) -> BTreeSet<i32> {
        view.categories
            .iter()
            .filter(|option| option.checked)
            .map(|option| option.id)
            .collect()
    }

    fn sample_category(id: i32, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            description: CategoryDescription::new("A category for tests.").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn sample_categories() -> Vec<Category> {
        vec![
            sample_category(1, "Toy"),
            sample_category(2, "Blanket"),
            sample_category(3, "Scratching post"),
        ]
    }

    fn sample_item(categories: &[i32]) -> Item {
        Item {
            id: ItemId::new(10).unwrap(),
            name: ItemName::new("Gray mouse").unwrap(),
            description: ItemDescription::new("Little gray mouse.").unwrap(),
            categories: categories
                .iter()
                .map(|id| CategoryId::new(*id).unwrap())
                .collect(),
            price: ItemPrice::new(0.75).unwrap(),
            number_in_stock: StockCount::new(20).unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn form(fields: &[(&str, &str)]) -> ItemForm {
        ItemForm::from(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    fn valid_form(categories: &[&str]) -> ItemForm {
        let mut fields = vec![
            ("name", " White mouse "),
            ("description", "For sophisticated cats."),
            ("price", "1"),
            ("number_in_stock", "20"),
        ];
        fields.extend(categories.iter().map(|c| ("category", *c)));
        form(&fields)
    }

    #[test]
    fn new_form_offers_every_category_unselected() {
        let repo = TestRepository::new(sample_categories(), vec![]);

        let view = new_item_form(&repo).unwrap();
        assert_eq!(view.title, CREATE_TITLE);
        assert_eq!(view.categories.len(), 3);
        assert!(checked_categories(&view).is_empty());
    }

    #[test]
    fn edit_form_marks_current_categories() {
        let repo = TestRepository::new(sample_categories(), vec![sample_item(&[1, 3])]);

        let view = edit_item(10, &repo).unwrap();
        assert_eq!(view.title, UPDATE_TITLE);
        assert_eq!(view.item.name, "Gray mouse");
        assert_eq!(view.item.price, "0.75");
        assert_eq!(checked_categories(&view), BTreeSet::from([1, 3]));
    }

    #[test]
    fn edit_of_missing_item_is_not_found() {
        let repo = TestRepository::new(sample_categories(), vec![]);
        assert_eq!(edit_item(10, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn invalid_create_recomputes_selection_from_submission() {
        let repo = TestRepository::new(sample_categories(), vec![]);
        let submission = create_item(
            form(&[
                ("name", "Cat"),
                ("description", "Little gray mouse."),
                ("category", "2"),
                ("price", "1"),
                ("number_in_stock", "1"),
            ]),
            &repo,
        )
        .unwrap();

        let Submission::Form(view) = submission else {
            panic!("expected form");
        };
        assert_eq!(view.errors[0].field, "name");
        assert_eq!(view.item.name, "Cat");
        assert_eq!(checked_categories(&view), BTreeSet::from([2]));
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn valid_create_persists_and_redirects() {
        let repo = TestRepository::new(sample_categories(), vec![]);

        let submission = create_item(valid_form(&["3", "1"]), &repo).unwrap();

        let Submission::Committed { url } = submission else {
            panic!("expected commit");
        };
        assert_eq!(url, "/catalog/item/4");
        let stored = repo.stored_item(ItemId::new(4).unwrap()).unwrap();
        assert_eq!(stored.name.as_str(), "White mouse");
        assert_eq!(
            stored.categories,
            vec![CategoryId::new(1).unwrap(), CategoryId::new(3).unwrap()]
        );
    }

    #[test]
    fn unknown_category_reference_is_a_violation() {
        let repo = TestRepository::new(sample_categories(), vec![]);

        let Submission::Form(view) = create_item(valid_form(&["1", "99"]), &repo).unwrap() else {
            panic!("expected form");
        };

        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "category");
        assert_eq!(checked_categories(&view), BTreeSet::from([1]));
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn unknown_reference_echoes_the_entered_identifier() {
        let repo = TestRepository::new(sample_categories(), vec![]);

        let Submission::Form(view) = create_item(valid_form(&[" <9> "]), &repo).unwrap() else {
            panic!("expected form");
        };

        assert_eq!(view.errors[0].field, "category");
        assert_eq!(view.errors[0].value, "<9>");
        assert_eq!(
            view.errors[0].message,
            "Selected category does not exist: <9>."
        );
        assert_eq!(view.item.category, BTreeSet::from(["&lt;9&gt;".to_string()]));
    }

    #[test]
    fn name_too_long_once_escaped_rerenders_the_form() {
        let repo = TestRepository::new(sample_categories(), vec![]);
        let name = "<".repeat(30);

        let Submission::Form(view) = create_item(
            form(&[
                ("name", name.as_str()),
                ("description", "For sophisticated cats."),
                ("price", "1"),
                ("number_in_stock", "20"),
            ]),
            &repo,
        )
        .unwrap() else {
            panic!("expected form");
        };

        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors[0].field, "name");
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn bad_price_is_reported_without_persisting() {
        let repo = TestRepository::new(sample_categories(), vec![]);

        let submission = create_item(
            form(&[
                ("name", "White mouse"),
                ("description", "For sophisticated cats."),
                ("price", "-2"),
                ("number_in_stock", "20"),
            ]),
            &repo,
        )
        .unwrap();

        let Submission::Form(view) = submission else {
            panic!("expected form");
        };
        assert_eq!(view.errors[0].field, "price");
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn update_replaces_item_under_route_identifier() {
        let repo = TestRepository::new(sample_categories(), vec![sample_item(&[1, 3])]);

        let submission = update_item(10, valid_form(&["2"]), &repo).unwrap();

        assert_eq!(
            submission,
            Submission::Committed {
                url: "/catalog/item/10".to_string()
            }
        );
        let stored = repo.stored_item(ItemId::new(10).unwrap()).unwrap();
        assert_eq!(stored.name.as_str(), "White mouse");
        assert_eq!(stored.categories, vec![CategoryId::new(2).unwrap()]);
        assert_eq!(stored.price, 1.0);
    }

    #[test]
    fn update_without_categories_clears_them() {
        let repo = TestRepository::new(sample_categories(), vec![sample_item(&[1, 3])]);

        update_item(10, valid_form(&[]), &repo).unwrap();

        let stored = repo.stored_item(ItemId::new(10).unwrap()).unwrap();
        assert!(stored.categories.is_empty());
    }

    #[test]
    fn update_of_missing_item_is_not_found() {
        let repo = TestRepository::new(sample_categories(), vec![]);

        let err = update_item(10, valid_form(&[]), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn item_deleted_during_update_is_not_found() {
        let repo = TestRepository::new(sample_categories(), vec![sample_item(&[1])])
            .deleting_before_update();

        let err = update_item(10, valid_form(&["2"]), &repo).unwrap_err();
        assert_eq!(err, ServiceError::NotFound);
    }

    #[test]
    fn detail_drops_references_to_deleted_categories() {
        let repo = TestRepository::new(
            vec![sample_category(1, "Toy")],
            vec![sample_item(&[1, 2])],
        );

        let detail = show_item(10, &repo).unwrap();
        assert_eq!(detail.item.url, "/catalog/item/10");
        assert_eq!(detail.categories.len(), 1);
        assert_eq!(detail.categories[0].name, "Toy");
    }

    #[test]
    fn detail_of_missing_item_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(show_item(10, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn deleting_missing_item_is_silent() {
        let repo = TestRepository::default();

        assert!(!delete_item(10, &repo).unwrap());
        assert!(!delete_item(0, &repo).unwrap());
        assert!(confirm_delete_item(10, &repo).unwrap().is_none());
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn deleting_existing_item_removes_it() {
        let repo = TestRepository::new(vec![], vec![sample_item(&[])]);

        assert!(confirm_delete_item(10, &repo).unwrap().is_some());
        assert!(delete_item(10, &repo).unwrap());
        assert!(repo.stored_item(ItemId::new(10).unwrap()).is_none());
    }

    #[test]
    fn lists_items_by_name() {
        let mut second = sample_item(&[]);
        second.id = ItemId::new(11).unwrap();
        second.name = ItemName::new("Blue blanket").unwrap();
        let repo = TestRepository::new(vec![], vec![sample_item(&[]), second]);

        let items = show_items(&repo).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Blue blanket", "Gray mouse"]);
    }
}
