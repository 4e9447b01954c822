use std::collections::BTreeSet;

use serde::Serialize;
use validator::Validate;

use crate::domain::item::{Item, NewItem};
use crate::domain::types::{CategoryId, ItemDescription, ItemName, ItemPrice, StockCount};
use crate::forms::{FieldViolation, Sanitized, escape, sort_violations, violations_from};

/// Raw item create/update submission.
///
/// Built from the decoded `application/x-www-form-urlencoded` pairs so that a
/// repeated `category` key ends up in one set regardless of how many
/// checkboxes were ticked.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ItemForm {
    #[validate(length(
        min = 5,
        max = 100,
        message = "Name must be between 5 and 100 characters."
    ))]
    pub name: String,
    #[validate(length(min = 5, message = "Description must be at least 5 characters."))]
    pub description: String,
    pub category: BTreeSet<String>,
    pub price: String,
    pub number_in_stock: String,
}

impl From<Vec<(String, String)>> for ItemForm {
    fn from(fields: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "name" => form.name = value,
                "description" => form.description = value,
                "category" | "category[]" => {
                    form.category.insert(value);
                }
                "price" => form.price = value,
                "number_in_stock" | "numberInStock" => form.number_in_stock = value,
                _ => {}
            }
        }
        form
    }
}

impl ItemForm {
    /// Selected category identifiers, trimmed but not yet escaped.
    pub fn selected_categories(&self) -> BTreeSet<String> {
        self.category
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    fn trimmed(self) -> Self {
        Self {
            category: self.selected_categories(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().to_string(),
            number_in_stock: self.number_in_stock.trim().to_string(),
        }
    }

    /// Trims, validates and escapes the submission.
    pub fn sanitize(self) -> Sanitized<ItemValues> {
        let form = self.trimmed();
        let violations = match form.validate() {
            Ok(()) => vec![],
            Err(errors) => violations_from(&errors, |field| match field {
                "name" => form.name.clone(),
                "description" => form.description.clone(),
                _ => String::new(),
            }),
        };

        Sanitized {
            values: ItemValues {
                name: escape(&form.name),
                description: escape(&form.description),
                category: form.category.iter().map(|c| escape(c)).collect(),
                price: escape(&form.price),
                number_in_stock: escape(&form.number_in_stock),
            },
            violations,
        }
    }
}

/// Item fields as shown in the form: trimmed and escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemValues {
    pub name: String,
    pub description: String,
    pub category: BTreeSet<String>,
    pub price: String,
    pub number_in_stock: String,
}

impl ItemValues {
    /// Coerces checked values into the record to persist.
    ///
    /// `categories` are the already resolved references for `self.category`.
    /// Every field that fails its domain constraint is reported.
    pub fn to_new_item(&self, categories: Vec<CategoryId>) -> Result<NewItem, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let name = ItemName::new(self.name.as_str())
            .map_err(|e| violations.push(FieldViolation::from_constraint(&e, &self.name)))
            .ok();
        let description = ItemDescription::new(self.description.as_str())
            .map_err(|e| violations.push(FieldViolation::from_constraint(&e, &self.description)))
            .ok();
        let price = ItemPrice::parse(&self.price)
            .map_err(|e| violations.push(FieldViolation::from_constraint(&e, &self.price)))
            .ok();
        let number_in_stock = StockCount::parse(&self.number_in_stock)
            .map_err(|e| {
                violations.push(FieldViolation::from_constraint(
                    &e,
                    &self.number_in_stock,
                ))
            })
            .ok();

        match (name, description, price, number_in_stock) {
            (Some(name), Some(description), Some(price), Some(number_in_stock)) => Ok(NewItem {
                name,
                description,
                categories,
                price,
                number_in_stock,
            }),
            _ => {
                sort_violations(&mut violations);
                Err(violations)
            }
        }
    }
}

impl From<&Item> for ItemValues {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.as_str().to_string(),
            description: item.description.as_str().to_string(),
            category: item.categories.iter().map(|c| c.to_string()).collect(),
            price: item.price.to_string(),
            number_in_stock: item.number_in_stock.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn valid_fields() -> Vec<(String, String)> {
        pairs(&[
            ("name", "Gray mouse"),
            ("description", "Little gray mouse."),
            ("price", "0.75"),
            ("numberInStock", "20"),
        ])
    }

    #[test]
    fn missing_category_becomes_empty_set() {
        let form = ItemForm::from(valid_fields());
        assert!(form.category.is_empty());
    }

    #[test]
    fn single_category_becomes_one_element_set() {
        let mut fields = valid_fields();
        fields.push(("category".into(), "X".into()));

        let form = ItemForm::from(fields);
        assert_eq!(form.category, BTreeSet::from(["X".to_string()]));
    }

    #[test]
    fn repeated_category_keys_are_collected() {
        let mut fields = valid_fields();
        fields.extend(pairs(&[("category", "2"), ("category", "1"), ("category", "2")]));

        let form = ItemForm::from(fields);
        assert_eq!(
            form.category,
            BTreeSet::from(["1".to_string(), "2".to_string()])
        );
    }

    #[test]
    fn selected_categories_are_trimmed_but_not_escaped() {
        let mut fields = valid_fields();
        fields.extend(pairs(&[("category", " <1> "), ("category", "  ")]));

        let form = ItemForm::from(fields);
        assert_eq!(
            form.selected_categories(),
            BTreeSet::from(["<1>".to_string()])
        );
    }

    #[test]
    fn escapes_every_category_element() {
        let mut fields = valid_fields();
        fields.push(("category".into(), " <1> ".into()));

        let sanitized = ItemForm::from(fields).sanitize();
        assert_eq!(
            sanitized.values.category,
            BTreeSet::from(["&lt;1&gt;".to_string()])
        );
    }

    #[test]
    fn short_name_and_description_are_violations() {
        let sanitized = ItemForm::from(pairs(&[
            ("name", " Cat "),
            ("description", "toy"),
            ("price", "1"),
            ("number_in_stock", "1"),
        ]))
        .sanitize();

        let fields: Vec<_> = sanitized
            .violations
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(fields, vec!["description", "name"]);
        assert_eq!(sanitized.values.name, "Cat");
    }

    #[test]
    fn price_and_stock_are_coerced_by_the_entity_model() {
        let sanitized = ItemForm::from(valid_fields()).sanitize();
        assert!(sanitized.is_valid());

        let item = sanitized
            .values
            .to_new_item(vec![CategoryId::new(3).unwrap()])
            .unwrap();
        assert_eq!(item.price, 0.75);
        assert_eq!(item.number_in_stock, 20);
        assert_eq!(item.categories, vec![CategoryId::new(3).unwrap()]);
    }

    #[test]
    fn unparsable_numbers_are_reported_per_field() {
        let sanitized = ItemForm::from(pairs(&[
            ("name", "Gray mouse"),
            ("description", "Little gray mouse."),
            ("price", "free"),
            ("number_in_stock", "-4"),
        ]))
        .sanitize();

        let violations = sanitized.values.to_new_item(vec![]).unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["number_in_stock", "price"]);
        assert_eq!(violations[1].value, "free");
    }
}
