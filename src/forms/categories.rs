use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryDescription, CategoryName, TypeConstraintError};
use crate::forms::{FieldViolation, Sanitized, escape, violations_from};

/// Raw category create/update submission.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryForm {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 100,
        message = "Name must be between 3 and 100 characters."
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 10, message = "Description must be at least 10 characters."))]
    pub description: String,
}

impl CategoryForm {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }

    /// Trims, validates and escapes the submission.
    pub fn sanitize(self) -> Sanitized<CategoryValues> {
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
            values: CategoryValues {
                name: escape(&form.name),
                description: escape(&form.description),
            },
            violations,
        }
    }
}

/// Category fields as shown in the form: trimmed and escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryValues {
    pub name: String,
    pub description: String,
}

impl CategoryValues {
    /// Builds the record to persist from checked values.
    pub fn to_new_category(&self) -> Result<NewCategory, FieldViolation> {
        let constraint = |e: TypeConstraintError, value: &str| {
            FieldViolation::from_constraint(&e, value.to_string())
        };
        Ok(NewCategory {
            name: CategoryName::new(self.name.as_str()).map_err(|e| constraint(e, &self.name))?,
            description: CategoryDescription::new(self.description.as_str())
                .map_err(|e| constraint(e, &self.description))?,
        })
    }
}

impl From<&Category> for CategoryValues {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.as_str().to_string(),
            description: category.description.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, description: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn trims_and_escapes_valid_input() {
        let sanitized = form("  Toys & more ", "  Paper, wooden <and> plush toys.  ").sanitize();

        assert!(sanitized.is_valid());
        assert_eq!(sanitized.values.name, "Toys &amp; more");
        assert_eq!(
            sanitized.values.description,
            "Paper, wooden &lt;and&gt; plush toys."
        );
    }

    #[test]
    fn length_is_checked_after_trimming() {
        let sanitized = form("  ab   ", "0123456789").sanitize();

        assert_eq!(sanitized.violations.len(), 1);
        assert_eq!(sanitized.violations[0].field, "name");
        assert_eq!(sanitized.violations[0].value, "ab");
    }

    #[test]
    fn length_is_checked_before_escaping() {
        // "<>" escapes to eight characters but only two were typed.
        let sanitized = form("<>", "ten chars!").sanitize();

        assert_eq!(sanitized.violations.len(), 1);
        assert_eq!(sanitized.violations[0].field, "name");
        assert_eq!(sanitized.violations[0].value, "<>");
        assert_eq!(sanitized.values.name, "&lt;&gt;");
    }

    #[test]
    fn reports_every_failing_field_in_order() {
        let sanitized = form("", "short").sanitize();

        let fields: Vec<_> = sanitized
            .violations
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(fields, vec!["description", "name"]);
    }

    #[test]
    fn rejects_names_over_one_hundred_characters() {
        let sanitized = form(&"x".repeat(101), "long enough description").sanitize();
        assert_eq!(sanitized.violations[0].field, "name");
    }
}
