//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative or not finite.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string could not be read as a number.
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    /// A string could not be read as a whole number.
    #[error("{0} must be a whole number")]
    NotAnInteger(&'static str),
    /// A string is longer than the stored column allows.
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
}

/// Maximum stored length of item and category names, in characters.
pub const NAME_MAX_CHARS: usize = 100;

impl TypeConstraintError {
    /// Name of the field the constraint was checked for.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveId(field)
            | Self::NegativeNumber(field)
            | Self::EmptyString(field)
            | Self::NotANumber(field)
            | Self::NotAnInteger(field)
            | Self::TooLong(field, _) => field,
        }
    }
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

fn require_max_chars(
    value: String,
    field: &'static str,
    max: Option<usize>,
) -> Result<String, TypeConstraintError> {
    match max {
        Some(max) if value.chars().count() > max => {
            Err(TypeConstraintError::TooLong(field, max))
        }
        _ => Ok(value),
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        non_empty_string_newtype!(@define $name, $doc, $field, None);
    };
    ($name:ident, $doc:expr, $field:expr, max = $max:expr) => {
        non_empty_string_newtype!(@define $name, $doc, $field, Some($max));
    };
    (@define $name:ident, $doc:expr, $field:expr, $max:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value within the length bound.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let value = trim_and_require_non_empty(value, $field)?;
                require_max_chars(value, $field, $max).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

id_newtype!(ItemId, "Unique identifier for an item.", "item_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);

non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values of at most 100 characters.",
    "name",
    max = NAME_MAX_CHARS
);
non_empty_string_newtype!(
    CategoryDescription,
    "Category description enforcing non-empty values.",
    "description"
);
non_empty_string_newtype!(
    ItemName,
    "Item name enforcing non-empty values of at most 100 characters.",
    "name",
    max = NAME_MAX_CHARS
);
non_empty_string_newtype!(
    ItemDescription,
    "Item description enforcing non-empty values.",
    "description"
);

/// Non-negative price value in standard currency units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct ItemPrice(f64);

impl ItemPrice {
    /// Constructs a finite numeric value that is zero or greater.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("price"))
        }
    }

    /// Reads a price from submitted form text.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let value = trim_and_require_non_empty(value, "price")?;
        let value = value
            .parse::<f64>()
            .map_err(|_| TypeConstraintError::NotANumber("price"))?;
        Self::new(value)
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for ItemPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for ItemPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemPrice> for f64 {
    fn from(value: ItemPrice) -> Self {
        value.0
    }
}

impl PartialEq<f64> for ItemPrice {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

/// Number of units of an item currently in stock.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct StockCount(i32);

impl StockCount {
    /// Constructs a value that must be zero or greater.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("number_in_stock"))
        }
    }

    /// Reads a stock count from submitted form text.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let value = trim_and_require_non_empty(value, "number_in_stock")?;
        let value = value
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::NotAnInteger("number_in_stock"))?;
        Self::new(value)
    }

    /// Returns the raw `i32` value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for StockCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for StockCount {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StockCount> for i32 {
    fn from(value: StockCount) -> Self {
        value.0
    }
}

impl PartialEq<i32> for StockCount {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}
