//! Domain entities of the catalog and their constrained value types.

pub mod category;
pub mod item;
pub mod types;

/// Prefix shared by every catalog route.
pub const CATALOG_ROOT: &str = "/catalog";
