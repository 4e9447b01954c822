//! Diesel row types and their conversions into domain entities.

pub mod category;
pub mod config;
pub mod item;
