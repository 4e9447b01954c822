//! Core library exports for the inventory catalog.
//!
//! The `data` feature builds the persistence layer alone (`domain`, `models`,
//! `schema`, `db`, `repository` and `seed`). The default `server` feature adds the
//! forms, services and Actix-web routes of the catalog web application.

pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod models;
pub mod repository;
pub mod schema;
pub mod seed;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
