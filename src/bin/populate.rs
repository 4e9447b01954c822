//! Inserts sample categories and items.
//!
//! Usage: `populate [DATABASE_URL]`. Without an argument the database from the
//! server configuration is used.

use std::error::Error;
use std::process::ExitCode;

use env_logger::Env;
use pushkind_common::db::establish_connection_pool;
use pushkind_inventory::db::run_migrations;
use pushkind_inventory::models::config::ServerConfig;
use pushkind_inventory::repository::DieselRepository;
use pushkind_inventory::seed::{create_categories, create_items};

fn populate(database_url: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let pool = establish_connection_pool(database_url)?;
    run_migrations(&pool)?;
    let repo = DieselRepository::new(pool);

    log::info!("Adding categories");
    let categories = create_categories(&repo)?;
    log::info!("Adding items");
    let items = create_items(&repo, &categories)?;

    log::info!(
        "Populated {database_url} with {} categories and {} items",
        categories.len(),
        items.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let database_url = match std::env::args().nth(1) {
        Some(url) => url,
        None => match ServerConfig::load() {
            Ok(config) => config.database_url,
            Err(e) => {
                log::error!("Failed to load configuration: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    match populate(&database_url) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Failed to populate database: {e}");
            ExitCode::FAILURE
        }
    }
}
