//! Embedded schema migrations for the catalog database.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::DbPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Error returned by [`run_migrations`].
pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Applies every migration that has not run yet.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    for version in conn.run_pending_migrations(MIGRATIONS)? {
        log::info!("Applied migration {version}");
    }
    Ok(())
}
