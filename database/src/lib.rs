//! Storage for league records: an in-memory store preloaded with the
//! built-in fixtures, and a SQLite store behind the same [`LeagueStore`]
//! trait.

pub mod config;
pub mod error;
pub mod fixture_store;
pub mod fixtures;
pub mod models;
pub mod retry;
pub mod sqlite_store;
pub mod store;

pub use config::{DatabaseConfig, FIXTURES};
pub use error::DatabaseError;
pub use fixture_store::FixtureStore;
pub use fixtures::LeagueData;
pub use retry::retry_with_backoff;
pub use sqlite_store::SqliteStore;
pub use store::LeagueStore;

/// Open the backend named by `config`.
pub async fn open_store(config: &DatabaseConfig) -> Result<Box<dyn LeagueStore>, DatabaseError> {
    if config.is_fixtures() {
        tracing::info!("Using built-in fixture data");
        return Ok(Box::new(FixtureStore::seeded()));
    }
    tracing::info!(url = %config.url, "Opening SQLite store");
    Ok(Box::new(SqliteStore::connect(config).await?))
}
