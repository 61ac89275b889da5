//! # Ledger Repository
//!
//! Concrete store adapters for the ledger/FX service. Currently a single
//! SQLite adapter implementing the `LedgerStore` port; `sqlite::memory:`
//! gives an ephemeral per-process database for demos and tests.

mod sqlite;
mod types;


pub use sqlite::SqliteStore;

/// Builds and migrates a store from a database URL.
///
/// # Examples
///
/// ```ignore
/// let store = ledger_repo::build_store("sqlite://ledger.db?mode=rwc").await?;
/// let ephemeral = ledger_repo::build_store("sqlite::memory:").await?;
/// ```
pub async fn build_store(database_url: &str) -> anyhow::Result<SqliteStore> {
    SqliteStore::new(database_url).await
}
