//! Ledger store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, in-memory test doubles) implement this trait.

use crate::domain::{Account, AccountId, LedgerEntry};
use crate::error::StoreError;

/// The main store port for accounts and their ledger entries.
///
/// Entries are immutable once inserted. Read operations that return multiple
/// entries order them by `occurred_at` descending (newest first).
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Account Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Persists a new account.
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Gets an account by ID.
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Lists all accounts.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Checks whether an account exists.
    async fn account_exists(&self, id: AccountId) -> Result<bool, StoreError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Entry Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Persists a single ledger entry.
    async fn insert_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// Persists a batch of ledger entries.
    async fn insert_entries(&self, entries: &[LedgerEntry]) -> Result<(), StoreError> {
        for entry in entries {
            self.insert_entry(entry).await?;
        }
        Ok(())
    }

    /// All entries for an account, newest first.
    async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// The most recent entries for an account, newest first, capped at `limit`.
    async fn recent_entries(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<LedgerEntry>, StoreError>;
}
