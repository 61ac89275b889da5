//! Ledger application service.
//!
//! Orchestrates domain operations through the store port so the HTTP layer
//! never talks to the store directly. Contains no infrastructure logic.
//! Account existence is validated here, fail-fast, to centralize the
//! business rule in one place.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use ledger_types::{
    Account, AccountId, AppError, CreateAccountRequest, CreateEntryRequest, LedgerEntry,
    LedgerStore,
};

use crate::feed::{EntryFeed, FeedConfig};
use crate::generator;

/// Application service for account and entry operations.
///
/// Generic over `S: LedgerStore` - the adapter is injected at compile time,
/// which keeps the service testable with an in-memory port implementation.
pub struct LedgerService<S: LedgerStore> {
    store: Arc<S>,
    feed_config: FeedConfig,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a new service with the default feed configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            feed_config: FeedConfig::default(),
        }
    }

    /// Overrides the feed poll cadence / fetch depth.
    pub fn with_feed_config(mut self, feed_config: FeedConfig) -> Self {
        self.feed_config = feed_config;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Account Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates a new account.
    pub async fn create_account(&self, req: CreateAccountRequest) -> Result<Account, AppError> {
        let account = Account::new(req.name, req.currency_code, req.initial_balance, Utc::now())?;
        self.store.insert_account(&account).await?;
        Ok(account)
    }

    /// Gets an account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.store
            .get_account(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account not found: {id}")))
    }

    /// Lists all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.store.list_accounts().await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a single ledger entry against an existing account.
    pub async fn record_entry(
        &self,
        account_id: AccountId,
        req: CreateEntryRequest,
    ) -> Result<LedgerEntry, AppError> {
        self.require_account(account_id).await?;

        if req.amount <= Decimal::ZERO {
            return Err(AppError::BadRequest("Amount must be positive".into()));
        }

        let now = Utc::now();
        let entry = LedgerEntry::new(
            account_id,
            req.entry_type,
            req.amount,
            req.currency_code,
            req.memo,
            req.occurred_at.unwrap_or(now),
            now,
        );
        self.store.insert_entry(&entry).await?;
        Ok(entry)
    }

    /// All entries for an account, newest first.
    pub async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, AppError> {
        self.require_account(account_id).await?;
        self.store
            .entries_for_account(account_id)
            .await
            .map_err(Into::into)
    }

    /// Bulk-generates demo entries in the account's home currency.
    pub async fn generate_entries(
        &self,
        account_id: AccountId,
        count: u32,
    ) -> Result<Vec<LedgerEntry>, AppError> {
        if count == 0 {
            return Err(AppError::BadRequest("count must be > 0".into()));
        }

        let account = self.get_account(account_id).await?;
        let entries = generator::generate_entries(account_id, &account.currency_code, count);
        self.store.insert_entries(&entries).await?;
        Ok(entries)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Live Feed
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens a live feed of the account's most recent entries.
    ///
    /// Fails with `NotFound` before any polling starts when the account does
    /// not exist; the returned stream is then infinite until the subscriber
    /// drops it or the store errors.
    pub async fn stream_entries(&self, account_id: AccountId) -> Result<EntryFeed<S>, AppError> {
        self.require_account(account_id).await?;
        Ok(EntryFeed::new(
            Arc::clone(&self.store),
            account_id,
            self.feed_config,
        ))
    }

    async fn require_account(&self, account_id: AccountId) -> Result<(), AppError> {
        if self.store.account_exists(account_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Account not found: {account_id}"
            )))
        }
    }
}
