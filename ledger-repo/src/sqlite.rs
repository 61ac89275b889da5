//! SQLite store adapter.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use ledger_types::{Account, AccountId, LedgerEntry, LedgerStore, StoreError};

use crate::types::{DbAccount, DbEntry};

/// SQLite implementation of the `LedgerStore` port.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects and runs the embedded schema migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::raw_sql(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO account (id, name, currency_code, balance, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(account.id.to_string())
        .bind(&account.name)
        .bind(&account.currency_code)
        .bind(account.balance.to_string())
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, name, currency_code, balance, created_at
               FROM account WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Account::try_from).transpose()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows: Vec<DbAccount> = sqlx::query_as(
            r#"SELECT id, name, currency_code, balance, created_at
               FROM account ORDER BY created_at"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn account_exists(&self, id: AccountId) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(1) FROM account WHERE id = ?"#)
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn insert_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO account_entry
               (id, account_id, entry_type, amount, currency_code, memo, occurred_at, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(entry.account_id.to_string())
        .bind(entry.entry_type.to_string())
        .bind(entry.amount.to_string())
        .bind(&entry.currency_code)
        .bind(&entry.memo)
        .bind(entry.occurred_at.to_rfc3339())
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn insert_entries(&self, entries: &[LedgerEntry]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        for entry in entries {
            sqlx::query(
                r#"INSERT INTO account_entry
                   (id, account_id, entry_type, amount, currency_code, memo, occurred_at, created_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(entry.id.to_string())
            .bind(entry.account_id.to_string())
            .bind(entry.entry_type.to_string())
            .bind(entry.amount.to_string())
            .bind(&entry.currency_code)
            .bind(&entry.memo)
            .bind(entry.occurred_at.to_rfc3339())
            .bind(entry.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;

        Ok(())
    }

    async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows: Vec<DbEntry> = sqlx::query_as(
            r#"SELECT id, account_id, entry_type, amount, currency_code, memo, occurred_at, created_at
               FROM account_entry WHERE account_id = ?
               ORDER BY occurred_at DESC"#,
        )
        .bind(account_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }

    async fn recent_entries(
        &self,
        account_id: AccountId,
        limit: u32,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let rows: Vec<DbEntry> = sqlx::query_as(
            r#"SELECT id, account_id, entry_type, amount, currency_code, memo, occurred_at, created_at
               FROM account_entry WHERE account_id = ?
               ORDER BY occurred_at DESC LIMIT ?"#,
        )
        .bind(account_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }
}
