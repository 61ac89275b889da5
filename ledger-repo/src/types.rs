//! Database row structs and conversions to domain types.
//!
//! SQLite has no native uuid/decimal/timestamp types, so every column comes
//! back as TEXT and is parsed here in one place.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use ledger_types::{Account, AccountId, EntryId, EntryType, LedgerEntry, StoreError};

fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Database(format!("invalid {column} timestamp {raw:?}: {e}")))
}

fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw)
        .map_err(|e| StoreError::Database(format!("invalid {column} decimal {raw:?}: {e}")))
}

/// Account row from the database.
#[derive(FromRow)]
pub struct DbAccount {
    pub id: String,
    pub name: String,
    pub currency_code: String,
    pub balance: String,
    pub created_at: String,
}

impl TryFrom<DbAccount> for Account {
    type Error = StoreError;

    fn try_from(row: DbAccount) -> Result<Self, Self::Error> {
        let id = AccountId::from_str(&row.id)
            .map_err(|e| StoreError::Database(format!("invalid account id {:?}: {e}", row.id)))?;
        Ok(Account::from_parts(
            id,
            row.name,
            row.currency_code,
            parse_decimal("balance", &row.balance)?,
            parse_timestamp("created_at", &row.created_at)?,
        ))
    }
}

/// Ledger entry row from the database.
#[derive(FromRow)]
pub struct DbEntry {
    pub id: String,
    pub account_id: String,
    pub entry_type: String,
    pub amount: String,
    pub currency_code: String,
    pub memo: Option<String>,
    pub occurred_at: String,
    pub created_at: String,
}

impl TryFrom<DbEntry> for LedgerEntry {
    type Error = StoreError;

    fn try_from(row: DbEntry) -> Result<Self, Self::Error> {
        let id = EntryId::from_str(&row.id)
            .map_err(|e| StoreError::Database(format!("invalid entry id {:?}: {e}", row.id)))?;
        let account_id = AccountId::from_str(&row.account_id).map_err(|e| {
            StoreError::Database(format!("invalid account id {:?}: {e}", row.account_id))
        })?;
        let entry_type = EntryType::from_str(&row.entry_type).map_err(StoreError::Database)?;

        Ok(LedgerEntry {
            id,
            account_id,
            entry_type,
            amount: parse_decimal("amount", &row.amount)?,
            currency_code: row.currency_code,
            memo: row.memo,
            occurred_at: parse_timestamp("occurred_at", &row.occurred_at)?,
            created_at: parse_timestamp("created_at", &row.created_at)?,
        })
    }
}
