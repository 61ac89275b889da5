//! Data Transfer Objects for the API boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::EntryType;

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name, must be non-blank
    pub name: String,
    /// Home currency, 3-letter uppercase code
    pub currency_code: String,
    /// Starting balance snapshot
    #[serde(default)]
    pub initial_balance: Decimal,
}

/// Request to record a single ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub currency_code: String,
    #[serde(default)]
    pub memo: Option<String>,
    /// Defaults to the record-creation time when omitted
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Query parameters for the conversion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}
