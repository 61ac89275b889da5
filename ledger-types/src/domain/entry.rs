//! Ledger entry domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;

/// Unique identifier for a LedgerEntry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a new random EntryId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an EntryId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The business direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    /// Incoming cash flow (salary, refund, ...)
    Income,
    /// Outgoing cash flow (groceries, rent, ...)
    Expense,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Income => write!(f, "INCOME"),
            EntryType::Expense => write!(f, "EXPENSE"),
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(EntryType::Income),
            "EXPENSE" => Ok(EntryType::Expense),
            other => Err(format!("Unknown entry type: {other}")),
        }
    }
}

/// A single income/expense record tied to an account.
///
/// Entries are immutable once written - they are a historical record of
/// what happened. Amounts stay positive; `entry_type` carries the direction.
/// Within one account, entry ids are unique, and consumers read entries in
/// `occurred_at`-descending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier
    pub id: EntryId,
    /// Owning account
    pub account_id: AccountId,
    /// Income or expense
    pub entry_type: EntryType,
    /// Monetary amount, always positive
    pub amount: Decimal,
    /// Currency of the amount, 3-letter uppercase code
    pub currency_code: String,
    /// Optional free-text memo
    pub memo: Option<String>,
    /// When the activity happened
    pub occurred_at: DateTime<Utc>,
    /// When the entry was recorded in the system
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a new entry with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: AccountId,
        entry_type: EntryType,
        amount: Decimal,
        currency_code: String,
        memo: Option<String>,
        occurred_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            account_id,
            entry_type,
            amount,
            currency_code,
            memo,
            occurred_at,
            created_at,
        }
    }
}
