//! Account domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for an Account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random AccountId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AccountId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Returns true when `code` is a 3-letter uppercase ISO-style currency code.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// A budgeting account (cash wallet, credit card, savings goal, ...).
///
/// Tracks the display name, home currency, a balance snapshot, and the
/// creation timestamp. Ledger entries reference the account id to build the
/// running ledger for this aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Human-readable account name
    pub name: String,
    /// Home currency, 3-letter uppercase code
    pub currency_code: String,
    /// Current balance snapshot
    pub balance: Decimal,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account.
    ///
    /// # Validation
    /// - Name cannot be blank
    /// - Currency code must match `[A-Z]{3}`
    pub fn new(
        name: String,
        currency_code: String,
        initial_balance: Decimal,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Account name cannot be empty".into(),
            ));
        }
        if !is_currency_code(&currency_code) {
            return Err(DomainError::Validation(format!(
                "Invalid currency code: {currency_code}"
            )));
        }

        Ok(Self {
            id: AccountId::new(),
            name,
            currency_code,
            balance: initial_balance,
            created_at,
        })
    }

    /// Reconstructs an account from stored parts without re-validating.
    pub fn from_parts(
        id: AccountId,
        name: String,
        currency_code: String,
        balance: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            currency_code,
            balance,
            created_at,
        }
    }
}
