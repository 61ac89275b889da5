//! Demo entry generator.
//!
//! Pure generator (no I/O): produces realistic-ish income/expense entries
//! for demos and tests. Persistence and account validation stay in the
//! service layer.

use chrono::{Duration, Utc};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use ledger_types::{AccountId, EntryType, LedgerEntry};

const MEMOS: &[&str] = &[
    "Coffee",
    "Groceries",
    "Salary",
    "Rent",
    "Subscription",
    "Taxi",
    "Restaurant",
    "Book",
];

/// Generates `count` random entries for the account, spread over ~30 days.
pub fn generate_entries(account_id: AccountId, currency_code: &str, count: u32) -> Vec<LedgerEntry> {
    let now = Utc::now();
    let mut rng = rand::rng();

    (0..count)
        .map(|_| {
            let entry_type = if rng.random_bool(0.5) {
                EntryType::Expense
            } else {
                EntryType::Income
            };
            let occurred_at = now - Duration::hours(rng.random_range(1..24 * 30));

            LedgerEntry::new(
                account_id,
                entry_type,
                random_amount(&mut rng, entry_type),
                currency_code.to_string(),
                Some(MEMOS[rng.random_range(0..MEMOS.len())].to_string()),
                occurred_at,
                now,
            )
        })
        .collect()
}

/// Positive amount with 2 fractional digits; direction lives in `EntryType`.
fn random_amount(rng: &mut impl Rng, entry_type: EntryType) -> Decimal {
    let raw = match entry_type {
        EntryType::Expense => rng.random_range(3.0..120.0),
        EntryType::Income => rng.random_range(200.0..5000.0),
    };
    Decimal::from_f64(raw)
        .unwrap_or(Decimal::ONE)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
