//! FX quote domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The result of a currency conversion request.
///
/// Constructed fresh per conversion and never persisted. `rate` is the unit
/// rate (target units per 1 unit of source). It may be absent when the
/// provider omitted it and derivation from `converted / requested_amount`
/// was impossible (zero amount or missing converted value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuote {
    /// Source currency code
    pub from_currency: String,
    /// Target currency code
    pub to_currency: String,
    /// Amount the conversion was requested for
    pub requested_amount: Decimal,
    /// Unit rate (target per 1 unit source), absent when underivable
    pub rate: Option<Decimal>,
    /// Converted amount for the requested source amount
    pub converted: Option<Decimal>,
    /// When the quote was fetched (provider-reported date or receipt time)
    pub fetched_at: DateTime<Utc>,
}
