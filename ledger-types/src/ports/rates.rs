//! Exchange rate provider port.

use rust_decimal::Decimal;

use crate::domain::RateQuote;

/// Error taxonomy for FX conversion calls.
///
/// Only `Timeout` and `Transport` are transient; a client may retry those
/// within its budget. `Remote` and `Configuration` must never be retried.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// Missing/blank access credential. No network call was made.
    #[error("FX configuration error: {0}")]
    Configuration(String),

    /// Provider returned an error status or a success=false payload.
    #[error("FX remote error{}: {detail}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Remote { status: Option<u16>, detail: String },

    /// The per-attempt response deadline elapsed, retry budget exhausted.
    #[error("FX request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Connection-level failure (DNS, refused connection, malformed body).
    #[error("FX transport error: {0}")]
    Transport(String),
}

impl FxError {
    /// Whether the failure may be retried within the retry budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, FxError::Timeout { .. } | FxError::Transport(_))
    }
}

/// Port trait for currency conversion providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Converts `amount` from `from` to `to`, returning a quote that is as
    /// fully populated as the provider's payload allows.
    async fn convert(&self, from: &str, to: &str, amount: Decimal) -> Result<RateQuote, FxError>;
}
