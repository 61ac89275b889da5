//! FX conversion facade.
//!
//! Keeps FX use-case rules in one place instead of scattering provider calls
//! across handlers. Input validation (currency pattern, positive amount)
//! belongs to the HTTP layer; anything cross-cutting that FX grows later
//! (caching, rate pinning) belongs here.

use std::sync::Arc;

use rust_decimal::Decimal;

use ledger_types::{FxError, RateProvider, RateQuote};

/// Use-case facade over the rate-provider port.
pub struct FxService<P: RateProvider> {
    provider: Arc<P>,
}

impl<P: RateProvider> FxService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Converts `amount` from `from` to `to` via the configured provider.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<RateQuote, FxError> {
        self.provider.convert(from, to, amount).await
    }
}
