//! # FX Rates Client
//!
//! Thin client around an exchangerate.host-style `/convert` endpoint,
//! implementing the `RateProvider` port.
//!
//! Responsibilities:
//! - Build the outbound GET request (source, target, amount, credential).
//! - Shield callers from transient network failures with a per-attempt
//!   timeout and a bounded exponential-backoff retry loop.
//! - Classify failures (configuration / remote / timeout / transport) so the
//!   retry loop and the HTTP layer can treat them differently.
//! - Map the JSON payload into a [`RateQuote`], deriving the unit rate when
//!   the provider omits it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;

use ledger_types::{Clock, FxError, RateProvider, RateQuote, SystemClock};

mod rate;
mod retry;

pub use rate::{derive_rate, effective_rate};
pub use retry::RetryPolicy;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";
const CLIENT_TIMEOUT: Duration = Duration::from_secs(2);

/// FX conversion client.
///
/// One call owns all of its state (retry counter, in-flight request); there
/// is no cache and no coordination between concurrent calls. Dropping the
/// call future aborts the timeout/retry chain without side effects.
pub struct FxClient {
    http: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl FxClient {
    /// Creates a client with default endpoint, timeout, and retry budget.
    pub fn new(access_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_key,
            timeout: CLIENT_TIMEOUT,
            retry: RetryPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Overrides the provider base URL (primarily for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the per-attempt response timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Overrides the time source used for quote timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Converts `amount` from `from` to `to` via the remote provider.
    ///
    /// Currency codes are expected to be pre-validated (`[A-Z]{3}`) by the
    /// caller; this method does not re-check them.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<RateQuote, FxError> {
        let access_key = self.require_access_key()?;

        let mut attempt = 1u32;
        let response = loop {
            let outcome =
                tokio::time::timeout(self.timeout, self.request_convert(from, to, amount, access_key))
                    .await;

            let err = match outcome {
                Ok(Ok(response)) => break response,
                Ok(Err(err)) => err,
                Err(_elapsed) => FxError::Timeout { attempts: attempt },
            };

            match self.retry.backoff_after(attempt) {
                Some(delay) if err.is_transient() => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient FX failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                _ => return Err(err),
            }
        };

        self.build_quote(from, to, amount, response)
    }

    /// One request/decode attempt. Timeout is applied by the caller.
    async fn request_convert(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        access_key: &str,
    ) -> Result<ConvertResponse, FxError> {
        let response = self
            .http
            .get(format!("{}/convert", self.base_url))
            .query(&[
                ("from", from),
                ("to", to),
                ("amount", &amount.to_string()),
                ("access_key", access_key),
            ])
            .send()
            .await
            .map_err(|e| FxError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(FxError::Remote {
                status: Some(status.as_u16()),
                detail: describe_error_body(&body),
            });
        }

        response
            .json::<ConvertResponse>()
            .await
            .map_err(|e| FxError::Transport(format!("undecodable payload: {e}")))
    }

    /// Maps a successful payload into a quote, deriving the rate if needed.
    fn build_quote(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        response: ConvertResponse,
    ) -> Result<RateQuote, FxError> {
        if !response.success {
            let detail = response
                .error
                .map(|e| e.describe())
                .unwrap_or_else(|| "provider reported success=false".to_string());
            return Err(FxError::Remote {
                status: None,
                detail,
            });
        }

        // Prefer the provider's echoed query values when present.
        let query = response.query.unwrap_or_default();
        let from_currency = query.from.unwrap_or_else(|| from.to_string());
        let to_currency = query.to.unwrap_or_else(|| to.to_string());
        let requested_amount = query.amount.unwrap_or(amount);

        let supplied = response.info.as_ref().and_then(|info| info.rate);
        let rate = effective_rate(supplied, response.result, requested_amount);
        match (supplied, rate) {
            (None, Some(derived)) => tracing::warn!(
                from = %from_currency,
                to = %to_currency,
                rate = %derived,
                "provider omitted info.rate; derived from converted/requested"
            ),
            (None, None) => tracing::warn!(
                from = %from_currency,
                to = %to_currency,
                converted = ?response.result,
                amount = %requested_amount,
                "provider omitted info.rate and derivation failed"
            ),
            _ => {}
        }

        let fetched_at = match response.date {
            Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
            None => self.clock.now(),
        };

        Ok(RateQuote {
            from_currency,
            to_currency,
            requested_amount,
            rate,
            converted: response.result,
            fetched_at,
        })
    }

    fn require_access_key(&self) -> Result<&str, FxError> {
        self.access_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                FxError::Configuration(
                    "FX access key missing. Set FX_ACCESS_KEY in the environment.".into(),
                )
            })
    }
}

#[async_trait::async_trait]
impl RateProvider for FxClient {
    async fn convert(&self, from: &str, to: &str, amount: Decimal) -> Result<RateQuote, FxError> {
        FxClient::convert(self, from, to, amount).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider payload shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Shape of the provider's `/convert` JSON payload.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    query: Option<QueryEcho>,
    info: Option<RateInfo>,
    result: Option<Decimal>,
    date: Option<NaiveDate>,
    error: Option<ErrorInfo>,
}

/// The provider's echo of the requested conversion.
#[derive(Debug, Default, Deserialize)]
struct QueryEcho {
    from: Option<String>,
    to: Option<String>,
    amount: Option<Decimal>,
}

/// The `info` map; only the unit rate matters here.
#[derive(Debug, Deserialize)]
struct RateInfo {
    rate: Option<Decimal>,
}

/// Provider error descriptor, attached to error payloads.
#[derive(Debug, Deserialize)]
struct ErrorInfo {
    code: Option<serde_json::Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl ErrorInfo {
    fn describe(self) -> String {
        self.info
            .or(self.kind)
            .or_else(|| self.code.map(|c| c.to_string()))
            .unwrap_or_else(|| "unknown provider error".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorInfo>,
}

/// Best-effort detail extraction from an HTTP error body.
fn describe_error_body(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(ErrorInfo::describe)
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no body".to_string()
            } else {
                body.to_string()
            }
        })
}
