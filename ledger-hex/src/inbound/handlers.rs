//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use futures::{Stream, StreamExt};
use rust_decimal::Decimal;
use serde::Deserialize;

use ledger_types::domain::account::is_currency_code;
use ledger_types::{
    AccountId, AppError, ConvertQuery, CreateAccountRequest, CreateEntryRequest, LedgerStore,
    RateProvider,
};

use crate::{FxService, LedgerService};

/// Application state shared across handlers.
pub struct AppState<S: LedgerStore, P: RateProvider> {
    pub ledger: LedgerService<S>,
    pub fx: FxService<P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

fn parse_account_id(raw: &str) -> Result<AccountId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::BadRequest("Invalid account ID".into())))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state, req))]
pub async fn create_account<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.ledger.create_account(req).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// List all accounts.
#[tracing::instrument(skip(state))]
pub async fn list_accounts<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.ledger.list_accounts().await?;
    Ok(Json(accounts))
}

/// Get account by ID.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn get_account<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let account = state.ledger.get_account(account_id).await?;
    Ok(Json(account))
}

// ─────────────────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────────────────

/// List an account's entries, newest first.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn list_entries<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let entries = state.ledger.entries_for_account(account_id).await?;
    Ok(Json(entries))
}

/// Record a single entry.
#[tracing::instrument(skip(state, req), fields(account_id = %id))]
pub async fn create_entry<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let entry = state.ledger.record_entry(account_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    count: Option<u32>,
}

/// Bulk-generate demo entries for an account.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn generate_entries<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
    Query(params): Query<GenerateParams>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = parse_account_id(&id)?;
    let count = params.count.unwrap_or(50);
    let entries = state.ledger.generate_entries(account_id, count).await?;
    Ok((StatusCode::CREATED, Json(entries)))
}

// ─────────────────────────────────────────────────────────────────────────────
// FX conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert an amount between currencies via the remote rate provider.
///
/// Malformed parameters are rejected here with 400 before the provider is
/// called; provider-side failures surface as 500/502 per the error taxonomy.
#[tracing::instrument(skip(state), fields(from = %params.from, to = %params.to))]
pub async fn convert<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Query(params): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_currency_code(&params.from) || !is_currency_code(&params.to) {
        return Err(ApiError(AppError::BadRequest(
            "from/to must be 3-letter uppercase currency codes".into(),
        )));
    }
    if params.amount <= Decimal::ZERO {
        return Err(ApiError(AppError::BadRequest(
            "amount must be positive".into(),
        )));
    }

    let quote = state
        .fx
        .convert(&params.from, &params.to, params.amount)
        .await
        .map_err(AppError::from)?;
    Ok(Json(quote))
}

// ─────────────────────────────────────────────────────────────────────────────
// Live ledger stream
// ─────────────────────────────────────────────────────────────────────────────

/// Server-Sent Events stream of an account's latest entries.
///
/// Open until the client disconnects; 404 when the account does not exist.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn ledger_stream<S: LedgerStore, P: RateProvider + 'static>(
    State(state): State<Arc<AppState<S, P>>>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let account_id = parse_account_id(&id)?;
    let feed = state.ledger.stream_entries(account_id).await?;

    let events = feed.map(|item| match item {
        Ok(entry) => Event::default().json_data(&entry),
        Err(err) => Err(axum::Error::new(err)),
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
