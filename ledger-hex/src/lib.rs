//! # Ledger Hex
//!
//! Application service layer and HTTP adapter for the ledger/FX service.
//!
//! ## Architecture
//!
//! - `service/` - Ledger application service (orchestrates domain operations)
//! - `fx/` - FX conversion facade over the rate-provider port
//! - `feed/` - Polling-based live entry feed (the change-feed simulator)
//! - `generator/` - Demo entry generator
//! - `inbound/` - HTTP adapter (Axum server, JSON + SSE)
//!
//! Services are generic over the `LedgerStore` / `RateProvider` ports,
//! allowing different adapter implementations to be injected.

pub mod feed;
pub mod fx;
mod generator;
pub mod inbound;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use feed::{EntryFeed, FeedConfig};
pub use fx::FxService;
pub use inbound::HttpServer;
pub use service::LedgerService;
