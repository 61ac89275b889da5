//! Domain models for the ledger/FX service.

pub mod account;
pub mod entry;
pub mod quote;

pub use account::{Account, AccountId};
pub use entry::{EntryId, EntryType, LedgerEntry};
pub use quote::RateQuote;
