//! Temporal Ledger Engine
//!
//! In-memory ledger that answers "what was this balance at time T?" for any
//! T, with deposits, transfers, payments with deferred cashback, spend
//! ranking and account merges.
//!
//! # Architecture
//!
//! - **Delta Timelines**: Each account stores signed deltas keyed by timestamp
//! - **Lazy Cashback**: Future credits are ordinary future deltas, no clock
//! - **Tombstones**: Merged-away accounts keep their history behind a marker
//! - **Single Critical Section**: `SharedLedger` serializes whole operations

#![forbid(unsafe_code)]
//!
//! # Invariants
//!
//! - balance(T) = Σ deltas at timestamps ≤ T on the account's timeline
//! - Lookups never mutate state
//! - Merges conserve money: survivor(T) after = survivor(T) + absorbed(T) before
//! - Spend counters never decrease

#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod banking;
pub mod config;
pub mod error;
pub mod ledger;
pub mod merge;
pub mod metrics;
pub mod payment;
pub mod ranking;
pub mod shared;
pub mod timeline;
pub mod types;

// Re-exports
pub use banking::BankingSystem;
pub use config::{CashbackConfig, Config};
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use metrics::Metrics;
pub use shared::SharedLedger;
pub use timeline::{Timeline, TimelineEntry};
pub use types::{
    AccountId, Amount, PaymentId, PaymentRecord, PaymentStatus, SpenderRank, Timestamp,
};
