//! Metrics collection for observability
//!
//! Prometheus counters for the ledger's business operations. Each `Ledger`
//! owns its own `Registry`, so independent engines never collide.
//!
//! # Metrics
//!
//! - `ledger_accounts_created_total` - Accounts created (including recycled ids)
//! - `ledger_deposits_total` - Successful deposits
//! - `ledger_transfers_total` - Successful transfers
//! - `ledger_payments_total` - Successful payments
//! - `ledger_cashback_scheduled_total` - Cashback units scheduled
//! - `ledger_merges_total` - Successful account merges
//! - `ledger_rejected_operations_total` - Mutating operations rejected by
//!   business rules (failed lookups are not counted)

use prometheus::{IntCounter, Registry};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Accounts created
    pub accounts_created: IntCounter,

    /// Deposits
    pub deposits: IntCounter,

    /// Transfers
    pub transfers: IntCounter,

    /// Payments
    pub payments: IntCounter,

    /// Cashback units scheduled
    pub cashback_scheduled: IntCounter,

    /// Merges
    pub merges: IntCounter,

    /// Rejected mutating operations
    pub rejected: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let counter = |name: &str, help: &str| -> prometheus::Result<IntCounter> {
            let counter = IntCounter::new(name, help)?;
            registry.register(Box::new(counter.clone()))?;
            Ok(counter)
        };

        let accounts_created = counter(
            "ledger_accounts_created_total",
            "Accounts created, including recycled ids",
        )?;
        let deposits = counter("ledger_deposits_total", "Successful deposits")?;
        let transfers = counter("ledger_transfers_total", "Successful transfers")?;
        let payments = counter("ledger_payments_total", "Successful payments")?;
        let cashback_scheduled = counter(
            "ledger_cashback_scheduled_total",
            "Cashback units scheduled for future credit",
        )?;
        let merges = counter("ledger_merges_total", "Successful account merges")?;
        let rejected = counter(
            "ledger_rejected_operations_total",
            "Mutating operations rejected by business rules",
        )?;

        Ok(Self {
            accounts_created,
            deposits,
            transfers,
            payments,
            cashback_scheduled,
            merges,
            rejected,
            registry,
        })
    }

    /// Record scheduled cashback
    pub fn record_cashback(&self, amount: u64) {
        self.cashback_scheduled.inc_by(amount);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("accounts_created", &self.accounts_created.get())
            .field("deposits", &self.deposits.get())
            .field("transfers", &self.transfers.get())
            .field("payments", &self.payments.get())
            .field("cashback_scheduled", &self.cashback_scheduled.get())
            .field("merges", &self.merges.get())
            .field("rejected", &self.rejected.get())
            .finish_non_exhaustive()
    }
}
