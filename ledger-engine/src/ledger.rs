//! Main ledger engine
//!
//! Owns every account timeline, the spend counters, and the payment
//! history. Account lifecycle, balance reconstruction, deposits and
//! transfers live here; payments, merges and ranking extend `Ledger` in
//! their own modules.
//!
//! # Example
//!
//! ```
//! use ledger_engine::Ledger;
//!
//! let mut ledger = Ledger::new();
//! ledger.create_account(1, "acc1").unwrap();
//! assert_eq!(ledger.deposit(2, "acc1", 100).unwrap(), 100);
//! assert_eq!(ledger.balance_at("acc1", 1).unwrap(), 0);
//! ```

use crate::{
    metrics::Metrics,
    timeline::Timeline,
    types::{AccountId, Amount, PaymentId, PaymentRecord, Timestamp},
    Config, Error, Result,
};
use std::collections::{BTreeMap, HashMap};

/// In-memory temporal ledger
#[derive(Debug)]
pub struct Ledger {
    /// Timeline per account id (merged-away accounts keep their tombstoned timeline)
    pub(crate) accounts: HashMap<AccountId, Timeline>,

    /// Cumulative outgoing amount per ranked account
    pub(crate) total_spent: HashMap<AccountId, u64>,

    /// Payment history
    pub(crate) payments: BTreeMap<PaymentId, PaymentRecord>,

    /// Configuration
    pub(crate) config: Config,

    /// Metrics
    pub(crate) metrics: Metrics,
}

impl Ledger {
    /// Ledger with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with explicit configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            accounts: HashMap::new(),
            total_spent: HashMap::new(),
            payments: BTreeMap::new(),
            config,
            metrics: Metrics::new()?,
        })
    }

    /// Configuration in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Create an account
    ///
    /// An id whose balance cannot be reconstructed at `timestamp` (merged
    /// away, or not yet opened at that instant) is wiped and reopened.
    pub fn create_account(&mut self, timestamp: Timestamp, account_id: &str) -> Result<()> {
        if self.accounts.contains_key(account_id) {
            if self.balance_at(account_id, timestamp).is_ok() {
                return self.reject(Error::InvalidOperation(format!(
                    "account {} already exists",
                    account_id
                )));
            }
            tracing::debug!(account = account_id, timestamp, "recycling account id");
        }

        let id = AccountId::new(account_id);
        self.accounts.insert(id.clone(), Timeline::opened(timestamp));
        self.total_spent.insert(id, 0);
        self.metrics.accounts_created.inc();

        tracing::debug!(account = account_id, timestamp, "account created");
        Ok(())
    }

    /// Balance of `account_id` as of `time_at`
    ///
    /// Fails if the account is unknown, was not yet opened at `time_at`, or
    /// had been merged away by then.
    pub fn balance_at(&self, account_id: &str, time_at: Timestamp) -> Result<Amount> {
        self.accounts
            .get(account_id)
            .and_then(|timeline| timeline.balance_at(time_at))
            .ok_or_else(|| Error::AccountNotFound(account_id.to_string()))
    }

    /// Deposit `amount` at `timestamp`, returning the balance after it
    pub fn deposit(
        &mut self,
        timestamp: Timestamp,
        account_id: &str,
        amount: u64,
    ) -> Result<Amount> {
        if let Err(err) = self.balance_at(account_id, timestamp) {
            return self.reject(err);
        }
        let delta = self.signed(amount)?;
        self.within_range(account_id, [(timestamp, delta)])?;

        self.record(account_id, timestamp, delta);
        self.metrics.deposits.inc();

        let balance = self.balance_at(account_id, timestamp)?;
        tracing::debug!(account = account_id, timestamp, amount, balance, "deposit");
        Ok(balance)
    }

    /// Move `amount` from `source` to `target` at `timestamp`, returning the
    /// source balance after it
    pub fn transfer(
        &mut self,
        timestamp: Timestamp,
        source: &str,
        target: &str,
        amount: u64,
    ) -> Result<Amount> {
        if source == target {
            return self.reject(Error::InvalidOperation(format!(
                "transfer from {} to itself",
                source
            )));
        }
        if let Err(err) = self.balance_at(target, timestamp) {
            return self.reject(err);
        }
        let delta = self.debitable(source, timestamp, amount)?;
        self.within_range(source, [(timestamp, -delta)])?;
        self.within_range(target, [(timestamp, delta)])?;

        self.record(source, timestamp, -delta);
        self.record(target, timestamp, delta);
        self.add_spend(source, amount);
        self.metrics.transfers.inc();

        let balance = self.balance_at(source, timestamp)?;
        tracing::debug!(
            source_account = source,
            target_account = target,
            timestamp,
            amount,
            balance,
            "transfer"
        );
        Ok(balance)
    }

    /// Number of known account ids, merged-away tombstones included
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// True if `account_id` was ever created
    pub fn contains_account(&self, account_id: &str) -> bool {
        self.accounts.contains_key(account_id)
    }

    /// Timeline recorded for `account_id`
    pub fn timeline(&self, account_id: &str) -> Option<&Timeline> {
        self.accounts.get(account_id)
    }

    /// Check that `account_id` can be debited `amount` at `timestamp` and
    /// return the amount as a delta
    pub(crate) fn debitable(
        &self,
        account_id: &str,
        timestamp: Timestamp,
        amount: u64,
    ) -> Result<Amount> {
        let balance = match self.balance_at(account_id, timestamp) {
            Ok(balance) => balance,
            Err(err) => return self.reject(err),
        };
        let delta = self.signed(amount)?;
        if balance < delta {
            return self.reject(Error::InsufficientFunds {
                account: account_id.to_string(),
                balance,
                requested: amount,
            });
        }
        Ok(delta)
    }

    /// Check that applying `deltas` keeps every balance of `account_id` in range
    pub(crate) fn within_range<I>(&self, account_id: &str, deltas: I) -> Result<()>
    where
        I: IntoIterator<Item = (Timestamp, Amount)>,
    {
        let fits = self
            .accounts
            .get(account_id)
            .map_or(false, |timeline| timeline.accepts(deltas));
        if !fits {
            return self.reject(Error::InvalidOperation(format!(
                "balance of {} would leave the representable range",
                account_id
            )));
        }
        Ok(())
    }

    /// Accumulate a delta into an account's timeline
    pub(crate) fn record(&mut self, account_id: &str, at: Timestamp, delta: Amount) {
        let recorded = self
            .accounts
            .get_mut(account_id)
            .map(|timeline| timeline.record_delta(at, delta))
            .unwrap_or(false);
        if !recorded {
            tracing::warn!(account = account_id, at, delta, "delta dropped");
        }
    }

    /// Add to an account's spend counter
    pub(crate) fn add_spend(&mut self, account_id: &str, amount: u64) {
        if let Some(total) = self.total_spent.get_mut(account_id) {
            *total = total.saturating_add(amount);
        }
    }

    /// Convert an operation amount to a signed delta
    pub(crate) fn signed(&self, amount: u64) -> Result<Amount> {
        match Amount::try_from(amount) {
            Ok(delta) => Ok(delta),
            Err(_) => self.reject(Error::InvalidOperation(format!(
                "amount {} out of range",
                amount
            ))),
        }
    }

    /// Count a rejected mutating operation and return it
    pub(crate) fn reject<T>(&self, err: Error) -> Result<T> {
        self.metrics.rejected.inc();
        Err(err)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::with_config(Config::default()).expect("default configuration is valid")
    }
}
