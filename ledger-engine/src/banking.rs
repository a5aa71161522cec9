//! Sentinel-returning caller surface
//!
//! External drivers speak in primitives and treat every failure alike:
//! `false`, `None`, or an empty list. `BankingSystem` is that surface; the
//! reason codes carried by [`crate::Error`] are dropped at this boundary.

use crate::{types::Amount, Ledger, PaymentId, SharedLedger};

/// Banking operations with primitive arguments and sentinel failures
pub trait BankingSystem {
    /// Create `account_id`; `false` if it already exists
    fn create_account(&mut self, timestamp: u64, account_id: &str) -> bool;

    /// Deposit, returning the new balance
    fn deposit(&mut self, timestamp: u64, account_id: &str, amount: u64) -> Option<Amount>;

    /// Transfer, returning the source's new balance
    fn transfer(
        &mut self,
        timestamp: u64,
        source_account_id: &str,
        target_account_id: &str,
        amount: u64,
    ) -> Option<Amount>;

    /// Top `n` spenders as `id(amount)`; `timestamp` is accepted and ignored
    fn top_spenders(&mut self, timestamp: u64, n: usize) -> Vec<String>;

    /// Pay, returning the payment id
    fn pay(&mut self, timestamp: u64, account_id: &str, amount: u64) -> Option<String>;

    /// `IN_PROGRESS` or `CASHBACK_RECEIVED`
    fn get_payment_status(
        &mut self,
        timestamp: u64,
        account_id: &str,
        payment: &str,
    ) -> Option<String>;

    /// Merge `account_id_2` into `account_id_1`
    fn merge_accounts(&mut self, timestamp: u64, account_id_1: &str, account_id_2: &str) -> bool;

    /// Balance of `account_id` at `time_at`; `timestamp` is accepted and ignored
    fn get_balance(&mut self, timestamp: u64, account_id: &str, time_at: u64) -> Option<Amount>;
}

impl BankingSystem for Ledger {
    fn create_account(&mut self, timestamp: u64, account_id: &str) -> bool {
        Ledger::create_account(self, timestamp, account_id).is_ok()
    }

    fn deposit(&mut self, timestamp: u64, account_id: &str, amount: u64) -> Option<Amount> {
        Ledger::deposit(self, timestamp, account_id, amount).ok()
    }

    fn transfer(
        &mut self,
        timestamp: u64,
        source_account_id: &str,
        target_account_id: &str,
        amount: u64,
    ) -> Option<Amount> {
        Ledger::transfer(self, timestamp, source_account_id, target_account_id, amount).ok()
    }

    fn top_spenders(&mut self, _timestamp: u64, n: usize) -> Vec<String> {
        Ledger::top_spenders(self, n)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn pay(&mut self, timestamp: u64, account_id: &str, amount: u64) -> Option<String> {
        Ledger::pay(self, timestamp, account_id, amount)
            .ok()
            .map(|payment_id| payment_id.to_string())
    }

    fn get_payment_status(
        &mut self,
        timestamp: u64,
        account_id: &str,
        payment: &str,
    ) -> Option<String> {
        let payment_id: PaymentId = payment.parse().ok()?;
        Ledger::payment_status(self, timestamp, account_id, &payment_id)
            .ok()
            .map(|status| status.to_string())
    }

    fn merge_accounts(&mut self, timestamp: u64, account_id_1: &str, account_id_2: &str) -> bool {
        Ledger::merge_accounts(self, timestamp, account_id_1, account_id_2).is_ok()
    }

    fn get_balance(&mut self, _timestamp: u64, account_id: &str, time_at: u64) -> Option<Amount> {
        Ledger::balance_at(self, account_id, time_at).ok()
    }
}

impl BankingSystem for SharedLedger {
    fn create_account(&mut self, timestamp: u64, account_id: &str) -> bool {
        self.execute(|ledger| BankingSystem::create_account(ledger, timestamp, account_id))
    }

    fn deposit(&mut self, timestamp: u64, account_id: &str, amount: u64) -> Option<Amount> {
        self.execute(|ledger| BankingSystem::deposit(ledger, timestamp, account_id, amount))
    }

    fn transfer(
        &mut self,
        timestamp: u64,
        source_account_id: &str,
        target_account_id: &str,
        amount: u64,
    ) -> Option<Amount> {
        self.execute(|ledger| {
            BankingSystem::transfer(ledger, timestamp, source_account_id, target_account_id, amount)
        })
    }

    fn top_spenders(&mut self, timestamp: u64, n: usize) -> Vec<String> {
        self.execute(|ledger| BankingSystem::top_spenders(ledger, timestamp, n))
    }

    fn pay(&mut self, timestamp: u64, account_id: &str, amount: u64) -> Option<String> {
        self.execute(|ledger| BankingSystem::pay(ledger, timestamp, account_id, amount))
    }

    fn get_payment_status(
        &mut self,
        timestamp: u64,
        account_id: &str,
        payment: &str,
    ) -> Option<String> {
        self.execute(|ledger| {
            BankingSystem::get_payment_status(ledger, timestamp, account_id, payment)
        })
    }

    fn merge_accounts(&mut self, timestamp: u64, account_id_1: &str, account_id_2: &str) -> bool {
        self.execute(|ledger| {
            BankingSystem::merge_accounts(ledger, timestamp, account_id_1, account_id_2)
        })
    }

    fn get_balance(&mut self, timestamp: u64, account_id: &str, time_at: u64) -> Option<Amount> {
        self.execute(|ledger| BankingSystem::get_balance(ledger, timestamp, account_id, time_at))
    }
}
