//! Payments with deferred cashback
//!
//! A payment debits the account immediately and schedules a cashback
//! credit `cashback.delay_ms` later as an ordinary future delta. Nothing
//! runs when that instant arrives: the credit simply becomes visible to
//! balance lookups whose window includes it.

use crate::{
    types::{PaymentId, PaymentRecord, PaymentStatus, Timestamp},
    Error, Ledger, Result,
};

impl Ledger {
    /// Pay `amount` from `account_id` at `timestamp`
    ///
    /// Returns the id of the new payment (`payment1`, `payment2`, ... across
    /// all accounts).
    pub fn pay(
        &mut self,
        timestamp: Timestamp,
        account_id: &str,
        amount: u64,
    ) -> Result<PaymentId> {
        let delta = self.debitable(account_id, timestamp, amount)?;
        let cashback = self.config.cashback.cashback_for(amount);
        let cashback_at = if cashback > 0 {
            match timestamp.checked_add(self.config.cashback.delay_ms) {
                Some(at) => Some(at),
                None => {
                    return self.reject(Error::InvalidOperation(format!(
                        "cashback instant for payment at {} overflows",
                        timestamp
                    )))
                }
            }
        } else {
            None
        };
        let credits = cashback_at.map(|at| (at, cashback as i64));
        self.within_range(account_id, std::iter::once((timestamp, -delta)).chain(credits))?;

        self.record(account_id, timestamp, -delta);
        self.add_spend(account_id, amount);
        if let Some(at) = cashback_at {
            // cashback <= amount, which already fit in an Amount
            self.record(account_id, at, cashback as i64);
            self.metrics.record_cashback(cashback);
        }

        let payment_id = PaymentId::from_ordinal(self.payments.len() as u64 + 1);
        self.payments.insert(
            payment_id,
            PaymentRecord {
                created_at: timestamp,
                owner: account_id.into(),
                amount,
                cashback,
            },
        );
        self.metrics.payments.inc();

        tracing::debug!(
            account = account_id,
            timestamp,
            amount,
            cashback,
            payment = %payment_id,
            "payment"
        );
        Ok(payment_id)
    }

    /// Cashback status of `payment_id` as seen at `timestamp`
    ///
    /// The payment must currently belong to `account_id`; payments of a
    /// merged-away account belong to its survivor. A read-only lookup, so a
    /// failure here is not counted as a rejected operation.
    pub fn payment_status(
        &self,
        timestamp: Timestamp,
        account_id: &str,
        payment_id: &PaymentId,
    ) -> Result<PaymentStatus> {
        if !self.accounts.contains_key(account_id) {
            return Err(Error::AccountNotFound(account_id.to_string()));
        }
        let record = match self.payment(payment_id) {
            Some(record) if record.owner.as_str() == account_id => record,
            _ => return Err(Error::PaymentNotFound(payment_id.to_string())),
        };

        let received_at = record
            .created_at
            .saturating_add(self.config.cashback.delay_ms);
        if timestamp < received_at {
            Ok(PaymentStatus::InProgress)
        } else {
            Ok(PaymentStatus::CashbackReceived)
        }
    }

    /// Stored record of `payment_id`
    pub fn payment(&self, payment_id: &PaymentId) -> Option<&PaymentRecord> {
        self.payments.get(payment_id)
    }

    /// Number of payments ever made
    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }
}
