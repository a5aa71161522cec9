//! Account merge
//!
//! Merging `absorbed` into `survivor` at T:
//!
//! ```text
//! absorbed:  t0 ─ t1 ─ t2 │ t4 (cashback)        survivor: s0 ─ s3
//!                         T
//! after:
//! absorbed:  t0 ─ t1 ─ t2 ─ [MergedInto survivor @ T]
//! survivor:  s0 ─ s3 ─ (+balance(absorbed, T) @ T) ─ t4
//! ```
//!
//! History of the absorbed account before T stays queryable; from T on it
//! no longer exists independently. Its payments and spend counter move to
//! the survivor.

use crate::{
    timeline::TimelineEntry,
    types::{AccountId, Amount, Timestamp},
    Error, Ledger, Result,
};

impl Ledger {
    /// Merge `absorbed` into `survivor` at `timestamp`
    pub fn merge_accounts(
        &mut self,
        timestamp: Timestamp,
        survivor: &str,
        absorbed: &str,
    ) -> Result<()> {
        if survivor == absorbed {
            return self.reject(Error::InvalidOperation(format!(
                "merge of {} into itself",
                survivor
            )));
        }
        if let Err(err) = self.balance_at(survivor, timestamp) {
            return self.reject(err);
        }
        let absorbed_balance = match self.balance_at(absorbed, timestamp) {
            Ok(balance) => balance,
            Err(err) => return self.reject(err),
        };

        let incoming: Vec<(Timestamp, Amount)> = self
            .accounts
            .get(absorbed)
            .map(|timeline| {
                timeline
                    .entries()
                    .filter(|(at, _)| *at > timestamp)
                    .filter_map(|(at, entry)| entry.delta().map(|delta| (at, delta)))
                    .collect()
            })
            .unwrap_or_default();
        self.within_range(
            survivor,
            std::iter::once((timestamp, absorbed_balance)).chain(incoming),
        )?;

        let survivor_id = AccountId::new(survivor);
        let future = self.accounts.get_mut(absorbed).map(|timeline| {
            let future = timeline.split_off_after(timestamp);
            timeline.mark_merged(timestamp, survivor_id.clone());
            future
        });
        let Some(future) = future else {
            return self.reject(Error::AccountNotFound(absorbed.to_string()));
        };

        self.record(survivor, timestamp, absorbed_balance);
        let mut spliced = 0usize;
        for (at, entry) in future {
            // A marker here means a later merge was recorded out of order; it
            // belongs to the absorbed id, not the survivor.
            if let TimelineEntry::Delta(delta) = entry {
                self.record(survivor, at, delta);
                spliced += 1;
            }
        }

        let mut reassigned = 0usize;
        for record in self.payments.values_mut() {
            if record.owner.as_str() == absorbed {
                record.owner = survivor_id.clone();
                reassigned += 1;
            }
        }

        let absorbed_spend = self.total_spent.remove(absorbed).unwrap_or(0);
        self.add_spend(survivor, absorbed_spend);
        self.metrics.merges.inc();

        tracing::debug!(
            survivor,
            absorbed,
            timestamp,
            absorbed_balance,
            spliced,
            reassigned,
            "accounts merged"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Ledger, PaymentStatus};

    const DAY: u64 = 86_400_000;

    fn two_funded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.create_account(1, "acc1").unwrap();
        ledger.create_account(1, "acc2").unwrap();
        ledger.deposit(2, "acc1", 100).unwrap();
        ledger.deposit(2, "acc2", 1000).unwrap();
        ledger
    }

    #[test]
    fn test_merge_moves_balance() {
        let mut ledger = two_funded();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        assert_eq!(ledger.balance_at("acc1", 10).unwrap(), 1100);
        assert_eq!(ledger.balance_at("acc1", 9).unwrap(), 100);
        assert!(ledger.balance_at("acc2", 10).is_err());
        assert!(ledger.balance_at("acc2", 1_000).is_err());
        assert_eq!(ledger.balance_at("acc2", 9).unwrap(), 1000);
        assert_eq!(ledger.metrics().merges.get(), 1);
    }

    #[test]
    fn test_merge_carries_pending_cashback() {
        let mut ledger = two_funded();
        let payment = ledger.pay(5, "acc2", 500).unwrap();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();

        assert_eq!(ledger.balance_at("acc1", 10).unwrap(), 600);
        assert_eq!(ledger.balance_at("acc1", 5 + DAY).unwrap(), 610);
        assert_eq!(
            ledger.payment_status(5 + DAY, "acc1", &payment).unwrap(),
            PaymentStatus::CashbackReceived
        );
        assert!(ledger.payment_status(5 + DAY, "acc2", &payment).is_err());
    }

    #[test]
    fn test_merge_cashback_accumulates_with_survivor_cashback() {
        let mut ledger = two_funded();
        ledger.pay(5, "acc1", 100).unwrap();
        ledger.pay(5, "acc2", 500).unwrap();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        assert_eq!(ledger.balance_at("acc1", 5 + DAY).unwrap(), 500 + 2 + 10);
    }

    #[test]
    fn test_merge_combines_spend_and_drops_absorbed_from_ranking() {
        let mut ledger = two_funded();
        ledger.pay(3, "acc1", 50).unwrap();
        ledger.pay(3, "acc2", 70).unwrap();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        assert_eq!(ledger.total_spent("acc1"), Some(120));
        assert_eq!(ledger.total_spent("acc2"), None);
        let ranking: Vec<String> = ledger.top_spenders(5).iter().map(|r| r.to_string()).collect();
        assert_eq!(ranking, vec!["acc1(120)"]);
    }

    #[test]
    fn test_merge_rejections() {
        let mut ledger = two_funded();
        assert!(matches!(
            ledger.merge_accounts(10, "acc1", "acc1").unwrap_err(),
            Error::InvalidOperation(_)
        ));
        assert!(ledger.merge_accounts(10, "acc1", "missing").is_err());
        assert!(ledger.merge_accounts(10, "missing", "acc1").is_err());

        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        assert!(ledger.merge_accounts(11, "acc1", "acc2").is_err());
        assert!(ledger.merge_accounts(11, "acc2", "acc1").is_err());
    }

    #[test]
    fn test_merged_account_rejects_operations() {
        let mut ledger = two_funded();
        ledger.create_account(1, "acc3").unwrap();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        assert!(ledger.deposit(10, "acc2", 5).is_err());
        assert!(ledger.deposit(11, "acc2", 5).is_err());
        assert!(ledger.pay(11, "acc2", 5).is_err());
        assert!(ledger.transfer(11, "acc2", "acc3", 5).is_err());
        assert!(ledger.transfer(11, "acc1", "acc2", 5).is_err());
        assert_eq!(ledger.balance_at("acc1", 11).unwrap(), 1100);
    }

    #[test]
    fn test_recreate_after_merge() {
        let mut ledger = two_funded();
        ledger.pay(3, "acc2", 100).unwrap();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        ledger.create_account(11, "acc2").unwrap();

        assert_eq!(ledger.balance_at("acc2", 11).unwrap(), 0);
        assert!(ledger.balance_at("acc2", 9).is_err());
        assert_eq!(ledger.total_spent("acc2"), Some(0));
        assert_eq!(ledger.deposit(12, "acc2", 7).unwrap(), 7);
        assert_eq!(ledger.balance_at("acc1", 12).unwrap(), 1000);
        assert_eq!(ledger.metrics().accounts_created.get(), 3);
    }

    #[test]
    fn test_recreate_at_merge_instant() {
        let mut ledger = two_funded();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        assert!(ledger.create_account(10, "acc2").is_ok());
        assert_eq!(ledger.balance_at("acc2", 10).unwrap(), 0);
    }

    #[test]
    fn test_merge_rejected_when_survivor_would_overflow() {
        let mut ledger = two_funded();
        ledger.deposit(3, "acc1", i64::MAX as u64 - 100).unwrap();
        assert!(matches!(
            ledger.merge_accounts(10, "acc1", "acc2").unwrap_err(),
            Error::InvalidOperation(_)
        ));
        assert_eq!(ledger.balance_at("acc1", 10).unwrap(), i64::MAX);
        assert_eq!(ledger.balance_at("acc2", 10).unwrap(), 1000);
        assert_eq!(ledger.metrics().merges.get(), 0);
    }

    #[test]
    fn test_merge_rejected_when_spliced_cashback_would_overflow() {
        let mut ledger = two_funded();
        ledger.pay(5, "acc2", 1000).unwrap();
        ledger.deposit(6, "acc1", i64::MAX as u64 - 110).unwrap();
        // the balance at 10 fits, the pending cashback of 20 does not
        assert!(ledger.merge_accounts(10, "acc1", "acc2").is_err());
        assert!(ledger.payment_status(11, "acc2", &"payment1".parse().unwrap()).is_ok());
    }

    #[test]
    fn test_chained_merges() {
        let mut ledger = two_funded();
        ledger.create_account(1, "acc3").unwrap();
        ledger.deposit(2, "acc3", 10).unwrap();
        ledger.merge_accounts(10, "acc2", "acc3").unwrap();
        ledger.merge_accounts(20, "acc1", "acc2").unwrap();
        assert_eq!(ledger.balance_at("acc1", 20).unwrap(), 1110);
        assert_eq!(ledger.balance_at("acc2", 15).unwrap(), 1010);
        assert!(ledger.balance_at("acc2", 20).is_err());
        assert!(ledger.balance_at("acc3", 15).is_err());
    }

    #[test]
    fn test_merge_reassigns_all_past_payments() {
        let mut ledger = two_funded();
        let first = ledger.pay(3, "acc2", 10).unwrap();
        let second = ledger.pay(4, "acc2", 10).unwrap();
        ledger.merge_accounts(10, "acc1", "acc2").unwrap();
        for payment in [first, second] {
            assert_eq!(ledger.payment(&payment).unwrap().owner.as_str(), "acc1");
        }
    }
}
