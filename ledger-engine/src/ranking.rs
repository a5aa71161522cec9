//! Top spenders ranking

use crate::{types::SpenderRank, Ledger};
use std::cmp::Reverse;

impl Ledger {
    /// The `n` accounts with the highest cumulative outgoing amount
    ///
    /// Ordered by spend descending, then account id ascending. Accounts
    /// merged away are not ranked; their spend counts for the survivor.
    pub fn top_spenders(&self, n: usize) -> Vec<SpenderRank> {
        let mut ranking: Vec<SpenderRank> = self
            .total_spent
            .iter()
            .map(|(account_id, total)| SpenderRank {
                account_id: account_id.clone(),
                total_spent: *total,
            })
            .collect();

        ranking.sort_unstable_by(|a, b| {
            (Reverse(a.total_spent), &a.account_id).cmp(&(Reverse(b.total_spent), &b.account_id))
        });
        ranking.truncate(n);
        ranking
    }

    /// Cumulative outgoing amount of a ranked account
    pub fn total_spent(&self, account_id: &str) -> Option<u64> {
        self.total_spent.get(account_id).copied()
    }
}
