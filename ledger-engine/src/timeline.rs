//! Per-account timestamped event store
//!
//! Each account owns one `Timeline`: a sorted map from timestamp to entry.
//! Balances are never stored, they are reconstructed by summing deltas.
//!
//! # Invariants
//!
//! - At most one entry per timestamp; writes to an occupied timestamp
//!   accumulate into the existing delta
//! - balance(T) = Σ deltas at timestamps ≤ T
//! - Once a `MergedInto` marker exists at or before T, balance(T) is unknown
//! - Every prefix sum fits in `Amount`; writes that would break this are
//!   refused, never clamped

use crate::types::{AccountId, Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timeline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEntry {
    /// Signed change applied at this instant
    Delta(Amount),
    /// Account was merged into the survivor at this instant
    MergedInto(AccountId),
}

impl TimelineEntry {
    /// Delta amount, if this is a delta
    pub fn delta(&self) -> Option<Amount> {
        match self {
            TimelineEntry::Delta(amount) => Some(*amount),
            TimelineEntry::MergedInto(_) => None,
        }
    }
}

/// Ordered timeline of ledger entries for one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    entries: BTreeMap<Timestamp, TimelineEntry>,
}

impl Timeline {
    /// New timeline opened with a zero delta at `opened_at`
    pub fn opened(opened_at: Timestamp) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(opened_at, TimelineEntry::Delta(0));
        Self { entries }
    }

    /// Accumulate `amount` into the delta at `at`
    ///
    /// Returns false (and leaves the timeline untouched) if `at` holds a
    /// merge marker or the entry would overflow. Callers guard balance range
    /// with [`Timeline::accepts`] first.
    pub fn record_delta(&mut self, at: Timestamp, amount: Amount) -> bool {
        match self.entries.entry(at).or_insert(TimelineEntry::Delta(0)) {
            TimelineEntry::Delta(existing) => match existing.checked_add(amount) {
                Some(sum) => {
                    *existing = sum;
                    true
                }
                None => false,
            },
            TimelineEntry::MergedInto(_) => false,
        }
    }

    /// True if recording every `(at, delta)` keeps all balances within `Amount`
    ///
    /// Checks every instant from the earliest write onwards, so a credit that
    /// fits today but overflows under an already scheduled cashback is
    /// refused as well.
    pub fn accepts<I>(&self, deltas: I) -> bool
    where
        I: IntoIterator<Item = (Timestamp, Amount)>,
    {
        let mut candidate = self.entries.clone();
        for (at, delta) in deltas {
            if let TimelineEntry::Delta(existing) =
                candidate.entry(at).or_insert(TimelineEntry::Delta(0))
            {
                match existing.checked_add(delta) {
                    Some(sum) => *existing = sum,
                    None => return false,
                }
            }
        }

        let mut balance: Amount = 0;
        for entry in candidate.values() {
            let Some(delta) = entry.delta() else { break };
            match balance.checked_add(delta) {
                Some(sum) => balance = sum,
                None => return false,
            }
        }
        true
    }

    /// Reconstruct the balance as of `time_at`
    ///
    /// `None` when nothing is recorded at or before `time_at`, or when the
    /// account had been merged away by then. Writes go through
    /// [`Timeline::accepts`], so the sum itself never overflows.
    pub fn balance_at(&self, time_at: Timestamp) -> Option<Amount> {
        let mut seen = false;
        let mut balance: Amount = 0;
        for entry in self.entries.range(..=time_at).map(|(_, entry)| entry) {
            seen = true;
            match entry {
                TimelineEntry::Delta(amount) => balance = balance.checked_add(*amount)?,
                TimelineEntry::MergedInto(_) => return None,
            }
        }
        seen.then_some(balance)
    }

    /// Latest entry at or before `time_at` (floor lookup)
    pub fn floor(&self, time_at: Timestamp) -> Option<(Timestamp, &TimelineEntry)> {
        self.entries
            .range(..=time_at)
            .next_back()
            .map(|(at, entry)| (*at, entry))
    }

    /// Remove and return every entry strictly after `at`
    pub fn split_off_after(&mut self, at: Timestamp) -> BTreeMap<Timestamp, TimelineEntry> {
        match at.checked_add(1) {
            Some(next) => self.entries.split_off(&next),
            None => BTreeMap::new(),
        }
    }

    /// Overwrite the entry at `at` with a merge marker
    pub fn mark_merged(&mut self, at: Timestamp, survivor: AccountId) {
        self.entries.insert(at, TimelineEntry::MergedInto(survivor));
    }

    /// Survivor this timeline was merged into, if a marker exists at or before `time_at`
    pub fn merged_into(&self, time_at: Timestamp) -> Option<&AccountId> {
        self.entries
            .range(..=time_at)
            .rev()
            .find_map(|(_, entry)| match entry {
                TimelineEntry::MergedInto(survivor) => Some(survivor),
                TimelineEntry::Delta(_) => None,
            })
    }

    /// Iterate entries in timestamp order
    pub fn entries(&self) -> impl Iterator<Item = (Timestamp, &TimelineEntry)> {
        self.entries.iter().map(|(at, entry)| (*at, entry))
    }

    /// Number of recorded timestamps
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was ever recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
