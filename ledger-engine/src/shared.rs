//! Thread-safe handle around a single ledger
//!
//! Merges and transfers touch two timelines, so readers must never observe
//! them half-applied. Every call through `SharedLedger` holds one lock for
//! the whole operation.

use crate::Ledger;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, lock-guarded ledger handle
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    /// Wrap a ledger
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run `f` with exclusive access to the ledger
    pub fn execute<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        let mut ledger = self.inner.lock();
        f(&mut ledger)
    }
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new(Ledger::default())
    }
}

impl From<Ledger> for SharedLedger {
    fn from(ledger: Ledger) -> Self {
        Self::new(ledger)
    }
}
