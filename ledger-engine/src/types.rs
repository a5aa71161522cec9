//! Core types for the ledger
//!
//! Timestamps and amounts are plain integers in the caller's units; the
//! engine never interprets them beyond ordering and addition.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Point in time (milliseconds, same unit as the cashback delay)
pub type Timestamp = u64;

/// Signed amount: timeline deltas and reconstructed balances
pub type Amount = i64;

/// Account identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for AccountId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Payment identifier, rendered as `payment{N}` with N starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaymentId(u64);

impl PaymentId {
    const PREFIX: &'static str = "payment";

    /// Create from 1-based ordinal
    pub fn from_ordinal(ordinal: u64) -> Self {
        Self(ordinal)
    }

    /// 1-based ordinal across all accounts
    pub fn ordinal(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for PaymentId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        s.strip_prefix(Self::PREFIX)
            .filter(|digits| {
                !digits.is_empty()
                    && !digits.starts_with('0')
                    && digits.bytes().all(|b| b.is_ascii_digit())
            })
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| crate::Error::PaymentNotFound(s.to_string()))
    }
}

/// Cashback status of a payment (derived from its creation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Cashback window still open
    InProgress,
    /// Cashback window elapsed
    CashbackReceived,
}

impl PaymentStatus {
    /// Wire code
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::InProgress => "IN_PROGRESS",
            PaymentStatus::CashbackReceived => "CASHBACK_RECEIVED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Stored payment history record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Instant the payment was made
    pub created_at: Timestamp,

    /// Current owner (rewritten when the payer is merged away)
    pub owner: AccountId,

    /// Amount debited
    pub amount: u64,

    /// Cashback scheduled at `created_at + delay` (may be zero)
    pub cashback: u64,
}

/// One line of the top spenders ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpenderRank {
    /// Account
    pub account_id: AccountId,

    /// Cumulative outgoing amount
    pub total_spent: u64,
}

impl fmt::Display for SpenderRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.account_id, self.total_spent)
    }
}
