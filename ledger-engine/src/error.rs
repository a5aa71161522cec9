//! Error types for the ledger engine

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every business-rule failure is reported through this type. Callers that
/// only care about success or failure can collapse it with `.ok()`; the
/// variant is the reason code.
#[derive(Error, Debug)]
pub enum Error {
    /// Account never existed, or no longer exists independently at the
    /// requested instant (merged away)
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Payment unknown or not owned by the named account
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Self-transfer, self-merge, duplicate account, out-of-range amount
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Balance below the requested amount
    #[error("Insufficient funds in {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Debited account
        account: String,
        /// Balance at the operation instant
        balance: i64,
        /// Requested amount
        requested: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures caused by the ledger's business rules, as opposed
    /// to setup problems (config, metrics, IO)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::AccountNotFound(_)
                | Error::PaymentNotFound(_)
                | Error::InvalidOperation(_)
                | Error::InsufficientFunds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        assert!(Error::AccountNotFound("a".into()).is_rejection());
        assert!(Error::InvalidOperation("self-merge".into()).is_rejection());
        assert!(Error::InsufficientFunds {
            account: "a".into(),
            balance: 0,
            requested: 10,
        }
        .is_rejection());
        assert!(!Error::Config("bad".into()).is_rejection());
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = Error::InsufficientFunds {
            account: "acc1".into(),
            balance: 5,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds in acc1: balance 5, requested 10"
        );
    }
}
