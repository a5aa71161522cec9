//! Configuration for the ledger engine

use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Cashback configuration
    #[serde(default)]
    pub cashback: CashbackConfig,
}

/// Cashback configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashbackConfig {
    /// Delay between a payment and its cashback credit (same unit as timestamps)
    pub delay_ms: u64,

    /// Cashback rate in basis points of the paid amount, rounded down
    pub rate_bps: u32,
}

impl Default for CashbackConfig {
    fn default() -> Self {
        Self {
            delay_ms: 86_400_000, // 24h
            rate_bps: 200,        // 2%
        }
    }
}

impl CashbackConfig {
    /// Cashback owed on a payment of `amount`
    pub fn cashback_for(&self, amount: u64) -> u64 {
        let cashback = u128::from(amount) * u128::from(self.rate_bps) / 10_000;
        // rate_bps <= 10_000 keeps this within u64
        u64::try_from(cashback).unwrap_or(u64::MAX)
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(delay) = std::env::var("LEDGER_CASHBACK_DELAY_MS") {
            config.cashback.delay_ms = delay.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_CASHBACK_DELAY_MS: {}", e))
            })?;
        }

        if let Ok(rate) = std::env::var("LEDGER_CASHBACK_RATE_BPS") {
            config.cashback.rate_bps = rate.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid LEDGER_CASHBACK_RATE_BPS: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.cashback.delay_ms == 0 {
            return Err(crate::Error::Config(
                "cashback.delay_ms must be positive".to_string(),
            ));
        }
        if self.cashback.rate_bps > 10_000 {
            return Err(crate::Error::Config(format!(
                "cashback.rate_bps {} exceeds 10000",
                self.cashback.rate_bps
            )));
        }
        Ok(())
    }
}
