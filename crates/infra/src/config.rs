//! Configuration loading and representation.
//!
//! Everything comes from environment variables; unset variables fall back to defaults,
//! malformed ones are rejected.

use stockledger_inventory::StockAdjuster;
use stockledger_products::{MarginRule, PriceRule, ValidationPolicy};
use thiserror::Error;

pub const ENV_PRICE_RULE: &str = "STOCKLEDGER_PRICE_RULE";
pub const ENV_MARGIN_RULE: &str = "STOCKLEDGER_MARGIN_RULE";
pub const ENV_STOCK_CEILING: &str = "STOCKLEDGER_STOCK_CEILING";
pub const ENV_TRACK_MOVEMENTS: &str = "STOCKLEDGER_TRACK_MOVEMENTS";
pub const ENV_BIND: &str = "STOCKLEDGER_BIND";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid (expected {expected})")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Business knobs of the inventory ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    pub policy: ValidationPolicy,
    /// Optional upper bound on stock after an inbound movement.
    pub stock_ceiling: Option<i64>,
    /// Record a movement for every stock adjustment.
    pub track_movements: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::default(),
            stock_ceiling: None,
            track_movements: true,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse from an arbitrary key lookup (tests pass a map instead of the environment).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let price = match lookup(ENV_PRICE_RULE).as_deref().map(str::trim) {
            None | Some("") => defaults.policy.price,
            Some("positive") => PriceRule::Positive,
            Some("non_negative") => PriceRule::NonNegative,
            Some(other) => return Err(invalid(ENV_PRICE_RULE, other, "positive | non_negative")),
        };

        let margin = match lookup(ENV_MARGIN_RULE).as_deref().map(str::trim) {
            None | Some("") => defaults.policy.margin,
            Some("allow_break_even") => MarginRule::AllowBreakEven,
            Some("require_profit") => MarginRule::RequireProfit,
            Some(other) => {
                return Err(invalid(ENV_MARGIN_RULE, other, "allow_break_even | require_profit"));
            }
        };

        let stock_ceiling = match lookup(ENV_STOCK_CEILING).as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(ceiling) if ceiling >= 0 => Some(ceiling),
                _ => return Err(invalid(ENV_STOCK_CEILING, raw, "a non-negative integer")),
            },
        };

        let track_movements = match lookup(ENV_TRACK_MOVEMENTS).as_deref().map(str::trim) {
            None | Some("") => defaults.track_movements,
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => return Err(invalid(ENV_TRACK_MOVEMENTS, other, "true | false")),
        };

        Ok(Self {
            policy: ValidationPolicy { price, margin },
            stock_ceiling,
            track_movements,
        })
    }

    pub fn adjuster(&self) -> StockAdjuster {
        match self.stock_ceiling {
            Some(ceiling) => StockAdjuster::with_ceiling(ceiling),
            None => StockAdjuster::new(),
        }
    }
}

/// Process-level settings for the API binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ledger: LedgerConfig,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ledger = LedgerConfig::from_lookup(&lookup)?;

        let database_url = lookup(ENV_DATABASE_URL).filter(|url| !url.trim().is_empty());
        if database_url.is_none() {
            tracing::warn!("{ENV_DATABASE_URL} not set; using the in-memory product store");
        }

        let bind_addr = lookup(ENV_BIND)
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        Ok(Self {
            ledger,
            database_url,
            bind_addr,
        })
    }
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.policy.price, PriceRule::Positive);
        assert_eq!(config.policy.margin, MarginRule::AllowBreakEven);
        assert!(config.track_movements);
        assert_eq!(config.adjuster().ceiling(), None);
    }

    #[test]
    fn reads_every_knob() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (ENV_PRICE_RULE, "non_negative"),
            (ENV_MARGIN_RULE, "require_profit"),
            (ENV_STOCK_CEILING, "250"),
            (ENV_TRACK_MOVEMENTS, "false"),
        ]))
        .unwrap();

        assert_eq!(config.policy.price, PriceRule::NonNegative);
        assert_eq!(config.policy.margin, MarginRule::RequireProfit);
        assert_eq!(config.stock_ceiling, Some(250));
        assert!(!config.track_movements);
        assert_eq!(config.adjuster().ceiling(), Some(250));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = LedgerConfig::from_lookup(lookup(&[(ENV_STOCK_CEILING, "-4")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: ENV_STOCK_CEILING,
                value: "-4".to_string(),
                expected: "a non-negative integer",
            }
        );

        assert!(LedgerConfig::from_lookup(lookup(&[(ENV_PRICE_RULE, "free")])).is_err());
        assert!(LedgerConfig::from_lookup(lookup(&[(ENV_MARGIN_RULE, "lenient")])).is_err());
        assert!(LedgerConfig::from_lookup(lookup(&[(ENV_TRACK_MOVEMENTS, "yes")])).is_err());
    }

    #[test]
    fn settings_pick_store_and_bind_address() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.database_url, None);
        assert_eq!(settings.bind_addr, DEFAULT_BIND);

        let settings = Settings::from_lookup(lookup(&[
            (ENV_DATABASE_URL, "postgres://localhost/stock"),
            (ENV_BIND, "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/stock"));
        assert_eq!(settings.bind_addr, "127.0.0.1:9000");
    }
}
