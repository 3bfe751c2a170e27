//! Application configuration.
//!
//! Defaults, overridden by environment variables, overridden in turn by CLI
//! flags (the binary applies those on top of [`AppConfig::from_env`]).

use std::path::PathBuf;

use shopbook_ledger::OverpayPolicy;
use shopbook_observability::LogFormat;

use crate::error::{AppError, AppResult};

pub const ENV_DATA: &str = "SHOPBOOK_DATA";
pub const ENV_OVERPAY_POLICY: &str = "SHOPBOOK_OVERPAY_POLICY";
pub const ENV_LOG_FORMAT: &str = "SHOPBOOK_LOG_FORMAT";

const DEFAULT_DATA_FILE: &str = "shopbook.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Snapshot file location.
    pub data_path: PathBuf,
    pub overpay_policy: OverpayPolicy,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            overpay_policy: OverpayPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_DATA) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(policy) = get(ENV_OVERPAY_POLICY) {
            config.overpay_policy = policy
                .parse()
                .map_err(|e| AppError::Config(format!("{ENV_OVERPAY_POLICY}: {e}")))?;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse()
                .map_err(|e| AppError::Config(format!("{ENV_LOG_FORMAT}: {e}")))?;
        }
        Ok(config)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.overpay_policy, OverpayPolicy::Faithful);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATA, "/var/lib/shop/state.json"),
            (ENV_OVERPAY_POLICY, "carry-credit"),
            (ENV_LOG_FORMAT, "json"),
        ]))
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/var/lib/shop/state.json"));
        assert_eq!(config.overpay_policy, OverpayPolicy::CarryCredit);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_DATA, "  ")])).unwrap();
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn bad_policy_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_OVERPAY_POLICY, "generous")])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.starts_with(ENV_OVERPAY_POLICY)));
    }
}
