//! Process configuration, read from environment variables at the binary edge.
//!
//! Only operational knobs live here. Fees, surcharge rates and the school year
//! are business data and come from the settings snapshot.

use std::path::PathBuf;

use thiserror::Error;

use coopbill_observability::{LogConfig, LogFormat};

pub const LOG_LEVEL_VAR: &str = "COOPBILL_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "COOPBILL_LOG_FORMAT";
pub const INCLUDE_SURCHARGE_VAR: &str = "COOPBILL_INCLUDE_SURCHARGE";
pub const SNAPSHOT_VAR: &str = "COOPBILL_SNAPSHOT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub log: LogConfig,
    /// Quote the processor surcharge unless a request says otherwise.
    pub include_surcharge_default: bool,
    pub snapshot_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(level) = get(LOG_LEVEL_VAR) {
            config.log.level = level.trim().to_string();
        }
        if let Some(format) = get(LOG_FORMAT_VAR) {
            config.log.format = format
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(LOG_FORMAT_VAR, e.to_string()))?;
        }
        if let Some(flag) = get(INCLUDE_SURCHARGE_VAR) {
            config.include_surcharge_default = parse_flag(&flag)
                .ok_or_else(|| ConfigError::invalid(INCLUDE_SURCHARGE_VAR, format!("not a boolean: {flag:?}")))?;
        }
        config.snapshot_path = get(SNAPSHOT_VAR).map(PathBuf::from);

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(!config.include_surcharge_default);
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (LOG_LEVEL_VAR, "coopbill_invoicing=debug"),
            (LOG_FORMAT_VAR, "pretty"),
            (INCLUDE_SURCHARGE_VAR, "1"),
            (SNAPSHOT_VAR, "/tmp/snapshot.json"),
        ])
        .unwrap();

        assert_eq!(config.log.level, "coopbill_invoicing=debug");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert!(config.include_surcharge_default);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/snapshot.json")));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = config_from(&[(LOG_LEVEL_VAR, "  "), (SNAPSHOT_VAR, "")]).unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn rejects_bad_values() {
        let err = config_from(&[(INCLUDE_SURCHARGE_VAR, "yes")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: INCLUDE_SURCHARGE_VAR, .. }));

        let err = config_from(&[(LOG_FORMAT_VAR, "xml")]).unwrap_err();
        assert!(err.to_string().starts_with(LOG_FORMAT_VAR));
    }
}
