//! Monitor configuration
//!
//! All knobs live in one immutable struct handed to each component at
//! construction, so tests can inject alternate paths and intervals.

use crate::currency::Currency;
use crate::error::{MonitorError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// NBRB exchange-rates endpoint
pub const DEFAULT_API_URL: &str = "https://api.nbrb.by/exrates/currencies";

/// Static monitor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MonitorConfig {
    /// Currencies to track
    pub currencies: Vec<Currency>,
    /// Seconds between poll cycles
    pub poll_interval_secs: u64,
    /// First hour (inclusive) of the working window, bank-local time
    pub start_hour: u32,
    /// Last hour (exclusive) of the working window, bank-local time
    pub end_hour: u32,
    /// Snapshot file path
    pub snapshot_path: PathBuf,
    /// Change log file path
    pub log_path: PathBuf,
    /// Upstream API endpoint
    pub api_url: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            currencies: Currency::all().to_vec(),
            poll_interval_secs: 600,
            start_hour: 9,
            end_hour: 16,
            snapshot_path: PathBuf::from("exchange_rates.json"),
            log_path: PathBuf::from("exchange_rate_changes.log"),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&text)
            .map_err(|e| MonitorError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is internally consistent
    pub fn validate(&self) -> Result<()> {
        if self.currencies.is_empty() {
            return Err(MonitorError::ConfigError(
                "no currencies to track".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(MonitorError::ConfigError(
                "poll interval must be positive".to_string(),
            ));
        }
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(MonitorError::ConfigError(format!(
                "invalid working hours: {}..{}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// Check whether `hour` (bank-local) falls inside the working window
    pub fn in_working_hours(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_original_constants() {
        let config = MonitorConfig::default();
        assert_eq!(config.poll_interval_secs, 600);
        assert_eq!(config.start_hour, 9);
        assert_eq!(config.end_hour, 16);
        assert_eq!(config.currencies.len(), 4);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_working_hours_window() {
        let config = MonitorConfig::default();
        assert!(!config.in_working_hours(8));
        assert!(config.in_working_hours(9));
        assert!(config.in_working_hours(15));
        assert!(!config.in_working_hours(16));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
currencies = ["USD", "EUR"]
poll_interval_secs = 60
snapshot_path = "/tmp/rates.json"
"#
        )
        .unwrap();

        let config = MonitorConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.currencies, vec![Currency::USD, Currency::EUR]);
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/rates.json"));
        // Unset keys fall back to defaults
        assert_eq!(config.start_hour, 9);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pol_interval_secs = 60").unwrap();
        assert!(MonitorConfig::from_toml_file(file.path()).is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = MonitorConfig::default();
        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.start_hour = 16;
        config.end_hour = 9;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.currencies.clear();
        assert!(config.validate().is_err());

        assert!(MonitorConfig::default().validate().is_ok());
    }
}
