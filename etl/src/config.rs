//! Run configuration.
//!
//! Values are layered: built-in defaults, then `ETL_*` environment variables
//! (a `.env` file is loaded by the binary), then command-line flags.
//!
//! | Variable              | Field          |
//! |-----------------------|----------------|
//! | `ETL_URL`             | `url`          |
//! | `ETL_TABLE_SELECTOR`  | `table_selector` |
//! | `ETL_COUNTRY_COLUMN`  | `layout.country` |
//! | `ETL_GDP_COLUMN`      | `layout.gdp`   |
//! | `ETL_CSV_PATH`        | `csv_path`     |
//! | `ETL_DB_PATH`         | `db_path`      |
//! | `ETL_TABLE_NAME`      | `table_name`   |
//! | `ETL_THRESHOLD`       | `threshold`    |
//! | `ETL_LOG_FILE`        | `log_file`     |
//! | `ETL_TIMEOUT_SECS`    | `timeout_secs` |
//! | `ETL_USER_AGENT`      | `user_agent`   |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::parser::RowLayout;

/// Archived copy of the IMF/World Bank GDP list.
pub const DEFAULT_URL: &str = "https://web.archive.org/web/20230902185326/https://en.wikipedia.org/wiki/List_of_countries_by_GDP_%28nominal%29";
pub const DEFAULT_TABLE_SELECTOR: &str = "table.wikitable";
pub const DEFAULT_CSV_PATH: &str = "Countries_by_GDP.csv";
pub const DEFAULT_DB_PATH: &str = "World_Economies.db";
pub const DEFAULT_TABLE_NAME: &str = "Countries_by_GDP";
pub const DEFAULT_THRESHOLD: f64 = 100.0;
pub const DEFAULT_LOG_FILE: &str = "etl_project_log.txt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Page holding the GDP table.
    pub url: String,
    /// CSS selector of the table; the first match is used.
    pub table_selector: String,
    /// Cell indices of country and GDP (millions) within a row.
    pub layout: RowLayout,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    /// Query keeps rows with `GDP_USD_Billions` strictly above this.
    pub threshold: f64,
    pub log_file: PathBuf,
    /// Whole-request timeout for the fetch.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            table_selector: DEFAULT_TABLE_SELECTOR.to_string(),
            // Country, UN region, IMF estimate, ...
            layout: RowLayout::new(0, 2),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            threshold: DEFAULT_THRESHOLD,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("gdp-etl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl EtlConfig {
    /// Defaults overridden by `ETL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `ETL_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("ETL_URL") {
            config.url = v;
        }
        if let Some(v) = lookup("ETL_TABLE_SELECTOR") {
            config.table_selector = v;
        }
        if let Some(v) = lookup("ETL_COUNTRY_COLUMN") {
            config.layout.country = parse_value("ETL_COUNTRY_COLUMN", &v)?;
        }
        if let Some(v) = lookup("ETL_GDP_COLUMN") {
            config.layout.gdp = parse_value("ETL_GDP_COLUMN", &v)?;
        }
        if let Some(v) = lookup("ETL_CSV_PATH") {
            config.csv_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ETL_DB_PATH") {
            config.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ETL_TABLE_NAME") {
            config.table_name = v;
        }
        if let Some(v) = lookup("ETL_THRESHOLD") {
            config.threshold = parse_value("ETL_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("ETL_LOG_FILE") {
            config.log_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("ETL_TIMEOUT_SECS") {
            config.timeout_secs = parse_value("ETL_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("ETL_USER_AGENT") {
            config.user_agent = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that would otherwise fail late, after sinks were written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(invalid(
                "threshold",
                &self.threshold.to_string(),
                "must be a finite number",
            ));
        }
        if self.table_name.trim().is_empty() {
            return Err(invalid("table_name", &self.table_name, "must not be blank"));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.into(),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| invalid(key, value, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EtlConfig::default();
        assert_eq!(config.table_selector, "table.wikitable");
        assert_eq!(config.csv_path, PathBuf::from("Countries_by_GDP.csv"));
        assert_eq!(config.db_path, PathBuf::from("World_Economies.db"));
        assert_eq!(config.table_name, "Countries_by_GDP");
        assert_eq!(config.threshold, 100.0);
        assert_eq!(config.log_file, PathBuf::from("etl_project_log.txt"));
        assert!(config.url.contains("List_of_countries_by_GDP"));
    }

    #[test]
    fn test_no_overrides_equals_default() {
        let config = EtlConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, EtlConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let config = EtlConfig::from_lookup(lookup_from(&[
            ("ETL_URL", "http://localhost:8080/gdp.html"),
            ("ETL_TABLE_NAME", "gdp"),
            ("ETL_THRESHOLD", " 250.5 "),
            ("ETL_COUNTRY_COLUMN", "1"),
            ("ETL_GDP_COLUMN", "3"),
            ("ETL_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.url, "http://localhost:8080/gdp.html");
        assert_eq!(config.table_name, "gdp");
        assert_eq!(config.threshold, 250.5);
        assert_eq!(config.layout, RowLayout::new(1, 3));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = EtlConfig::from_lookup(lookup_from(&[("ETL_GDP_COLUMN", "second")])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ETL_GDP_COLUMN"));
        assert!(msg.contains("second"));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        assert!(EtlConfig::from_lookup(lookup_from(&[("ETL_THRESHOLD", "inf")])).is_err());
        assert!(EtlConfig::from_lookup(lookup_from(&[("ETL_THRESHOLD", "NaN")])).is_err());
    }

    #[test]
    fn test_validate_checks_values_set_after_loading() {
        assert!(EtlConfig::default().validate().is_ok());

        for threshold in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = EtlConfig {
                threshold,
                ..EtlConfig::default()
            };
            let msg = config.validate().unwrap_err().to_string();
            assert!(msg.contains("threshold"), "unexpected message: {}", msg);
        }

        let config = EtlConfig {
            table_name: "  ".into(),
            ..EtlConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
