//! # Server Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Sources (later wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            ServerConfig::default()                         │
//! │  2. Config file         ./kassa.toml, or the path in KASSA_CONFIG       │
//! │                         (optional, TOML)                                │
//! │  3. Environment         KASSA_BIND_ADDR, KASSA_DB_PATH,                 │
//! │                         KASSA_STORE_NAME, KASSA_CURRENCY_SYMBOL,        │
//! │                         KASSA_LOW_STOCK_THRESHOLD, KASSA_HISTORY_LIMIT  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use kassa_core::{Money, DEFAULT_HISTORY_LIMIT, LOW_STOCK_THRESHOLD, MAX_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "kassa.toml";
const ENV_PREFIX: &str = "KASSA";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// SQLite database file.
    pub db_path: PathBuf,

    /// Shown in the header of the till.
    pub store_name: String,

    pub currency_symbol: String,

    /// Stock at or below this count is flagged as low.
    pub low_stock_threshold: i64,

    /// Sales returned by the history view when no limit is given.
    pub history_limit: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            db_path: default_db_path(),
            store_name: "Kassa".to_string(),
            currency_symbol: "€".to_string(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the default file location and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(format!("{ENV_PREFIX}_CONFIG"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_with(&path, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn load_with(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let config: ServerConfig = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue {
                field: "low_stock_threshold",
                reason: "must not be negative".to_string(),
            });
        }
        if !(1..=MAX_HISTORY_LIMIT).contains(&self.history_limit) {
            return Err(ConfigError::InvalidValue {
                field: "history_limit",
                reason: format!("must be between 1 and {MAX_HISTORY_LIMIT}"),
            });
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "currency_symbol",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

/// Platform data directory for the database.
///
/// - **macOS**: `~/Library/Application Support/com.kassa.pos/kassa.db`
/// - **Windows**: `%APPDATA%\kassa\pos\data\kassa.db`
/// - **Linux**: `~/.local/share/pos/kassa.db`
///
/// Falls back to `./kassa.db` when no home directory is known.
fn default_db_path() -> PathBuf {
    ProjectDirs::from("com", "kassa", "pos")
        .map(|dirs| dirs.data_dir().join("kassa.db"))
        .unwrap_or_else(|| PathBuf::from("kassa.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    fn missing_file() -> PathBuf {
        PathBuf::from("/nonexistent/kassa-test-config.toml")
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load_with(&missing_file(), env(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.low_stock_threshold, LOW_STOCK_THRESHOLD);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(config.db_path.ends_with("kassa.db"));
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServerConfig::load_with(
            &missing_file(),
            env(&[
                ("KASSA_BIND_ADDR", "0.0.0.0:8080"),
                ("KASSA_DB_PATH", "/tmp/shop.db"),
                ("KASSA_STORE_NAME", "Candle Corner"),
                ("KASSA_LOW_STOCK_THRESHOLD", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.db_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.store_name, "Candle Corner");
        assert_eq!(config.low_stock_threshold, 3);
    }

    #[test]
    fn test_invalid_history_limit_is_rejected() {
        let result = ServerConfig::load_with(&missing_file(), env(&[("KASSA_HISTORY_LIMIT", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "history_limit", .. })
        ));
    }

    #[test]
    fn test_format_money() {
        let config = ServerConfig::default();
        assert_eq!(config.format_money(Money::from_cents(1450)), "€14.50");
    }
}
