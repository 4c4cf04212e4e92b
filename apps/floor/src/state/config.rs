//! # Configuration State
//!
//! Store-level settings for the floor service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Load Order (later overrides earlier)                  │
//! │                                                                         │
//! │  1. Defaults          ConfigState::default()                           │
//! │  2. Config file       $TAVOLA_CONFIG, or                               │
//! │                       ~/.config/tavola/floor.toml (Linux)              │
//! │  3. Environment       TAVOLA_STORE_NAME, TAVOLA_CURRENCY_SYMBOL,       │
//! │                       TAVOLA_DEFAULT_PAYMENT_METHOD,                   │
//! │                       TAVOLA_DEFAULT_GUEST_COUNT                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```toml
//! # floor.toml
//! store_name = "Tavola Downtown"
//! currency_symbol = "€"
//! default_payment_method = "cash"
//! default_guest_count = 2
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tavola_core::{Money, PaymentMethod, DEFAULT_GUEST_COUNT};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while loading `floor.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Shown in the header and on receipts
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Method preselected when the billing dialog opens
    pub default_payment_method: PaymentMethod,

    /// Guests assumed when a free table orders
    pub default_guest_count: u32,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Tavola".to_string(),
            currency_symbol: "$".to_string(),
            default_payment_method: PaymentMethod::Card,
            default_guest_count: DEFAULT_GUEST_COUNT,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a file that fails to parse is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("TAVOLA_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading floor config from file");
                config = Self::from_file(&path)?;
                config.validate()?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        // each override is checked on its own, so a bad one never costs the file
        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load floor config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }

        if self.default_guest_count == 0 {
            return Err(ConfigError::Invalid(
                "default_guest_count must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `TAVOLA_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("TAVOLA_STORE_NAME") {
            if name.trim().is_empty() {
                warn!("Blank store name in environment");
            } else {
                self.store_name = name;
            }
        }

        if let Some(symbol) = lookup("TAVOLA_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(method) = lookup("TAVOLA_DEFAULT_PAYMENT_METHOD") {
            match method.parse::<PaymentMethod>() {
                Ok(parsed) => {
                    debug!(method = %parsed, "Overriding default payment method from environment");
                    self.default_payment_method = parsed;
                }
                Err(_) => warn!(method = %method, "Unknown payment method in environment"),
            }
        }

        if let Some(guests) = lookup("TAVOLA_DEFAULT_GUEST_COUNT") {
            match guests.parse::<u32>() {
                Ok(n) if n > 0 => self.default_guest_count = n,
                _ => warn!(guests = %guests, "Invalid guest count in environment"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tavola", "tavola")
            .map(|dirs| dirs.config_dir().join("floor.toml"))
    }

    /// Formats a cent amount as a currency string. Amounts are always held
    /// in cents, so there are always two decimal places.
    pub fn format_currency(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        format!("{}{}{}.{:02}", sign, self.currency_symbol, abs / 100, abs % 100)
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }
}
