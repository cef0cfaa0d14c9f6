//! # Configuration Management Module
//!
//! Loads the shop engine configuration from TOML and turns it into the
//! snapshot the type-availability layer consumes.
//!
//! ## Configuration Structure
//!
//! - [`ShopTypesConfig`] - per shop type enable flags
//! - [`SignTypesConfig`] - per sign type enable flags
//! - [`EconomyConfig`] - whether a currency/economy integration is present
//! - [`SessionConfig`] - idle session sweep and delete confirmation window
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [shop_types]
//! barter = true
//! sell = true
//! buy = true
//! admin = false
//!
//! [sign_types]
//! stackable = true
//! unstackable = true
//! barter = true
//!
//! [economy]
//! enabled = false
//!
//! [sessions]
//! idle_timeout_minutes = 10
//! delete_confirm_seconds = 5
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every type flag defaults to enabled, so a missing section turns nothing off.
//! Disabling everything is tolerated: the availability layer force-enables
//! barter and warns.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tokio::fs;

use crate::shop::{ShopType, SignType};

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopTypesConfig {
    #[serde(default = "enabled")]
    pub barter: bool,
    #[serde(default = "enabled")]
    pub sell: bool,
    #[serde(default = "enabled")]
    pub buy: bool,
    #[serde(default = "enabled")]
    pub admin: bool,
}

impl Default for ShopTypesConfig {
    fn default() -> Self {
        Self {
            barter: true,
            sell: true,
            buy: true,
            admin: true,
        }
    }
}

impl ShopTypesConfig {
    pub fn is_enabled(&self, shop_type: ShopType) -> bool {
        match shop_type {
            ShopType::Barter => self.barter,
            ShopType::Sell => self.sell,
            ShopType::Buy => self.buy,
            ShopType::Admin => self.admin,
        }
    }

    pub fn enabled_types(&self) -> BTreeSet<ShopType> {
        ShopType::ALL
            .into_iter()
            .filter(|t| self.is_enabled(*t))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignTypesConfig {
    #[serde(default = "enabled")]
    pub stackable: bool,
    #[serde(default = "enabled")]
    pub unstackable: bool,
    #[serde(default = "enabled")]
    pub barter: bool,
}

impl Default for SignTypesConfig {
    fn default() -> Self {
        Self {
            stackable: true,
            unstackable: true,
            barter: true,
        }
    }
}

impl SignTypesConfig {
    pub fn is_enabled(&self, sign_type: SignType) -> bool {
        match sign_type {
            SignType::Stackable => self.stackable,
            SignType::Unstackable => self.unstackable,
            SignType::Barter => self.barter,
        }
    }

    pub fn enabled_types(&self) -> BTreeSet<SignType> {
        SignType::ALL
            .into_iter()
            .filter(|t| self.is_enabled(*t))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EconomyConfig {
    /// True when an economy integration is installed and sell/buy shops can move currency.
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes without interaction before a shop session is swept.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: i64,
    /// Seconds an armed shop deletion waits for the confirming click.
    #[serde(default = "default_delete_confirm")]
    pub delete_confirm_seconds: i64,
}

fn default_idle_timeout() -> i64 {
    10
}

fn default_delete_confirm() -> i64 {
    5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: default_idle_timeout(),
            delete_confirm_seconds: default_delete_confirm(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub shop_types: ShopTypesConfig,
    #[serde(default)]
    pub sign_types: SignTypesConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What the availability layer needs: configured type sets plus runtime capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSettings {
    pub shop_types: BTreeSet<ShopType>,
    pub sign_types: BTreeSet<SignType>,
    pub economy_available: bool,
}

impl TypeSettings {
    /// Everything enabled, with the given economy capability.
    pub fn all_enabled(economy_available: bool) -> Self {
        Self {
            shop_types: ShopType::ALL.into_iter().collect(),
            sign_types: SignType::ALL.into_iter().collect(),
            economy_available,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        Self::from_toml_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn type_settings(&self) -> TypeSettings {
        TypeSettings {
            shop_types: self.shop_types.enabled_types(),
            sign_types: self.sign_types.enabled_types(),
            economy_available: self.economy.enabled,
        }
    }
}
