//! Configuration for the escrow core

use crate::types::AccountId;
use serde::{Deserialize, Serialize};

/// Escrow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ledger account the core holds escrowed value under
    pub escrow_account: AccountId,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            escrow_account: AccountId::new("escrow-vault"),
            service_name: "escrow-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(account) = std::env::var("ESCROW_ACCOUNT") {
            config.escrow_account = AccountId::new(account);
        }

        if let Ok(name) = std::env::var("ESCROW_SERVICE_NAME") {
            config.service_name = name;
        }

        Ok(config)
    }
}
