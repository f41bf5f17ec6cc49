// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Process configuration
//!
//! Which environments may be selected and which Solana RPC endpoints to use.
//! Values come from the process environment, with a `.env` file loaded first
//! if one exists:
//!
//! | Variable | Default |
//! |---|---|
//! | `CCTP_ENABLE_MAINNET` | `false` |
//! | `SOLANA_MAINNET_RPC_URL` | `https://api.mainnet-beta.solana.com` |
//! | `SOLANA_DEVNET_RPC_URL` | `https://api.devnet.solana.com` |

use dotenvy::dotenv;
use tracing::debug;
use url::Url;

use crate::chain::{Environment, SolanaNetwork};
use crate::error::{CctpError, Result};

pub const ENABLE_MAINNET_VAR: &str = "CCTP_ENABLE_MAINNET";
pub const SOLANA_MAINNET_RPC_URL_VAR: &str = "SOLANA_MAINNET_RPC_URL";
pub const SOLANA_DEVNET_RPC_URL_VAR: &str = "SOLANA_DEVNET_RPC_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mainnet_enabled: bool,
    pub solana_mainnet_rpc_url: String,
    pub solana_devnet_rpc_url: String,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv() {
            debug!(path = %path.display(), event = "dotenv_loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// ```rust
    /// use cctp_bridge_orchestrator::config::AppConfig;
    /// use cctp_bridge_orchestrator::Environment;
    ///
    /// let config = AppConfig::from_lookup(|key| {
    ///     (key == "CCTP_ENABLE_MAINNET").then(|| "true".to_string())
    /// })
    /// .unwrap();
    /// assert!(config.is_environment_available(Environment::Mainnet));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mainnet_enabled = match lookup(ENABLE_MAINNET_VAR) {
            Some(value) => parse_flag(ENABLE_MAINNET_VAR, &value)?,
            None => false,
        };

        Ok(Self {
            mainnet_enabled,
            solana_mainnet_rpc_url: rpc_url(&lookup, SolanaNetwork::Mainnet)?,
            solana_devnet_rpc_url: rpc_url(&lookup, SolanaNetwork::Devnet)?,
        })
    }

    /// Testnet always, mainnet only when enabled.
    pub fn available_environments(&self) -> Vec<Environment> {
        let mut environments = vec![Environment::Testnet];
        if self.mainnet_enabled {
            environments.push(Environment::Mainnet);
        }
        environments
    }

    pub fn is_environment_available(&self, environment: Environment) -> bool {
        match environment {
            Environment::Testnet => true,
            Environment::Mainnet => self.mainnet_enabled,
        }
    }

    pub fn default_environment(&self) -> Environment {
        Environment::Testnet
    }

    pub fn solana_rpc_url(&self, network: SolanaNetwork) -> &str {
        match network {
            SolanaNetwork::Mainnet => &self.solana_mainnet_rpc_url,
            SolanaNetwork::Devnet => &self.solana_devnet_rpc_url,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mainnet_enabled: false,
            solana_mainnet_rpc_url: SolanaNetwork::Mainnet.default_rpc_url().to_string(),
            solana_devnet_rpc_url: SolanaNetwork::Devnet.default_rpc_url().to_string(),
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CctpError::InvalidConfig(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

/// The configured endpoint for `network`, validated as a URL.
fn rpc_url<F>(lookup: &F, network: SolanaNetwork) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let key = match network {
        SolanaNetwork::Mainnet => SOLANA_MAINNET_RPC_URL_VAR,
        SolanaNetwork::Devnet => SOLANA_DEVNET_RPC_URL_VAR,
    };

    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(value) => {
            let url = Url::parse(value.trim())
                .map_err(|e| CctpError::InvalidConfig(format!("{key}: {e}")))?;
            Ok(url.to_string())
        }
        None => Ok(network.default_rpc_url().to_string()),
    }
}
