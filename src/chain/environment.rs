// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_chains::NamedChain;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ChainIdentifier, SolanaNetwork};
use crate::error::CctpError;

/// Circle Iris API hosts
///
/// See <https://developers.circle.com/cctp/cctp-apis>
pub const IRIS_API: &str = "https://iris-api.circle.com";
pub const IRIS_API_SANDBOX: &str = "https://iris-api-sandbox.circle.com";

const MAINNET_EVM_CHAINS: &[NamedChain] = &[
    NamedChain::Mainnet,
    NamedChain::Polygon,
    NamedChain::Arbitrum,
    NamedChain::Optimism,
    NamedChain::Base,
];

const TESTNET_EVM_CHAINS: &[NamedChain] = &[
    NamedChain::Sepolia,
    NamedChain::PolygonAmoy,
    NamedChain::ArbitrumSepolia,
    NamedChain::OptimismSepolia,
    NamedChain::BaseSepolia,
];

/// Network environment a transfer runs in.
///
/// Selects the attestation host, the Solana cluster, the contract set and the
/// chains a user can pick. Both ends of a transfer share one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    #[default]
    Testnet,
}

impl Environment {
    pub const fn iris_api_url(self) -> &'static str {
        match self {
            Self::Mainnet => IRIS_API,
            Self::Testnet => IRIS_API_SANDBOX,
        }
    }

    pub const fn solana_network(self) -> SolanaNetwork {
        match self {
            Self::Mainnet => SolanaNetwork::Mainnet,
            Self::Testnet => SolanaNetwork::Devnet,
        }
    }

    pub const fn evm_chains(self) -> &'static [NamedChain] {
        match self {
            Self::Mainnet => MAINNET_EVM_CHAINS,
            Self::Testnet => TESTNET_EVM_CHAINS,
        }
    }

    pub const fn is_mainnet(self) -> bool {
        matches!(self, Self::Mainnet)
    }

    /// Every chain a transfer can start or end on, Solana last.
    pub fn supported_chains(self) -> Vec<ChainIdentifier> {
        self.evm_chains()
            .iter()
            .copied()
            .map(ChainIdentifier::Evm)
            .chain(std::iter::once(ChainIdentifier::Solana(
                self.solana_network(),
            )))
            .collect()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CctpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(CctpError::InvalidConfig(format!(
                "unknown environment: {other}"
            ))),
        }
    }
}
