// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_chains::NamedChain;
use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use super::addresses::{SOLANA_USDC_MINT_DEVNET, SOLANA_USDC_MINT_MAINNET};
use super::{CctpChain, Environment};
use crate::error::Result;
use crate::protocol::DomainId;

pub const SOLANA_MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const SOLANA_DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";

/// Solana cluster. Testnet transfers run against devnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolanaNetwork {
    Mainnet,
    Devnet,
}

impl SolanaNetwork {
    pub const fn usdc_mint(self) -> Pubkey {
        match self {
            Self::Mainnet => SOLANA_USDC_MINT_MAINNET,
            Self::Devnet => SOLANA_USDC_MINT_DEVNET,
        }
    }

    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Mainnet => SOLANA_MAINNET_RPC_URL,
            Self::Devnet => SOLANA_DEVNET_RPC_URL,
        }
    }

    pub const fn environment(self) -> Environment {
        match self {
            Self::Mainnet => Environment::Mainnet,
            Self::Devnet => Environment::Testnet,
        }
    }
}

/// A chain a transfer can start or end on.
///
/// The two variants have different execution models: EVM chains are driven
/// through a wallet with an active network, Solana through program
/// instructions signed by a connected keypair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainIdentifier {
    Evm(NamedChain),
    Solana(SolanaNetwork),
}

impl ChainIdentifier {
    pub fn domain_id(&self) -> Result<DomainId> {
        match self {
            Self::Evm(chain) => chain.cctp_domain_id(),
            Self::Solana(_) => Ok(DomainId::Solana),
        }
    }

    pub fn environment(&self) -> Result<Environment> {
        match self {
            Self::Evm(chain) => chain.cctp_environment(),
            Self::Solana(network) => Ok(network.environment()),
        }
    }

    pub const fn is_solana(&self) -> bool {
        matches!(self, Self::Solana(_))
    }

    pub const fn evm_chain(&self) -> Option<NamedChain> {
        match self {
            Self::Evm(chain) => Some(*chain),
            Self::Solana(_) => None,
        }
    }
}

impl From<NamedChain> for ChainIdentifier {
    fn from(chain: NamedChain) -> Self {
        Self::Evm(chain)
    }
}

impl fmt::Display for ChainIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm(chain) => write!(f, "{chain}"),
            Self::Solana(SolanaNetwork::Mainnet) => f.write_str("solana"),
            Self::Solana(SolanaNetwork::Devnet) => f.write_str("solana-devnet"),
        }
    }
}

impl Serialize for ChainIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_ids() {
        assert_eq!(
            ChainIdentifier::Solana(SolanaNetwork::Devnet).domain_id().unwrap(),
            DomainId::Solana
        );
        assert_eq!(
            ChainIdentifier::Evm(NamedChain::BaseSepolia).domain_id().unwrap(),
            DomainId::Base
        );
        assert!(ChainIdentifier::Evm(NamedChain::Gnosis).domain_id().is_err());
    }

    #[test]
    fn test_solana_clusters() {
        assert_eq!(
            SolanaNetwork::Mainnet.usdc_mint().to_string(),
            "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
        );
        assert_eq!(
            SolanaNetwork::Devnet.default_rpc_url(),
            "https://api.devnet.solana.com"
        );
        assert_eq!(SolanaNetwork::Devnet.environment(), Environment::Testnet);
    }

    #[test]
    fn test_display_and_serialize() {
        let solana = ChainIdentifier::Solana(SolanaNetwork::Devnet);
        assert_eq!(solana.to_string(), "solana-devnet");
        assert_eq!(serde_json::to_string(&solana).unwrap(), "\"solana-devnet\"");
        assert!(solana.evm_chain().is_none());

        let base = ChainIdentifier::from(NamedChain::Base);
        assert_eq!(base.evm_chain(), Some(NamedChain::Base));
        assert!(!base.is_solana());
    }
}
