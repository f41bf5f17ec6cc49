// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP configuration for EVM chains
//!
//! The `CctpChain` trait is implemented on `alloy_chains::NamedChain` and
//! answers every per-chain question the bridge asks: domain, environment,
//! contract addresses and the USDC token.

use alloy_chains::NamedChain;
use alloy_primitives::Address;

use super::addresses::{
    ARBITRUM_SEPOLIA_USDC, ARBITRUM_USDC, BASE_SEPOLIA_USDC, BASE_USDC,
    CCTP_V2_MESSAGE_TRANSMITTER_MAINNET, CCTP_V2_MESSAGE_TRANSMITTER_TESTNET,
    CCTP_V2_TOKEN_MESSENGER_MAINNET, CCTP_V2_TOKEN_MESSENGER_TESTNET, ETHEREUM_USDC,
    OPTIMISM_SEPOLIA_USDC, OPTIMISM_USDC, POLYGON_AMOY_USDC, POLYGON_USDC, SEPOLIA_USDC,
};
use super::Environment;
use crate::error::{CctpError, Result};
use crate::protocol::DomainId;

/// CCTP configuration for an EVM chain.
///
/// # Example
///
/// ```rust
/// use cctp_bridge_orchestrator::{CctpChain, DomainId, Environment};
/// use alloy_chains::NamedChain;
///
/// let chain = NamedChain::ArbitrumSepolia;
/// assert!(chain.supports_cctp_bridge());
/// assert_eq!(chain.cctp_domain_id().unwrap(), DomainId::Arbitrum);
/// assert_eq!(chain.cctp_environment().unwrap(), Environment::Testnet);
/// ```
pub trait CctpChain {
    /// Returns true if transfers can start or end on this chain
    fn supports_cctp_bridge(&self) -> bool;

    fn cctp_domain_id(&self) -> Result<DomainId>;

    fn cctp_environment(&self) -> Result<Environment>;

    /// The TokenMessengerV2 contract, spender of the burn allowance
    fn token_messenger_address(&self) -> Result<Address>;

    /// The MessageTransmitterV2 contract, target of claims
    fn message_transmitter_address(&self) -> Result<Address>;

    fn usdc_address(&self) -> Result<Address>;
}

impl CctpChain for NamedChain {
    fn supports_cctp_bridge(&self) -> bool {
        Environment::Mainnet.evm_chains().contains(self)
            || Environment::Testnet.evm_chains().contains(self)
    }

    fn cctp_domain_id(&self) -> Result<DomainId> {
        Ok(match self {
            Self::Mainnet | Self::Sepolia => DomainId::Ethereum,
            Self::Optimism | Self::OptimismSepolia => DomainId::Optimism,
            Self::Arbitrum | Self::ArbitrumSepolia => DomainId::Arbitrum,
            Self::Base | Self::BaseSepolia => DomainId::Base,
            Self::Polygon | Self::PolygonAmoy => DomainId::Polygon,
            _ => return Err(unsupported(self)),
        })
    }

    fn cctp_environment(&self) -> Result<Environment> {
        if Environment::Mainnet.evm_chains().contains(self) {
            Ok(Environment::Mainnet)
        } else if Environment::Testnet.evm_chains().contains(self) {
            Ok(Environment::Testnet)
        } else {
            Err(unsupported(self))
        }
    }

    fn token_messenger_address(&self) -> Result<Address> {
        Ok(match self.cctp_environment()? {
            Environment::Mainnet => CCTP_V2_TOKEN_MESSENGER_MAINNET,
            Environment::Testnet => CCTP_V2_TOKEN_MESSENGER_TESTNET,
        })
    }

    fn message_transmitter_address(&self) -> Result<Address> {
        Ok(match self.cctp_environment()? {
            Environment::Mainnet => CCTP_V2_MESSAGE_TRANSMITTER_MAINNET,
            Environment::Testnet => CCTP_V2_MESSAGE_TRANSMITTER_TESTNET,
        })
    }

    fn usdc_address(&self) -> Result<Address> {
        Ok(match self {
            Self::Mainnet => ETHEREUM_USDC,
            Self::Polygon => POLYGON_USDC,
            Self::Arbitrum => ARBITRUM_USDC,
            Self::Optimism => OPTIMISM_USDC,
            Self::Base => BASE_USDC,
            Self::Sepolia => SEPOLIA_USDC,
            Self::PolygonAmoy => POLYGON_AMOY_USDC,
            Self::ArbitrumSepolia => ARBITRUM_SEPOLIA_USDC,
            Self::OptimismSepolia => OPTIMISM_SEPOLIA_USDC,
            Self::BaseSepolia => BASE_SEPOLIA_USDC,
            _ => return Err(unsupported(self)),
        })
    }
}

/// The EVM chain of `domain` within `environment`.
///
/// Used to recover the burn token of a message arriving on Solana.
pub fn evm_chain_for_domain(domain: DomainId, environment: Environment) -> Result<NamedChain> {
    environment
        .evm_chains()
        .iter()
        .copied()
        .find(|chain| chain.cctp_domain_id().ok() == Some(domain))
        .ok_or_else(|| CctpError::UnsupportedChain {
            chain: format!("{domain} on {environment}"),
        })
}

fn unsupported(chain: &NamedChain) -> CctpError {
    CctpError::UnsupportedChain {
        chain: chain.to_string(),
    }
}
