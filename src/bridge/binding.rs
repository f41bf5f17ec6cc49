// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Which adapter runs each step of a route, resolved once per transfer.

use alloy_chains::NamedChain;

use crate::chain::{ChainIdentifier, Environment, SolanaNetwork};
use crate::error::{CctpError, Result};
use crate::protocol::DomainId;

/// Adapter that burns on the source chain. Approve binds to the same chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositBinding {
    Evm { chain: NamedChain },
    Solana { network: SolanaNetwork },
}

/// Adapter that mints on the destination chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimBinding {
    Evm { chain: NamedChain },
    Solana { network: SolanaNetwork },
}

/// A validated route with its CCTP domains and adapter bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteBinding {
    pub source_domain: DomainId,
    pub destination_domain: DomainId,
    pub deposit: DepositBinding,
    pub claim: ClaimBinding,
}

impl RouteBinding {
    /// Validates `source -> destination` within `environment`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedRoute` for a chain to itself or Solana to Solana
    /// - `UnsupportedChain` for a chain without CCTP v2 or outside `environment`
    pub fn resolve(
        source: ChainIdentifier,
        destination: ChainIdentifier,
        environment: Environment,
    ) -> Result<Self> {
        if source == destination || (source.is_solana() && destination.is_solana()) {
            return Err(CctpError::UnsupportedRoute {
                source_chain: source.to_string(),
                destination_chain: destination.to_string(),
            });
        }

        for chain in [&source, &destination] {
            if chain.environment()? != environment {
                return Err(CctpError::UnsupportedChain {
                    chain: format!("{chain} on {environment}"),
                });
            }
        }

        let deposit = match source {
            ChainIdentifier::Evm(chain) => DepositBinding::Evm { chain },
            ChainIdentifier::Solana(network) => DepositBinding::Solana { network },
        };
        let claim = match destination {
            ChainIdentifier::Evm(chain) => ClaimBinding::Evm { chain },
            ChainIdentifier::Solana(network) => ClaimBinding::Solana { network },
        };

        Ok(Self {
            source_domain: source.domain_id()?,
            destination_domain: destination.domain_id()?,
            deposit,
            claim,
        })
    }

    /// The EVM chain approvals go to, `None` for a Solana source.
    pub fn approve_chain(&self) -> Option<NamedChain> {
        match self.deposit {
            DepositBinding::Evm { chain } => Some(chain),
            DepositBinding::Solana { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_evm_to_solana() {
        let route = RouteBinding::resolve(
            ChainIdentifier::Evm(NamedChain::BaseSepolia),
            ChainIdentifier::Solana(SolanaNetwork::Devnet),
            Environment::Testnet,
        )
        .unwrap();

        assert_eq!(route.source_domain, DomainId::Base);
        assert_eq!(route.destination_domain, DomainId::Solana);
        assert_eq!(route.approve_chain(), Some(NamedChain::BaseSepolia));
        assert_eq!(
            route.claim,
            ClaimBinding::Solana {
                network: SolanaNetwork::Devnet
            }
        );
    }

    #[test]
    fn test_solana_to_evm() {
        let route = RouteBinding::resolve(
            ChainIdentifier::Solana(SolanaNetwork::Mainnet),
            ChainIdentifier::Evm(NamedChain::Arbitrum),
            Environment::Mainnet,
        )
        .unwrap();

        assert_eq!(route.approve_chain(), None);
        assert_eq!(
            route.claim,
            ClaimBinding::Evm {
                chain: NamedChain::Arbitrum
            }
        );
    }

    #[rstest]
    #[case(ChainIdentifier::Evm(NamedChain::Sepolia), ChainIdentifier::Evm(NamedChain::Sepolia))]
    #[case(
        ChainIdentifier::Solana(SolanaNetwork::Devnet),
        ChainIdentifier::Solana(SolanaNetwork::Devnet)
    )]
    fn test_rejects_unsupported_routes(
        #[case] source: ChainIdentifier,
        #[case] destination: ChainIdentifier,
    ) {
        let err = RouteBinding::resolve(source, destination, Environment::Testnet).unwrap_err();
        assert!(matches!(err, CctpError::UnsupportedRoute { .. }));
    }

    #[test]
    fn test_rejects_chains_outside_environment() {
        let err = RouteBinding::resolve(
            ChainIdentifier::Evm(NamedChain::Base),
            ChainIdentifier::Evm(NamedChain::Sepolia),
            Environment::Testnet,
        )
        .unwrap_err();
        insta::assert_snapshot!(err, @"Chain not supported: base on testnet");

        let err = RouteBinding::resolve(
            ChainIdentifier::Evm(NamedChain::Gnosis),
            ChainIdentifier::Evm(NamedChain::Sepolia),
            Environment::Testnet,
        )
        .unwrap_err();
        assert!(matches!(err, CctpError::UnsupportedChain { .. }));
    }
}
