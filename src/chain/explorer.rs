// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block explorer links for step transaction references.

use alloy_chains::NamedChain;

use super::{ChainIdentifier, SolanaNetwork};

const FALLBACK_EVM_EXPLORER: &str = "https://etherscan.io/tx/";

fn evm_explorer_base(chain: NamedChain) -> &'static str {
    match chain {
        NamedChain::Mainnet => "https://etherscan.io/tx/",
        NamedChain::Polygon => "https://polygonscan.com/tx/",
        NamedChain::Arbitrum => "https://arbiscan.io/tx/",
        NamedChain::Optimism => "https://optimistic.etherscan.io/tx/",
        NamedChain::Base => "https://basescan.org/tx/",
        NamedChain::Sepolia => "https://sepolia.etherscan.io/tx/",
        NamedChain::PolygonAmoy => "https://amoy.polygonscan.com/tx/",
        NamedChain::ArbitrumSepolia => "https://sepolia.arbiscan.io/tx/",
        NamedChain::OptimismSepolia => "https://sepolia-optimism.etherscan.io/tx/",
        NamedChain::BaseSepolia => "https://sepolia.basescan.org/tx/",
        _ => FALLBACK_EVM_EXPLORER,
    }
}

/// Explorer URL for a transaction hash or signature on `chain`.
pub fn explorer_url(chain: &ChainIdentifier, tx_ref: &str) -> String {
    match chain {
        ChainIdentifier::Evm(chain) => format!("{}{tx_ref}", evm_explorer_base(*chain)),
        ChainIdentifier::Solana(SolanaNetwork::Mainnet) => {
            format!("https://solscan.io/tx/{tx_ref}")
        }
        ChainIdentifier::Solana(SolanaNetwork::Devnet) => {
            format!("https://solscan.io/tx/{tx_ref}?cluster=devnet")
        }
    }
}
