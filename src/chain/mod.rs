// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain configuration and contract addresses for CCTP
//!
//! This module contains the environment split, chain identifiers spanning EVM
//! and Solana, per-chain contract addresses and explorer links.

pub mod addresses;
mod environment;
mod evm;
mod explorer;
mod identifier;

pub use environment::{Environment, IRIS_API, IRIS_API_SANDBOX};
pub use evm::{evm_chain_for_domain, CctpChain};
pub use explorer::explorer_url;
pub use identifier::{ChainIdentifier, SolanaNetwork, SOLANA_DEVNET_RPC_URL, SOLANA_MAINNET_RPC_URL};
