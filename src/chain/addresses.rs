// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract, program and token addresses for CCTP v2 on every routed network.
//!
//! EVM contracts share one address per environment. Solana programs share one
//! address across mainnet-beta and devnet.

use alloy_primitives::{address, Address};
use solana_sdk::{pubkey, pubkey::Pubkey};

// =============================================================================
// EVM contracts
// =============================================================================
//
// Reference: <https://developers.circle.com/cctp/evm-smart-contracts>

pub const CCTP_V2_MESSAGE_TRANSMITTER_MAINNET: Address =
    address!("81D40F21F12A8F0E3252Bccb954D722d4c464B64");

pub const CCTP_V2_TOKEN_MESSENGER_MAINNET: Address =
    address!("28b5a0e9C621a5BadaA536219b3a228C8168cf5d");

pub const CCTP_V2_MESSAGE_TRANSMITTER_TESTNET: Address =
    address!("E737e5cEBEEBa77EFE34D4aa090756590b1CE275");

pub const CCTP_V2_TOKEN_MESSENGER_TESTNET: Address =
    address!("8FE6B999Dc680CcFDD5Bf7EB0974218be2542DAA");

// =============================================================================
// USDC on EVM
// =============================================================================
//
// Reference: <https://developers.circle.com/stablecoins/usdc-contract-addresses>

pub const ETHEREUM_USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
pub const POLYGON_USDC: Address = address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359");
pub const ARBITRUM_USDC: Address = address!("af88d065e77c8cC2239327C5EDb3A432268e5831");
pub const OPTIMISM_USDC: Address = address!("0b2C639c533813f4Aa9D7837CAf62653d097Ff85");
pub const BASE_USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

pub const SEPOLIA_USDC: Address = address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238");
pub const POLYGON_AMOY_USDC: Address = address!("41E94Eb019C0762f9Bfcf9Fb1E58725BfB0e7582");
pub const ARBITRUM_SEPOLIA_USDC: Address = address!("75faf114eafb1BDbe2F0316DF893fd58CE46AA4d");
pub const OPTIMISM_SEPOLIA_USDC: Address = address!("5fd84259d66Cd46123540766Be93DFE6D43130D7");
pub const BASE_SEPOLIA_USDC: Address = address!("036CbD53842c5426634e7929541eC2318f3dCF7e");

// =============================================================================
// Solana programs
// =============================================================================
//
// Reference: <https://developers.circle.com/cctp/solana-programs>

/// MessageTransmitterV2
pub const MESSAGE_TRANSMITTER_PROGRAM_ID: Pubkey =
    pubkey!("CCTPV2Sm4AdWt5296sk4P66VBZ7bEhcARwFaaS9YPbeC");

/// TokenMessengerMinterV2
pub const TOKEN_MESSENGER_MINTER_PROGRAM_ID: Pubkey =
    pubkey!("CCTPV2vPZJS2u2BBsUoscuikbYjnpFmbFsvVuJdgUMQe");

pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

pub const SOLANA_USDC_MINT_MAINNET: Pubkey =
    pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

pub const SOLANA_USDC_MINT_DEVNET: Pubkey =
    pubkey!("4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU");
