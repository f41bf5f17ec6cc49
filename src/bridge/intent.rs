// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Address, FixedBytes};
use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

use crate::adapters::solana::pda::associated_token_address;
use crate::chain::{ChainIdentifier, SolanaNetwork};
use crate::protocol::UsdcAmount;

/// Account that receives the minted USDC on the destination chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    Evm(Address),
    /// The wallet owner. Funds land in its USDC associated token account.
    Solana(Pubkey),
}

impl Recipient {
    /// The 32-byte `mint_recipient` a burn names.
    ///
    /// EVM addresses are left-padded. For Solana this is the owner's USDC
    /// token account on `network`, not the owner itself.
    pub fn mint_recipient(&self, network: SolanaNetwork) -> FixedBytes<32> {
        match self {
            Self::Evm(address) => address.into_word(),
            Self::Solana(owner) => FixedBytes::from(
                associated_token_address(owner, &network.usdc_mint()).to_bytes(),
            ),
        }
    }

    pub fn solana_owner(&self) -> Option<&Pubkey> {
        match self {
            Self::Solana(owner) => Some(owner),
            Self::Evm(_) => None,
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm(address) => write!(f, "{address}"),
            Self::Solana(owner) => write!(f, "{owner}"),
        }
    }
}

impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What the user asked for. Fixed for the lifetime of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferIntent {
    pub source_chain: ChainIdentifier,
    pub destination_chain: ChainIdentifier,
    pub amount: UsdcAmount,
    /// `None` when no wallet for the destination side was connected
    pub recipient: Option<Recipient>,
}
