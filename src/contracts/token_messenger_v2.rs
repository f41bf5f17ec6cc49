// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! TokenMessengerV2 bindings
//!
//! The token messenger burns USDC on the source chain and emits the message
//! Circle attests to.

use alloy_primitives::{Address, FixedBytes, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use bon::Builder;
use tracing::info;

/// Arguments of a v2 `depositForBurn`.
#[derive(Debug, Clone, Builder)]
pub struct DepositForBurnArgs {
    pub amount: U256,
    pub destination_domain: u32,
    /// Recipient on the destination chain, left-padded to 32 bytes
    pub mint_recipient: FixedBytes<32>,
    pub burn_token: Address,
    /// Zero lets anyone relay the claim
    #[builder(default)]
    pub destination_caller: FixedBytes<32>,
    pub max_fee: U256,
    pub min_finality_threshold: u32,
}

/// TokenMessengerV2 at a fixed address. Produces unsigned transactions.
#[derive(Debug, Clone, Copy)]
pub struct TokenMessengerV2Contract {
    address: Address,
}

impl TokenMessengerV2Contract {
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub fn deposit_for_burn_transaction(
        &self,
        from: Address,
        args: &DepositForBurnArgs,
    ) -> TransactionRequest {
        info!(
            from = %from,
            amount = %args.amount,
            destination_domain = args.destination_domain,
            mint_recipient = %args.mint_recipient,
            max_fee = %args.max_fee,
            min_finality_threshold = args.min_finality_threshold,
            contract_address = %self.address,
            event = "deposit_for_burn_transaction_created"
        );

        let calldata = TokenMessengerV2::depositForBurnCall {
            amount: args.amount,
            destinationDomain: args.destination_domain,
            mintRecipient: args.mint_recipient,
            burnToken: args.burn_token,
            destinationCaller: args.destination_caller,
            maxFee: args.max_fee,
            minFinalityThreshold: args.min_finality_threshold,
        }
        .abi_encode();

        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .input(TransactionInput::new(calldata.into()))
    }
}

sol!(
    #[allow(missing_docs)]
    contract TokenMessengerV2 {
        function depositForBurn(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken,
            bytes32 destinationCaller,
            uint256 maxFee,
            uint32 minFinalityThreshold
        ) external;
    }
);
