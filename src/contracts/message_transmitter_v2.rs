// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! MessageTransmitterV2 bindings
//!
//! `receiveMessage` verifies the attestation and mints USDC to the recipient
//! named in the burn message.

use alloy_primitives::{Address, Bytes};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use tracing::info;

/// MessageTransmitterV2 at a fixed address. Produces unsigned transactions.
#[derive(Debug, Clone, Copy)]
pub struct MessageTransmitterV2Contract {
    address: Address,
}

impl MessageTransmitterV2Contract {
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub fn receive_message_transaction(
        &self,
        from: Address,
        message: Bytes,
        attestation: Bytes,
    ) -> TransactionRequest {
        info!(
            from = %from,
            message_length_bytes = message.len(),
            attestation_length_bytes = attestation.len(),
            contract_address = %self.address,
            event = "receive_message_transaction_created"
        );

        let calldata = MessageTransmitterV2::receiveMessageCall {
            message,
            attestation,
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
    contract MessageTransmitterV2 {
        function receiveMessage(bytes message, bytes attestation) external returns (bool success);
    }
);
