// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CctpError {
    #[error("Wallet rejected the request: {reason}")]
    WalletRejected { reason: String },

    #[error("Transaction submission failed: {reason}")]
    SubmissionFailed { reason: String },

    #[error("Transaction {tx_ref} reverted")]
    TransactionReverted { tx_ref: String },

    #[error("Transaction {tx_ref} failed: {reason}")]
    TransactionFailed { tx_ref: String, reason: String },

    #[error("Timed out waiting for confirmation of {tx_ref}")]
    ConfirmationTimeout { tx_ref: String },

    #[error("Timeout waiting for attestation")]
    AttestationTimeout,

    #[error("Precondition not met: {reason}")]
    PreconditionNotMet { reason: String },

    #[error("Failed to switch network to {chain}: {reason}")]
    NetworkSwitchFailed { chain: String, reason: String },

    #[error("{0}")]
    InvalidAmount(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Chain not supported: {chain}")]
    UnsupportedChain { chain: String },

    #[error("Route not supported: {source_chain} -> {destination_chain}")]
    UnsupportedRoute {
        source_chain: String,
        destination_chain: String,
    },

    #[error("No recipient wallet connected for {chain}")]
    MissingRecipient { chain: String },

    #[error("No wallet connected for {chain}")]
    WalletNotConnected { chain: String },

    #[error("Step {index} out of range for a sequence of {len} steps")]
    StepOutOfRange { index: usize, len: usize },

    #[error("No transfer has been initialized")]
    NotInitialized,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Solana RPC error: {0}")]
    SolanaRpc(#[from] Box<solana_client::client_error::ClientError>),
}

impl CctpError {
    /// Transaction reference carried by errors raised after a transaction
    /// was already broadcast.
    pub fn transaction_reference(&self) -> Option<&str> {
        match self {
            Self::TransactionReverted { tx_ref }
            | Self::TransactionFailed { tx_ref, .. }
            | Self::ConfirmationTimeout { tx_ref } => Some(tx_ref),
            _ => None,
        }
    }
}

impl From<solana_client::client_error::ClientError> for CctpError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Self::SolanaRpc(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CctpError>;
