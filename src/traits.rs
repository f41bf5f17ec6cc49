// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Core trait abstractions for bridge operations.
//!
//! Every external dependency of the orchestrator sits behind one of these
//! traits: the attestation service, the clock, the EVM wallet and the Solana
//! connection. Production implementations live in [`crate::providers`]; fakes
//! for tests live in [`crate::testing`].

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signature::Signature};
use std::time::{Duration, Instant};

use crate::chain::Environment;
use crate::error::Result;
use crate::protocol::{DomainId, FeeTier, MessagesResponse};

/// HTTP access to Circle's Iris API.
///
/// An instance is bound to one environment's host.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Attestations becoming available after N polls
/// - Transport failures mid-poll
/// - Missing or malformed fee schedules
#[async_trait]
pub trait AttestationProvider: Send + Sync {
    /// `GET /v2/burn/USDC/fees/{source}/{destination}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a tier list.
    async fn get_fee_tiers(&self, source: DomainId, destination: DomainId) -> Result<Vec<FeeTier>>;

    /// `GET /v2/messages/{source}?transactionHash={tx_ref}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    async fn get_messages(&self, source: DomainId, tx_ref: &str) -> Result<MessagesResponse>;

    /// The environment this provider's host serves, if it is a known one.
    fn environment(&self) -> Option<Environment> {
        None
    }
}

/// Trait for time-based operations.
///
/// Lets tests run polling loops and timeouts without waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> Instant;
}

/// A connected EVM wallet able to sign on any supported chain.
///
/// Mirrors a browser wallet: one account, one active network at a time, and
/// signature prompts the user may decline.
#[async_trait]
pub trait EvmWallet: Send + Sync {
    fn address(&self) -> Address;

    /// Chain id of the currently active network.
    async fn active_chain_id(&self) -> Result<u64>;

    /// Asks the wallet to change its active network.
    ///
    /// # Errors
    ///
    /// `NetworkSwitchFailed` if the wallet declines or cannot serve the chain.
    async fn switch_chain(&self, chain: NamedChain) -> Result<()>;

    /// Signs and broadcasts on the active network.
    ///
    /// # Errors
    ///
    /// `WalletRejected` if the user declines, `SubmissionFailed` otherwise.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Waits until the transaction is mined and reports whether it succeeded.
    async fn wait_for_receipt(&self, chain: NamedChain, tx_hash: TxHash) -> Result<bool>;

    async fn token_balance(&self, chain: NamedChain, token: Address) -> Result<U256>;
}

/// Commitment a Solana signature has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Status of a submitted Solana transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureState {
    pub commitment: Commitment,
    /// Execution error reported by the cluster, if any
    pub err: Option<String>,
}

/// A Solana RPC connection with a connected wallet as fee payer.
#[async_trait]
pub trait SolanaConnection: Send + Sync {
    /// The connected wallet, payer and signer of every transaction.
    fn pubkey(&self) -> Pubkey;

    /// Signs with the wallet plus `extra_signers` and broadcasts.
    ///
    /// # Errors
    ///
    /// `WalletRejected` if signing is declined, `SubmissionFailed` otherwise.
    async fn send_transaction(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature>;

    /// `None` while the cluster has not seen the signature.
    async fn get_signature_status(&self, signature: &Signature) -> Result<Option<SignatureState>>;

    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>>;

    /// Balance of an SPL token account in base units.
    async fn token_account_balance(&self, token_account: &Pubkey) -> Result<u64>;
}
