// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # cctp-bridge-orchestrator
//!
//! Step orchestration for USDC transfers over Circle's Cross-Chain Transfer
//! Protocol (CCTP v2) between EVM chains and Solana.
//!
//! A transfer burns USDC on the source chain, waits for Circle's attestation
//! service (Iris) to sign the burn message, then mints on the destination
//! chain. [`BridgeOrchestrator`] runs that as an ordered list of steps, each
//! gated on the one before it:
//!
//! | Source | Steps |
//! |---|---|
//! | EVM | Approve, Deposit, FetchAttestation, Claim |
//! | Solana | Deposit, FetchAttestation, Claim |
//!
//! Failures land in the failing step's state and the step can be re-run in
//! place.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cctp_bridge_orchestrator::{BridgeOrchestrator, Environment, StepStatus};
//! use cctp_bridge_orchestrator::chain::ChainIdentifier;
//! use cctp_bridge_orchestrator::client::IrisClient;
//! use cctp_bridge_orchestrator::providers::{
//!     AlloyEvmWallet, IrisAttestationProvider, RpcSolanaConnection, TokioClock,
//! };
//! use alloy_chains::NamedChain;
//!
//! # async fn example(evm_wallet: AlloyEvmWallet) -> cctp_bridge_orchestrator::Result<()> {
//! let environment = Environment::Testnet;
//! let mut orchestrator = BridgeOrchestrator::<_, _, _, RpcSolanaConnection>::builder()
//!     .client(IrisClient::new(
//!         IrisAttestationProvider::for_environment(environment),
//!         TokioClock::new(),
//!     ))
//!     .environment(environment)
//!     .evm_wallet(evm_wallet)
//!     .build();
//!
//! orchestrator.initialize(
//!     ChainIdentifier::Evm(NamedChain::Sepolia),
//!     ChainIdentifier::Evm(NamedChain::BaseSepolia),
//!     "10.5".parse()?,
//! )?;
//!
//! if orchestrator.run_to_completion().await? != StepStatus::Success {
//!     for step in orchestrator.steps() {
//!         println!("{}: {:?} {:?}", step.kind(), step.status(), step.error_message());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`BridgeOrchestrator`] with [`StepKind`], [`StepState`] and [`StepStatus`]
//! - [`client::IrisClient`] for fee quotes and attestation polling
//! - [`adapters::EvmAdapter`] and [`adapters::SolanaAdapter`] for the
//!   individual chain operations
//! - [`traits`] for the wallet, attestation and clock seams, with production
//!   implementations in [`providers`] and fakes in `testing` (behind the
//!   `testing` feature)
//! - [`CctpError`] and [`Result`]

pub mod adapters;
pub mod bridge;
pub mod chain;
pub mod client;
pub mod config;
pub mod contracts;
mod error;
pub mod protocol;
pub mod providers;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;

pub use bridge::{
    step_sequence, BridgeOrchestrator, ConfirmationConfig, PollingConfig, Recipient, StepKind,
    StepState, StepStatus, TransferIntent,
};
pub use chain::addresses::{
    CCTP_V2_MESSAGE_TRANSMITTER_MAINNET, CCTP_V2_MESSAGE_TRANSMITTER_TESTNET,
    CCTP_V2_TOKEN_MESSENGER_MAINNET, CCTP_V2_TOKEN_MESSENGER_TESTNET,
};
pub use chain::{CctpChain, ChainIdentifier, Environment, SolanaNetwork};
pub use error::{CctpError, Result};
pub use protocol::{
    Attestation, DomainId, FeeQuote, FinalityThreshold, MessageHeader, UsdcAmount,
};

// Public module for callers that add their own instrumentation
pub mod spans;
