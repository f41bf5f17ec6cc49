// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Steps of a transfer and their per-step state.

use serde::Serialize;
use std::fmt;

use crate::chain::ChainIdentifier;
use crate::protocol::Attestation;

/// Step sequence for an EVM source. The allowance is a separate transaction.
const EVM_SOURCE_SEQUENCE: &[StepKind] = &[
    StepKind::Approve,
    StepKind::Deposit,
    StepKind::FetchAttestation,
    StepKind::Claim,
];

/// Step sequence for a Solana source. SPL burns need no allowance.
const SOLANA_SOURCE_SEQUENCE: &[StepKind] =
    &[StepKind::Deposit, StepKind::FetchAttestation, StepKind::Claim];

/// The ordered steps of a transfer from `source`.
///
/// ```rust
/// use cctp_bridge_orchestrator::bridge::{step_sequence, StepKind};
/// use cctp_bridge_orchestrator::chain::{ChainIdentifier, SolanaNetwork};
///
/// let steps = step_sequence(&ChainIdentifier::Solana(SolanaNetwork::Devnet));
/// assert_eq!(steps, [StepKind::Deposit, StepKind::FetchAttestation, StepKind::Claim]);
/// ```
pub fn step_sequence(source: &ChainIdentifier) -> &'static [StepKind] {
    match source {
        ChainIdentifier::Evm(_) => EVM_SOURCE_SEQUENCE,
        ChainIdentifier::Solana(_) => SOLANA_SOURCE_SEQUENCE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Approve,
    Deposit,
    FetchAttestation,
    Claim,
}

impl StepKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deposit => "deposit",
            Self::FetchAttestation => "fetch_attestation",
            Self::Claim => "claim",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `Pending → Processing → Success | Error`, with `Error → Processing` on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Processing,
    Success,
    Error,
}

/// State of one step. Only the orchestrator mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepState {
    kind: StepKind,
    status: StepStatus,
    /// EVM transaction hash or Solana signature
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    /// Only set on a successful FetchAttestation step
    #[serde(skip_serializing_if = "Option::is_none")]
    attestation: Option<Attestation>,
}

impl StepState {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            status: StepStatus::Pending,
            transaction_reference: None,
            error_message: None,
            attestation: None,
        }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }

    pub fn transaction_reference(&self) -> Option<&str> {
        self.transaction_reference.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn attestation(&self) -> Option<&Attestation> {
        self.attestation.as_ref()
    }

    /// Entering `Processing` clears whatever a failed attempt left behind.
    pub(crate) fn start(&mut self) {
        self.status = StepStatus::Processing;
        self.transaction_reference = None;
        self.error_message = None;
        self.attestation = None;
    }

    pub(crate) fn succeed(&mut self, transaction_reference: String) {
        self.status = StepStatus::Success;
        self.transaction_reference = Some(transaction_reference);
    }

    pub(crate) fn succeed_with_attestation(&mut self, attestation: Attestation) {
        self.status = StepStatus::Success;
        self.attestation = Some(attestation);
    }

    pub(crate) fn fail(&mut self, message: String, transaction_reference: Option<String>) {
        self.status = StepStatus::Error;
        self.error_message = Some(message);
        self.transaction_reference = transaction_reference;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::SolanaNetwork;
    use alloy_chains::NamedChain;
    use alloy_primitives::Bytes;
    use rstest::rstest;

    #[rstest]
    #[case(NamedChain::Sepolia)]
    #[case(NamedChain::BaseSepolia)]
    #[case(NamedChain::Arbitrum)]
    #[case(NamedChain::Polygon)]
    fn test_evm_source_has_four_steps(#[case] chain: NamedChain) {
        let steps = step_sequence(&ChainIdentifier::Evm(chain));
        assert_eq!(
            steps,
            [
                StepKind::Approve,
                StepKind::Deposit,
                StepKind::FetchAttestation,
                StepKind::Claim
            ]
        );
    }

    #[rstest]
    #[case(SolanaNetwork::Mainnet)]
    #[case(SolanaNetwork::Devnet)]
    fn test_solana_source_has_three_steps(#[case] network: SolanaNetwork) {
        let steps = step_sequence(&ChainIdentifier::Solana(network));
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0], StepKind::Deposit);
    }

    #[test]
    fn test_retry_clears_previous_failure() {
        let mut step = StepState::new(StepKind::Deposit);
        step.start();
        step.fail("Transaction 0xabc reverted".to_string(), Some("0xabc".to_string()));
        assert_eq!(step.status(), StepStatus::Error);
        assert_eq!(step.transaction_reference(), Some("0xabc"));

        step.start();
        assert_eq!(step.status(), StepStatus::Processing);
        assert_eq!(step.transaction_reference(), None);
        assert_eq!(step.error_message(), None);
    }

    #[test]
    fn test_serialized_snapshot() {
        let mut step = StepState::new(StepKind::FetchAttestation);
        step.start();
        step.succeed_with_attestation(Attestation {
            attestation: Bytes::from(vec![0xab, 0xcd]),
            message: Bytes::from(vec![0x01]),
        });

        insta::assert_snapshot!(
            serde_json::to_string(&step).unwrap(),
            @r#"{"kind":"fetch_attestation","status":"success","attestation":{"attestation":"0xabcd","message":"0x01"}}"#
        );
    }
}
