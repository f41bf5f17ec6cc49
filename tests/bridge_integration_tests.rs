// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end transfers through the orchestrator using the fake wallets,
//! attestation service and clock.

use alloy_chains::NamedChain;
use alloy_primitives::{address, Address, Bytes, U256};
use cctp_bridge_orchestrator::adapters::solana::pda::{associated_token_address, DepositForBurnPdas};
use cctp_bridge_orchestrator::chain::addresses::TOKEN_MESSENGER_MINTER_PROGRAM_ID;
use cctp_bridge_orchestrator::client::IrisClient;
use cctp_bridge_orchestrator::protocol::FeeTier;
use cctp_bridge_orchestrator::testing::{
    burn_message, FakeAttestationProvider, FakeClock, FakeEvmWallet, FakeSolanaConnection,
};
use cctp_bridge_orchestrator::{
    Attestation, BridgeOrchestrator, CctpError, ChainIdentifier, DomainId, Environment,
    MessageHeader, Recipient, SolanaNetwork, StepKind, StepState, StepStatus, UsdcAmount,
};
use rstest::rstest;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

type TestOrchestrator =
    BridgeOrchestrator<FakeAttestationProvider, FakeClock, FakeEvmWallet, FakeSolanaConnection>;

const EVM_OWNER: Address = address!("742d35Cc6634C0532925a3b844Bc9e7595f0bEb0");

const SEPOLIA: ChainIdentifier = ChainIdentifier::Evm(NamedChain::Sepolia);
const BASE_SEPOLIA: ChainIdentifier = ChainIdentifier::Evm(NamedChain::BaseSepolia);
const SOLANA_DEVNET: ChainIdentifier = ChainIdentifier::Solana(SolanaNetwork::Devnet);

/// Fakes shared between the orchestrator and the test body.
struct Harness {
    provider: FakeAttestationProvider,
    clock: FakeClock,
    evm: FakeEvmWallet,
    solana: FakeSolanaConnection,
}

impl Harness {
    fn new() -> Self {
        Self {
            provider: FakeAttestationProvider::new(),
            clock: FakeClock::new(),
            evm: FakeEvmWallet::new(EVM_OWNER, NamedChain::Sepolia),
            solana: FakeSolanaConnection::default(),
        }
    }

    fn orchestrator(&self, with_evm: bool, with_solana: bool) -> TestOrchestrator {
        BridgeOrchestrator::builder()
            .client(IrisClient::new(self.provider.clone(), self.clock.clone()))
            .environment(Environment::Testnet)
            .maybe_evm_wallet(with_evm.then(|| self.evm.clone()))
            .maybe_solana(with_solana.then(|| self.solana.clone()))
            .build()
    }
}

fn attestation_for(source: DomainId, destination: DomainId, nonce: [u8; 32]) -> Attestation {
    Attestation {
        attestation: Bytes::from(vec![0xab; 65]),
        message: burn_message(source, destination, nonce),
    }
}

fn deposit_ref(orchestrator: &TestOrchestrator) -> String {
    orchestrator
        .steps()
        .iter()
        .find(|step| step.kind() == StepKind::Deposit)
        .and_then(StepState::transaction_reference)
        .expect("deposit has a transaction reference")
        .to_string()
}

#[tokio::test]
async fn test_evm_to_evm_transfer() {
    let harness = Harness::new();
    harness.provider.set_fee_tiers(vec![
        FeeTier {
            finality_threshold: 1000,
            minimum_fee: "1".to_string(),
        },
        FeeTier {
            finality_threshold: 2000,
            minimum_fee: "0".to_string(),
        },
    ]);
    let mut orchestrator = harness.orchestrator(true, false);

    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, "10.5".parse().unwrap())
        .unwrap();
    assert_eq!(
        orchestrator.sequence().unwrap(),
        [
            StepKind::Approve,
            StepKind::Deposit,
            StepKind::FetchAttestation,
            StepKind::Claim
        ]
    );

    // Approve
    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);
    assert!(orchestrator.steps()[0].transaction_reference().is_some());

    // Deposit, priced at the fast tier: floor(10_500_000 * 1000 / 10_000_000) + 1
    let quote = orchestrator
        .quote_fee(&SEPOLIA, &BASE_SEPOLIA, UsdcAmount::from_base_units(10_500_000))
        .await
        .unwrap();
    assert_eq!(quote.fee, 1_051);

    assert_eq!(orchestrator.run_step(1).await.unwrap(), StepStatus::Success);
    let sent = harness.evm.sent_transactions();
    let calldata = sent[1].request.input.input().unwrap();
    let max_fee = U256::from_be_slice(&calldata[4 + 5 * 32..4 + 6 * 32]);
    assert!(max_fee <= U256::from(quote.fee));
    assert_eq!(sent[1].chain, NamedChain::Sepolia);

    // FetchAttestation
    let tx_ref = deposit_ref(&orchestrator);
    let attestation = attestation_for(DomainId::Ethereum, DomainId::Base, [7u8; 32]);
    harness
        .provider
        .add_pending_then_ready(&tx_ref, 2, &attestation);

    assert_eq!(orchestrator.run_step(2).await.unwrap(), StepStatus::Success);
    let fetched = orchestrator.steps()[2].attestation().unwrap();
    assert!(!fetched.attestation.is_empty());
    assert!(!fetched.message.is_empty());
    assert_eq!(harness.provider.lookups()[0], (DomainId::Ethereum, tx_ref));
    assert_eq!(harness.clock.total_sleep_time(), Duration::from_secs(4));

    // Claim, after switching the wallet over to the destination
    assert!(harness.evm.switch_requests().is_empty());
    assert_eq!(orchestrator.run_step(3).await.unwrap(), StepStatus::Success);
    assert_eq!(harness.evm.switch_requests(), vec![NamedChain::BaseSepolia]);
    assert_eq!(harness.evm.active_chain(), Some(NamedChain::BaseSepolia));

    let sent = harness.evm.sent_transactions();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[2].chain, NamedChain::BaseSepolia);
    assert_eq!(
        orchestrator.steps()[3].transaction_reference(),
        Some(sent[2].tx_hash.to_string().as_str())
    );
    assert!(orchestrator.is_complete());
}

#[tokio::test]
async fn test_solana_to_evm_transfer() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, true);

    orchestrator
        .initialize(SOLANA_DEVNET, BASE_SEPOLIA, "5".parse().unwrap())
        .unwrap();
    assert_eq!(orchestrator.steps().len(), 3);
    assert_eq!(
        orchestrator.intent().unwrap().recipient,
        Some(Recipient::Evm(EVM_OWNER))
    );

    // Deposit
    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);
    let sent = harness.solana.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].extra_signers.len(), 1);

    let ix = &sent[0].instructions[0];
    assert_eq!(ix.program_id, TOKEN_MESSENGER_MINTER_PROGRAM_ID);

    let owner = harness.solana_pubkey();
    let mint = SolanaNetwork::Devnet.usdc_mint();
    let pdas = DepositForBurnPdas::derive(&owner, &mint, DomainId::Base);
    assert_eq!(pdas, DepositForBurnPdas::derive(&owner, &mint, DomainId::Base));
    assert_eq!(ix.accounts[3].pubkey, pdas.burn_token_account);
    assert_eq!(ix.accounts[7].pubkey, pdas.remote_token_messenger);

    // amount, destination domain, then the left-padded EVM recipient
    assert_eq!(&ix.data[8..16], &5_000_000u64.to_le_bytes());
    assert_eq!(&ix.data[16..20], &6u32.to_le_bytes());
    assert_eq!(&ix.data[20..52], EVM_OWNER.into_word().as_slice());
    // no fee tiers served: fallback fee, no finality requirement
    assert_eq!(&ix.data[84..92], &1_000u64.to_le_bytes());
    assert_eq!(&ix.data[92..96], &0u32.to_le_bytes());

    // FetchAttestation
    let signature = deposit_ref(&orchestrator);
    assert_eq!(signature, sent[0].signature.to_string());
    let nonce = [0x5au8; 32];
    harness.provider.add_ready_attestation(
        &signature,
        &attestation_for(DomainId::Solana, DomainId::Base, nonce),
    );
    assert_eq!(orchestrator.run_step(1).await.unwrap(), StepStatus::Success);
    assert_eq!(harness.provider.lookups()[0].0, DomainId::Solana);

    let message = &orchestrator.steps()[1].attestation().unwrap().message;
    let header = MessageHeader::decode(message).unwrap();
    assert_eq!(header.source_domain, DomainId::Solana);
    assert_eq!(header.source_domain.as_u32(), 5);
    assert_eq!(header.nonce.0, nonce);

    // Claim on the EVM side
    assert_eq!(orchestrator.run_step(2).await.unwrap(), StepStatus::Success);
    let evm_sent = harness.evm.sent_transactions();
    assert_eq!(evm_sent.len(), 1);
    assert_eq!(evm_sent[0].chain, NamedChain::BaseSepolia);
    assert!(orchestrator.is_complete());
}

#[tokio::test]
async fn test_evm_to_solana_without_solana_wallet() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);

    orchestrator
        .initialize(SEPOLIA, SOLANA_DEVNET, UsdcAmount::from_base_units(1_000_000))
        .unwrap();
    assert_eq!(orchestrator.intent().unwrap().recipient, None);

    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);
    assert_eq!(orchestrator.run_step(1).await.unwrap(), StepStatus::Error);

    let deposit = &orchestrator.steps()[1];
    insta::assert_snapshot!(
        deposit.error_message().unwrap(),
        @"No recipient wallet connected for solana-devnet"
    );
    assert_eq!(deposit.transaction_reference(), None);
    // only the approval went out
    assert_eq!(harness.evm.sent_transactions().len(), 1);
}

#[tokio::test]
async fn test_evm_to_solana_claims_with_solana_adapter() {
    let harness = Harness::new();
    harness.solana.set_account_data(
        cctp_bridge_orchestrator::adapters::solana::pda::token_messenger(),
        cctp_bridge_orchestrator::testing::token_messenger_account_data(&Pubkey::new_unique()),
    );
    let mut orchestrator = harness.orchestrator(true, true);

    orchestrator
        .initialize(BASE_SEPOLIA, SOLANA_DEVNET, UsdcAmount::from_base_units(3_000_000))
        .unwrap();
    orchestrator.run_step(0).await.unwrap();
    orchestrator.run_step(1).await.unwrap();

    // the burn names the recipient's USDC token account, not the wallet
    let recipient = Recipient::Solana(harness.solana_pubkey());
    let calldata = harness.evm.sent_transactions()[1]
        .request
        .input
        .input()
        .unwrap()
        .clone();
    assert_eq!(
        &calldata[4 + 2 * 32..4 + 3 * 32],
        recipient.mint_recipient(SolanaNetwork::Devnet).as_slice()
    );

    let tx_ref = deposit_ref(&orchestrator);
    harness.provider.add_ready_attestation(
        &tx_ref,
        &attestation_for(DomainId::Base, DomainId::Solana, [3u8; 32]),
    );
    orchestrator.run_step(2).await.unwrap();
    assert_eq!(orchestrator.run_step(3).await.unwrap(), StepStatus::Success);

    // one EVM approve, one EVM burn, one Solana claim
    assert_eq!(harness.evm.sent_transactions().len(), 2);
    let solana_sent = harness.solana.sent_transactions();
    assert_eq!(solana_sent.len(), 1);
    assert_eq!(
        orchestrator.steps()[3].transaction_reference(),
        Some(solana_sent[0].signature.to_string().as_str())
    );
    assert!(orchestrator
        .explorer_link(3)
        .unwrap()
        .ends_with("?cluster=devnet"));
}

#[rstest]
#[case::evm_source(SEPOLIA, BASE_SEPOLIA)]
#[case::solana_source(SOLANA_DEVNET, BASE_SEPOLIA)]
#[tokio::test]
async fn test_steps_are_gated_on_their_predecessor(
    #[case] source: ChainIdentifier,
    #[case] destination: ChainIdentifier,
) {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, true);
    orchestrator
        .initialize(source, destination, UsdcAmount::from_base_units(1_000_000))
        .unwrap();

    let len = orchestrator.steps().len();
    for index in 1..len {
        let before = orchestrator.steps().to_vec();
        let err = orchestrator.run_step(index).await.unwrap_err();
        assert!(matches!(err, CctpError::PreconditionNotMet { .. }));
        assert_eq!(orchestrator.steps(), before.as_slice());
    }
    assert!(harness.evm.sent_transactions().is_empty());
    assert!(harness.solana.sent_transactions().is_empty());

    // a failed predecessor gates just the same
    harness.evm.reject_next_transaction();
    harness.solana.reject_next_transaction();
    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Error);
    let err = orchestrator.run_step(1).await.unwrap_err();
    assert!(matches!(err, CctpError::PreconditionNotMet { .. }));
    assert_eq!(orchestrator.steps()[1].status(), StepStatus::Pending);
}

#[tokio::test]
async fn test_rerunning_a_successful_step_is_a_no_op() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();

    orchestrator.run_step(0).await.unwrap();
    let tx_ref = orchestrator.steps()[0]
        .transaction_reference()
        .map(str::to_string);

    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);
    assert_eq!(
        orchestrator.steps()[0].transaction_reference().map(str::to_string),
        tx_ref
    );
    assert_eq!(harness.evm.sent_transactions().len(), 1);
}

#[tokio::test]
async fn test_failed_step_can_be_retried() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();

    harness.evm.reject_next_transaction();
    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Error);
    insta::assert_snapshot!(
        orchestrator.steps()[0].error_message().unwrap(),
        @"Wallet rejected the request: User rejected the request"
    );

    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);
    assert_eq!(orchestrator.steps()[0].error_message(), None);

    // a reverted burn keeps its hash for the explorer
    harness.evm.revert_next_transaction();
    assert_eq!(orchestrator.run_step(1).await.unwrap(), StepStatus::Error);
    let reverted = harness.evm.sent_transactions()[1].tx_hash.to_string();
    assert_eq!(
        orchestrator.steps()[1].transaction_reference(),
        Some(reverted.as_str())
    );
    assert!(orchestrator.explorer_link(1).unwrap().ends_with(&reverted));

    assert_eq!(orchestrator.run_step(1).await.unwrap(), StepStatus::Success);
    assert_ne!(
        orchestrator.steps()[1].transaction_reference(),
        Some(reverted.as_str())
    );
}

#[tokio::test]
async fn test_submission_failure_leaves_no_transaction_reference() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();

    harness.evm.fail_next_submission("nonce too low");
    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Error);
    insta::assert_snapshot!(
        orchestrator.steps()[0].error_message().unwrap(),
        @"Transaction submission failed: nonce too low"
    );
    assert_eq!(orchestrator.steps()[0].transaction_reference(), None);
    assert_eq!(orchestrator.explorer_link(0), None);
    assert!(harness.evm.sent_transactions().is_empty());

    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);
    assert_eq!(harness.evm.sent_transactions().len(), 1);
}

#[tokio::test]
async fn test_receipt_lookup_failure_keeps_transaction_reference() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();
    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Success);

    harness.evm.fail_next_receipt("connection reset by peer");
    assert_eq!(orchestrator.run_step(1).await.unwrap(), StepStatus::Error);

    let burn = harness.evm.sent_transactions()[1].tx_hash.to_string();
    let deposit = &orchestrator.steps()[1];
    assert_eq!(deposit.transaction_reference(), Some(burn.as_str()));
    assert_eq!(
        deposit.error_message(),
        Some(
            format!("Transaction {burn} failed: Provider error: connection reset by peer").as_str()
        )
    );
    assert_eq!(orchestrator.steps()[2].status(), StepStatus::Pending);
}

#[tokio::test]
async fn test_source_balance_reads_solana_token_account() {
    let harness = Harness::new();
    let usdc_account =
        associated_token_address(&harness.solana_pubkey(), &SolanaNetwork::Devnet.usdc_mint());
    harness.solana.set_token_balance(usdc_account, 7_250_000);
    let orchestrator = harness.orchestrator(false, true);

    assert_eq!(
        orchestrator.source_balance(&SOLANA_DEVNET).await,
        UsdcAmount::from_base_units(7_250_000)
    );
    assert_eq!(
        orchestrator.source_balance(&SEPOLIA).await,
        UsdcAmount::ZERO
    );
}

#[tokio::test]
async fn test_attestation_timeout_is_a_step_error() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();
    orchestrator.run_step(0).await.unwrap();
    orchestrator.run_step(1).await.unwrap();

    let tx_ref = deposit_ref(&orchestrator);
    harness.provider.add_always_pending(&tx_ref);

    assert_eq!(orchestrator.run_step(2).await.unwrap(), StepStatus::Error);
    insta::assert_snapshot!(
        orchestrator.steps()[2].error_message().unwrap(),
        @"Timeout waiting for attestation"
    );
    assert_eq!(harness.provider.get_call_count(&tx_ref), 60);
    assert_eq!(harness.clock.total_sleep_time(), Duration::from_secs(120));

    // the claim stays gated until the attestation arrives
    assert!(orchestrator.run_step(3).await.is_err());

    harness.provider.add_ready_attestation(
        &tx_ref,
        &attestation_for(DomainId::Ethereum, DomainId::Base, [1u8; 32]),
    );
    assert_eq!(orchestrator.run_step(2).await.unwrap(), StepStatus::Success);
    assert_eq!(orchestrator.run_step(3).await.unwrap(), StepStatus::Success);
}

#[tokio::test]
async fn test_solana_execution_failure_is_a_step_error() {
    let harness = Harness::new();
    harness
        .solana
        .fail_transactions_with("InstructionError(0, Custom(1))");
    let mut orchestrator = harness.orchestrator(true, true);
    orchestrator
        .initialize(SOLANA_DEVNET, SEPOLIA, UsdcAmount::from_base_units(2_000_000))
        .unwrap();

    assert_eq!(orchestrator.run_step(0).await.unwrap(), StepStatus::Error);
    let signature = harness.solana.sent_transactions()[0].signature.to_string();
    let deposit = &orchestrator.steps()[0];
    assert_eq!(deposit.transaction_reference(), Some(signature.as_str()));
    assert_eq!(
        deposit.error_message(),
        Some(format!("Transaction {signature} failed: InstructionError(0, Custom(1))").as_str())
    );
}

#[tokio::test]
async fn test_reset_then_new_transfer() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, true);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();
    orchestrator.run_step(0).await.unwrap();
    harness.evm.reject_next_transaction();
    orchestrator.run_step(1).await.unwrap();
    assert_eq!(orchestrator.steps()[1].status(), StepStatus::Error);

    orchestrator.reset();
    assert!(orchestrator.steps().is_empty());
    assert!(orchestrator.intent().is_none());
    assert!(matches!(
        orchestrator.run_step(0).await.unwrap_err(),
        CctpError::NotInitialized
    ));

    orchestrator
        .initialize(SOLANA_DEVNET, SEPOLIA, UsdcAmount::from_base_units(4_000_000))
        .unwrap();
    assert_eq!(orchestrator.steps().len(), 3);
    for step in orchestrator.steps() {
        assert_eq!(step.status(), StepStatus::Pending);
        assert_eq!(step.transaction_reference(), None);
        assert_eq!(step.error_message(), None);
    }
}

#[tokio::test]
async fn test_run_to_completion_stops_at_first_failure() {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, false);
    orchestrator
        .initialize(SEPOLIA, BASE_SEPOLIA, UsdcAmount::from_base_units(1_000_000))
        .unwrap();

    // the deposit's hash is the second one the fake wallet hands out
    let deposit_hash = alloy_primitives::TxHash::left_padding_from(&2u64.to_be_bytes());
    harness
        .provider
        .add_ready_attestation(
            &deposit_hash.to_string(),
            &attestation_for(DomainId::Ethereum, DomainId::Base, [2u8; 32]),
        );
    harness.evm.refuse_network_switch();

    assert_eq!(
        orchestrator.run_to_completion().await.unwrap(),
        StepStatus::Error
    );
    let statuses: Vec<_> = orchestrator.steps().iter().map(StepState::status).collect();
    assert_eq!(
        statuses,
        [
            StepStatus::Success,
            StepStatus::Success,
            StepStatus::Success,
            StepStatus::Error
        ]
    );
    insta::assert_snapshot!(
        orchestrator.steps()[3].error_message().unwrap(),
        @"Failed to switch network to base-sepolia: User rejected the request"
    );
}

#[rstest]
#[case::same_chain(SEPOLIA, SEPOLIA)]
#[case::solana_to_solana(SOLANA_DEVNET, SOLANA_DEVNET)]
fn test_unsupported_routes(#[case] source: ChainIdentifier, #[case] destination: ChainIdentifier) {
    let harness = Harness::new();
    let mut orchestrator = harness.orchestrator(true, true);

    let err = orchestrator
        .initialize(source, destination, UsdcAmount::from_base_units(1_000_000))
        .unwrap_err();
    assert!(matches!(err, CctpError::UnsupportedRoute { .. }));
    assert!(orchestrator.steps().is_empty());
}

impl Harness {
    fn solana_pubkey(&self) -> Pubkey {
        use cctp_bridge_orchestrator::traits::SolanaConnection;
        self.solana.pubkey()
    }
}
