// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test utilities and fake implementations of the bridge traits
//!
//! These fakes stand in for Circle's Iris API, the clock, an EVM wallet and a
//! Solana connection, so a whole transfer can be driven without a network.
//! Each fake is cheaply cloneable and shares its state between clones: keep a
//! clone in the test to script responses and inspect what was submitted.
//!
//! Scenarios covered include attestations that become ready after N polls,
//! transport failures mid-poll, rejected signature prompts, reverted receipts,
//! refused network switches and Solana transactions that never confirm.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, FixedBytes, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::chain::Environment;
use crate::error::{CctpError, Result};
use crate::protocol::{
    Attestation, AttestationStatus, DomainId, FeeTier, MessageHeader, MessagesResponse, V2Message,
};
use crate::traits::{
    AttestationProvider, Clock, Commitment, EvmWallet, SignatureState, SolanaConnection,
};

// ============================================================================
// Fixtures
// ============================================================================

/// A burn message: a v2 header followed by a dummy body.
pub fn burn_message(source: DomainId, destination: DomainId, nonce: [u8; 32]) -> Bytes {
    let header = MessageHeader::builder()
        .source_domain(source)
        .destination_domain(destination)
        .nonce(FixedBytes::from(nonce))
        .build();

    let mut message = header.encode().to_vec();
    message.extend_from_slice(&[0x42; 228]);
    Bytes::from(message)
}

/// Raw token messenger account data with `fee_recipient` at its on-chain offset.
pub fn token_messenger_account_data(fee_recipient: &Pubkey) -> Vec<u8> {
    let mut data = vec![0u8; 8 + 32 + 32 + 32 + 4 + 1];
    data.extend_from_slice(fee_recipient.as_ref());
    data.extend_from_slice(&[0u8; 64]);
    data
}

/// An Iris response carrying `attestation`.
pub fn ready_response(attestation: &Attestation) -> MessagesResponse {
    MessagesResponse {
        messages: vec![V2Message {
            status: Some(AttestationStatus::Complete),
            message: Some(attestation.message.clone()),
            attestation: Some(attestation.attestation.clone()),
        }],
        error: None,
    }
}

/// An Iris response for a burn that is seen but not yet attested.
pub fn pending_response() -> MessagesResponse {
    MessagesResponse {
        messages: vec![V2Message {
            status: Some(AttestationStatus::PendingConfirmations),
            message: None,
            attestation: None,
        }],
        error: None,
    }
}

/// The response Iris gives before it has indexed the burn transaction.
pub fn not_found_response() -> MessagesResponse {
    MessagesResponse {
        messages: Vec::new(),
        error: Some("Message hash not found".to_string()),
    }
}

// ============================================================================
// Fake Attestation Provider
// ============================================================================

type ScriptedResponse = std::result::Result<MessagesResponse, String>;

/// A fake Iris API with scripted fee tiers and message lookups.
///
/// Message lookups for a transaction walk through the configured sequence
/// and then keep returning its last entry. Unknown transactions get the
/// "not found" error body.
#[derive(Clone, Debug, Default)]
pub struct FakeAttestationProvider {
    fee_tiers: Arc<Mutex<Option<Vec<FeeTier>>>>,
    fee_calls: Arc<Mutex<usize>>,
    responses: Arc<Mutex<HashMap<String, Vec<ScriptedResponse>>>>,
    response_index: Arc<Mutex<HashMap<String, usize>>>,
    lookups: Arc<Mutex<Vec<(DomainId, String)>>>,
    environment: Option<Environment>,
}

impl FakeAttestationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that reports serving `environment`.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment: Some(environment),
            ..Self::default()
        }
    }

    /// Serve `tiers` from the fee endpoint. Without this the endpoint fails.
    pub fn set_fee_tiers(&self, tiers: Vec<FeeTier>) {
        *self.fee_tiers.lock().unwrap() = Some(tiers);
    }

    pub fn add_response_sequence(&self, tx_ref: &str, responses: Vec<ScriptedResponse>) {
        self.responses
            .lock()
            .unwrap()
            .insert(tx_ref.to_string(), responses);
        self.response_index
            .lock()
            .unwrap()
            .insert(tx_ref.to_string(), 0);
    }

    pub fn add_ready_attestation(&self, tx_ref: &str, attestation: &Attestation) {
        self.add_response_sequence(tx_ref, vec![Ok(ready_response(attestation))]);
    }

    /// `pending_count` pending responses, then the attestation.
    pub fn add_pending_then_ready(
        &self,
        tx_ref: &str,
        pending_count: usize,
        attestation: &Attestation,
    ) {
        let mut responses = vec![Ok(pending_response()); pending_count];
        responses.push(Ok(ready_response(attestation)));
        self.add_response_sequence(tx_ref, responses);
    }

    /// `failure_count` transport errors, then the attestation.
    pub fn add_failures_then_ready(
        &self,
        tx_ref: &str,
        failure_count: usize,
        attestation: &Attestation,
    ) {
        let mut responses: Vec<ScriptedResponse> =
            vec![Err("connection reset by peer".to_string()); failure_count];
        responses.push(Ok(ready_response(attestation)));
        self.add_response_sequence(tx_ref, responses);
    }

    pub fn add_always_pending(&self, tx_ref: &str) {
        self.add_response_sequence(tx_ref, vec![Ok(pending_response())]);
    }

    pub fn fee_call_count(&self) -> usize {
        *self.fee_calls.lock().unwrap()
    }

    /// Number of message lookups made for `tx_ref`.
    pub fn get_call_count(&self, tx_ref: &str) -> usize {
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, looked_up)| looked_up == tx_ref)
            .count()
    }

    /// Every `(source domain, tx_ref)` looked up, in order.
    pub fn lookups(&self) -> Vec<(DomainId, String)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttestationProvider for FakeAttestationProvider {
    async fn get_fee_tiers(
        &self,
        _source: DomainId,
        _destination: DomainId,
    ) -> Result<Vec<FeeTier>> {
        *self.fee_calls.lock().unwrap() += 1;
        self.fee_tiers
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CctpError::Provider("Simulated fee endpoint failure".to_string()))
    }

    async fn get_messages(&self, source: DomainId, tx_ref: &str) -> Result<MessagesResponse> {
        self.lookups
            .lock()
            .unwrap()
            .push((source, tx_ref.to_string()));

        let responses = self.responses.lock().unwrap();
        let mut indices = self.response_index.lock().unwrap();

        let Some(sequence) = responses.get(tx_ref) else {
            return Ok(not_found_response());
        };

        let index = indices.get(tx_ref).copied().unwrap_or(0);
        indices.insert(tx_ref.to_string(), index + 1);

        match sequence.get(index).or_else(|| sequence.last()) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(reason)) => Err(CctpError::Provider(reason.clone())),
            None => Ok(not_found_response()),
        }
    }

    fn environment(&self) -> Option<Environment> {
        self.environment
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock whose `sleep` returns immediately and advances `now`.
///
/// Timeouts measured with `now` therefore elapse after the right number of
/// polls without waiting.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}

// ============================================================================
// Fake EVM Wallet
// ============================================================================

/// A transaction the fake wallet signed.
#[derive(Clone, Debug)]
pub struct SentEvmTransaction {
    /// Active network at signing time
    pub chain: NamedChain,
    pub tx_hash: TxHash,
    pub request: TransactionRequest,
}

#[derive(Debug, Default)]
struct EvmWalletState {
    active_chain: Option<NamedChain>,
    refuse_switch: bool,
    ignore_switch: bool,
    switches: Vec<NamedChain>,
    reject_next: usize,
    fail_next_submission: Option<String>,
    revert_next: usize,
    reverted: HashSet<TxHash>,
    receipt_failure: Option<String>,
    sent: Vec<SentEvmTransaction>,
    balances: HashMap<(NamedChain, Address), U256>,
}

/// A fake browser-style EVM wallet.
///
/// Transaction hashes are sequential. Receipts succeed unless the
/// transaction was scripted to revert.
#[derive(Clone, Debug)]
pub struct FakeEvmWallet {
    address: Address,
    state: Arc<Mutex<EvmWalletState>>,
}

impl FakeEvmWallet {
    /// A wallet for `address` whose active network is `chain`.
    pub fn new(address: Address, chain: NamedChain) -> Self {
        Self {
            address,
            state: Arc::new(Mutex::new(EvmWalletState {
                active_chain: Some(chain),
                ..Default::default()
            })),
        }
    }

    /// Network switch prompts fail with `NetworkSwitchFailed`.
    pub fn refuse_network_switch(&self) {
        self.state.lock().unwrap().refuse_switch = true;
    }

    /// Network switch prompts succeed without changing the active network.
    pub fn ignore_network_switch(&self) {
        self.state.lock().unwrap().ignore_switch = true;
    }

    /// The next signature prompt is declined by the user.
    pub fn reject_next_transaction(&self) {
        self.state.lock().unwrap().reject_next += 1;
    }

    /// The next broadcast fails before a hash is returned.
    pub fn fail_next_submission(&self, reason: &str) {
        self.state.lock().unwrap().fail_next_submission = Some(reason.to_string());
    }

    /// The next broadcast transaction is mined with a failed receipt.
    pub fn revert_next_transaction(&self) {
        self.state.lock().unwrap().revert_next += 1;
    }

    /// The next receipt lookup errors instead of reporting a status.
    pub fn fail_next_receipt(&self, reason: &str) {
        self.state.lock().unwrap().receipt_failure = Some(reason.to_string());
    }

    pub fn set_balance(&self, chain: NamedChain, token: Address, balance: U256) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((chain, token), balance);
    }

    pub fn active_chain(&self) -> Option<NamedChain> {
        self.state.lock().unwrap().active_chain
    }

    pub fn sent_transactions(&self) -> Vec<SentEvmTransaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn switch_requests(&self) -> Vec<NamedChain> {
        self.state.lock().unwrap().switches.clone()
    }
}

#[async_trait]
impl EvmWallet for FakeEvmWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn active_chain_id(&self) -> Result<u64> {
        self.state
            .lock()
            .unwrap()
            .active_chain
            .map(|chain| chain as u64)
            .ok_or_else(|| CctpError::Provider("wallet is not connected".to_string()))
    }

    async fn switch_chain(&self, chain: NamedChain) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.switches.push(chain);

        if state.refuse_switch {
            return Err(CctpError::NetworkSwitchFailed {
                chain: chain.to_string(),
                reason: "User rejected the request".to_string(),
            });
        }
        if !state.ignore_switch {
            state.active_chain = Some(chain);
        }
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();

        if state.reject_next > 0 {
            state.reject_next -= 1;
            return Err(CctpError::WalletRejected {
                reason: "User rejected the request".to_string(),
            });
        }
        if let Some(reason) = state.fail_next_submission.take() {
            return Err(CctpError::SubmissionFailed { reason });
        }

        let chain = state
            .active_chain
            .ok_or_else(|| CctpError::Provider("wallet is not connected".to_string()))?;
        let nonce = state.sent.len() as u64 + 1;
        let tx_hash = TxHash::left_padding_from(&nonce.to_be_bytes());

        if state.revert_next > 0 {
            state.revert_next -= 1;
            state.reverted.insert(tx_hash);
        }
        state.sent.push(SentEvmTransaction {
            chain,
            tx_hash,
            request: tx,
        });

        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, _chain: NamedChain, tx_hash: TxHash) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.receipt_failure.take() {
            return Err(CctpError::Provider(reason));
        }
        Ok(!state.reverted.contains(&tx_hash))
    }

    async fn token_balance(&self, chain: NamedChain, token: Address) -> Result<U256> {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&(chain, token))
            .copied()
            .ok_or_else(|| CctpError::Provider("Simulated balance lookup failure".to_string()))
    }
}

// ============================================================================
// Fake Solana Connection
// ============================================================================

/// A transaction the fake connection signed and "sent".
#[derive(Clone, Debug)]
pub struct SentSolanaTransaction {
    pub signature: Signature,
    pub instructions: Vec<Instruction>,
    /// Public keys of the co-signers besides the wallet
    pub extra_signers: Vec<Pubkey>,
}

type ScriptedStatus = std::result::Result<Option<SignatureState>, String>;

#[derive(Debug)]
struct SolanaState {
    reject_next: usize,
    sent: Vec<SentSolanaTransaction>,
    status_script: VecDeque<ScriptedStatus>,
    final_status: Option<SignatureState>,
    status_calls: usize,
    accounts: HashMap<Pubkey, Vec<u8>>,
    token_balances: HashMap<Pubkey, u64>,
}

/// A fake Solana RPC connection with a connected wallet.
///
/// Signature status lookups walk the scripted statuses and then report
/// `final_status`, which defaults to confirmed without error.
#[derive(Clone, Debug)]
pub struct FakeSolanaConnection {
    pubkey: Pubkey,
    state: Arc<Mutex<SolanaState>>,
}

impl Default for FakeSolanaConnection {
    fn default() -> Self {
        Self::new(Pubkey::new_unique())
    }
}

impl FakeSolanaConnection {
    pub fn new(pubkey: Pubkey) -> Self {
        Self {
            pubkey,
            state: Arc::new(Mutex::new(SolanaState {
                reject_next: 0,
                sent: Vec::new(),
                status_script: VecDeque::new(),
                final_status: Some(SignatureState {
                    commitment: Commitment::Confirmed,
                    err: None,
                }),
                status_calls: 0,
                accounts: HashMap::new(),
                token_balances: HashMap::new(),
            })),
        }
    }

    pub fn reject_next_transaction(&self) {
        self.state.lock().unwrap().reject_next += 1;
    }

    /// Statuses returned, in order, before falling back to the final status.
    pub fn script_statuses(&self, statuses: Vec<ScriptedStatus>) {
        self.state.lock().unwrap().status_script = statuses.into();
    }

    pub fn set_final_status(&self, status: Option<SignatureState>) {
        self.state.lock().unwrap().final_status = status;
    }

    /// Transactions land but execution fails with `err`.
    pub fn fail_transactions_with(&self, err: &str) {
        self.set_final_status(Some(SignatureState {
            commitment: Commitment::Confirmed,
            err: Some(err.to_string()),
        }));
    }

    /// The cluster never reports the signature.
    pub fn never_confirm(&self) {
        self.set_final_status(None);
    }

    pub fn set_account_data(&self, address: Pubkey, data: Vec<u8>) {
        self.state.lock().unwrap().accounts.insert(address, data);
    }

    pub fn set_token_balance(&self, token_account: Pubkey, amount: u64) {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .insert(token_account, amount);
    }

    pub fn sent_transactions(&self) -> Vec<SentSolanaTransaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn status_call_count(&self) -> usize {
        self.state.lock().unwrap().status_calls
    }
}

#[async_trait]
impl SolanaConnection for FakeSolanaConnection {
    fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    async fn send_transaction(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature> {
        let mut state = self.state.lock().unwrap();

        if state.reject_next > 0 {
            state.reject_next -= 1;
            return Err(CctpError::WalletRejected {
                reason: "User rejected the request.".to_string(),
            });
        }

        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&(state.sent.len() as u64 + 1).to_le_bytes());
        let signature = Signature::from(bytes);

        state.sent.push(SentSolanaTransaction {
            signature,
            instructions: instructions.to_vec(),
            extra_signers: extra_signers.iter().map(|k| k.pubkey()).collect(),
        });

        Ok(signature)
    }

    async fn get_signature_status(&self, _signature: &Signature) -> Result<Option<SignatureState>> {
        let mut state = self.state.lock().unwrap();
        state.status_calls += 1;

        match state.status_script.pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(reason)) => Err(CctpError::Provider(reason)),
            None => Ok(state.final_status.clone()),
        }
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(address)
            .cloned()
            .ok_or_else(|| CctpError::Provider(format!("AccountNotFound: pubkey={address}")))
    }

    async fn token_account_balance(&self, token_account: &Pubkey) -> Result<u64> {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .get(token_account)
            .copied()
            .ok_or_else(|| {
                CctpError::Provider(format!("could not find token account {token_account}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attestation() -> Attestation {
        Attestation {
            attestation: Bytes::from(vec![0xaa; 65]),
            message: burn_message(DomainId::Base, DomainId::Solana, [1u8; 32]),
        }
    }

    #[tokio::test]
    async fn test_fake_clock_tracks_sleep_calls() {
        let clock = FakeClock::new();
        let start = clock.now();

        clock.sleep(Duration::from_secs(60)).await;
        clock.sleep(Duration::from_secs(120)).await;

        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(180));
        assert_eq!(clock.now() - start, Duration::from_secs(180));
    }

    #[tokio::test]
    async fn test_fake_attestation_provider_sequence() {
        let provider = FakeAttestationProvider::new();
        provider.add_pending_then_ready("0xabc", 1, &attestation());

        let first = provider.get_messages(DomainId::Base, "0xabc").await.unwrap();
        assert!(first.ready_attestation().is_none());

        let second = provider.get_messages(DomainId::Base, "0xabc").await.unwrap();
        assert_eq!(second.ready_attestation(), Some(attestation()));

        // sticks on the last entry
        let third = provider.get_messages(DomainId::Base, "0xabc").await.unwrap();
        assert!(third.ready_attestation().is_some());
        assert_eq!(provider.get_call_count("0xabc"), 3);
    }

    #[tokio::test]
    async fn test_fake_attestation_provider_unknown_transaction() {
        let provider = FakeAttestationProvider::new();
        let response = provider.get_messages(DomainId::Base, "0xdef").await.unwrap();
        assert!(response.error.is_some());
        assert!(provider.get_fee_tiers(DomainId::Base, DomainId::Solana).await.is_err());
        assert_eq!(provider.fee_call_count(), 1);
    }

    #[tokio::test]
    async fn test_fake_evm_wallet_scripting() {
        let wallet = FakeEvmWallet::new(Address::repeat_byte(0x11), NamedChain::Sepolia);
        wallet.reject_next_transaction();
        wallet.revert_next_transaction();

        let rejected = wallet.send_transaction(TransactionRequest::default()).await;
        assert!(matches!(rejected, Err(CctpError::WalletRejected { .. })));

        let tx_hash = wallet
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap();
        assert!(!wallet.wait_for_receipt(NamedChain::Sepolia, tx_hash).await.unwrap());
        assert_eq!(wallet.sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_solana_connection_statuses() {
        let connection = FakeSolanaConnection::default();
        connection.script_statuses(vec![Ok(None), Err("timeout".to_string())]);

        let signature = connection.send_transaction(&[], &[]).await.unwrap();
        assert_eq!(connection.get_signature_status(&signature).await.unwrap(), None);
        assert!(connection.get_signature_status(&signature).await.is_err());
        assert_eq!(
            connection
                .get_signature_status(&signature)
                .await
                .unwrap()
                .map(|s| s.commitment),
            Some(Commitment::Confirmed)
        );
        assert_eq!(connection.status_call_count(), 3);
    }
}
