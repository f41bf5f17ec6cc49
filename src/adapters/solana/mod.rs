// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Solana side of a transfer: burn and claim through the CCTP v2 programs.
//!
//! Solana has no approval step. A burn is a single `deposit_for_burn`
//! instruction co-signed by a throwaway keypair that receives the outgoing
//! message. A claim is a `receive_message` instruction naming every account
//! the token messenger touches while minting.

pub mod instructions;
pub mod pda;

use alloy_primitives::FixedBytes;
use bon::Builder;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::{debug, info, trace, Instrument, Span};

use self::instructions::{DepositForBurnParams, ReceiveMessageParams};
use self::pda::{associated_token_address, DepositForBurnPdas, ReceiveMessagePdas};
use crate::bridge::ConfirmationConfig;
use crate::chain::{evm_chain_for_domain, CctpChain, SolanaNetwork};
use crate::error::{CctpError, Result};
use crate::protocol::{DomainId, MessageHeader, UsdcAmount};
use crate::spans;
use crate::traits::{Clock, Commitment, SolanaConnection};

/// Offset of `fee_recipient` in the token messenger account: the Anchor
/// discriminator, three pubkeys, a u32 and a u8 precede it.
const FEE_RECIPIENT_OFFSET: usize = 8 + 32 + 32 + 32 + 4 + 1;

/// Runs CCTP operations on one Solana cluster through a [`SolanaConnection`].
///
/// # Example
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::adapters::SolanaAdapter;
/// use cctp_bridge_orchestrator::chain::SolanaNetwork;
/// use cctp_bridge_orchestrator::providers::{RpcSolanaConnection, TokioClock};
/// use solana_sdk::signature::Keypair;
///
/// let connection = RpcSolanaConnection::for_network(SolanaNetwork::Devnet, Keypair::new());
/// let clock = TokioClock::new();
/// let adapter = SolanaAdapter::builder()
///     .connection(&connection)
///     .clock(&clock)
///     .network(SolanaNetwork::Devnet)
///     .build();
/// ```
#[derive(Builder)]
pub struct SolanaAdapter<'a, S, C> {
    connection: &'a S,
    clock: &'a C,
    network: SolanaNetwork,
    #[builder(default)]
    confirmation: ConfirmationConfig,
}

impl<S: SolanaConnection, C: Clock> SolanaAdapter<'_, S, C> {
    pub fn network(&self) -> SolanaNetwork {
        self.network
    }

    /// The connected wallet's USDC token account.
    pub fn usdc_account(&self, owner: &Pubkey) -> Pubkey {
        associated_token_address(owner, &self.network.usdc_mint())
    }

    pub async fn usdc_balance(&self) -> Result<u64> {
        let account = self.usdc_account(&self.connection.pubkey());
        self.connection.token_account_balance(&account).await
    }

    /// Burns `amount` USDC from the wallet's token account.
    ///
    /// Returns once the signature is confirmed.
    ///
    /// # Errors
    ///
    /// - `WalletRejected` / `SubmissionFailed` before broadcast
    /// - `TransactionFailed` if the cluster reports an execution error
    /// - `ConfirmationTimeout` if no confirmation arrives in time
    pub async fn deposit_for_burn(
        &self,
        amount: UsdcAmount,
        destination_domain: DomainId,
        mint_recipient: FixedBytes<32>,
        max_fee: u64,
        min_finality_threshold: u32,
    ) -> Result<Signature> {
        let span = spans::solana_transaction("deposit_for_burn", self.network);
        async {
            let owner = self.connection.pubkey();
            let mint = self.network.usdc_mint();
            let pdas = DepositForBurnPdas::derive(&owner, &mint, destination_domain);
            let message_sent_event_data = Keypair::new();

            debug!(
                owner = %owner,
                burn_token_account = %pdas.burn_token_account,
                remote_token_messenger = %pdas.remote_token_messenger,
                message_sent_event_data = %message_sent_event_data.pubkey(),
                event = "deposit_for_burn_accounts_derived"
            );

            let params = DepositForBurnParams {
                amount: amount.base_units(),
                destination_domain: destination_domain.as_u32(),
                mint_recipient: mint_recipient.0,
                destination_caller: [0u8; 32],
                max_fee,
                min_finality_threshold,
            };
            let instruction = instructions::deposit_for_burn(
                &owner,
                &mint,
                &message_sent_event_data.pubkey(),
                &pdas,
                &params,
            )?;

            let signature = self
                .connection
                .send_transaction(&[instruction], &[&message_sent_event_data])
                .await?;
            self.confirm(&signature).await?;
            Ok(signature)
        }
        .instrument(span)
        .await
    }

    /// Mints to `recipient_wallet`'s USDC account with an attested message.
    ///
    /// The source domain and nonce are read from the message header; the
    /// burn token of the source chain keys the token pair.
    pub async fn claim(
        &self,
        message: &[u8],
        attestation: &[u8],
        recipient_wallet: &Pubkey,
    ) -> Result<Signature> {
        let span = spans::solana_transaction("receive_message", self.network);
        async {
            let header = MessageHeader::decode(message)?;
            let source_usdc = self.source_usdc(header.source_domain)?;
            let mint = self.network.usdc_mint();
            let pdas = ReceiveMessagePdas::derive(
                &mint,
                header.source_domain,
                &source_usdc,
                &header.nonce.0,
            );

            let fee_recipient = self.fee_recipient(&pdas.token_messenger).await?;
            let fee_recipient_token_account = associated_token_address(&fee_recipient, &mint);
            let recipient_token_account = associated_token_address(recipient_wallet, &mint);

            debug!(
                source_domain = header.source_domain.as_u32(),
                nonce = %header.nonce,
                used_nonce = %pdas.used_nonce,
                recipient_token_account = %recipient_token_account,
                event = "receive_message_accounts_derived"
            );

            let params = ReceiveMessageParams {
                message: message.to_vec(),
                attestation: attestation.to_vec(),
            };
            let instruction = instructions::receive_message(
                &self.connection.pubkey(),
                &pdas,
                &fee_recipient_token_account,
                &recipient_token_account,
                &params,
            )?;

            let signature = self.connection.send_transaction(&[instruction], &[]).await?;
            self.confirm(&signature).await?;
            Ok(signature)
        }
        .instrument(span)
        .await
    }

    /// Polls the signature until it is confirmed or finalized.
    ///
    /// Lookup failures are retried; only the timeout ends the loop early.
    pub async fn confirm(&self, signature: &Signature) -> Result<()> {
        let tx_ref = signature.to_string();
        Span::current().record("signature", tx_ref.as_str());

        let span = spans::confirm_signature(&tx_ref, self.confirmation.timeout.as_millis() as u64);
        async {
            let started = self.clock.now();

            loop {
                match self.connection.get_signature_status(signature).await {
                    Ok(Some(state))
                        if matches!(
                            state.commitment,
                            Commitment::Confirmed | Commitment::Finalized
                        ) =>
                    {
                        if let Some(reason) = state.err {
                            spans::record_error_with_context(
                                "TransactionFailed",
                                &reason,
                                Some(&tx_ref),
                            );
                            return Err(CctpError::TransactionFailed { tx_ref, reason });
                        }
                        info!(signature = %tx_ref, commitment = ?state.commitment, event = "solana_transaction_confirmed");
                        return Ok(());
                    }
                    Ok(state) => trace!(state = ?state, "Signature not confirmed yet"),
                    Err(e) => debug!(error = %e, "Signature status lookup failed, retrying"),
                }

                if self.clock.now().duration_since(started) >= self.confirmation.timeout {
                    return Err(CctpError::ConfirmationTimeout { tx_ref });
                }
                self.clock.sleep(self.confirmation.poll_interval).await;
            }
        }
        .instrument(span)
        .await
    }

    /// USDC of the message's source chain as a 32-byte token id.
    fn source_usdc(&self, source_domain: DomainId) -> Result<[u8; 32]> {
        if source_domain.is_solana() {
            return Err(CctpError::UnsupportedRoute {
                source_chain: source_domain.to_string(),
                destination_chain: source_domain.to_string(),
            });
        }

        let chain = evm_chain_for_domain(source_domain, self.network.environment())?;
        let mut token = [0u8; 32];
        token[12..].copy_from_slice(chain.usdc_address()?.as_slice());
        Ok(token)
    }

    async fn fee_recipient(&self, token_messenger: &Pubkey) -> Result<Pubkey> {
        let data = self.connection.get_account_data(token_messenger).await?;
        let bytes: [u8; 32] = data
            .get(FEE_RECIPIENT_OFFSET..FEE_RECIPIENT_OFFSET + 32)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| {
                CctpError::Provider(format!(
                    "token messenger account {token_messenger} is too short ({} bytes)",
                    data.len()
                ))
            })?;
        Ok(Pubkey::new_from_array(bytes))
    }
}
