// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Solana JSON-RPC connection backed by `solana-client`.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use tracing::{debug, info, instrument};

use crate::chain::SolanaNetwork;
use crate::error::{CctpError, Result};
use crate::traits::{Commitment, SignatureState, SolanaConnection};

/// A Solana RPC client paired with the keypair that pays for and signs
/// every transaction.
///
/// # Examples
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::providers::RpcSolanaConnection;
/// use cctp_bridge_orchestrator::chain::SolanaNetwork;
/// use solana_sdk::signature::Keypair;
///
/// let connection = RpcSolanaConnection::for_network(SolanaNetwork::Devnet, Keypair::new());
/// ```
pub struct RpcSolanaConnection {
    rpc: RpcClient,
    payer: Keypair,
}

impl RpcSolanaConnection {
    /// Connects to `url` at `confirmed` commitment.
    pub fn new(url: impl Into<String>, payer: Keypair) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(url.into(), CommitmentConfig::confirmed()),
            payer,
        }
    }

    /// Connects to the public RPC endpoint of `network`.
    pub fn for_network(network: SolanaNetwork, payer: Keypair) -> Self {
        Self::new(network.default_rpc_url(), payer)
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }
}

#[async_trait]
impl SolanaConnection for RpcSolanaConnection {
    fn pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    #[instrument(skip_all, fields(instructions = instructions.len(), extra_signers = extra_signers.len()))]
    async fn send_transaction(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature> {
        let recent_blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| CctpError::SubmissionFailed {
                reason: format!("failed to fetch recent blockhash: {e}"),
            })?;

        let mut signers: Vec<&Keypair> = Vec::with_capacity(extra_signers.len() + 1);
        signers.push(&self.payer);
        signers.extend_from_slice(extra_signers);

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &signers,
            recent_blockhash,
        );

        let signature = self
            .rpc
            .send_transaction(&tx)
            .await
            .map_err(|e| CctpError::SubmissionFailed {
                reason: e.to_string(),
            })?;

        info!(signature = %signature, event = "solana_transaction_sent");
        Ok(signature)
    }

    async fn get_signature_status(&self, signature: &Signature) -> Result<Option<SignatureState>> {
        let response = self.rpc.get_signature_statuses(&[*signature]).await?;

        let Some(status) = response.value.into_iter().next().flatten() else {
            return Ok(None);
        };

        let commitment = if status.satisfies_commitment(CommitmentConfig::finalized()) {
            Commitment::Finalized
        } else if status.satisfies_commitment(CommitmentConfig::confirmed()) {
            Commitment::Confirmed
        } else {
            Commitment::Processed
        };

        debug!(signature = %signature, commitment = ?commitment, event = "signature_status_fetched");
        Ok(Some(SignatureState {
            commitment,
            err: status.err.map(|e| e.to_string()),
        }))
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>> {
        Ok(self.rpc.get_account_data(address).await?)
    }

    async fn token_account_balance(&self, token_account: &Pubkey) -> Result<u64> {
        let balance = self.rpc.get_token_account_balance(token_account).await?;
        balance.amount.parse::<u64>().map_err(|e| {
            CctpError::Provider(format!(
                "invalid token balance {:?} for {token_account}: {e}",
                balance.amount
            ))
        })
    }
}
