// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! EVM side of a transfer: approve, burn and claim through a connected wallet.

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, FixedBytes, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use tracing::{info, Instrument, Span};

use crate::chain::CctpChain;
use crate::contracts::erc20::approve_transaction;
use crate::contracts::message_transmitter_v2::MessageTransmitterV2Contract;
use crate::contracts::token_messenger_v2::{DepositForBurnArgs, TokenMessengerV2Contract};
use crate::error::{CctpError, Result};
use crate::protocol::{DomainId, UsdcAmount};
use crate::spans;
use crate::traits::EvmWallet;

/// Runs CCTP operations on EVM chains through an [`EvmWallet`].
///
/// Every operation first makes sure the wallet's active network is the
/// chain the operation targets, then returns once the receipt is in.
///
/// # Example
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::adapters::EvmAdapter;
/// use cctp_bridge_orchestrator::traits::EvmWallet;
/// use cctp_bridge_orchestrator::UsdcAmount;
/// use alloy_chains::NamedChain;
///
/// # async fn example<W: EvmWallet>(wallet: &W) -> cctp_bridge_orchestrator::Result<()> {
/// let adapter = EvmAdapter::new(wallet);
/// let balance = adapter.usdc_balance(NamedChain::BaseSepolia).await?;
/// # Ok(())
/// # }
/// ```
pub struct EvmAdapter<'a, W> {
    wallet: &'a W,
}

impl<'a, W: EvmWallet> EvmAdapter<'a, W> {
    pub fn new(wallet: &'a W) -> Self {
        Self { wallet }
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Grants `spender` an allowance of `amount` on `token`.
    ///
    /// # Errors
    ///
    /// - `NetworkSwitchFailed` if the wallet cannot be moved to `chain`
    /// - `WalletRejected` / `SubmissionFailed` before broadcast
    /// - `TransactionReverted` if the receipt reports failure
    pub async fn approve(
        &self,
        chain: NamedChain,
        token: Address,
        spender: Address,
        amount: UsdcAmount,
    ) -> Result<TxHash> {
        let span = spans::evm_transaction("approve", &chain);
        async {
            self.ensure_active_chain(chain).await?;
            let tx = approve_transaction(token, self.wallet.address(), spender, amount.as_u256());
            self.submit_and_confirm(chain, tx).await
        }
        .instrument(span)
        .await
    }

    /// Burns `amount` USDC on `chain` towards `destination_domain`.
    ///
    /// `mint_recipient` is the destination account left-padded to 32 bytes.
    /// Requires an allowance for the chain's TokenMessengerV2.
    pub async fn deposit_for_burn(
        &self,
        chain: NamedChain,
        amount: UsdcAmount,
        destination_domain: DomainId,
        mint_recipient: FixedBytes<32>,
        max_fee: u64,
        min_finality_threshold: u32,
    ) -> Result<TxHash> {
        let span = spans::evm_transaction("deposit_for_burn", &chain);
        async {
            let token_messenger = TokenMessengerV2Contract::new(chain.token_messenger_address()?);
            let args = DepositForBurnArgs::builder()
                .amount(amount.as_u256())
                .destination_domain(destination_domain.as_u32())
                .mint_recipient(mint_recipient)
                .burn_token(chain.usdc_address()?)
                .max_fee(U256::from(max_fee))
                .min_finality_threshold(min_finality_threshold)
                .build();

            self.ensure_active_chain(chain).await?;
            let tx = token_messenger.deposit_for_burn_transaction(self.wallet.address(), &args);
            self.submit_and_confirm(chain, tx).await
        }
        .instrument(span)
        .await
    }

    /// Mints on `chain` with an attested burn message.
    pub async fn claim(
        &self,
        chain: NamedChain,
        message: Bytes,
        attestation: Bytes,
    ) -> Result<TxHash> {
        let span = spans::evm_transaction("receive_message", &chain);
        async {
            let transmitter =
                MessageTransmitterV2Contract::new(chain.message_transmitter_address()?);

            self.ensure_active_chain(chain).await?;
            let tx = transmitter.receive_message_transaction(
                self.wallet.address(),
                message,
                attestation,
            );
            self.submit_and_confirm(chain, tx).await
        }
        .instrument(span)
        .await
    }

    /// USDC balance of the wallet on `chain`.
    pub async fn usdc_balance(&self, chain: NamedChain) -> Result<U256> {
        self.wallet
            .token_balance(chain, chain.usdc_address()?)
            .await
    }

    /// Switches the wallet to `chain` unless it is already there, then checks
    /// the switch actually took effect.
    async fn ensure_active_chain(&self, chain: NamedChain) -> Result<()> {
        let target = chain as u64;
        let active = self.wallet.active_chain_id().await?;
        if active == target {
            return Ok(());
        }

        info!(
            from_chain_id = active,
            to_chain = %chain,
            event = "network_switch_requested"
        );

        self.wallet
            .switch_chain(chain)
            .await
            .map_err(|e| match e {
                CctpError::NetworkSwitchFailed { .. } => e,
                other => CctpError::NetworkSwitchFailed {
                    chain: chain.to_string(),
                    reason: other.to_string(),
                },
            })?;

        let active = self.wallet.active_chain_id().await?;
        if active != target {
            return Err(CctpError::NetworkSwitchFailed {
                chain: chain.to_string(),
                reason: format!("wallet is still on chain {active}"),
            });
        }
        Ok(())
    }

    async fn submit_and_confirm(&self, chain: NamedChain, tx: TransactionRequest) -> Result<TxHash> {
        let tx_hash = self.wallet.send_transaction(tx).await?;
        Span::current().record("tx_hash", tx_hash.to_string());

        let succeeded = self
            .wallet
            .wait_for_receipt(chain, tx_hash)
            .await
            .map_err(|e| {
                if e.transaction_reference().is_some() {
                    e
                } else {
                    CctpError::TransactionFailed {
                        tx_ref: tx_hash.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !succeeded {
            spans::record_error_with_context(
                "TransactionReverted",
                &format!("{tx_hash} reverted on {chain}"),
                None,
            );
            return Err(CctpError::TransactionReverted {
                tx_ref: tx_hash.to_string(),
            });
        }

        info!(tx_hash = %tx_hash, chain = %chain, event = "evm_transaction_confirmed");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::addresses::{CCTP_V2_TOKEN_MESSENGER_TESTNET, SEPOLIA_USDC};
    use crate::testing::FakeEvmWallet;
    use alloy_primitives::{address, hex, TxKind};

    const OWNER: Address = address!("1111111111111111111111111111111111111111");

    #[tokio::test]
    async fn test_approve_targets_usdc() {
        let wallet = FakeEvmWallet::new(OWNER, NamedChain::Sepolia);
        let adapter = EvmAdapter::new(&wallet);

        let tx_hash = adapter
            .approve(
                NamedChain::Sepolia,
                SEPOLIA_USDC,
                CCTP_V2_TOKEN_MESSENGER_TESTNET,
                UsdcAmount::from_base_units(10_500_000),
            )
            .await
            .unwrap();

        let sent = wallet.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tx_hash, tx_hash);
        assert_eq!(sent[0].request.to, Some(TxKind::Call(SEPOLIA_USDC)));
        let input = sent[0].request.input.input().unwrap();
        assert_eq!(hex::encode(&input[..4]), "095ea7b3");
        assert!(wallet.switch_requests().is_empty());
    }

    #[tokio::test]
    async fn test_deposit_switches_to_source_chain_first() {
        let wallet = FakeEvmWallet::new(OWNER, NamedChain::BaseSepolia);
        let adapter = EvmAdapter::new(&wallet);

        adapter
            .deposit_for_burn(
                NamedChain::Sepolia,
                UsdcAmount::from_base_units(1_000_000),
                DomainId::Solana,
                FixedBytes::repeat_byte(0x22),
                1_000,
                1_000,
            )
            .await
            .unwrap();

        assert_eq!(wallet.switch_requests(), vec![NamedChain::Sepolia]);
        let sent = wallet.sent_transactions();
        assert_eq!(sent[0].chain, NamedChain::Sepolia);
        assert_eq!(
            sent[0].request.to,
            Some(TxKind::Call(CCTP_V2_TOKEN_MESSENGER_TESTNET))
        );
    }

    #[tokio::test]
    async fn test_reverted_receipt_keeps_tx_ref() {
        let wallet = FakeEvmWallet::new(OWNER, NamedChain::Sepolia);
        wallet.revert_next_transaction();
        let adapter = EvmAdapter::new(&wallet);

        let err = adapter
            .claim(
                NamedChain::Sepolia,
                Bytes::from(vec![1u8; 200]),
                Bytes::from(vec![2u8; 65]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::TransactionReverted { .. }));
        let tx_hash = wallet.sent_transactions()[0].tx_hash;
        assert_eq!(err.transaction_reference(), Some(tx_hash.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_refused_switch_blocks_submission() {
        let wallet = FakeEvmWallet::new(OWNER, NamedChain::Sepolia);
        wallet.refuse_network_switch();
        let adapter = EvmAdapter::new(&wallet);

        let err = adapter
            .claim(NamedChain::BaseSepolia, Bytes::new(), Bytes::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::NetworkSwitchFailed { .. }));
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_switch_that_did_not_take_effect_fails() {
        let wallet = FakeEvmWallet::new(OWNER, NamedChain::Sepolia);
        wallet.ignore_network_switch();
        let adapter = EvmAdapter::new(&wallet);

        let err = adapter
            .claim(NamedChain::BaseSepolia, Bytes::new(), Bytes::new())
            .await
            .unwrap_err();

        insta::assert_snapshot!(err, @"Failed to switch network to base-sepolia: wallet is still on chain 11155111");
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_prompt() {
        let wallet = FakeEvmWallet::new(OWNER, NamedChain::Sepolia);
        wallet.reject_next_transaction();
        let adapter = EvmAdapter::new(&wallet);

        let err = adapter
            .approve(
                NamedChain::Sepolia,
                SEPOLIA_USDC,
                CCTP_V2_TOKEN_MESSENGER_TESTNET,
                UsdcAmount::from_base_units(1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CctpError::WalletRejected { .. }));
        assert_eq!(err.transaction_reference(), None);
    }
}
