// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Alloy-backed EVM wallet.

use alloy_chains::NamedChain;
use alloy_network::Ethereum;
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, trace};

use super::TokioClock;
use crate::contracts::erc20::Erc20Contract;
use crate::error::{CctpError, Result};
use crate::traits::{Clock, EvmWallet};

/// EIP-1193 "user rejected request"
const USER_REJECTED_CODE: i64 = 4001;

/// An EVM wallet made of one signer and one Alloy provider per chain.
///
/// Each provider must carry a wallet filler for `address`. Switching the
/// active network only succeeds for chains a provider was registered for.
/// Receipt polling sleeps and times out on `C`.
///
/// # Examples
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::providers::AlloyEvmWallet;
/// use alloy_chains::NamedChain;
/// use alloy_provider::ProviderBuilder;
/// use alloy_signer_local::PrivateKeySigner;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = PrivateKeySigner::random();
/// let address = signer.address();
/// let sepolia = ProviderBuilder::new()
///     .wallet(signer)
///     .connect_http("https://ethereum-sepolia-rpc.publicnode.com".parse()?);
///
/// let wallet = AlloyEvmWallet::new(address).with_chain(NamedChain::Sepolia, sepolia);
/// # Ok(())
/// # }
/// ```
pub struct AlloyEvmWallet<C = TokioClock> {
    address: Address,
    providers: HashMap<NamedChain, DynProvider<Ethereum>>,
    active_chain: RwLock<Option<NamedChain>>,
    clock: C,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl AlloyEvmWallet {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            providers: HashMap::new(),
            active_chain: RwLock::new(None),
            clock: TokioClock::new(),
            receipt_poll_interval: Duration::from_secs(2),
            receipt_timeout: Duration::from_secs(300),
        }
    }
}

impl<C: Clock> AlloyEvmWallet<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> AlloyEvmWallet<D> {
        AlloyEvmWallet {
            address: self.address,
            providers: self.providers,
            active_chain: self.active_chain,
            clock,
            receipt_poll_interval: self.receipt_poll_interval,
            receipt_timeout: self.receipt_timeout,
        }
    }

    /// Registers the provider for `chain`. The first registered chain starts active.
    pub fn with_chain<P>(mut self, chain: NamedChain, provider: P) -> Self
    where
        P: Provider<Ethereum> + 'static,
    {
        if self.providers.is_empty() {
            self.active_chain = RwLock::new(Some(chain));
        }
        self.providers.insert(chain, provider.erased());
        self
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    fn provider(&self, chain: NamedChain) -> Result<&DynProvider<Ethereum>> {
        self.providers
            .get(&chain)
            .ok_or_else(|| CctpError::UnsupportedChain {
                chain: format!("{chain} (no provider configured)"),
            })
    }

    async fn active_chain(&self) -> Result<NamedChain> {
        (*self.active_chain.read().await)
            .ok_or_else(|| CctpError::Provider("wallet has no active network".to_string()))
    }
}

fn submission_error(err: alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>) -> CctpError {
    match err.as_error_resp() {
        Some(payload) if payload.code == USER_REJECTED_CODE => CctpError::WalletRejected {
            reason: payload.message.to_string(),
        },
        _ => CctpError::SubmissionFailed {
            reason: err.to_string(),
        },
    }
}

#[async_trait]
impl<C: Clock> EvmWallet for AlloyEvmWallet<C> {
    fn address(&self) -> Address {
        self.address
    }

    async fn active_chain_id(&self) -> Result<u64> {
        Ok(self.active_chain().await? as u64)
    }

    #[instrument(skip(self), fields(chain = %chain))]
    async fn switch_chain(&self, chain: NamedChain) -> Result<()> {
        if !self.providers.contains_key(&chain) {
            return Err(CctpError::NetworkSwitchFailed {
                chain: chain.to_string(),
                reason: "no RPC provider configured".to_string(),
            });
        }

        *self.active_chain.write().await = Some(chain);
        info!(chain = %chain, event = "active_network_switched");
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let chain = self.active_chain().await?;
        let provider = self.provider(chain)?;

        let pending = provider
            .send_transaction(tx.from(self.address))
            .await
            .map_err(submission_error)?;
        let tx_hash = *pending.tx_hash();

        info!(tx_hash = %tx_hash, chain = %chain, event = "transaction_broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(chain = %chain, tx_hash = %tx_hash))]
    async fn wait_for_receipt(&self, chain: NamedChain, tx_hash: TxHash) -> Result<bool> {
        let provider = self.provider(chain)?;
        let started = self.clock.now();

        loop {
            match provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return Ok(receipt.status()),
                Ok(None) => trace!("Receipt not available yet"),
                Err(e) => debug!(error = %e, "Receipt lookup failed, retrying"),
            }

            if self.clock.now().duration_since(started) >= self.receipt_timeout {
                return Err(CctpError::ConfirmationTimeout {
                    tx_ref: tx_hash.to_string(),
                });
            }
            self.clock.sleep(self.receipt_poll_interval).await;
        }
    }

    async fn token_balance(&self, chain: NamedChain, token: Address) -> Result<U256> {
        let provider = self.provider(chain)?.clone();
        Erc20Contract::new(token, provider)
            .balance_of(self.address)
            .await
            .map_err(|e| CctpError::Provider(e.to_string()))
    }
}
