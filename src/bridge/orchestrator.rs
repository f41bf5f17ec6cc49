// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_chains::NamedChain;
use bon::Builder;
use tracing::{error, info, warn, Instrument, Span};

use super::binding::{ClaimBinding, DepositBinding, RouteBinding};
use super::config::ConfirmationConfig;
use super::intent::{Recipient, TransferIntent};
use super::step::{step_sequence, StepKind, StepState, StepStatus};
use crate::adapters::{EvmAdapter, SolanaAdapter};
use crate::chain::{explorer_url, CctpChain, ChainIdentifier, Environment, SolanaNetwork};
use crate::client::IrisClient;
use crate::error::{CctpError, Result};
use crate::protocol::{Attestation, FeeQuote, FinalityThreshold, UsdcAmount};
use crate::spans;
use crate::traits::{AttestationProvider, Clock, EvmWallet, SolanaConnection};

/// A transfer in flight: the intent, its bindings and one state per step.
#[derive(Debug, Clone)]
struct Transfer {
    intent: TransferIntent,
    route: RouteBinding,
    steps: Vec<StepState>,
}

impl Transfer {
    fn step(&self, kind: StepKind) -> Option<&StepState> {
        self.steps.iter().find(|step| step.kind() == kind)
    }
}

/// What a successful step leaves behind.
enum StepOutcome {
    Transaction(String),
    Attestation(Attestation),
}

/// Drives one USDC transfer through its steps.
///
/// The orchestrator owns the per-step state and nothing else. Wallets are
/// borrowed by the adapters for the duration of a single step, so several
/// orchestrators can run independent transfers side by side.
///
/// Steps run strictly in order: step `i` only leaves `Pending` once step
/// `i - 1` succeeded. A failed step can be re-run in place; nothing is
/// retried automatically.
///
/// # Example
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::{BridgeOrchestrator, Environment, StepStatus};
/// use cctp_bridge_orchestrator::chain::{ChainIdentifier, SolanaNetwork};
/// use cctp_bridge_orchestrator::client::IrisClient;
/// use cctp_bridge_orchestrator::providers::{
///     AlloyEvmWallet, IrisAttestationProvider, RpcSolanaConnection, TokioClock,
/// };
/// use alloy_chains::NamedChain;
///
/// # async fn example(
/// #     evm_wallet: AlloyEvmWallet,
/// #     solana: RpcSolanaConnection,
/// # ) -> cctp_bridge_orchestrator::Result<()> {
/// let mut orchestrator = BridgeOrchestrator::builder()
///     .client(IrisClient::new(IrisAttestationProvider::sandbox(), TokioClock::new()))
///     .environment(Environment::Testnet)
///     .evm_wallet(evm_wallet)
///     .solana(solana)
///     .build();
///
/// orchestrator.initialize(
///     ChainIdentifier::Evm(NamedChain::BaseSepolia),
///     ChainIdentifier::Solana(SolanaNetwork::Devnet),
///     "10.5".parse()?,
/// )?;
///
/// for index in 0..orchestrator.steps().len() {
///     if orchestrator.run_step(index).await? != StepStatus::Success {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct BridgeOrchestrator<A, C, W, S> {
    client: IrisClient<A, C>,
    environment: Environment,
    evm_wallet: Option<W>,
    solana: Option<S>,
    #[builder(default)]
    confirmation: ConfirmationConfig,
    /// Finality threshold the burn is priced and submitted at
    #[builder(default = FinalityThreshold::Fast)]
    finality_threshold: FinalityThreshold,
    #[builder(skip)]
    transfer: Option<Transfer>,
}

impl<A, C, W, S> BridgeOrchestrator<A, C, W, S>
where
    A: AttestationProvider,
    C: Clock,
    W: EvmWallet,
    S: SolanaConnection,
{
    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn client(&self) -> &IrisClient<A, C> {
        &self.client
    }

    pub fn evm_wallet(&self) -> Option<&W> {
        self.evm_wallet.as_ref()
    }

    pub fn solana(&self) -> Option<&S> {
        self.solana.as_ref()
    }

    /// Starts a new transfer with every step `Pending`.
    ///
    /// The recipient is the connected wallet on the destination side; it is
    /// left empty if that wallet is missing and the Deposit step reports it.
    ///
    /// # Errors
    ///
    /// - `PreconditionNotMet` if a transfer already left `Pending`; call
    ///   [`reset`](Self::reset) first
    /// - `InvalidConfig` if the attestation provider serves another environment
    /// - `InvalidAmount` for a zero amount
    /// - `UnsupportedRoute` / `UnsupportedChain` from route validation
    pub fn initialize(
        &mut self,
        source: ChainIdentifier,
        destination: ChainIdentifier,
        amount: UsdcAmount,
    ) -> Result<()> {
        if let Some(transfer) = &self.transfer {
            if transfer
                .steps
                .iter()
                .any(|step| step.status() != StepStatus::Pending)
            {
                return Err(CctpError::PreconditionNotMet {
                    reason: "a transfer is already in progress".to_string(),
                });
            }
        }

        if let Some(served) = self.client.provider().environment() {
            if served != self.environment {
                return Err(CctpError::InvalidConfig(format!(
                    "attestation provider serves {served}, transfers run on {}",
                    self.environment
                )));
            }
        }

        if amount.is_zero() {
            return Err(CctpError::InvalidAmount(
                "Please enter a valid amount".to_string(),
            ));
        }

        let route = RouteBinding::resolve(source, destination, self.environment)?;
        let recipient = match destination {
            ChainIdentifier::Evm(_) => self
                .evm_wallet
                .as_ref()
                .map(|wallet| Recipient::Evm(wallet.address())),
            ChainIdentifier::Solana(_) => self
                .solana
                .as_ref()
                .map(|connection| Recipient::Solana(connection.pubkey())),
        };

        let steps: Vec<StepState> = step_sequence(&source)
            .iter()
            .copied()
            .map(StepState::new)
            .collect();

        info!(
            source_chain = %source,
            destination_chain = %destination,
            amount = %amount,
            recipient = recipient.map(|r| r.to_string()),
            steps = steps.len(),
            event = "transfer_initialized"
        );

        self.transfer = Some(Transfer {
            intent: TransferIntent {
                source_chain: source,
                destination_chain: destination,
                amount,
                recipient,
            },
            route,
            steps,
        });
        Ok(())
    }

    /// Runs step `index` and returns the status it settled in.
    ///
    /// Adapter and attestation failures do not surface as `Err`: they put the
    /// step in `Error` with the failure's message. Re-running a successful
    /// step returns `Success` without touching the chain.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` before [`initialize`](Self::initialize)
    /// - `StepOutOfRange` for an index past the sequence
    /// - `PreconditionNotMet` if the previous step has not succeeded; no
    ///   state changes in that case
    pub async fn run_step(&mut self, index: usize) -> Result<StepStatus> {
        let transfer = self.transfer.as_mut().ok_or(CctpError::NotInitialized)?;
        let len = transfer.steps.len();
        let step = transfer
            .steps
            .get(index)
            .ok_or(CctpError::StepOutOfRange { index, len })?;

        if step.is_success() {
            return Ok(StepStatus::Success);
        }

        if let Some(previous) = index.checked_sub(1).and_then(|i| transfer.steps.get(i)) {
            if !previous.is_success() {
                return Err(CctpError::PreconditionNotMet {
                    reason: format!(
                        "step {} ({}) must succeed before step {index} ({})",
                        index - 1,
                        previous.kind(),
                        step.kind()
                    ),
                });
            }
        }

        let kind = step.kind();
        let span = spans::run_step(
            index,
            kind,
            &transfer.intent.source_chain,
            &transfer.intent.destination_chain,
        );
        transfer.steps[index].start();

        let outcome = self.execute(kind).instrument(span.clone()).await;

        let _guard = span.enter();
        let transfer = self.transfer.as_mut().ok_or(CctpError::NotInitialized)?;
        let step = &mut transfer.steps[index];
        match outcome {
            Ok(StepOutcome::Transaction(tx_ref)) => {
                Span::current().record("tx_ref", tx_ref.as_str());
                info!(tx_ref = %tx_ref, event = "step_succeeded");
                step.succeed(tx_ref);
            }
            Ok(StepOutcome::Attestation(attestation)) => {
                info!(event = "step_succeeded");
                step.succeed_with_attestation(attestation);
            }
            Err(e) => {
                spans::record_error(&e);
                error!(error = %e, event = "step_failed");
                step.fail(
                    e.to_string(),
                    e.transaction_reference().map(str::to_string),
                );
            }
        }
        Ok(step.status())
    }

    /// Runs every step that has not succeeded yet, stopping at the first
    /// one that does not reach `Success`.
    pub async fn run_to_completion(&mut self) -> Result<StepStatus> {
        let len = self.steps().len();
        if len == 0 {
            return Err(CctpError::NotInitialized);
        }

        for index in 0..len {
            let status = self.run_step(index).await?;
            if status != StepStatus::Success {
                return Ok(status);
            }
        }
        Ok(StepStatus::Success)
    }

    /// Drops the transfer. Transactions already broadcast stay on-chain.
    pub fn reset(&mut self) {
        if self.transfer.take().is_some() {
            info!(event = "transfer_reset");
        }
    }

    /// Step states in sequence order, empty before `initialize`.
    pub fn steps(&self) -> &[StepState] {
        self.transfer
            .as_ref()
            .map(|transfer| transfer.steps.as_slice())
            .unwrap_or_default()
    }

    pub fn sequence(&self) -> Option<&'static [StepKind]> {
        self.transfer
            .as_ref()
            .map(|transfer| step_sequence(&transfer.intent.source_chain))
    }

    pub fn intent(&self) -> Option<&TransferIntent> {
        self.transfer.as_ref().map(|transfer| &transfer.intent)
    }

    pub fn route(&self) -> Option<&RouteBinding> {
        self.transfer.as_ref().map(|transfer| &transfer.route)
    }

    pub fn is_complete(&self) -> bool {
        let steps = self.steps();
        !steps.is_empty() && steps.iter().all(StepState::is_success)
    }

    /// Fee for a prospective transfer, for display while the user is still
    /// picking a destination and amount.
    ///
    /// The Deposit step always fetches its own quote.
    pub async fn quote_fee(
        &self,
        source: &ChainIdentifier,
        destination: &ChainIdentifier,
        amount: UsdcAmount,
    ) -> Result<FeeQuote> {
        Ok(self
            .client
            .get_fee_quote(
                source.domain_id()?,
                destination.domain_id()?,
                amount,
                self.finality_threshold,
            )
            .await)
    }

    /// USDC held by the connected wallet on `chain`.
    ///
    /// Lookup failures and missing wallets read as zero.
    pub async fn source_balance(&self, chain: &ChainIdentifier) -> UsdcAmount {
        let balance = match chain {
            ChainIdentifier::Evm(named) => match &self.evm_wallet {
                Some(wallet) => EvmAdapter::new(wallet)
                    .usdc_balance(*named)
                    .await
                    .map(|units| u64::try_from(units).unwrap_or(u64::MAX)),
                None => return UsdcAmount::ZERO,
            },
            ChainIdentifier::Solana(network) => match self.solana_adapter(*network) {
                Ok(adapter) => adapter.usdc_balance().await,
                Err(_) => return UsdcAmount::ZERO,
            },
        };

        balance.map(UsdcAmount::from_base_units).unwrap_or_else(|e| {
            warn!(chain = %chain, error = %e, event = "balance_lookup_failed");
            UsdcAmount::ZERO
        })
    }

    /// Block explorer link for the transaction of step `index`, if it has one.
    pub fn explorer_link(&self, index: usize) -> Option<String> {
        let transfer = self.transfer.as_ref()?;
        let step = transfer.steps.get(index)?;
        let tx_ref = step.transaction_reference()?;
        let chain = match step.kind() {
            StepKind::Approve | StepKind::Deposit => &transfer.intent.source_chain,
            StepKind::Claim => &transfer.intent.destination_chain,
            StepKind::FetchAttestation => return None,
        };
        Some(explorer_url(chain, tx_ref))
    }

    async fn execute(&self, kind: StepKind) -> Result<StepOutcome> {
        let transfer = self.transfer.as_ref().ok_or(CctpError::NotInitialized)?;
        match kind {
            StepKind::Approve => self.approve(transfer).await,
            StepKind::Deposit => self.deposit(transfer).await,
            StepKind::FetchAttestation => self.fetch_attestation(transfer).await,
            StepKind::Claim => self.claim(transfer).await,
        }
    }

    async fn approve(&self, transfer: &Transfer) -> Result<StepOutcome> {
        let chain = transfer
            .route
            .approve_chain()
            .ok_or_else(|| CctpError::PreconditionNotMet {
                reason: format!("{} has no approval step", transfer.intent.source_chain),
            })?;

        let tx_hash = EvmAdapter::new(self.require_evm_wallet(chain)?)
            .approve(
                chain,
                chain.usdc_address()?,
                chain.token_messenger_address()?,
                transfer.intent.amount,
            )
            .await?;
        Ok(StepOutcome::Transaction(tx_hash.to_string()))
    }

    async fn deposit(&self, transfer: &Transfer) -> Result<StepOutcome> {
        let intent = &transfer.intent;
        let route = &transfer.route;
        let recipient = intent.recipient.ok_or_else(|| CctpError::MissingRecipient {
            chain: intent.destination_chain.to_string(),
        })?;

        let quote = self
            .client
            .get_fee_quote(
                route.source_domain,
                route.destination_domain,
                intent.amount,
                self.finality_threshold,
            )
            .await;
        let mint_recipient = recipient.mint_recipient(self.environment.solana_network());

        info!(
            amount = %intent.amount,
            max_fee = quote.fee,
            min_finality_threshold = quote.finality_threshold,
            mint_recipient = %mint_recipient,
            event = "deposit_prepared"
        );

        let tx_ref = match route.deposit {
            DepositBinding::Evm { chain } => EvmAdapter::new(self.require_evm_wallet(chain)?)
                .deposit_for_burn(
                    chain,
                    intent.amount,
                    route.destination_domain,
                    mint_recipient,
                    quote.fee,
                    quote.finality_threshold,
                )
                .await?
                .to_string(),
            DepositBinding::Solana { network } => self
                .solana_adapter(network)?
                .deposit_for_burn(
                    intent.amount,
                    route.destination_domain,
                    mint_recipient,
                    quote.fee,
                    quote.finality_threshold,
                )
                .await?
                .to_string(),
        };
        Ok(StepOutcome::Transaction(tx_ref))
    }

    async fn fetch_attestation(&self, transfer: &Transfer) -> Result<StepOutcome> {
        let tx_ref = transfer
            .step(StepKind::Deposit)
            .and_then(StepState::transaction_reference)
            .ok_or_else(|| CctpError::PreconditionNotMet {
                reason: "the deposit has no transaction reference".to_string(),
            })?;

        let attestation = self
            .client
            .poll_for_attestation(transfer.route.source_domain, tx_ref, None, None)
            .await?;
        Ok(StepOutcome::Attestation(attestation))
    }

    async fn claim(&self, transfer: &Transfer) -> Result<StepOutcome> {
        let attestation = transfer
            .step(StepKind::FetchAttestation)
            .and_then(StepState::attestation)
            .ok_or_else(|| CctpError::PreconditionNotMet {
                reason: "no attestation has been fetched".to_string(),
            })?;

        let tx_ref = match transfer.route.claim {
            ClaimBinding::Evm { chain } => EvmAdapter::new(self.require_evm_wallet(chain)?)
                .claim(
                    chain,
                    attestation.message.clone(),
                    attestation.attestation.clone(),
                )
                .await?
                .to_string(),
            ClaimBinding::Solana { network } => {
                let recipient = transfer
                    .intent
                    .recipient
                    .as_ref()
                    .and_then(Recipient::solana_owner)
                    .ok_or_else(|| CctpError::MissingRecipient {
                        chain: transfer.intent.destination_chain.to_string(),
                    })?;
                self.solana_adapter(network)?
                    .claim(&attestation.message, &attestation.attestation, recipient)
                    .await?
                    .to_string()
            }
        };
        Ok(StepOutcome::Transaction(tx_ref))
    }

    fn require_evm_wallet(&self, chain: NamedChain) -> Result<&W> {
        self.evm_wallet
            .as_ref()
            .ok_or_else(|| CctpError::WalletNotConnected {
                chain: chain.to_string(),
            })
    }

    fn solana_adapter(&self, network: SolanaNetwork) -> Result<SolanaAdapter<'_, S, C>> {
        let connection = self
            .solana
            .as_ref()
            .ok_or_else(|| CctpError::WalletNotConnected {
                chain: ChainIdentifier::Solana(network).to_string(),
            })?;

        Ok(SolanaAdapter::builder()
            .connection(connection)
            .clock(self.client.clock())
            .network(network)
            .confirmation(self.confirmation)
            .build())
    }
}
