// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fee quotes and attestation polling on top of an [`AttestationProvider`].

use std::time::Duration;
use tracing::{debug, error, info, warn, Instrument};

use crate::bridge::PollingConfig;
use crate::error::{CctpError, Result};
use crate::protocol::{Attestation, DomainId, FeeQuote, FinalityThreshold, UsdcAmount};
use crate::spans;
use crate::traits::{AttestationProvider, Clock};

/// Stateless wrapper around the two Iris endpoints a transfer needs.
///
/// The environment is fixed by the provider's host, so one client serves
/// every transfer of that environment.
///
/// # Example
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::client::IrisClient;
/// use cctp_bridge_orchestrator::providers::{IrisAttestationProvider, TokioClock};
/// use cctp_bridge_orchestrator::{DomainId, FinalityThreshold, UsdcAmount};
///
/// # async fn example() -> cctp_bridge_orchestrator::Result<()> {
/// let client = IrisClient::new(IrisAttestationProvider::sandbox(), TokioClock::new());
///
/// let quote = client
///     .get_fee_quote(
///         DomainId::Base,
///         DomainId::Solana,
///         "10.5".parse::<UsdcAmount>()?,
///         FinalityThreshold::Fast,
///     )
///     .await;
///
/// let attestation = client
///     .poll_for_attestation(DomainId::Base, "0x...", None, None)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IrisClient<A, C> {
    provider: A,
    clock: C,
    polling: PollingConfig,
}

impl<A: AttestationProvider, C: Clock> IrisClient<A, C> {
    pub fn new(provider: A, clock: C) -> Self {
        Self {
            provider,
            clock,
            polling: PollingConfig::default(),
        }
    }

    /// Replaces the default polling budget of 60 attempts every 2 seconds.
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    pub fn provider(&self) -> &A {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    /// Prices a burn of `amount` at the `target` finality threshold.
    ///
    /// Never fails: a failed lookup, a malformed body or a missing tier all
    /// yield [`FeeQuote::fallback`].
    pub async fn get_fee_quote(
        &self,
        source: DomainId,
        destination: DomainId,
        amount: UsdcAmount,
        target: FinalityThreshold,
    ) -> FeeQuote {
        let quote = match self.provider.get_fee_tiers(source, destination).await {
            Ok(tiers) => FeeQuote::from_tiers(&tiers, amount, target),
            Err(e) => {
                warn!(
                    error = %e,
                    source = %source,
                    destination = %destination,
                    event = "fee_lookup_failed"
                );
                FeeQuote::fallback()
            }
        };

        debug!(
            fee = quote.fee,
            finality_threshold = quote.finality_threshold,
            fallback = quote.is_fallback(),
            event = "fee_quote_computed"
        );
        quote
    }

    /// Polls the message endpoint for the burn in `tx_ref` until it is attested.
    ///
    /// Transport and decode failures count as "not ready yet". `None`
    /// arguments fall back to the client's [`PollingConfig`].
    ///
    /// # Errors
    ///
    /// `AttestationTimeout` once `max_attempts` lookups came back without an
    /// attestation.
    pub async fn poll_for_attestation(
        &self,
        source: DomainId,
        tx_ref: &str,
        max_attempts: Option<u32>,
        poll_interval: Option<Duration>,
    ) -> Result<Attestation> {
        let max_attempts = max_attempts.unwrap_or(self.polling.max_attempts);
        let poll_interval = poll_interval.unwrap_or(self.polling.poll_interval);

        let span = spans::poll_for_attestation(
            source,
            tx_ref,
            max_attempts,
            poll_interval.as_millis() as u64,
        );

        async {
            info!(event = "attestation_polling_started");

            for attempt in 1..=max_attempts {
                let lookup = self
                    .provider
                    .get_messages(source, tx_ref)
                    .instrument(spans::attestation_attempt(attempt))
                    .await;

                match lookup {
                    Ok(response) => {
                        if let Some(attestation) = response.ready_attestation() {
                            info!(
                                attempt = attempt,
                                attestation_length_bytes = attestation.attestation.len(),
                                message_length_bytes = attestation.message.len(),
                                event = "attestation_complete"
                            );
                            return Ok(attestation);
                        }
                        debug!(
                            attempt = attempt,
                            api_error = response.error.as_deref(),
                            event = "attestation_pending"
                        );
                    }
                    Err(e) => {
                        debug!(
                            error = %e,
                            attempt = attempt,
                            event = "attestation_lookup_failed"
                        );
                    }
                }

                self.clock.sleep(poll_interval).await;
            }

            spans::record_error_with_context(
                "AttestationTimeout",
                &format!("No attestation after {max_attempts} attempts"),
                Some(&format!("poll interval {}ms", poll_interval.as_millis())),
            );
            error!(max_attempts = max_attempts, event = "attestation_timeout");
            Err(CctpError::AttestationTimeout)
        }
        .instrument(span)
        .await
    }
}
