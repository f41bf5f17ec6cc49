// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! OpenTelemetry span helpers for bridge operations
//!
//! Static span names, structured attributes, kept out of business logic.
//! The orchestrator, adapters and attestation client use them internally;
//! they are public so callers can nest their own instrumentation.
//!
//! # Example
//!
//! ```rust,no_run
//! use cctp_bridge_orchestrator::spans;
//! use cctp_bridge_orchestrator::DomainId;
//! use tracing::Instrument;
//!
//! # async fn example() {
//! let span = spans::poll_for_attestation(DomainId::Base, "0xabc", 60, 2000);
//! async {
//!     // custom attestation logic
//! }
//! .instrument(span)
//! .await;
//! # }
//! ```

use alloy_chains::NamedChain;
use tracing::Span;
use url::Url;

use crate::bridge::StepKind;
use crate::chain::{ChainIdentifier, SolanaNetwork};
use crate::protocol::DomainId;

/// Span for one `run_step` call.
///
/// Parent: caller
/// Children: adapter and attestation client spans
#[inline]
pub fn run_step(
    index: usize,
    kind: StepKind,
    source_chain: &ChainIdentifier,
    destination_chain: &ChainIdentifier,
) -> Span {
    tracing::info_span!(
        "cctp_bridge.run_step",
        step.index = index,
        step.kind = %kind,
        source_chain = %source_chain,
        destination_chain = %destination_chain,
        tx_ref = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for the bounded attestation polling loop.
///
/// Parent: cctp_bridge.run_step
/// Children: cctp_bridge.attestation_attempt
#[inline]
pub fn poll_for_attestation(
    source_domain: DomainId,
    tx_ref: &str,
    max_attempts: u32,
    poll_interval_ms: u64,
) -> Span {
    tracing::info_span!(
        "cctp_bridge.poll_for_attestation",
        source_domain = source_domain.as_u32(),
        tx_ref = tx_ref,
        max_attempts = max_attempts,
        poll_interval_ms = poll_interval_ms,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Parent: cctp_bridge.poll_for_attestation
#[inline]
pub fn attestation_attempt(attempt: u32) -> Span {
    tracing::debug_span!("cctp_bridge.attestation_attempt", attempt = attempt)
}

/// Span for an EVM call from build to receipt.
///
/// Parent: cctp_bridge.run_step
/// Children: wallet RPC calls
#[inline]
pub fn evm_transaction(operation: &str, chain: &NamedChain) -> Span {
    tracing::info_span!(
        "cctp_bridge.evm_transaction",
        operation = operation,
        chain = %chain,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for a Solana instruction from build to confirmation.
///
/// Parent: cctp_bridge.run_step
/// Children: cctp_bridge.confirm_signature
#[inline]
pub fn solana_transaction(operation: &str, network: SolanaNetwork) -> Span {
    tracing::info_span!(
        "cctp_bridge.solana_transaction",
        operation = operation,
        network = ?network,
        signature = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Parent: cctp_bridge.solana_transaction
#[inline]
pub fn confirm_signature(signature: &str, timeout_ms: u64) -> Span {
    tracing::debug_span!(
        "cctp_bridge.confirm_signature",
        signature = signature,
        timeout_ms = timeout_ms,
    )
}

/// Span for HTTP request to Circle API.
///
/// Parent: cctp_bridge.attestation_attempt or fee lookup
/// Children: None
#[inline]
pub fn http_request(method: &str, url: &Url) -> Span {
    tracing::trace_span!(
        "cctp_bridge.http_request",
        http.method = method,
        http.url = %url,
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions:
/// - error.type: leading segment of the message
/// - error.message: full message
/// - error.source: the error's source, if any
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with an explicit type and extra context on the
/// current span.
///
/// # Example
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::spans;
///
/// let span = tracing::info_span!("cctp_bridge.operation", error.type = tracing::field::Empty);
/// let _guard = span.enter();
///
/// spans::record_error_with_context(
///     "AttestationTimeout",
///     "no attestation after 60 attempts",
///     Some("burn is final, retry the step later"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
