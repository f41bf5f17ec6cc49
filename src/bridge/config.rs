// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Configuration for attestation polling behavior.
///
/// Controls how the FetchAttestation step polls Circle's Iris API.
///
/// # Examples
///
/// ```rust
/// use cctp_bridge_orchestrator::PollingConfig;
/// use std::time::Duration;
///
/// // Defaults: 60 attempts, 2 second intervals
/// let config = PollingConfig::default();
/// assert_eq!(config.total_timeout(), Duration::from_secs(120));
///
/// let config = PollingConfig::default()
///     .with_max_attempts(20)
///     .with_poll_interval(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of lookups before giving up.
    pub max_attempts: u32,
    /// Wait between lookups.
    pub poll_interval: Duration,
}

impl Default for PollingConfig {
    /// 60 attempts every 2 seconds, roughly two minutes. Fast transfers are
    /// usually attested well within that.
    fn default() -> Self {
        Self {
            max_attempts: 60,
            poll_interval: Duration::from_millis(2_000),
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// `max_attempts * poll_interval`
    pub fn total_timeout(&self) -> Duration {
        self.poll_interval.saturating_mul(self.max_attempts)
    }
}

/// Signature-status polling for Solana transactions.
///
/// # Example
///
/// ```rust
/// use cctp_bridge_orchestrator::ConfirmationConfig;
/// use std::time::Duration;
///
/// let config = ConfirmationConfig::default();
/// assert_eq!(config.poll_interval, Duration::from_millis(500));
/// assert_eq!(config.timeout, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ConfirmationConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
