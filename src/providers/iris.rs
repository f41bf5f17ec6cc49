// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Circle Iris API provider implementation.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use tracing::{debug, instrument, trace, Instrument};
use url::Url;

use crate::chain::{Environment, IRIS_API, IRIS_API_SANDBOX};
use crate::error::{CctpError, Result};
use crate::protocol::{DomainId, FeeTier, MessagesResponse};
use crate::spans;
use crate::traits::AttestationProvider;

/// Production attestation provider using Circle's Iris API.
///
/// # Examples
///
/// ```rust,no_run
/// use cctp_bridge_orchestrator::providers::IrisAttestationProvider;
/// use cctp_bridge_orchestrator::traits::AttestationProvider;
/// use cctp_bridge_orchestrator::DomainId;
///
/// # async fn example() -> Result<(), cctp_bridge_orchestrator::CctpError> {
/// let provider = IrisAttestationProvider::sandbox();
/// let tiers = provider.get_fee_tiers(DomainId::Ethereum, DomainId::Solana).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IrisAttestationProvider {
    base_url: String,
    client: Client,
}

impl IrisAttestationProvider {
    /// Creates a provider for the given Iris host, e.g. <https://iris-api.circle.com>
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn production() -> Self {
        Self::new(IRIS_API)
    }

    pub fn sandbox() -> Self {
        Self::new(IRIS_API_SANDBOX)
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.iris_api_url())
    }

    pub fn fees_url(&self, source: DomainId, destination: DomainId) -> Result<Url> {
        self.url(&format!(
            "/v2/burn/USDC/fees/{}/{}",
            source.as_u32(),
            destination.as_u32()
        ))
    }

    pub fn messages_url(&self, source: DomainId, tx_ref: &str) -> Result<Url> {
        let mut url = self.url(&format!("/v2/messages/{}", source.as_u32()))?;
        url.query_pairs_mut().append_pair("transactionHash", tx_ref);
        Ok(url)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|e| CctpError::InvalidConfig(format!("invalid Iris URL {raw}: {e}")))
    }

    async fn get_body(&self, url: Url) -> Result<String> {
        let span = spans::http_request("GET", &url);

        async {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            trace!(status_code = %response.status(), "Received response from Iris API");

            // Unknown transactions come back as 404 with a JSON error body,
            // so the body is read regardless of status.
            Ok::<_, CctpError>(response.text().await?)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl AttestationProvider for IrisAttestationProvider {
    #[instrument(skip(self), fields(source = %source, destination = %destination))]
    async fn get_fee_tiers(&self, source: DomainId, destination: DomainId) -> Result<Vec<FeeTier>> {
        let body = self.get_body(self.fees_url(source, destination)?).await?;
        let tiers: Vec<FeeTier> = serde_json::from_str(&body)?;

        debug!(tiers = tiers.len(), event = "fee_tiers_parsed");
        Ok(tiers)
    }

    #[instrument(skip(self), fields(source = %source))]
    async fn get_messages(&self, source: DomainId, tx_ref: &str) -> Result<MessagesResponse> {
        let body = self.get_body(self.messages_url(source, tx_ref)?).await?;
        let response: MessagesResponse = serde_json::from_str(&body)?;

        debug!(
            messages = response.messages.len(),
            error = response.error.as_deref(),
            event = "messages_response_parsed"
        );
        Ok(response)
    }

    fn environment(&self) -> Option<Environment> {
        [Environment::Mainnet, Environment::Testnet]
            .into_iter()
            .find(|environment| environment.iris_api_url() == self.base_url)
    }
}
