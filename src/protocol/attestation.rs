// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{hex::FromHex, Bytes};
use serde::{Deserialize, Deserializer, Serialize};

/// Response of the Iris message lookup endpoint.
///
/// `GET /v2/messages/{sourceDomain}?transactionHash={ref}` returns either a
/// list of messages emitted by the burn transaction or an `error` string while
/// the transaction is still unknown to the attestation service.
///
/// ```json
/// {
///   "messages": [
///     { "status": "complete", "message": "0x...", "attestation": "0x..." }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<V2Message>,

    #[serde(default)]
    pub error: Option<String>,
}

/// A single message in the lookup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Message {
    #[serde(default)]
    pub status: Option<AttestationStatus>,

    /// The burn message bytes from the MessageSent event
    #[serde(default, deserialize_with = "deserialize_optional_bytes_or_pending")]
    pub message: Option<Bytes>,

    /// The signed attestation bytes (null/PENDING until complete)
    #[serde(default, deserialize_with = "deserialize_optional_bytes_or_pending")]
    pub attestation: Option<Bytes>,
}

impl MessagesResponse {
    /// First message carrying both a signed attestation and the message bytes.
    ///
    /// Responses with an `error` field are never ready.
    pub fn ready_attestation(&self) -> Option<Attestation> {
        if self.error.is_some() {
            return None;
        }

        self.messages.iter().find_map(|entry| {
            let attestation = entry.attestation.as_ref().filter(|a| !a.is_empty())?;
            let message = entry.message.as_ref().filter(|m| !m.is_empty())?;
            Some(Attestation {
                attestation: attestation.clone(),
                message: message.clone(),
            })
        })
    }
}

/// Signed proof and the burn message it attests to. Both are inputs to a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attestation {
    pub attestation: Bytes,
    pub message: Bytes,
}

/// Circle's Iris API sometimes returns the string `"PENDING"` for the
/// attestation field instead of `null`.
///
/// - Valid hex string (with or without "0x") → `Some(Bytes)`
/// - "PENDING" in any case, empty string, null or missing → `None`
/// - Invalid hex → error
fn deserialize_optional_bytes_or_pending<'de, D>(deserializer: D) -> Result<Option<Bytes>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;

    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("pending") => Ok(None),
        Some(s) => {
            let bytes = Bytes::from_hex(s).map_err(serde::de::Error::custom)?;
            Ok(Some(bytes))
        }
    }
}

/// Status of the attestation.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttestationStatus {
    Complete,
    Pending,
    PendingConfirmations,
    Failed,
    #[serde(other)]
    Unknown,
}
