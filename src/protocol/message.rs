// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP v2 message header.
//!
//! Claims on Solana must name the used-nonce account of the message, which is
//! derived from the nonce and source domain carried in the header.
//!
//! Reference: <https://developers.circle.com/cctp/technical-guide>

use alloy_primitives::{Bytes, FixedBytes};
use bon::Builder;

use super::DomainId;
use crate::error::{CctpError, Result};

/// CCTP v2 Message Header
///
/// # Format
///
/// - version: uint32 (4 bytes)
/// - sourceDomain: uint32 (4 bytes)
/// - destinationDomain: uint32 (4 bytes)
/// - nonce: bytes32 (32 bytes)
/// - sender: bytes32 (32 bytes)
/// - recipient: bytes32 (32 bytes)
/// - destinationCaller: bytes32 (32 bytes)
/// - minFinalityThreshold: uint32 (4 bytes)
/// - finalityThresholdExecuted: uint32 (4 bytes)
///
/// Total fixed size: 148 bytes. The burn message body follows.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct MessageHeader {
    #[builder(default = 1)]
    pub version: u32,
    pub source_domain: DomainId,
    pub destination_domain: DomainId,
    pub nonce: FixedBytes<32>,
    #[builder(default)]
    pub sender: FixedBytes<32>,
    #[builder(default)]
    pub recipient: FixedBytes<32>,
    #[builder(default)]
    pub destination_caller: FixedBytes<32>,
    #[builder(default = 1000)]
    pub min_finality_threshold: u32,
    #[builder(default = 1000)]
    pub finality_threshold_executed: u32,
}

impl MessageHeader {
    pub const SIZE: usize = 148;

    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::SIZE);

        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&self.source_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.destination_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(self.nonce.as_slice());
        bytes.extend_from_slice(self.sender.as_slice());
        bytes.extend_from_slice(self.recipient.as_slice());
        bytes.extend_from_slice(self.destination_caller.as_slice());
        bytes.extend_from_slice(&self.min_finality_threshold.to_be_bytes());
        bytes.extend_from_slice(&self.finality_threshold_executed.to_be_bytes());

        Bytes::from(bytes)
    }

    /// Decodes the header at the start of a message. Trailing body bytes are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CctpError::InvalidMessage(format!(
                "expected at least {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }

        let source_domain = read_domain(bytes, 4)?;
        let destination_domain = read_domain(bytes, 8)?;

        Ok(Self {
            version: read_u32(bytes, 0),
            source_domain,
            destination_domain,
            nonce: FixedBytes::from_slice(&bytes[12..44]),
            sender: FixedBytes::from_slice(&bytes[44..76]),
            recipient: FixedBytes::from_slice(&bytes[76..108]),
            destination_caller: FixedBytes::from_slice(&bytes[108..140]),
            min_finality_threshold: read_u32(bytes, 140),
            finality_threshold_executed: read_u32(bytes, 144),
        })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_domain(bytes: &[u8], offset: usize) -> Result<DomainId> {
    let raw = read_u32(bytes, offset);
    DomainId::try_from(raw).map_err(|e| CctpError::InvalidMessage(e.to_string()))
}
