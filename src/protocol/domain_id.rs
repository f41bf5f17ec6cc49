// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP domain identifiers for the networks the bridge can route between.
//!
//! Circle assigns each network a numeric domain. Testnets share the domain of
//! their mainnet counterpart, so a domain alone never selects an environment.
//!
//! Reference: <https://developers.circle.com/cctp/cctp-supported-blockchains>

use serde::Serialize;
use std::fmt;

/// CCTP domain identifier.
///
/// # Example
///
/// ```rust
/// use cctp_bridge_orchestrator::DomainId;
///
/// assert_eq!(DomainId::Solana.as_u32(), 5);
/// assert_eq!(DomainId::from_u32(6), Some(DomainId::Base));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum DomainId {
    /// Ethereum and Sepolia
    Ethereum = 0,
    /// OP Mainnet and OP Sepolia
    Optimism = 2,
    /// Arbitrum One and Arbitrum Sepolia
    Arbitrum = 3,
    /// Solana mainnet-beta and devnet
    Solana = 5,
    /// Base and Base Sepolia
    Base = 6,
    /// Polygon PoS and Amoy
    Polygon = 7,
}

impl DomainId {
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Ethereum),
            2 => Some(Self::Optimism),
            3 => Some(Self::Arbitrum),
            5 => Some(Self::Solana),
            6 => Some(Self::Base),
            7 => Some(Self::Polygon),
            _ => None,
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Optimism => "Optimism",
            Self::Arbitrum => "Arbitrum",
            Self::Solana => "Solana",
            Self::Base => "Base",
            Self::Polygon => "Polygon",
        }
    }

    /// Whether burns on this domain are submitted as Solana program instructions.
    #[inline]
    pub const fn is_solana(self) -> bool {
        matches!(self, Self::Solana)
    }
}

impl From<DomainId> for u32 {
    #[inline]
    fn from(domain: DomainId) -> Self {
        domain.as_u32()
    }
}

impl TryFrom<u32> for DomainId {
    type Error = InvalidDomainId;

    #[inline]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(InvalidDomainId(value))
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}

/// Error returned when a u32 is not a domain this bridge routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDomainId(pub u32);

impl fmt::Display for InvalidDomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported CCTP domain ID: {}", self.0)
    }
}

impl std::error::Error for InvalidDomainId {}
