// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP v2 finality thresholds.
//!
//! A burn names the minimum finality Circle must observe before signing the
//! message. The fee schedule is quoted per threshold.

use serde::Serialize;
use std::fmt;

/// Finality threshold for CCTP v2 messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[repr(u32)]
pub enum FinalityThreshold {
    /// Attestation at confirmed block level. The tier fee quotes target.
    #[default]
    Fast = 1000,

    /// Attestation at finalized block level.
    Standard = 2000,
}

impl FinalityThreshold {
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fast => "Fast Transfer",
            Self::Standard => "Standard Transfer",
        }
    }
}

impl From<FinalityThreshold> for u32 {
    #[inline]
    fn from(threshold: FinalityThreshold) -> Self {
        threshold.as_u32()
    }
}

impl fmt::Display for FinalityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}
