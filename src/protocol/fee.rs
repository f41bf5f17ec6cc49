// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fast-transfer fee quoting.
//!
//! Iris publishes a minimum fee in basis points per finality threshold. The
//! quote converts it to base units with a floor of [`FALLBACK_FEE`], which is
//! also the quote used whenever the schedule cannot be read.

use serde::{Deserialize, Deserializer, Serialize};

use super::{FinalityThreshold, UsdcAmount};

/// Fee used when the schedule is unavailable, and the floor for computed fees.
pub const FALLBACK_FEE: u64 = 1_000;

/// One entry of `GET /v2/burn/USDC/fees/{source}/{destination}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTier {
    pub finality_threshold: u32,

    /// Basis points as a decimal, e.g. `"1"` or `"1.3"`
    #[serde(deserialize_with = "deserialize_decimal")]
    pub minimum_fee: String,
}

impl FeeTier {
    /// The minimum fee in thousandths of a basis point, truncated.
    pub fn milli_bps(&self) -> Option<u64> {
        parse_milli_bps(&self.minimum_fee)
    }
}

/// The fee and finality threshold to submit with a burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    /// Maximum fee in USDC base units
    pub fee: u64,
    /// `0` when the quote is the fallback
    pub finality_threshold: u32,
}

impl FeeQuote {
    pub const fn fallback() -> Self {
        Self {
            fee: FALLBACK_FEE,
            finality_threshold: 0,
        }
    }

    pub const fn is_fallback(&self) -> bool {
        self.finality_threshold == 0
    }

    pub const fn fee_amount(&self) -> UsdcAmount {
        UsdcAmount::from_base_units(self.fee)
    }

    /// Fee formatted for display with six decimals.
    pub fn fee_usdc(&self) -> String {
        self.fee_amount().to_fixed_string()
    }

    /// Selects the tier for `target` and prices `amount` with it.
    pub fn from_tiers(tiers: &[FeeTier], amount: UsdcAmount, target: FinalityThreshold) -> Self {
        let Some(tier) = tiers
            .iter()
            .find(|tier| tier.finality_threshold == target.as_u32())
        else {
            return Self::fallback();
        };

        let Some(milli_bps) = tier.milli_bps() else {
            return Self::fallback();
        };

        Self {
            fee: compute_fee(amount, milli_bps).max(FALLBACK_FEE),
            finality_threshold: tier.finality_threshold,
        }
    }
}

/// `floor(amount * milli_bps / 10_000_000) + 1`
///
/// Saturates at `u64::MAX`; such a fee can never be paid and fails on-chain.
pub fn compute_fee(amount: UsdcAmount, milli_bps: u64) -> u64 {
    let scaled = u128::from(amount.base_units()) * u128::from(milli_bps) / 10_000_000 + 1;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

fn parse_milli_bps(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    if digits(whole) && (fraction.is_empty() || digits(fraction)) {
        let whole = whole.parse::<u64>().ok()?;
        let milli = fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(3)
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
        return whole.checked_mul(1000)?.checked_add(milli);
    }

    // exponent notation and the like
    let bps = raw.parse::<f64>().ok()?;
    if !bps.is_finite() || bps < 0.0 {
        return None;
    }
    Some((bps * 1000.0).floor() as u64)
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a decimal fee, got {other}"
        ))),
    }
}
