// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! USDC amounts in base units.
//!
//! USDC has 6 decimals on every supported chain. Amounts are parsed from the
//! decimal strings users type and kept as integers from then on.

use alloy_primitives::U256;
use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::error::{CctpError, Result};

pub const USDC_DECIMALS: u32 = 6;

const UNIT: u64 = 10u64.pow(USDC_DECIMALS);

/// Smallest transfer accepted by [`validate_bridge_amount`] callers by default (0.01 USDC).
pub const DEFAULT_MINIMUM_AMOUNT: UsdcAmount = UsdcAmount::from_base_units(10_000);

const INVALID_AMOUNT: &str = "Please enter a valid amount";

/// A USDC amount in base units (1 USDC = 1_000_000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct UsdcAmount(u64);

impl UsdcAmount {
    pub const ZERO: Self = Self(0);

    pub const fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    pub const fn base_units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn as_u256(self) -> U256 {
        U256::from(self.0)
    }

    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Renders with all six decimals, e.g. `"1.500000"`.
    pub fn to_fixed_string(self) -> String {
        format!("{}.{:06}", self.0 / UNIT, self.0 % UNIT)
    }
}

impl FromStr for UsdcAmount {
    type Err = CctpError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CctpError::InvalidAmount(INVALID_AMOUNT.to_string());

        let s = s.trim();
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > USDC_DECIMALS as usize {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };
        let fraction_units = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<6}");
            padded.parse::<u64>().map_err(|_| invalid())?
        };

        whole_units
            .checked_mul(UNIT)
            .and_then(|units| units.checked_add(fraction_units))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for UsdcAmount {
    /// Trailing zeros are trimmed, e.g. `0.01` or `25`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let fraction = self.0 % UNIT;
        if fraction == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{fraction:06}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Validates a user-entered amount against the connected balance.
///
/// Error messages are shown to the user verbatim.
pub fn validate_bridge_amount(
    input: &str,
    balance: UsdcAmount,
    minimum: UsdcAmount,
) -> Result<UsdcAmount> {
    let amount: UsdcAmount = input.parse()?;

    if amount.is_zero() {
        return Err(CctpError::InvalidAmount(INVALID_AMOUNT.to_string()));
    }
    if amount < minimum {
        return Err(CctpError::InvalidAmount(format!(
            "Minimum amount is {minimum} USDC"
        )));
    }
    if amount > balance {
        return Err(CctpError::InvalidAmount("Insufficient balance".to_string()));
    }

    Ok(amount)
}

/// Amount minted on the destination once the fee is taken, floored at zero.
pub const fn amount_after_fee(amount: UsdcAmount, fee: UsdcAmount) -> UsdcAmount {
    amount.saturating_sub(fee)
}
