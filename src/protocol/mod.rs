// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP protocol types and definitions
//!
//! Domain identifiers, finality thresholds, the message header, attestation
//! responses, fee quotes and USDC amounts.

mod amount;
mod attestation;
mod domain_id;
mod fee;
mod finality;
mod message;

pub use amount::{
    amount_after_fee, validate_bridge_amount, UsdcAmount, DEFAULT_MINIMUM_AMOUNT, USDC_DECIMALS,
};
pub use attestation::{Attestation, AttestationStatus, MessagesResponse, V2Message};
pub use domain_id::{DomainId, InvalidDomainId};
pub use fee::{compute_fee, FeeQuote, FeeTier, FALLBACK_FEE};
pub use finality::FinalityThreshold;
pub use message::MessageHeader;
