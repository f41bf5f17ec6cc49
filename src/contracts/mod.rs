// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP v2 contract bindings
//!
//! Alloy-generated bindings for USDC, TokenMessengerV2 and MessageTransmitterV2.
//! Write calls are built as unsigned `TransactionRequest`s so the connected
//! wallet can sign them.

pub mod erc20;
pub mod message_transmitter_v2;
pub mod token_messenger_v2;
