// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain adapters
//!
//! One adapter per execution model. Each borrows the connected wallet for the
//! duration of a call and returns once the operation is confirmed on-chain.

mod evm;
pub mod solana;

pub use evm::EvmAdapter;
pub use solana::SolanaAdapter;
