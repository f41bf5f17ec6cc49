// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Production implementations of the trait abstractions.
//!
//! These talk to Circle's Iris API, EVM chains through Alloy providers,
//! Solana through `solana-client` and the tokio clock. Tests use the fakes in
//! `crate::testing` instead.

mod alloy;
mod iris;
mod solana_rpc;
mod tokio_clock;

pub use self::alloy::AlloyEvmWallet;
pub use self::iris::IrisAttestationProvider;
pub use self::solana_rpc::RpcSolanaConnection;
pub use self::tokio_clock::TokioClock;
