// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bridge step orchestrator
//!
//! A transfer is a fixed sequence of steps chosen by the source chain's
//! execution model. [`BridgeOrchestrator`] owns the per-step state, gates
//! each step on its predecessor and dispatches to the EVM or Solana adapter
//! bound to the route at [`initialize`](BridgeOrchestrator::initialize) time.

mod binding;
mod config;
mod intent;
mod orchestrator;
mod step;

pub use binding::{ClaimBinding, DepositBinding, RouteBinding};
pub use config::{ConfirmationConfig, PollingConfig};
pub use intent::{Recipient, TransferIntent};
pub use orchestrator::BridgeOrchestrator;
pub use step::{step_sequence, StepKind, StepState, StepStatus};
