// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Program-derived addresses of the CCTP v2 Solana programs.
//!
//! Every account touched by `deposit_for_burn` and `receive_message` has to be
//! named explicitly, so these derivations must match the on-chain seeds byte
//! for byte or the runtime rejects the transaction.

use solana_sdk::pubkey::Pubkey;

use spl_associated_token_account::get_associated_token_address;

use crate::chain::addresses::{MESSAGE_TRANSMITTER_PROGRAM_ID, TOKEN_MESSENGER_MINTER_PROGRAM_ID};
use crate::protocol::DomainId;

const EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";

fn token_messenger_minter_pda(seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, &TOKEN_MESSENGER_MINTER_PROGRAM_ID).0
}

fn message_transmitter_pda(seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, &MESSAGE_TRANSMITTER_PROGRAM_ID).0
}

/// Remote domains are keyed by their decimal string, not the raw integer.
fn domain_seed(domain: DomainId) -> String {
    domain.as_u32().to_string()
}

/// SPL associated token account of `owner` for `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

pub fn token_messenger() -> Pubkey {
    token_messenger_minter_pda(&[b"token_messenger"])
}

pub fn token_minter() -> Pubkey {
    token_messenger_minter_pda(&[b"token_minter"])
}

pub fn local_token(mint: &Pubkey) -> Pubkey {
    token_messenger_minter_pda(&[b"local_token", mint.as_ref()])
}

pub fn remote_token_messenger(domain: DomainId) -> Pubkey {
    token_messenger_minter_pda(&[b"remote_token_messenger", domain_seed(domain).as_bytes()])
}

pub fn sender_authority() -> Pubkey {
    token_messenger_minter_pda(&[b"sender_authority"])
}

pub fn denylist_account(owner: &Pubkey) -> Pubkey {
    token_messenger_minter_pda(&[b"denylist_account", owner.as_ref()])
}

/// Local/remote token pairing, keyed by the remote domain and the remote
/// USDC address left-padded to 32 bytes.
pub fn token_pair(remote_domain: DomainId, remote_token: &[u8; 32]) -> Pubkey {
    token_messenger_minter_pda(&[
        b"token_pair",
        domain_seed(remote_domain).as_bytes(),
        remote_token.as_ref(),
    ])
}

pub fn custody(mint: &Pubkey) -> Pubkey {
    token_messenger_minter_pda(&[b"custody", mint.as_ref()])
}

pub fn token_messenger_event_authority() -> Pubkey {
    token_messenger_minter_pda(&[EVENT_AUTHORITY_SEED])
}

pub fn message_transmitter() -> Pubkey {
    message_transmitter_pda(&[b"message_transmitter"])
}

/// Authority the message transmitter signs with when calling the receiver.
pub fn message_transmitter_authority(receiver: &Pubkey) -> Pubkey {
    message_transmitter_pda(&[b"message_transmitter_authority", receiver.as_ref()])
}

pub fn used_nonce(nonce: &[u8; 32]) -> Pubkey {
    message_transmitter_pda(&[b"used_nonce", nonce.as_ref()])
}

pub fn message_transmitter_event_authority() -> Pubkey {
    message_transmitter_pda(&[EVENT_AUTHORITY_SEED])
}

/// Accounts read by `deposit_for_burn` besides the signer and the
/// ephemeral message account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositForBurnPdas {
    pub sender_authority: Pubkey,
    pub burn_token_account: Pubkey,
    pub denylist_account: Pubkey,
    pub message_transmitter: Pubkey,
    pub token_messenger: Pubkey,
    pub remote_token_messenger: Pubkey,
    pub token_minter: Pubkey,
    pub local_token: Pubkey,
    pub event_authority: Pubkey,
}

impl DepositForBurnPdas {
    pub fn derive(owner: &Pubkey, mint: &Pubkey, destination_domain: DomainId) -> Self {
        Self {
            sender_authority: sender_authority(),
            burn_token_account: associated_token_address(owner, mint),
            denylist_account: denylist_account(owner),
            message_transmitter: message_transmitter(),
            token_messenger: token_messenger(),
            remote_token_messenger: remote_token_messenger(destination_domain),
            token_minter: token_minter(),
            local_token: local_token(mint),
            event_authority: token_messenger_event_authority(),
        }
    }
}

/// Accounts read by `receive_message`, minus the fee recipient's token
/// account which lives in the token messenger's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveMessagePdas {
    pub message_transmitter: Pubkey,
    pub authority: Pubkey,
    pub used_nonce: Pubkey,
    pub message_transmitter_event_authority: Pubkey,
    pub token_messenger: Pubkey,
    pub remote_token_messenger: Pubkey,
    pub token_minter: Pubkey,
    pub local_token: Pubkey,
    pub token_pair: Pubkey,
    pub custody: Pubkey,
    pub token_messenger_event_authority: Pubkey,
}

impl ReceiveMessagePdas {
    pub fn derive(
        mint: &Pubkey,
        source_domain: DomainId,
        source_usdc: &[u8; 32],
        nonce: &[u8; 32],
    ) -> Self {
        Self {
            message_transmitter: message_transmitter(),
            authority: message_transmitter_authority(&TOKEN_MESSENGER_MINTER_PROGRAM_ID),
            used_nonce: used_nonce(nonce),
            message_transmitter_event_authority: message_transmitter_event_authority(),
            token_messenger: token_messenger(),
            remote_token_messenger: remote_token_messenger(source_domain),
            token_minter: token_minter(),
            local_token: local_token(mint),
            token_pair: token_pair(source_domain, source_usdc),
            custody: custody(mint),
            token_messenger_event_authority: token_messenger_event_authority(),
        }
    }
}
