// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Anchor instruction encoding for `deposit_for_burn` and `receive_message`.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::pda::{DepositForBurnPdas, ReceiveMessagePdas};
use crate::chain::addresses::{
    MESSAGE_TRANSMITTER_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_MESSENGER_MINTER_PROGRAM_ID,
};
use crate::error::{CctpError, Result};

/// First 8 bytes of `sha256("global:<name>")`.
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct DepositForBurnParams {
    pub amount: u64,
    pub destination_domain: u32,
    pub mint_recipient: [u8; 32],
    pub destination_caller: [u8; 32],
    pub max_fee: u64,
    pub min_finality_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct ReceiveMessageParams {
    pub message: Vec<u8>,
    pub attestation: Vec<u8>,
}

fn instruction_data<T: BorshSerialize>(name: &str, params: &T) -> Result<Vec<u8>> {
    let mut data = anchor_discriminator(name).to_vec();
    params
        .serialize(&mut data)
        .map_err(|e| CctpError::InvalidMessage(format!("failed to encode {name} params: {e}")))?;
    Ok(data)
}

/// `TokenMessengerMinterV2::deposit_for_burn`.
///
/// `message_sent_event_data` must be a fresh keypair that co-signs the
/// transaction; the program stores the outgoing message in it.
pub fn deposit_for_burn(
    owner: &Pubkey,
    mint: &Pubkey,
    message_sent_event_data: &Pubkey,
    pdas: &DepositForBurnPdas,
    params: &DepositForBurnParams,
) -> Result<Instruction> {
    let accounts = vec![
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new(*owner, true),
        AccountMeta::new_readonly(pdas.sender_authority, false),
        AccountMeta::new(pdas.burn_token_account, false),
        AccountMeta::new_readonly(pdas.denylist_account, false),
        AccountMeta::new(pdas.message_transmitter, false),
        AccountMeta::new_readonly(pdas.token_messenger, false),
        AccountMeta::new_readonly(pdas.remote_token_messenger, false),
        AccountMeta::new_readonly(pdas.token_minter, false),
        AccountMeta::new(pdas.local_token, false),
        AccountMeta::new(*mint, false),
        AccountMeta::new(*message_sent_event_data, true),
        AccountMeta::new_readonly(MESSAGE_TRANSMITTER_PROGRAM_ID, false),
        AccountMeta::new_readonly(TOKEN_MESSENGER_MINTER_PROGRAM_ID, false),
        AccountMeta::new_readonly(spl_token::ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(pdas.event_authority, false),
        AccountMeta::new_readonly(TOKEN_MESSENGER_MINTER_PROGRAM_ID, false),
    ];

    Ok(Instruction::new_with_bytes(
        TOKEN_MESSENGER_MINTER_PROGRAM_ID,
        &instruction_data("deposit_for_burn", params)?,
        accounts,
    ))
}

/// `MessageTransmitterV2::receive_message`, with the token messenger's
/// accounts passed as remaining accounts for the CPI into `handle_receive_message`.
pub fn receive_message(
    payer: &Pubkey,
    pdas: &ReceiveMessagePdas,
    fee_recipient_token_account: &Pubkey,
    recipient_token_account: &Pubkey,
    params: &ReceiveMessageParams,
) -> Result<Instruction> {
    let mut accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(*payer, true),
        AccountMeta::new_readonly(pdas.authority, false),
        AccountMeta::new_readonly(pdas.message_transmitter, false),
        AccountMeta::new(pdas.used_nonce, false),
        AccountMeta::new_readonly(TOKEN_MESSENGER_MINTER_PROGRAM_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(pdas.message_transmitter_event_authority, false),
        AccountMeta::new_readonly(MESSAGE_TRANSMITTER_PROGRAM_ID, false),
    ];

    // remaining accounts
    accounts.extend([
        AccountMeta::new_readonly(pdas.token_messenger, false),
        AccountMeta::new_readonly(pdas.remote_token_messenger, false),
        AccountMeta::new(pdas.token_minter, false),
        AccountMeta::new(pdas.local_token, false),
        AccountMeta::new_readonly(pdas.token_pair, false),
        AccountMeta::new(*fee_recipient_token_account, false),
        AccountMeta::new(*recipient_token_account, false),
        AccountMeta::new(pdas.custody, false),
        AccountMeta::new_readonly(spl_token::ID, false),
        AccountMeta::new_readonly(pdas.token_messenger_event_authority, false),
        AccountMeta::new_readonly(TOKEN_MESSENGER_MINTER_PROGRAM_ID, false),
    ]);

    Ok(Instruction::new_with_bytes(
        MESSAGE_TRANSMITTER_PROGRAM_ID,
        &instruction_data("receive_message", params)?,
        accounts,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::addresses::SOLANA_USDC_MINT_DEVNET;
    use crate::protocol::DomainId;
    use solana_sdk::pubkey;

    const OWNER: Pubkey = pubkey!("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");

    #[test]
    fn test_anchor_discriminators() {
        assert_eq!(
            anchor_discriminator("deposit_for_burn"),
            [215, 60, 61, 46, 114, 55, 128, 176]
        );
        assert_eq!(
            anchor_discriminator("receive_message"),
            [38, 144, 127, 225, 31, 225, 238, 25]
        );
    }

    #[test]
    fn test_deposit_for_burn_layout() {
        let event_data = Pubkey::new_unique();
        let pdas = DepositForBurnPdas::derive(&OWNER, &SOLANA_USDC_MINT_DEVNET, DomainId::Base);
        let params = DepositForBurnParams {
            amount: 5_000_000,
            destination_domain: 6,
            mint_recipient: [0x11; 32],
            destination_caller: [0; 32],
            max_fee: 1_000,
            min_finality_threshold: 1_000,
        };

        let ix = deposit_for_burn(&OWNER, &SOLANA_USDC_MINT_DEVNET, &event_data, &pdas, &params)
            .unwrap();

        assert_eq!(ix.program_id, TOKEN_MESSENGER_MINTER_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 18);
        // discriminator + u64 + u32 + 32 + 32 + u64 + u32
        assert_eq!(ix.data.len(), 8 + 8 + 4 + 32 + 32 + 8 + 4);
        assert_eq!(&ix.data[8..16], &5_000_000u64.to_le_bytes());
        assert_eq!(&ix.data[16..20], &6u32.to_le_bytes());

        let signers: Vec<Pubkey> = ix
            .accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect();
        assert_eq!(signers, vec![OWNER, OWNER, event_data]);
        assert_eq!(ix.accounts[10].pubkey, SOLANA_USDC_MINT_DEVNET);
        assert!(ix.accounts[10].is_writable);
        assert_eq!(ix.accounts[14].pubkey, spl_token::ID);
    }

    #[test]
    fn test_receive_message_layout() {
        let pdas = ReceiveMessagePdas::derive(
            &SOLANA_USDC_MINT_DEVNET,
            DomainId::Ethereum,
            &[0x22; 32],
            &[0x33; 32],
        );
        let fee_recipient = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let params = ReceiveMessageParams {
            message: vec![0xaa; 250],
            attestation: vec![0xbb; 130],
        };

        let ix = receive_message(&OWNER, &pdas, &fee_recipient, &recipient, &params).unwrap();

        assert_eq!(ix.program_id, MESSAGE_TRANSMITTER_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 9 + 11);
        assert_eq!(ix.accounts[4].pubkey, pdas.used_nonce);
        assert_eq!(ix.accounts[14].pubkey, fee_recipient);
        assert_eq!(ix.accounts[15].pubkey, recipient);
        assert!(ix.accounts[15].is_writable);

        // borsh Vec<u8> is a u32 length prefix followed by the bytes
        assert_eq!(&ix.data[8..12], &250u32.to_le_bytes());
        assert_eq!(ix.data.len(), 8 + 4 + 250 + 4 + 130);
    }
}
