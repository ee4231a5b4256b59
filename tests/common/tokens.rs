/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! # Token Utilities
//!
//! Mint, associated token account and balance helpers for program tests.

use solana_program_test::{BanksClient, BanksClientError};
use solana_sdk::{
    hash::Hash,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_instruction,
    transaction::Transaction,
};
use spl_token::{instruction as token_instruction, state::Account as TokenAccount, state::Mint};

use crate::common::TestResult;

pub const GOVERNANCE_TOKEN_DECIMALS: u8 = 9;

/// Create a token mint with `decimals` decimals and `payer` as mint authority
pub async fn create_mint(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    mint: &Keypair,
    decimals: u8,
) -> TestResult {
    let rent = banks.get_rent().await?;
    let lamports = rent.minimum_balance(Mint::LEN);

    let create_account_ix = system_instruction::create_account(
        &payer.pubkey(),
        &mint.pubkey(),
        lamports,
        Mint::LEN as u64,
        &spl_token::id(),
    );
    let initialize_mint_ix = token_instruction::initialize_mint(
        &spl_token::id(),
        &mint.pubkey(),
        &payer.pubkey(),
        None,
        decimals,
    )
    .unwrap();

    let transaction = Transaction::new_signed_with_payer(
        &[create_account_ix, initialize_mint_ix],
        Some(&payer.pubkey()),
        &[payer, mint],
        recent_blockhash,
    );
    banks.process_transaction(transaction).await
}

/// Create the associated token account of `owner` (may be a PDA)
pub async fn create_associated_account(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey, BanksClientError> {
    let ix = spl_associated_token_account::instruction::create_associated_token_account(
        &payer.pubkey(),
        owner,
        mint,
        &spl_token::id(),
    );
    let transaction = Transaction::new_signed_with_payer(&[ix], Some(&payer.pubkey()), &[payer], recent_blockhash);
    banks.process_transaction(transaction).await?;
    Ok(spl_associated_token_account::get_associated_token_address(owner, mint))
}

/// Mint `amount` to `destination`, signed by the mint authority `payer`
pub async fn mint_tokens(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    mint: &Pubkey,
    destination: &Pubkey,
    amount: u64,
) -> TestResult {
    let mint_to_ix = token_instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        &payer.pubkey(),
        &[],
        amount,
    )
    .unwrap();

    let transaction = Transaction::new_signed_with_payer(&[mint_to_ix], Some(&payer.pubkey()), &[payer], recent_blockhash);
    banks.process_transaction(transaction).await
}

/// Token balance of `token_account`
pub async fn get_token_balance(banks: &mut BanksClient, token_account: &Pubkey) -> u64 {
    let account = banks
        .get_account(*token_account)
        .await
        .unwrap()
        .expect("token account exists");
    TokenAccount::unpack(&account.data).unwrap().amount
}

/// Fund a keypair with SOL so it can sign as instruction caller
pub async fn fund_lamports(
    banks: &mut BanksClient,
    payer: &Keypair,
    recent_blockhash: Hash,
    recipient: &Pubkey,
    lamports: u64,
) -> TestResult {
    let ix = system_instruction::transfer(&payer.pubkey(), recipient, lamports);
    let transaction = Transaction::new_signed_with_payer(&[ix], Some(&payer.pubkey()), &[payer], recent_blockhash);
    banks.process_transaction(transaction).await
}
