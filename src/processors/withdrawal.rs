//! Withdrawal Path Processors
//!
//! Entry points for the withdrawal router: fee credits, debits and the
//! complete fee-charging flow for a relayed withdrawal.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
};

use crate::{
    processors::{current_timestamp, parse_record_accounts, parse_vault_accounts, split_record_accounts, CommonAccounts},
    registry::PoolId,
    utils::account_adapters::AccountPriceFeed,
};

/// Processes `CreditBalance`. Withdrawal router only.
///
/// # Accounts
/// - [0..=6] Common and vault accounts (caller is the router)
/// - [7] Relayer record PDA
pub fn process_credit_balance(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    relayer: Pubkey,
    amount: u64,
) -> ProgramResult {
    msg!("➕ CREDIT {} TO RELAYER {}", amount, relayer);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut vault = parse_vault_accounts(program_id, account_info_iter, &common, &registry)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let balance = registry.credit_balance(&mut records, common.caller.key, &relayer, amount, &mut vault)?;
    msg!("✅ Relayer balance now {}, reward per token {}", balance, registry.staking.reward_per_token_stored);
    common.commit_with_records(&registry, records)
}

/// Processes `DebitBalance`. Withdrawal router only.
///
/// # Accounts
/// - [0..=2] Common accounts (caller is the router)
/// - [3] Relayer record PDA
pub fn process_debit_balance(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    relayer: Pubkey,
    amount: u64,
) -> ProgramResult {
    msg!("➖ DEBIT {} FROM RELAYER {}", amount, relayer);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let balance = registry.debit_balance(&mut records, common.caller.key, &relayer, amount)?;
    msg!("✅ Relayer balance now {}", balance);
    common.commit_with_records(&registry, records)
}

/// Processes `ChargeWithdrawal`. Withdrawal router only.
///
/// # Accounts
/// - [0..=2] Common accounts (caller is the router)
/// - [3] Sender address binding PDA
/// - [4] Relayer address binding PDA
/// - [5] Relayer record PDA
/// - [6..] Price feed accounts, used when the pool fee must be refreshed
pub fn process_charge_withdrawal(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    sender: Pubkey,
    relayer: Pubkey,
    pool_id: PoolId,
) -> ProgramResult {
    msg!("🧾 CHARGE WITHDRAWAL FEE");
    msg!("   • Sender: {}", sender);
    msg!("   • Relayer: {}", relayer);
    msg!("   • Pool: {}", pool_id);

    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let (record_accounts, feed_accounts) = split_record_accounts(account_info_iter.as_slice(), 3)?;
    let mut records = parse_record_accounts(program_id, record_accounts);
    let feed = AccountPriceFeed::from_accounts(feed_accounts, &registry.governance.price_feed_program)?;
    let fee = registry.charge_withdrawal(
        &mut records,
        common.caller.key,
        &sender,
        &relayer,
        pool_id,
        &feed,
        current_timestamp()?,
    )?;
    msg!("✅ Fee charged: {}", fee);
    common.commit_with_records(&registry, records)
}
