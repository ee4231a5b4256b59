//! Relayer Processors
//!
//! Registration, sub-address management, stake top-ups and the governance
//! penalties on relayer balances.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
};

use crate::{
    processors::{current_timestamp, parse_record_accounts, parse_vault_accounts, CommonAccounts},
    registry::Registration,
    utils::account_adapters::NameRecordResolver,
};

/// Processes `Register`.
///
/// # Accounts
/// - [0..=6] Common and vault accounts
/// - [7] Name record account
/// - [8..] Record PDAs: relayer record, identity claim, and the address
///   binding of the caller and of every listed sub-address
pub fn process_register(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    registration: Registration,
) -> ProgramResult {
    msg!("📝 REGISTER RELAYER");
    msg!("💰 Stake: {}", registration.stake);
    msg!("👥 Sub-addresses: {}", registration.subaddresses.len());

    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    msg!("⏳ Step 1/3: Loading registry and identity proof");
    let mut registry = common.load(program_id)?;
    let mut vault = parse_vault_accounts(program_id, account_info_iter, &common, &registry)?;
    let name_record = next_account_info(account_info_iter)?; // Index 7: Name record
    let resolver = NameRecordResolver::from_account(name_record, &registry.governance.name_service_program)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());

    msg!("⏳ Step 2/3: Registering {}", common.caller.key);
    registry.register(
        &mut records,
        common.caller.key,
        &registration,
        &resolver,
        &mut vault,
        current_timestamp()?,
    )?;

    msg!("⏳ Step 3/3: Saving registry state and records");
    common.commit_with_records(&registry, records)?;
    msg!("🎉 RELAYER {} REGISTERED", common.caller.key);
    Ok(())
}

/// Processes `RegisterSubaddress`.
///
/// # Accounts
/// - [0..=2] Common accounts
/// - [3..] Record PDAs: relayer record, sub-address binding
pub fn process_register_subaddress(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    relayer: Pubkey,
    subaddress: Pubkey,
) -> ProgramResult {
    msg!("👥 REGISTER SUB-ADDRESS {} FOR {}", subaddress, relayer);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    registry.register_subaddress(&mut records, common.caller.key, &relayer, &subaddress)?;
    common.commit_with_records(&registry, records)
}

/// Processes `UnregisterSubaddress`.
///
/// # Accounts
/// - [0..=2] Common accounts
/// - [3..] Record PDAs: sub-address binding, record of the owning relayer
pub fn process_unregister_subaddress(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    subaddress: Pubkey,
) -> ProgramResult {
    msg!("👥 UNREGISTER SUB-ADDRESS {}", subaddress);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let owner = registry.unregister_subaddress(&mut records, common.caller.key, &subaddress)?;
    msg!("✅ {} no longer acts for {}", subaddress, owner);
    common.commit_with_records(&registry, records)
}

/// Processes `StakeToRelayer`.
///
/// # Accounts
/// - [0..=6] Common and vault accounts
/// - [7] Relayer record PDA
pub fn process_stake_to_relayer(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    relayer: Pubkey,
    amount: u64,
) -> ProgramResult {
    msg!("💰 STAKE {} TO RELAYER {}", amount, relayer);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut vault = parse_vault_accounts(program_id, account_info_iter, &common, &registry)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let balance = registry.stake_to_relayer(&mut records, common.caller.key, &relayer, amount, &mut vault)?;
    msg!("✅ Relayer balance now {}", balance);
    common.commit_with_records(&registry, records)
}

/// Processes `NullifyBalance`. Governance only.
///
/// # Accounts
/// - [0..=2] Common accounts
/// - [3] Relayer record PDA
pub fn process_nullify_balance(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    relayer: Pubkey,
) -> ProgramResult {
    msg!("⛔ NULLIFY RELAYER BALANCE {}", relayer);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let removed = registry.nullify_balance(&mut records, common.caller.key, &relayer)?;
    msg!("✅ {} removed from {}", removed, relayer);
    common.commit_with_records(&registry, records)
}

/// Processes `SetMinStakeAmount`. Governance only.
pub fn process_set_min_stake_amount(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    msg!("🔧 SET MINIMUM STAKE {}", amount);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    registry.set_min_stake_amount(common.caller.key, amount)?;
    common.commit(&registry)
}
