//! Staking Reward Processors
//!
//! Stake mirroring, reward claims, governance reward injection and the
//! corrective operations on the reward accumulator.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    pubkey::Pubkey,
};

use crate::processors::{parse_record_accounts, parse_vault_accounts, CommonAccounts};

/// Processes `UpdateStakedBalance`. Stake source only.
///
/// # Accounts
/// - [0..=2] Common accounts (caller is the stake source)
/// - [3] Stake account PDA of `staker`
pub fn process_update_staked_balance(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    staker: Pubkey,
    new_amount: u64,
) -> ProgramResult {
    msg!("🔒 UPDATE STAKED BALANCE OF {} TO {}", staker, new_amount);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    registry.update_staked_balance(&mut records, common.caller.key, &staker, new_amount)?;
    msg!("✅ Total staked: {}", registry.staking.total_staked);
    common.commit_with_records(&registry, records)
}

/// Processes `ClaimRewards`. Publishes the claimed amount as return data.
///
/// # Accounts
/// - [0..=6] Common and vault accounts
/// - [7] Stake account PDA of the caller
pub fn process_claim_rewards(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("💸 CLAIM REWARDS");
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut vault = parse_vault_accounts(program_id, account_info_iter, &common, &registry)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let claimed = registry.claim_rewards(&mut records, common.caller.key, &mut vault)?;
    msg!("✅ {} claimed {}", common.caller.key, claimed);
    set_return_data(&claimed.to_le_bytes());
    common.commit_with_records(&registry, records)
}

/// Processes `AddRewards`. Governance only.
///
/// # Accounts
/// - [0..=6] Common and vault accounts
pub fn process_add_rewards(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
    msg!("📥 ADD REWARDS {}", amount);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut vault = parse_vault_accounts(program_id, account_info_iter, &common, &registry)?;
    registry.add_rewards(common.caller.key, amount, &mut vault)?;
    common.commit(&registry)
}

/// Processes `AddBurnRewards`. Governance only.
pub fn process_add_burn_rewards(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
    msg!("🔥 BURN REWARDS {}", amount);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let decrease = registry.add_burn_rewards(common.caller.key, amount)?;
    msg!("✅ Reward per token lowered by {}", decrease);
    common.commit(&registry)
}

/// Processes `ForceDowngrade`. Governance only.
///
/// # Accounts
/// - [0..=2] Common accounts
/// - [3] Stake account PDA of `staker`
pub fn process_force_downgrade(program_id: &Pubkey, accounts: &[AccountInfo], staker: Pubkey) -> ProgramResult {
    msg!("⬇️ FORCE DOWNGRADE {}", staker);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let outcome = registry.force_downgrade(&mut records, common.caller.key, &staker)?;
    msg!("✅ {:?}", outcome);
    common.commit_with_records(&registry, records)
}

/// Processes `ResetRewardPerToken`. Governance only.
pub fn process_reset_reward_per_token(program_id: &Pubkey, accounts: &[AccountInfo], value: u128) -> ProgramResult {
    msg!("🛠️ RESET REWARD PER TOKEN TO {}", value);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    registry.reset_reward_per_token(common.caller.key, value)?;
    common.commit(&registry)
}

/// Processes `RescueTokens`. Governance only.
///
/// # Accounts
/// - [0..=6] Common and vault accounts (destination owned by governance)
pub fn process_rescue_tokens(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
    msg!("🛟 RESCUE TOKENS {}", amount);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let mut vault = parse_vault_accounts(program_id, account_info_iter, &common, &registry)?;
    let rescued = registry.rescue_tokens(common.caller.key, amount, &mut vault)?;
    set_return_data(&rescued.to_le_bytes());
    common.commit(&registry)
}
