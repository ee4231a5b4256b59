//! Fee Oracle Processors
//!
//! Pool registration and parameter changes (governance) and the permissionless
//! fee refreshes.

use borsh::BorshSerialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    pubkey::Pubkey,
};

use crate::{
    processors::{current_timestamp, CommonAccounts},
    registry::{BatchUpdateReport, OracleParamsUpdate, PoolId, PoolRegistration},
    utils::account_adapters::AccountPriceFeed,
};

/// Processes `RegisterPool`. Governance only.
pub fn process_register_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    registration: PoolRegistration,
) -> ProgramResult {
    msg!("🏊 REGISTER POOL {}", registration.pool_address);
    msg!("   • Token: {} (non-native: {})", registration.token_address, registration.is_non_native_token);
    msg!("   • Swap fee tier: {}", registration.swap_fee_tier);
    msg!("   • Denomination: {}", registration.denomination);
    msg!("   • Protocol fee: {} bps", registration.protocol_fee_bps);

    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let pool_id = registry.register_pool(common.caller.key, &registration)?;
    set_return_data(&pool_id.to_le_bytes());
    common.commit(&registry)
}

/// Processes `SetOracleParams`. Governance only.
pub fn process_set_oracle_params(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    update: OracleParamsUpdate,
) -> ProgramResult {
    msg!("🔧 SET ORACLE PARAMS {:?}", update);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    registry.set_oracle_params(common.caller.key, &update)?;
    common.commit(&registry)
}

/// Processes `UpdateFeeOfPool`. Fails if the new fee would be zero.
///
/// # Accounts
/// - [0..=2] Common accounts
/// - [3..] Price feed accounts
pub fn process_update_fee_of_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    pool_id: PoolId,
) -> ProgramResult {
    msg!("💱 UPDATE FEE OF POOL {}", pool_id);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let feed = AccountPriceFeed::from_accounts(account_info_iter.as_slice(), &registry.governance.price_feed_program)?;
    let fee = registry.update_fee_of_pool(pool_id, &feed, current_timestamp()?)?;
    set_return_data(&fee.to_le_bytes());
    common.commit(&registry)
}

/// Processes `UpdateFeesOfPools`. Pools that fail are logged and skipped.
pub fn process_update_fees_of_pools(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    pool_ids: Vec<PoolId>,
) -> ProgramResult {
    msg!("💱 UPDATE FEES OF {} POOLS", pool_ids.len());
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let feed = AccountPriceFeed::from_accounts(account_info_iter.as_slice(), &registry.governance.price_feed_program)?;
    let report = registry.update_fees_of_pools(&pool_ids, &feed, current_timestamp()?)?;
    publish_report(&report)?;
    common.commit(&registry)
}

/// Processes `UpdateAllFees`.
pub fn process_update_all_fees(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("💱 UPDATE ALL FEES");
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    let feed = AccountPriceFeed::from_accounts(account_info_iter.as_slice(), &registry.governance.price_feed_program)?;
    let report = registry.update_all_fees(&feed, current_timestamp()?)?;
    publish_report(&report)?;
    common.commit(&registry)
}

/// Logs failures and returns the updated `(pool_id, fee)` pairs as return data.
fn publish_report(report: &BatchUpdateReport) -> ProgramResult {
    msg!("📊 {} updated, {} failed", report.updated.len(), report.failed.len());
    for (pool_id, error) in &report.failed {
        msg!("   • Pool {}: {}", pool_id, error);
    }
    set_return_data(&report.updated.try_to_vec()?);
    Ok(())
}
