//! Read-only Processors
//!
//! Results are published with `set_return_data` as little-endian `u64`.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    pubkey::Pubkey,
};

use crate::{
    processors::parse_record_accounts,
    registry::{PoolId, Registry},
};

/// Processes `GetFeeForPoolId`.
///
/// # Accounts
/// - [0] Registry State PDA
pub fn process_get_fee_for_pool_id(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    pool_id: PoolId,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let registry_state = next_account_info(account_info_iter)?;
    let registry = Registry::load_from_account(registry_state, program_id)?;

    let fee = registry.get_fee_for_pool_id(pool_id)?;
    msg!("💱 Pool {} fee: {}", pool_id, fee);
    set_return_data(&fee.to_le_bytes());
    Ok(())
}

/// Processes `GetRelayerBalance`. Sub-addresses report their relayer's balance.
///
/// # Accounts
/// - [0] Registry State PDA
/// - [1] Address binding PDA of `relayer`
/// - [2] Record PDA of the relayer the address is bound to
pub fn process_get_relayer_balance(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    relayer: Pubkey,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let registry_state = next_account_info(account_info_iter)?;
    let registry = Registry::load_from_account(registry_state, program_id)?;

    let records = parse_record_accounts(program_id, account_info_iter.as_slice());
    let balance = registry.get_relayer_balance(&records, &relayer)?;
    msg!("💰 Relayer {} balance: {}", relayer, balance);
    set_return_data(&balance.to_le_bytes());
    Ok(())
}
