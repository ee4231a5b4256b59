//! Serialization Utilities
//!
//! Creates program-owned PDAs and writes borsh state into them, growing the
//! account when the serialized state no longer fits.

use borsh::BorshSerialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::{ProgramResult, MAX_PERMITTED_DATA_INCREASE},
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};

/// Creates the PDA `account` with `space` bytes, owned by `program_id`.
///
/// Lamports already sent to the address are kept and only the rent shortfall
/// is paid by `payer`, so a pre-funded address cannot block creation.
pub fn create_pda_account<'a>(
    program_id: &Pubkey,
    account: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let rent_needed = Rent::get()?.minimum_balance(space);
    if account.lamports() == 0 {
        invoke_signed(
            &system_instruction::create_account(payer.key, account.key, rent_needed, space as u64, program_id),
            &[payer.clone(), account.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
        return Ok(());
    }

    let shortfall = rent_needed.saturating_sub(account.lamports());
    if shortfall > 0 {
        invoke(
            &system_instruction::transfer(payer.key, account.key, shortfall),
            &[payer.clone(), account.clone(), system_program.clone()],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(account.key, space as u64),
        &[account.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(account.key, program_id),
        &[account.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    Ok(())
}

/// Serializes `data` into `account`, reallocating it first if needed.
///
/// The state is serialized to a buffer before anything is written, so a
/// serialization failure never leaves a half-written account. Growth is
/// paid by `payer`, which must be a writable signer.
pub fn serialize_to_account<'a, T: BorshSerialize>(
    data: &T,
    account: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
) -> ProgramResult {
    let mut buffer = Vec::new();
    data.serialize(&mut buffer).map_err(|e| {
        msg!("❌ State serialization failed: {}", e);
        ProgramError::InvalidAccountData
    })?;

    if buffer.len() > account.data_len() {
        grow_account(account, payer, system_program, buffer.len())?;
    }

    let mut account_data = account.try_borrow_mut_data()?;
    account_data[..buffer.len()].copy_from_slice(&buffer);
    Ok(())
}

/// Reallocates `account` to at least `required` bytes and tops up its rent.
fn grow_account<'a>(
    account: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    required: usize,
) -> ProgramResult {
    let current = account.data_len();
    // 25% headroom, capped at one realloc step
    let new_len = required
        .saturating_add(required / 4)
        .min(current.saturating_add(MAX_PERMITTED_DATA_INCREASE));
    if new_len < required {
        msg!("❌ State grew by more than one realloc step: {} → {}", current, required);
        return Err(ProgramError::AccountDataTooSmall);
    }

    let rent_needed = Rent::get()?
        .minimum_balance(new_len)
        .saturating_sub(account.lamports());
    if rent_needed > 0 {
        if !payer.is_signer {
            msg!("❌ Payer must sign to fund state growth");
            return Err(ProgramError::MissingRequiredSignature);
        }
        invoke(
            &system_instruction::transfer(payer.key, account.key, rent_needed),
            &[payer.clone(), account.clone(), system_program.clone()],
        )?;
    }

    account.realloc(new_len, false)?;
    msg!("📐 Account {} resized: {} → {} bytes", account.key, current, new_len);
    Ok(())
}
