//! Input Validation Utilities
//!
//! Account checks shared by the processors.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

/// Validates that an account is a signer.
pub fn validate_signer(account: &AccountInfo, context: &str) -> ProgramResult {
    if !account.is_signer {
        msg!("{} must be a signer", context);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Validates that an account is writable.
pub fn validate_writable(account: &AccountInfo, context: &str) -> ProgramResult {
    if !account.is_writable {
        msg!("{} must be writable", context);
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Validates that an account is the expected address.
pub fn validate_address(account: &AccountInfo, expected: &Pubkey, context: &str) -> ProgramResult {
    if account.key != expected {
        msg!("{} mismatch: expected {}, got {}", context, expected, account.key);
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

pub fn validate_system_program(account: &AccountInfo) -> ProgramResult {
    if *account.key != system_program::id() {
        msg!("Invalid system program: {}", account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

pub fn validate_token_program(account: &AccountInfo) -> ProgramResult {
    if *account.key != spl_token::id() {
        msg!("Invalid token program: {}", account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}
