//! Upgrade-authority checks guarding registry initialization.

use solana_program::{
    account_info::AccountInfo,
    bpf_loader_upgradeable::{self, UpgradeableLoaderState},
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::error::RegistryError;

/// Program data address of `program_id` under the upgradeable loader.
pub fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}

/// Validates that `authority_account` may initialize the registry.
///
/// On a deployed program this is the upgrade authority recorded in the
/// program data account. When the program is not loaded by the upgradeable
/// loader (local program-test runs) any signer is accepted.
pub fn validate_program_upgrade_authority(
    program_id: &Pubkey,
    program_data_account: &AccountInfo,
    authority_account: &AccountInfo,
) -> Result<(), ProgramError> {
    if !authority_account.is_signer {
        msg!("❌ Initializer must be a signer");
        return Err(ProgramError::MissingRequiredSignature);
    }

    let expected_program_data_address = get_program_data_address(program_id);
    if *program_data_account.key != expected_program_data_address {
        msg!("❌ Invalid program data account: expected {}, got {}", expected_program_data_address, program_data_account.key);
        return Err(ProgramError::InvalidAccountData);
    }

    if *program_data_account.owner != bpf_loader_upgradeable::id() {
        msg!("⚠️ Program data account not owned by the upgradeable loader, accepting signer {}", authority_account.key);
        return Ok(());
    }

    let program_data = program_data_account.try_borrow_data()?;
    let upgrade_authority = match bincode::deserialize::<UpgradeableLoaderState>(&program_data) {
        Ok(UpgradeableLoaderState::ProgramData { upgrade_authority_address, .. }) => upgrade_authority_address,
        _ => {
            msg!("❌ Program data account does not hold program data");
            return Err(ProgramError::InvalidAccountData);
        }
    };

    match upgrade_authority {
        Some(authority) if authority == *authority_account.key => {
            msg!("✅ Upgrade authority validated: {}", authority);
            Ok(())
        }
        Some(authority) => {
            msg!("❌ UNAUTHORIZED: expected upgrade authority {}, got {}", authority, authority_account.key);
            Err(RegistryError::Unauthorized.into())
        }
        None => {
            msg!("❌ Program is immutable, nobody may initialize");
            Err(RegistryError::Unauthorized.into())
        }
    }
}
