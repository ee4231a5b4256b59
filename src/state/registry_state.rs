//! Registry state PDA
//!
//! The global part of the [`Registry`] (configuration, accumulator, audit
//! totals and the bounded pool table) lives in one program-owned account
//! derived from `[REGISTRY_STATE_SEED_PREFIX]`. Every mutating instruction
//! write-locks it, which gives all registry operations a single global order.
//! Its size does not depend on the number of relayers or stakers; their
//! records are separate PDAs (see [`record_accounts`](super::record_accounts)).

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::{REGISTRY_STATE_SEED_PREFIX, VAULT_AUTHORITY_SEED_PREFIX},
    error::RegistryError,
    registry::Registry,
};

/// Registry state PDA and bump.
pub fn registry_state_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REGISTRY_STATE_SEED_PREFIX], program_id)
}

/// Vault authority PDA and bump.
pub fn vault_authority_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED_PREFIX], program_id)
}

impl Registry {
    /// Loads an initialized registry from its PDA.
    ///
    /// Checks the account address and owner before deserializing. Trailing
    /// bytes left over after the state shrank are ignored.
    pub fn load_from_account(account: &AccountInfo, program_id: &Pubkey) -> Result<Self, ProgramError> {
        let (expected, _) = registry_state_address(program_id);
        if *account.key != expected {
            msg!("❌ Invalid registry state PDA: expected {}, got {}", expected, account.key);
            return Err(RegistryError::InvalidStateAccount.into());
        }
        if account.owner != program_id || account.data_is_empty() {
            msg!("❌ Registry state account not owned by this program or empty");
            return Err(RegistryError::NotInitialized.into());
        }

        let data = account.try_borrow_data()?;
        let registry = Registry::deserialize(&mut &data[..]).map_err(|e| {
            msg!("❌ Failed to deserialize registry state: {}", e);
            ProgramError::from(RegistryError::InvalidStateAccount)
        })?;
        if !registry.governance.is_initialized {
            return Err(RegistryError::NotInitialized.into());
        }
        Ok(registry)
    }
}
