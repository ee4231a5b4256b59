//! Processors Module
//!
//! One function per instruction. Each processor parses and validates its
//! accounts, loads the registry globals from their PDA, wraps the passed
//! participant record PDAs in an [`AccountRecords`] store, runs the registry
//! operation and writes back the globals and the records it changed. Token
//! transfers happen inside the registry operation, after its bookkeeping;
//! accounts are written last.

pub mod fee_oracle;
pub mod governance;
pub mod initialize;
pub mod relayer;
pub mod staking;
pub mod views;
pub mod withdrawal;

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::{
    constants::VAULT_AUTHORITY_SEED_PREFIX,
    registry::Registry,
    state::AccountRecords,
    utils::{
        account_adapters::SplTokenVault,
        serialization::serialize_to_account,
        validation::{validate_address, validate_signer, validate_system_program, validate_token_program, validate_writable},
    },
};

pub use fee_oracle::*;
pub use governance::*;
pub use initialize::*;
pub use relayer::*;
pub use staking::*;
pub use views::*;
pub use withdrawal::*;

/// Accounts [0..=2] shared by every mutating instruction.
pub struct CommonAccounts<'a, 'b> {
    pub caller: &'a AccountInfo<'b>,
    pub registry_state: &'a AccountInfo<'b>,
    pub system_program: &'a AccountInfo<'b>,
}

impl<'a, 'b> CommonAccounts<'a, 'b> {
    pub fn parse<I>(account_info_iter: &mut I) -> Result<Self, ProgramError>
    where
        I: Iterator<Item = &'a AccountInfo<'b>>,
    {
        let caller = next_account_info(account_info_iter)?;          // Index 0: Caller
        let registry_state = next_account_info(account_info_iter)?;  // Index 1: Registry State PDA
        let system_program = next_account_info(account_info_iter)?;  // Index 2: System Program

        validate_signer(caller, "Caller")?;
        validate_writable(registry_state, "Registry state")?;
        validate_system_program(system_program)?;
        Ok(Self {
            caller,
            registry_state,
            system_program,
        })
    }

    pub fn load(&self, program_id: &Pubkey) -> Result<Registry, ProgramError> {
        Registry::load_from_account(self.registry_state, program_id)
    }

    /// Writes the registry back, growing the account at the caller's expense.
    pub fn commit(&self, registry: &Registry) -> ProgramResult {
        serialize_to_account(registry, self.registry_state, self.caller, self.system_program)?;
        msg!("💾 Registry state saved");
        Ok(())
    }

    /// Writes changed participant records, then the registry.
    pub fn commit_with_records(&self, registry: &Registry, records: AccountRecords<'a, 'b>) -> ProgramResult {
        records.commit(self.caller, self.system_program)?;
        self.commit(registry)
    }
}

/// Wraps `accounts` as the participant record store of the instruction.
pub fn parse_record_accounts<'a, 'b>(program_id: &Pubkey, accounts: &'a [AccountInfo<'b>]) -> AccountRecords<'a, 'b> {
    AccountRecords::new(program_id, accounts)
}

/// Splits `count` record accounts off the front of `accounts`.
pub fn split_record_accounts<'a, 'b>(
    accounts: &'a [AccountInfo<'b>],
    count: usize,
) -> Result<(&'a [AccountInfo<'b>], &'a [AccountInfo<'b>]), ProgramError> {
    if accounts.len() < count {
        msg!("❌ Expected {} record accounts, got {}", count, accounts.len());
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    Ok(accounts.split_at(count))
}

/// Parses accounts [3..=6] into the vault adapter for `common.caller`.
pub fn parse_vault_accounts<'a, 'b, I>(
    program_id: &Pubkey,
    account_info_iter: &mut I,
    common: &CommonAccounts<'a, 'b>,
    registry: &Registry,
) -> Result<SplTokenVault<'a, 'b>, ProgramError>
where
    I: Iterator<Item = &'a AccountInfo<'b>>,
{
    let vault = next_account_info(account_info_iter)?;              // Index 3: Vault token account
    let vault_authority = next_account_info(account_info_iter)?;    // Index 4: Vault authority PDA
    let user_token_account = next_account_info(account_info_iter)?; // Index 5: Caller token account
    let token_program = next_account_info(account_info_iter)?;      // Index 6: SPL Token Program

    validate_address(vault, &registry.governance.vault, "Vault")?;
    validate_writable(vault, "Vault")?;
    let expected_authority = Pubkey::create_program_address(
        &[VAULT_AUTHORITY_SEED_PREFIX, &[registry.governance.vault_authority_bump]],
        program_id,
    )?;
    validate_address(vault_authority, &expected_authority, "Vault authority")?;
    validate_writable(user_token_account, "Caller token account")?;
    validate_token_program(token_program)?;

    Ok(SplTokenVault {
        vault,
        vault_authority,
        user: common.caller,
        user_token_account,
        token_program,
        vault_authority_bump: registry.governance.vault_authority_bump,
    })
}

pub fn current_timestamp() -> Result<i64, ProgramError> {
    Ok(Clock::get()?.unix_timestamp)
}
