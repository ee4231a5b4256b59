//! Reentrancy Protection Utilities
//!
//! Pre/post snapshots around the vault CPI. The registry finishes all of its
//! bookkeeping before calling the token program; the snapshot additionally
//! verifies that the CPI moved exactly the expected amount and did not touch
//! the vault's mint, owner or freeze state.

use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::state::{Account as TokenAccount, AccountState};

/// Vault token account state captured before a CPI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountSnapshot {
    pub account_key: Pubkey,
    pub balance: u64,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub frozen: bool,
}

impl TokenAccountSnapshot {
    pub fn capture(account: &AccountInfo) -> Result<Self, ProgramError> {
        let token_account = unpack_token_account(account)?;
        Ok(Self {
            account_key: *account.key,
            balance: token_account.amount,
            mint: token_account.mint,
            owner: token_account.owner,
            frozen: token_account.state == AccountState::Frozen,
        })
    }

    /// Checks the account moved by exactly `expected_change` and nothing else changed.
    pub fn validate_changes(
        &self,
        account: &AccountInfo,
        expected_change: i128,
        operation_name: &str,
    ) -> Result<(), ProgramError> {
        let current = unpack_token_account(account)?;

        if current.mint != self.mint || current.owner != self.owner {
            msg!("❌ REENTRANCY PROTECTION: vault mint or owner changed during {}", operation_name);
            return Err(ProgramError::InvalidAccountData);
        }
        if (current.state == AccountState::Frozen) != self.frozen {
            msg!("❌ REENTRANCY PROTECTION: vault freeze state changed during {}", operation_name);
            return Err(ProgramError::InvalidAccountData);
        }

        let actual_change = current.amount as i128 - self.balance as i128;
        if actual_change != expected_change {
            msg!(
                "❌ REENTRANCY PROTECTION: {} moved {} instead of {} ({} → {})",
                operation_name,
                actual_change,
                expected_change,
                self.balance,
                current.amount
            );
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(())
    }
}

/// Runs a vault transfer between a snapshot and its validation.
pub struct SafeTokenTransfer<'a, 'b> {
    vault: &'a AccountInfo<'b>,
    expected_change: i128,
    operation_name: &'static str,
}

impl<'a, 'b> SafeTokenTransfer<'a, 'b> {
    pub fn new(vault: &'a AccountInfo<'b>, expected_change: i128, operation_name: &'static str) -> Self {
        Self {
            vault,
            expected_change,
            operation_name,
        }
    }

    pub fn execute_with_protection<F>(self, transfer_fn: F) -> Result<(), ProgramError>
    where
        F: FnOnce() -> Result<(), ProgramError>,
    {
        let snapshot = TokenAccountSnapshot::capture(self.vault)?;
        transfer_fn()?;
        snapshot.validate_changes(self.vault, self.expected_change, self.operation_name)
    }
}

pub fn unpack_token_account(account: &AccountInfo) -> Result<TokenAccount, ProgramError> {
    if account.owner != &spl_token::id() {
        msg!("❌ {} is not owned by the SPL Token program", account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    let data = account.try_borrow_data()?;
    TokenAccount::unpack(&data).map_err(|_| {
        msg!("❌ {} is not an initialized token account", account.key);
        ProgramError::InvalidAccountData
    })
}
