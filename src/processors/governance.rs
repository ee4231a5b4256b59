//! Governance Processors
//!
//! Authority hand-over and collaborator migration.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
};

use crate::{processors::CommonAccounts, registry::CollaboratorUpdate};

/// Processes `TransferGovernance`. Governance only.
pub fn process_transfer_governance(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    new_governance: Pubkey,
) -> ProgramResult {
    msg!("🏛️ TRANSFER GOVERNANCE TO {}", new_governance);
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    registry.transfer_governance(common.caller.key, new_governance)?;
    common.commit(&registry)
}

/// Processes `SetCollaborators`. Governance only.
pub fn process_set_collaborators(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    update: CollaboratorUpdate,
) -> ProgramResult {
    msg!("🏛️ SET COLLABORATORS");
    let account_info_iter = &mut accounts.iter();
    let common = CommonAccounts::parse(account_info_iter)?;

    let mut registry = common.load(program_id)?;
    registry.set_collaborators(common.caller.key, &update)?;
    common.commit(&registry)
}
