//! Relayer registry program.
//!
//! Relayers stake the governance token to submit withdrawals for users and are
//! charged a per-pool fee, priced by a TWAP oracle, which is distributed to
//! governance stakers through a reward-per-token accumulator. Governance may
//! penalize relayers and correct the accumulator.

pub mod client_sdk;
pub mod constants;
pub mod error;
pub mod processors;
pub mod registry;
pub mod state;
pub mod types;
pub mod utils;

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

pub use error::RegistryError;
pub use registry::Registry;
pub use types::RegistryInstruction;

use processors::*;

solana_program::declare_id!("7BB1QLknpMiV8orKBECx3kTXf3Bv4Mnzf8tT2qHL2xyy");

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

/// Program entrypoint: decodes the instruction and dispatches to its processor.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = RegistryInstruction::try_from_slice(instruction_data).map_err(|_| {
        msg!("❌ Invalid instruction data");
        ProgramError::InvalidInstructionData
    })?;

    match instruction {
        RegistryInstruction::InitializeRegistry { params } => {
            process_initialize_registry(program_id, accounts, params)
        }
        RegistryInstruction::Register { registration } => {
            process_register(program_id, accounts, registration)
        }
        RegistryInstruction::RegisterSubaddress { relayer, subaddress } => {
            process_register_subaddress(program_id, accounts, relayer, subaddress)
        }
        RegistryInstruction::UnregisterSubaddress { subaddress } => {
            process_unregister_subaddress(program_id, accounts, subaddress)
        }
        RegistryInstruction::StakeToRelayer { relayer, amount } => {
            process_stake_to_relayer(program_id, accounts, relayer, amount)
        }
        RegistryInstruction::CreditBalance { relayer, amount } => {
            process_credit_balance(program_id, accounts, relayer, amount)
        }
        RegistryInstruction::DebitBalance { relayer, amount } => {
            process_debit_balance(program_id, accounts, relayer, amount)
        }
        RegistryInstruction::ChargeWithdrawal { sender, relayer, pool_id } => {
            process_charge_withdrawal(program_id, accounts, sender, relayer, pool_id)
        }
        RegistryInstruction::NullifyBalance { relayer } => {
            process_nullify_balance(program_id, accounts, relayer)
        }
        RegistryInstruction::SetMinStakeAmount { amount } => {
            process_set_min_stake_amount(program_id, accounts, amount)
        }
        RegistryInstruction::UpdateStakedBalance { staker, new_amount } => {
            process_update_staked_balance(program_id, accounts, staker, new_amount)
        }
        RegistryInstruction::ClaimRewards => process_claim_rewards(program_id, accounts),
        RegistryInstruction::AddRewards { amount } => process_add_rewards(program_id, accounts, amount),
        RegistryInstruction::AddBurnRewards { amount } => {
            process_add_burn_rewards(program_id, accounts, amount)
        }
        RegistryInstruction::ForceDowngrade { staker } => {
            process_force_downgrade(program_id, accounts, staker)
        }
        RegistryInstruction::ResetRewardPerToken { value } => {
            process_reset_reward_per_token(program_id, accounts, value)
        }
        RegistryInstruction::RescueTokens { amount } => {
            process_rescue_tokens(program_id, accounts, amount)
        }
        RegistryInstruction::RegisterPool { registration } => {
            process_register_pool(program_id, accounts, registration)
        }
        RegistryInstruction::SetOracleParams { update } => {
            process_set_oracle_params(program_id, accounts, update)
        }
        RegistryInstruction::UpdateFeeOfPool { pool_id } => {
            process_update_fee_of_pool(program_id, accounts, pool_id)
        }
        RegistryInstruction::UpdateFeesOfPools { pool_ids } => {
            process_update_fees_of_pools(program_id, accounts, pool_ids)
        }
        RegistryInstruction::UpdateAllFees => process_update_all_fees(program_id, accounts),
        RegistryInstruction::TransferGovernance { new_governance } => {
            process_transfer_governance(program_id, accounts, new_governance)
        }
        RegistryInstruction::SetCollaborators { update } => {
            process_set_collaborators(program_id, accounts, update)
        }
        RegistryInstruction::GetFeeForPoolId { pool_id } => {
            process_get_fee_for_pool_id(program_id, accounts, pool_id)
        }
        RegistryInstruction::GetRelayerBalance { relayer } => {
            process_get_relayer_balance(program_id, accounts, relayer)
        }
    }
}
