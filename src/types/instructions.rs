//! Registry Instructions
//!
//! Every instruction the relayer registry program accepts. Instruction data is
//! the borsh encoding of [`RegistryInstruction`].
//!
//! Unless stated otherwise, mutating instructions start with the same three
//! accounts:
//! - [0] Caller (signer, writable: pays rent when the state account grows)
//! - [1] Registry State PDA (writable)
//! - [2] System Program
//!
//! Token-moving instructions append the vault accounts:
//! - [3] Vault token account (writable)
//! - [4] Vault authority PDA
//! - [5] Caller token account (writable)
//! - [6] SPL Token Program
//!
//! Participant records (relayers, address bindings, identity claims, stake
//! accounts) live in their own PDAs and follow the fixed accounts. Record PDAs
//! that do not exist yet are created at the caller's expense.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::registry::{
    CollaboratorUpdate, InitializeParams, OracleParamsUpdate, PoolId, PoolRegistration,
    Registration,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum RegistryInstruction {
    /// Creates the registry state PDA and stores the collaborator configuration.
    ///
    /// Only the program upgrade authority may initialize; a second call fails
    /// with `AlreadyInitialized`.
    ///
    /// # Accounts:
    /// - [0] Upgrade authority (signer, writable, pays for the state account)
    /// - [1] Registry State PDA (writable, uninitialized)
    /// - [2] System Program
    /// - [3] Vault authority PDA
    /// - [4] Vault token account (owned by the vault authority, governance token mint)
    /// - [5] Program data account
    /// - [6] Governance token mint
    InitializeRegistry { params: InitializeParams },

    /// Registers the caller as a relayer, pulling `stake` into the vault.
    ///
    /// # Accounts:
    /// - [0..=6] Common and vault accounts
    /// - [7] Name record account proving control of `registration.identity`
    /// - [8] Relayer record PDA of the caller (writable)
    /// - [9] Identity claim PDA (writable)
    /// - [10] Address binding PDA of the caller (writable)
    /// - [11..] Address binding PDA of every listed sub-address (writable)
    Register { registration: Registration },

    /// Binds `subaddress` to `relayer`; the caller must be the relayer.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Relayer record PDA (writable)
    /// - [4] Address binding PDA of `subaddress` (writable)
    RegisterSubaddress { relayer: Pubkey, subaddress: Pubkey },

    /// Unbinds `subaddress`; the caller must be the sub-address or its relayer.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Address binding PDA of `subaddress` (writable)
    /// - [4] Record PDA of the relayer it is bound to (writable)
    UnregisterSubaddress { subaddress: Pubkey },

    /// Adds `amount` tokens from the caller to `relayer`'s balance.
    ///
    /// # Accounts:
    /// - [0..=6] Common and vault accounts
    /// - [7] Relayer record PDA (writable)
    StakeToRelayer { relayer: Pubkey, amount: u64 },

    /// Withdrawal router credits a fee to `relayer` and distributes it as reward.
    ///
    /// # Accounts:
    /// - [0..=6] Common and vault accounts
    /// - [7] Relayer record PDA (writable)
    CreditBalance { relayer: Pubkey, amount: u64 },

    /// Withdrawal router debits `relayer`.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Relayer record PDA (writable)
    DebitBalance { relayer: Pubkey, amount: u64 },

    /// Withdrawal router charges the pool fee for a withdrawal by `sender`.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Address binding PDA of `sender`
    /// - [4] Address binding PDA of `relayer`
    /// - [5] Relayer record PDA (writable)
    /// - [6..] Price feed accounts for the governance token and the pool token
    ChargeWithdrawal {
        sender: Pubkey,
        relayer: Pubkey,
        pool_id: PoolId,
    },

    /// Governance zeroes `relayer`'s balance.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Relayer record PDA (writable)
    NullifyBalance { relayer: Pubkey },

    /// Governance changes the minimum registration stake.
    SetMinStakeAmount { amount: u64 },

    /// Stake source mirrors a lock/unlock of `staker`.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Stake account PDA of `staker` (writable)
    UpdateStakedBalance { staker: Pubkey, new_amount: u64 },

    /// Pays the caller's accumulated rewards into its token account.
    ///
    /// # Accounts:
    /// - [0..=6] Common and vault accounts
    /// - [7] Stake account PDA of the caller (writable)
    ClaimRewards,

    /// Governance deposits `amount` tokens as staking reward.
    ///
    /// # Accounts:
    /// - [0..=6] Common and vault accounts
    AddRewards { amount: u64 },

    /// Governance socializes a loss of `amount` across stakers.
    ///
    /// Only the part the accumulator can absorb is recorded as burned; with
    /// nothing staked the call changes nothing.
    AddBurnRewards { amount: u64 },

    /// Governance rebases a staker that is ahead of the accumulator.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3] Stake account PDA of `staker` (writable)
    ForceDowngrade { staker: Pubkey },

    /// Governance overwrites the reward-per-token accumulator.
    ResetRewardPerToken { value: u128 },

    /// Governance sweeps up to `amount` tokens out of the vault.
    ///
    /// # Accounts:
    /// - [0..=6] Common and vault accounts
    RescueTokens { amount: u64 },

    /// Governance adds a pool or supersedes its parameters.
    RegisterPool { registration: PoolRegistration },

    /// Governance changes oracle parameters.
    SetOracleParams { update: OracleParamsUpdate },

    /// Refreshes one pool fee. Fails if the fee would be zero.
    ///
    /// # Accounts:
    /// - [0..=2] Common accounts
    /// - [3..] Price feed accounts
    UpdateFeeOfPool { pool_id: PoolId },

    /// Refreshes the listed pools; a failing pool does not stop the others.
    UpdateFeesOfPools { pool_ids: Vec<PoolId> },

    /// Refreshes every registered pool with the same isolation as `UpdateFeesOfPools`.
    UpdateAllFees,

    /// Governance hands its authority to `new_governance`.
    TransferGovernance { new_governance: Pubkey },

    /// Governance migrates collaborator addresses.
    SetCollaborators { update: CollaboratorUpdate },

    /// Publishes the current fee of `pool_id` as return data (u64 LE).
    ///
    /// # Accounts:
    /// - [0] Registry State PDA
    GetFeeForPoolId { pool_id: PoolId },

    /// Publishes the balance of the relayer `relayer` acts for as return data (u64 LE).
    ///
    /// # Accounts:
    /// - [0] Registry State PDA
    /// - [1] Address binding PDA of `relayer`
    /// - [2] Record PDA of the relayer it is bound to
    GetRelayerBalance { relayer: Pubkey },
}
