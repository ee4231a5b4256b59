/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! # Relayer Registry - Client SDK
//!
//! Address derivation and instruction builders for the relayer registry
//! program.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relayer_registry::client_sdk::RegistryClient;
//! use solana_program::pubkey::Pubkey;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let token_mint = Pubkey::new_unique();
//! let client = RegistryClient::new(relayer_registry::id(), token_mint);
//!
//! let staker = Pubkey::new_unique();
//! let claim = client.claim_rewards(&staker)?;
//! assert_eq!(claim.program_id, relayer_registry::id());
//! # Ok(())
//! # }
//! ```

use borsh::BorshSerialize;
use solana_program::{
    bpf_loader_upgradeable,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::{
    registry::{
        CollaboratorUpdate, InitializeParams, OracleParamsUpdate, PoolId, PoolRegistration,
        Registration,
    },
    state::{
        identity_record_address, registry_state_address, relayer_record_address,
        stake_account_address, subaddress_record_address, vault_authority_address,
    },
    types::RegistryInstruction,
};

/// Errors that can occur when building registry instructions
#[derive(Debug)]
pub enum RegistryClientError {
    /// Error during instruction serialization
    SerializationError,
}

impl From<std::io::Error> for RegistryClientError {
    fn from(_error: std::io::Error) -> Self {
        Self::SerializationError
    }
}

impl std::fmt::Display for RegistryClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryClientError::SerializationError => write!(f, "Failed to serialize instruction data"),
        }
    }
}

impl std::error::Error for RegistryClientError {}

pub type ClientResult = Result<Instruction, RegistryClientError>;

/// Derived program addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryAddresses {
    pub registry_state: Pubkey,
    pub registry_state_bump: u8,
    pub vault_authority: Pubkey,
    pub vault_authority_bump: u8,
    /// Associated token account of the vault authority for the governance token
    pub vault: Pubkey,
}

/// Instruction builder bound to one deployment.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    pub program_id: Pubkey,
    pub token_mint: Pubkey,
    /// Vault token account; defaults to the vault authority's associated token account
    pub vault: Pubkey,
}

impl RegistryClient {
    pub fn new(program_id: Pubkey, token_mint: Pubkey) -> Self {
        let vault = Self::derive_addresses_for(&program_id, &token_mint).vault;
        Self {
            program_id,
            token_mint,
            vault,
        }
    }

    /// Uses an explicitly created vault token account instead of the associated one.
    pub fn with_vault(mut self, vault: Pubkey) -> Self {
        self.vault = vault;
        self
    }

    pub fn derive_addresses(&self) -> RegistryAddresses {
        RegistryAddresses {
            vault: self.vault,
            ..Self::derive_addresses_for(&self.program_id, &self.token_mint)
        }
    }

    fn derive_addresses_for(program_id: &Pubkey, token_mint: &Pubkey) -> RegistryAddresses {
        let (registry_state, registry_state_bump) = registry_state_address(program_id);
        let (vault_authority, vault_authority_bump) = vault_authority_address(program_id);
        RegistryAddresses {
            registry_state,
            registry_state_bump,
            vault_authority,
            vault_authority_bump,
            vault: spl_associated_token_account::get_associated_token_address(&vault_authority, token_mint),
        }
    }

    /// Record PDA of a registered relayer.
    pub fn relayer_record(&self, relayer: &Pubkey) -> Pubkey {
        relayer_record_address(&self.program_id, relayer).0
    }

    /// Binding PDA naming the relayer `address` acts for.
    pub fn address_binding(&self, address: &Pubkey) -> Pubkey {
        subaddress_record_address(&self.program_id, address).0
    }

    pub fn identity_claim(&self, identity: &[u8; 32]) -> Pubkey {
        identity_record_address(&self.program_id, identity).0
    }

    pub fn stake_account(&self, staker: &Pubkey) -> Pubkey {
        stake_account_address(&self.program_id, staker).0
    }

    /// Governance-token account of `owner` used for deposits and payouts.
    pub fn token_account_of(&self, owner: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(owner, &self.token_mint)
    }

    pub fn initialize(&self, authority: &Pubkey, params: InitializeParams) -> ClientResult {
        let addresses = self.derive_addresses();
        let program_data = Pubkey::find_program_address(&[self.program_id.as_ref()], &bpf_loader_upgradeable::id()).0;
        self.build(
            RegistryInstruction::InitializeRegistry { params },
            vec![
                AccountMeta::new(*authority, true),
                AccountMeta::new(addresses.registry_state, false),
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(addresses.vault_authority, false),
                AccountMeta::new_readonly(addresses.vault, false),
                AccountMeta::new_readonly(program_data, false),
                AccountMeta::new_readonly(self.token_mint, false),
            ],
        )
    }

    pub fn register(&self, relayer: &Pubkey, registration: Registration, name_record: &Pubkey) -> ClientResult {
        let mut accounts = self.vault_accounts(relayer, &self.token_account_of(relayer));
        accounts.push(AccountMeta::new_readonly(*name_record, false));
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        accounts.push(AccountMeta::new(self.identity_claim(&registration.identity), false));
        accounts.push(AccountMeta::new(self.address_binding(relayer), false));
        accounts.extend(
            registration
                .subaddresses
                .iter()
                .map(|subaddress| AccountMeta::new(self.address_binding(subaddress), false)),
        );
        self.build(RegistryInstruction::Register { registration }, accounts)
    }

    pub fn register_subaddress(&self, relayer: &Pubkey, subaddress: &Pubkey) -> ClientResult {
        let mut accounts = self.common_accounts(relayer);
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        accounts.push(AccountMeta::new(self.address_binding(subaddress), false));
        self.build(
            RegistryInstruction::RegisterSubaddress {
                relayer: *relayer,
                subaddress: *subaddress,
            },
            accounts,
        )
    }

    /// `relayer` is the relayer `subaddress` is currently bound to.
    pub fn unregister_subaddress(&self, caller: &Pubkey, relayer: &Pubkey, subaddress: &Pubkey) -> ClientResult {
        let mut accounts = self.common_accounts(caller);
        accounts.push(AccountMeta::new(self.address_binding(subaddress), false));
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        self.build(RegistryInstruction::UnregisterSubaddress { subaddress: *subaddress }, accounts)
    }

    pub fn stake_to_relayer(&self, staker: &Pubkey, relayer: &Pubkey, amount: u64) -> ClientResult {
        let mut accounts = self.vault_accounts(staker, &self.token_account_of(staker));
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        self.build(RegistryInstruction::StakeToRelayer { relayer: *relayer, amount }, accounts)
    }

    pub fn credit_balance(&self, router: &Pubkey, router_token_account: &Pubkey, relayer: &Pubkey, amount: u64) -> ClientResult {
        let mut accounts = self.vault_accounts(router, router_token_account);
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        self.build(RegistryInstruction::CreditBalance { relayer: *relayer, amount }, accounts)
    }

    pub fn debit_balance(&self, router: &Pubkey, relayer: &Pubkey, amount: u64) -> ClientResult {
        let mut accounts = self.common_accounts(router);
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        self.build(RegistryInstruction::DebitBalance { relayer: *relayer, amount }, accounts)
    }

    pub fn charge_withdrawal(
        &self,
        router: &Pubkey,
        sender: &Pubkey,
        relayer: &Pubkey,
        pool_id: PoolId,
        price_feeds: &[Pubkey],
    ) -> ClientResult {
        let mut accounts = self.common_accounts(router);
        accounts.push(AccountMeta::new_readonly(self.address_binding(sender), false));
        accounts.push(AccountMeta::new_readonly(self.address_binding(relayer), false));
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        accounts.extend(price_feeds.iter().map(|feed| AccountMeta::new_readonly(*feed, false)));
        self.build(
            RegistryInstruction::ChargeWithdrawal {
                sender: *sender,
                relayer: *relayer,
                pool_id,
            },
            accounts,
        )
    }

    pub fn nullify_balance(&self, governance: &Pubkey, relayer: &Pubkey) -> ClientResult {
        let mut accounts = self.common_accounts(governance);
        accounts.push(AccountMeta::new(self.relayer_record(relayer), false));
        self.build(RegistryInstruction::NullifyBalance { relayer: *relayer }, accounts)
    }

    pub fn set_min_stake_amount(&self, governance: &Pubkey, amount: u64) -> ClientResult {
        self.build(RegistryInstruction::SetMinStakeAmount { amount }, self.common_accounts(governance))
    }

    pub fn update_staked_balance(&self, stake_source: &Pubkey, staker: &Pubkey, new_amount: u64) -> ClientResult {
        let mut accounts = self.common_accounts(stake_source);
        accounts.push(AccountMeta::new(self.stake_account(staker), false));
        self.build(
            RegistryInstruction::UpdateStakedBalance {
                staker: *staker,
                new_amount,
            },
            accounts,
        )
    }

    pub fn claim_rewards(&self, staker: &Pubkey) -> ClientResult {
        let mut accounts = self.vault_accounts(staker, &self.token_account_of(staker));
        accounts.push(AccountMeta::new(self.stake_account(staker), false));
        self.build(RegistryInstruction::ClaimRewards, accounts)
    }

    pub fn add_rewards(&self, governance: &Pubkey, governance_token_account: &Pubkey, amount: u64) -> ClientResult {
        self.build(
            RegistryInstruction::AddRewards { amount },
            self.vault_accounts(governance, governance_token_account),
        )
    }

    pub fn add_burn_rewards(&self, governance: &Pubkey, amount: u64) -> ClientResult {
        self.build(RegistryInstruction::AddBurnRewards { amount }, self.common_accounts(governance))
    }

    pub fn force_downgrade(&self, governance: &Pubkey, staker: &Pubkey) -> ClientResult {
        let mut accounts = self.common_accounts(governance);
        accounts.push(AccountMeta::new(self.stake_account(staker), false));
        self.build(RegistryInstruction::ForceDowngrade { staker: *staker }, accounts)
    }

    pub fn reset_reward_per_token(&self, governance: &Pubkey, value: u128) -> ClientResult {
        self.build(RegistryInstruction::ResetRewardPerToken { value }, self.common_accounts(governance))
    }

    pub fn rescue_tokens(&self, governance: &Pubkey, governance_token_account: &Pubkey, amount: u64) -> ClientResult {
        self.build(
            RegistryInstruction::RescueTokens { amount },
            self.vault_accounts(governance, governance_token_account),
        )
    }

    pub fn register_pool(&self, governance: &Pubkey, registration: PoolRegistration) -> ClientResult {
        self.build(RegistryInstruction::RegisterPool { registration }, self.common_accounts(governance))
    }

    pub fn set_oracle_params(&self, governance: &Pubkey, update: OracleParamsUpdate) -> ClientResult {
        self.build(RegistryInstruction::SetOracleParams { update }, self.common_accounts(governance))
    }

    pub fn update_fee_of_pool(&self, caller: &Pubkey, pool_id: PoolId, price_feeds: &[Pubkey]) -> ClientResult {
        self.build(
            RegistryInstruction::UpdateFeeOfPool { pool_id },
            self.with_price_feeds(caller, price_feeds),
        )
    }

    pub fn update_fees_of_pools(&self, caller: &Pubkey, pool_ids: Vec<PoolId>, price_feeds: &[Pubkey]) -> ClientResult {
        self.build(
            RegistryInstruction::UpdateFeesOfPools { pool_ids },
            self.with_price_feeds(caller, price_feeds),
        )
    }

    pub fn update_all_fees(&self, caller: &Pubkey, price_feeds: &[Pubkey]) -> ClientResult {
        self.build(RegistryInstruction::UpdateAllFees, self.with_price_feeds(caller, price_feeds))
    }

    pub fn transfer_governance(&self, governance: &Pubkey, new_governance: &Pubkey) -> ClientResult {
        self.build(
            RegistryInstruction::TransferGovernance {
                new_governance: *new_governance,
            },
            self.common_accounts(governance),
        )
    }

    pub fn set_collaborators(&self, governance: &Pubkey, update: CollaboratorUpdate) -> ClientResult {
        self.build(RegistryInstruction::SetCollaborators { update }, self.common_accounts(governance))
    }

    pub fn get_fee_for_pool_id(&self, pool_id: PoolId) -> ClientResult {
        self.build(
            RegistryInstruction::GetFeeForPoolId { pool_id },
            vec![AccountMeta::new_readonly(self.derive_addresses().registry_state, false)],
        )
    }

    /// `owner` is the relayer `address` is bound to (`address` itself for a relayer).
    pub fn get_relayer_balance(&self, address: &Pubkey, owner: &Pubkey) -> ClientResult {
        self.build(
            RegistryInstruction::GetRelayerBalance { relayer: *address },
            vec![
                AccountMeta::new_readonly(self.derive_addresses().registry_state, false),
                AccountMeta::new_readonly(self.address_binding(address), false),
                AccountMeta::new_readonly(self.relayer_record(owner), false),
            ],
        )
    }

    fn common_accounts(&self, caller: &Pubkey) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*caller, true),
            AccountMeta::new(self.derive_addresses().registry_state, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ]
    }

    fn vault_accounts(&self, caller: &Pubkey, caller_token_account: &Pubkey) -> Vec<AccountMeta> {
        let addresses = self.derive_addresses();
        let mut accounts = self.common_accounts(caller);
        accounts.extend([
            AccountMeta::new(addresses.vault, false),
            AccountMeta::new_readonly(addresses.vault_authority, false),
            AccountMeta::new(*caller_token_account, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ]);
        accounts
    }

    fn with_price_feeds(&self, caller: &Pubkey, price_feeds: &[Pubkey]) -> Vec<AccountMeta> {
        let mut accounts = self.common_accounts(caller);
        accounts.extend(price_feeds.iter().map(|feed| AccountMeta::new_readonly(*feed, false)));
        accounts
    }

    fn build(&self, instruction: RegistryInstruction, accounts: Vec<AccountMeta>) -> ClientResult {
        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction.try_to_vec()?,
        })
    }
}
