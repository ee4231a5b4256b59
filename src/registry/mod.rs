//! Registry core: composes the ledger, the staking accumulator, the fee
//! oracle and the governance gateway into the top-level operations.
//!
//! The [`Registry`] value holds only global state: configuration, the
//! accumulator, the audit totals and the governance-bounded pool table.
//! Participant records (relayers, bindings, identities, stake accounts) live
//! in a [`RecordStore`] and are read and written one key at a time.
//!
//! Every mutating operation runs inside [`Registry::transact`] or
//! [`Registry::transact_with_records`]: it works on a scratch copy of the
//! globals and a staged view of the records, and commits both only on
//! success, so a failing vault transfer or oracle read leaves no partial
//! state behind. Local bookkeeping always completes before the vault is
//! called.

pub mod accumulator;
pub mod collaborators;
pub mod fee_oracle;
pub mod governance;
pub mod ledger;
pub mod records;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    constants::{DEFAULT_MIN_STAKE_TOKENS, MAX_TOKEN_DECIMALS},
    error::RegistryError,
};

pub use accumulator::{DowngradeOutcome, StakeAccount, StakingAccumulator};
pub use collaborators::{IdentityResolver, PriceFeed, PriceObservation, TokenVault};
pub use fee_oracle::{
    BatchUpdateReport, FeeOracle, OracleParamsUpdate, PoolFeeRecord, PoolId, PoolRegistration,
};
pub use governance::{Authorizer, CollaboratorUpdate, GovernanceConfig, GovernanceGateway};
pub use ledger::{LedgerTotals, Registration, Relayer, RelayerLedger};
pub use records::{MemoryRecords, RecordChanges, RecordStore, StagedRecords};

/// One-time configuration of the registry.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct InitializeParams {
    pub governance: Pubkey,
    pub withdrawal_router: Pubkey,
    pub stake_source: Pubkey,
    pub token_mint: Pubkey,
    pub name_service_program: Pubkey,
    pub price_feed_program: Pubkey,
    /// Zero selects 100 whole governance tokens
    pub min_stake_amount: u64,
    pub oracle: OracleParamsUpdate,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    pub governance: GovernanceConfig,
    pub ledger: RelayerLedger,
    pub staking: StakingAccumulator,
    pub fees: FeeOracle,
}

impl Registry {
    /// Configures collaborators and parameters. Fails on a second call.
    ///
    /// `token_decimals` are the decimals of the governance mint; fees are
    /// computed in its base units.
    pub fn initialize(
        &mut self,
        params: &InitializeParams,
        vault: Pubkey,
        token_decimals: u8,
    ) -> Result<(), RegistryError> {
        if self.governance.is_initialized {
            msg!("❌ Registry already initialized");
            return Err(RegistryError::AlreadyInitialized);
        }
        if params.governance == Pubkey::default() || token_decimals > MAX_TOKEN_DECIMALS {
            return Err(RegistryError::InvalidParameter);
        }
        let min_stake_amount = match params.min_stake_amount {
            0 => default_min_stake(token_decimals)?,
            amount => amount,
        };
        self.transact(|draft| {
            draft.governance = GovernanceConfig {
                is_initialized: true,
                governance: params.governance,
                withdrawal_router: params.withdrawal_router,
                stake_source: params.stake_source,
                token_mint: params.token_mint,
                vault,
                name_service_program: params.name_service_program,
                price_feed_program: params.price_feed_program,
                registry_state_bump: draft.governance.registry_state_bump,
                vault_authority_bump: draft.governance.vault_authority_bump,
            };
            draft.ledger = RelayerLedger::new(min_stake_amount);
            draft.staking = StakingAccumulator::default();
            draft.fees = FeeOracle::new(params.token_mint, token_decimals);
            draft.fees.apply_params(&params.oracle)?;
            msg!("✅ Registry initialized, governance {}", params.governance);
            msg!("   • Minimum stake {} ({} decimals)", min_stake_amount, token_decimals);
            Ok(())
        })
    }

    /// Runs `op` against a copy of the globals and keeps the copy only on success.
    pub fn transact<T, F>(&mut self, op: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut Registry) -> Result<T, RegistryError>,
    {
        let mut draft = self.clone();
        let value = op(&mut draft)?;
        *self = draft;
        Ok(value)
    }

    /// Like [`Registry::transact`], with record writes staged over `records`.
    ///
    /// Staged writes reach `records` only when `op` succeeds.
    pub fn transact_with_records<T, F>(&mut self, records: &mut dyn RecordStore, op: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut Registry, &mut StagedRecords<'_>) -> Result<T, RegistryError>,
    {
        let mut draft = self.clone();
        let mut staged = StagedRecords::new(&*records);
        let value = op(&mut draft, &mut staged)?;
        let changes = staged.into_changes();
        changes.apply_to(records);
        *self = draft;
        Ok(value)
    }

    pub fn gateway(&self) -> GovernanceGateway<&GovernanceConfig> {
        GovernanceGateway::new(&self.governance)
    }

    fn ensure_initialized(&self) -> Result<(), RegistryError> {
        if !self.governance.is_initialized {
            return Err(RegistryError::NotInitialized);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Relayer ledger
    // ------------------------------------------------------------------

    /// Registers `caller` as a relayer and pulls its stake into the vault.
    pub fn register(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        registration: &Registration,
        resolver: &dyn IdentityResolver,
        vault: &mut dyn TokenVault,
        now: i64,
    ) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        if resolver.owner_of(&registration.identity) != Some(*caller) {
            msg!("❌ {} does not control the presented identity", caller);
            return Err(RegistryError::Unauthorized);
        }
        self.transact_with_records(records, |draft, staged| {
            draft.ledger.register(staged, caller, registration, now)?;
            vault.deposit(caller, registration.stake)
        })
    }

    pub fn register_subaddress(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        relayer: &Pubkey,
        subaddress: &Pubkey,
    ) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.transact_with_records(records, |draft, staged| {
            draft.ledger.register_subaddress(staged, caller, relayer, subaddress)
        })
    }

    pub fn unregister_subaddress(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        subaddress: &Pubkey,
    ) -> Result<Pubkey, RegistryError> {
        self.ensure_initialized()?;
        self.transact_with_records(records, |draft, staged| {
            draft.ledger.unregister_subaddress(staged, caller, subaddress)
        })
    }

    /// Tops up any relayer's balance with tokens from `caller`.
    pub fn stake_to_relayer(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        relayer: &Pubkey,
        amount: u64,
        vault: &mut dyn TokenVault,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.transact_with_records(records, |draft, staged| {
            let balance = draft.ledger.credit_balance(staged, relayer, amount)?;
            vault.deposit(caller, amount)?;
            Ok(balance)
        })
    }

    /// Credits a withdrawal fee paid in by the router and distributes it as reward.
    pub fn credit_balance(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        relayer: &Pubkey,
        amount: u64,
        vault: &mut dyn TokenVault,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_withdrawal_router(caller)?;
        self.transact_with_records(records, |draft, staged| {
            let balance = draft.ledger.credit_balance(staged, relayer, amount)?;
            draft.staking.notify_reward_added(amount)?;
            vault.deposit(caller, amount)?;
            Ok(balance)
        })
    }

    pub fn debit_balance(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        relayer: &Pubkey,
        amount: u64,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_withdrawal_router(caller)?;
        self.transact_with_records(records, |draft, staged| {
            draft.ledger.debit_balance(staged, relayer, amount)
        })
    }

    /// Charges the pool fee for a withdrawal submitted by `sender` for `relayer`.
    ///
    /// Withdrawals by unregistered relayers are free. Returns the fee charged.
    pub fn charge_withdrawal(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        sender: &Pubkey,
        relayer: &Pubkey,
        pool_id: PoolId,
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_withdrawal_router(caller)?;
        match RelayerLedger::owner_of(&*records, sender)? {
            None if RelayerLedger::is_relayer(&*records, relayer)? => {
                msg!("❌ {} is not a sub-address of registered relayer {}", sender, relayer);
                return Err(RegistryError::Unauthorized);
            }
            None => {
                msg!("ℹ️ Unregistered relayer {}, no fee charged", relayer);
                return Ok(0);
            }
            Some(owner) if owner != *relayer => {
                msg!("❌ {} acts for {}, not {}", sender, owner, relayer);
                return Err(RegistryError::Unauthorized);
            }
            Some(_) => {}
        }
        self.transact_with_records(records, |draft, staged| {
            let fee = draft.fees.fee_with_refresh(pool_id, feed, now)?;
            draft.ledger.debit_balance(staged, relayer, fee)?;
            draft.staking.notify_reward_added(fee)?;
            msg!("🧾 Charged {} to {} for pool {}", fee, relayer, pool_id);
            Ok(fee)
        })
    }

    pub fn nullify_balance(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        relayer: &Pubkey,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact_with_records(records, |draft, staged| draft.ledger.nullify_balance(staged, relayer))
    }

    pub fn set_min_stake_amount(&mut self, caller: &Pubkey, amount: u64) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact(|draft| draft.ledger.set_min_stake_amount(amount))
    }

    pub fn get_relayer_balance(&self, records: &dyn RecordStore, relayer: &Pubkey) -> Result<u64, RegistryError> {
        RelayerLedger::balance_of(records, relayer)
    }

    pub fn get_relayer_identity(
        &self,
        records: &dyn RecordStore,
        relayer: &Pubkey,
    ) -> Result<Option<[u8; 32]>, RegistryError> {
        RelayerLedger::get_relayer_identity(records, relayer)
    }

    // ------------------------------------------------------------------
    // Staking accumulator
    // ------------------------------------------------------------------

    /// Mirrors a lock/unlock from the governance staking system.
    pub fn update_staked_balance(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        staker: &Pubkey,
        new_amount: u64,
    ) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_stake_source(caller)?;
        self.transact_with_records(records, |draft, staged| {
            let mut account = staged.stake_account(staker)?.unwrap_or_default();
            draft.staking.update_staked_balance(&mut account, new_amount)?;
            staged.put_stake_account(*staker, account);
            msg!("🔒 {} now stakes {}", staker, new_amount);
            Ok(())
        })
    }

    /// Pays out the caller's accumulated rewards. Returns the amount paid.
    pub fn claim_rewards(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        vault: &mut dyn TokenVault,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.transact_with_records(records, |draft, staged| {
            let Some(mut account) = staged.stake_account(caller)? else {
                msg!("ℹ️ Nothing to claim for {}", caller);
                return Ok(0);
            };
            let amount = draft.staking.claim(&mut account)?;
            staged.put_stake_account(*caller, account);
            if amount == 0 {
                msg!("ℹ️ Nothing to claim for {}", caller);
                return Ok(0);
            }
            vault.withdraw(caller, amount)?;
            msg!("💸 {} claims {}", caller, amount);
            Ok(amount)
        })
    }

    /// Governance reward injection from the governance treasury.
    pub fn add_rewards(
        &mut self,
        caller: &Pubkey,
        amount: u64,
        vault: &mut dyn TokenVault,
    ) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        if amount == 0 {
            return Err(RegistryError::InvalidAmount);
        }
        self.transact(|draft| {
            draft.staking.notify_reward_added(amount)?;
            vault.deposit(caller, amount)
        })
    }

    pub fn add_burn_rewards(&mut self, caller: &Pubkey, amount: u64) -> Result<u128, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact(|draft| draft.staking.add_burn_rewards(amount))
    }

    /// Rebases `staker` if it is ahead of the accumulator, else checkpoints it.
    ///
    /// A staker without a stake account has nothing to settle.
    pub fn force_downgrade(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        staker: &Pubkey,
    ) -> Result<DowngradeOutcome, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact_with_records(records, |draft, staged| {
            let Some(mut account) = staged.stake_account(staker)? else {
                return Ok(DowngradeOutcome::Checkpointed { accrued: 0 });
            };
            let outcome = draft.staking.force_downgrade(&mut account)?;
            staged.put_stake_account(*staker, account);
            msg!("⬇️ {} settled: {:?}", staker, outcome);
            Ok(outcome)
        })
    }

    pub fn reset_reward_per_token(&mut self, caller: &Pubkey, value: u128) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.staking.reset_reward_per_token(value);
        Ok(())
    }

    /// Sends `min(amount, vault balance)` to governance. Returns the amount sent.
    pub fn rescue_tokens(
        &mut self,
        caller: &Pubkey,
        amount: u64,
        vault: &mut dyn TokenVault,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        let rescued = amount.min(vault.balance()?);
        if rescued > 0 {
            vault.withdraw(&self.governance.governance, rescued)?;
        }
        msg!("🛟 Rescued {} tokens to governance", rescued);
        Ok(rescued)
    }

    pub fn pending_rewards(&self, records: &dyn RecordStore, staker: &Pubkey) -> Result<u64, RegistryError> {
        Ok(records
            .stake_account(staker)?
            .map(|account| self.staking.pending_rewards(&account))
            .unwrap_or(0))
    }

    // ------------------------------------------------------------------
    // Fee oracle
    // ------------------------------------------------------------------

    pub fn register_pool(
        &mut self,
        caller: &Pubkey,
        registration: &PoolRegistration,
    ) -> Result<PoolId, RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact(|draft| draft.fees.register_pool(registration))
    }

    pub fn set_oracle_params(
        &mut self,
        caller: &Pubkey,
        update: &OracleParamsUpdate,
    ) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact(|draft| draft.fees.apply_params(update))
    }

    pub fn update_fee_of_pool(
        &mut self,
        pool_id: PoolId,
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<u64, RegistryError> {
        self.ensure_initialized()?;
        self.transact(|draft| draft.fees.update_fee_of_pool(pool_id, feed, now))
    }

    pub fn update_fees_of_pools(
        &mut self,
        pool_ids: &[PoolId],
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<BatchUpdateReport, RegistryError> {
        self.ensure_initialized()?;
        Ok(self.fees.update_fees_of_pools(pool_ids, feed, now))
    }

    pub fn update_all_fees(
        &mut self,
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<BatchUpdateReport, RegistryError> {
        self.ensure_initialized()?;
        Ok(self.fees.update_all_fees(feed, now))
    }

    pub fn get_fee_for_pool_id(&self, pool_id: PoolId) -> Result<u64, RegistryError> {
        self.fees.get_fee_for_pool_id(pool_id)
    }

    // ------------------------------------------------------------------
    // Governance
    // ------------------------------------------------------------------

    pub fn transfer_governance(&mut self, caller: &Pubkey, new_governance: Pubkey) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.transact(|draft| draft.governance.transfer_governance(new_governance))
    }

    pub fn set_collaborators(
        &mut self,
        caller: &Pubkey,
        update: &CollaboratorUpdate,
    ) -> Result<(), RegistryError> {
        self.ensure_initialized()?;
        self.gateway().require_governance(caller)?;
        self.governance.update_collaborators(update);
        Ok(())
    }
}

/// `DEFAULT_MIN_STAKE_TOKENS` whole tokens in base units.
fn default_min_stake(token_decimals: u8) -> Result<u64, RegistryError> {
    10u64
        .checked_pow(token_decimals as u32)
        .and_then(|unit| unit.checked_mul(DEFAULT_MIN_STAKE_TOKENS))
        .ok_or(RegistryError::InvalidParameter)
}
