//! Authorization for privileged registry operations.
//!
//! Every gated operation asks a [`GovernanceGateway`] before touching state.
//! The gateway only consults an [`Authorizer`], so the ledger and accumulator
//! never compare caller keys themselves and tests can swap the authority out.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::error::RegistryError;

/// Role checks backing the gateway.
pub trait Authorizer {
    fn is_governance(&self, caller: &Pubkey) -> bool;

    /// Collaborator that reports successful withdrawals.
    fn is_withdrawal_router(&self, caller: &Pubkey) -> bool;

    /// Collaborator that mirrors lock/unlock events from governance staking.
    fn is_stake_source(&self, caller: &Pubkey) -> bool;
}

impl<A: Authorizer + ?Sized> Authorizer for &A {
    fn is_governance(&self, caller: &Pubkey) -> bool {
        (**self).is_governance(caller)
    }

    fn is_withdrawal_router(&self, caller: &Pubkey) -> bool {
        (**self).is_withdrawal_router(caller)
    }

    fn is_stake_source(&self, caller: &Pubkey) -> bool {
        (**self).is_stake_source(caller)
    }
}

/// Capability check in front of every privileged call.
#[derive(Debug, Clone, Copy)]
pub struct GovernanceGateway<A> {
    authorizer: A,
}

impl<A: Authorizer> GovernanceGateway<A> {
    pub fn new(authorizer: A) -> Self {
        Self { authorizer }
    }

    pub fn require_governance(&self, caller: &Pubkey) -> Result<(), RegistryError> {
        if !self.authorizer.is_governance(caller) {
            msg!("❌ UNAUTHORIZED: {} is not the governance authority", caller);
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_withdrawal_router(&self, caller: &Pubkey) -> Result<(), RegistryError> {
        if !self.authorizer.is_withdrawal_router(caller) {
            msg!("❌ UNAUTHORIZED: {} is not the withdrawal router", caller);
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_stake_source(&self, caller: &Pubkey) -> Result<(), RegistryError> {
        if !self.authorizer.is_stake_source(caller) {
            msg!("❌ UNAUTHORIZED: {} is not the stake source", caller);
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }
}

/// Collaborator addresses fixed at initialization.
///
/// Only governance may change them afterwards, through
/// [`GovernanceConfig::transfer_governance`] and
/// [`GovernanceConfig::update_collaborators`].
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GovernanceConfig {
    pub is_initialized: bool,
    pub governance: Pubkey,
    pub withdrawal_router: Pubkey,
    pub stake_source: Pubkey,
    /// Governance token mint
    pub token_mint: Pubkey,
    /// Token account holding stakes and rewards
    pub vault: Pubkey,
    /// Program owning name record accounts
    pub name_service_program: Pubkey,
    /// Program owning price feed accounts
    pub price_feed_program: Pubkey,
    pub registry_state_bump: u8,
    pub vault_authority_bump: u8,
}

/// Optional collaborator changes; `None` keeps the current value.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaboratorUpdate {
    pub withdrawal_router: Option<Pubkey>,
    pub stake_source: Option<Pubkey>,
    pub name_service_program: Option<Pubkey>,
    pub price_feed_program: Option<Pubkey>,
}

impl GovernanceConfig {
    /// Replaces the governance authority. Callers must have passed
    /// `require_governance` for the current authority.
    pub fn transfer_governance(&mut self, new_governance: Pubkey) -> Result<(), RegistryError> {
        if new_governance == Pubkey::default() {
            return Err(RegistryError::InvalidParameter);
        }
        msg!("🔄 Governance: {} → {}", self.governance, new_governance);
        self.governance = new_governance;
        Ok(())
    }

    pub fn update_collaborators(&mut self, update: &CollaboratorUpdate) {
        if let Some(router) = update.withdrawal_router {
            msg!("🔄 Withdrawal router: {} → {}", self.withdrawal_router, router);
            self.withdrawal_router = router;
        }
        if let Some(source) = update.stake_source {
            msg!("🔄 Stake source: {} → {}", self.stake_source, source);
            self.stake_source = source;
        }
        if let Some(program) = update.name_service_program {
            msg!("🔄 Name service program: {} → {}", self.name_service_program, program);
            self.name_service_program = program;
        }
        if let Some(program) = update.price_feed_program {
            msg!("🔄 Price feed program: {} → {}", self.price_feed_program, program);
            self.price_feed_program = program;
        }
    }
}

impl Authorizer for GovernanceConfig {
    fn is_governance(&self, caller: &Pubkey) -> bool {
        self.is_initialized && *caller == self.governance
    }

    fn is_withdrawal_router(&self, caller: &Pubkey) -> bool {
        self.is_initialized && *caller == self.withdrawal_router
    }

    fn is_stake_source(&self, caller: &Pubkey) -> bool {
        self.is_initialized && *caller == self.stake_source
    }
}
