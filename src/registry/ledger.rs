//! Relayer identities, balances and sub-address bindings.
//!
//! The ledger only does bookkeeping. Token movement and authorization are
//! done by the caller (`Registry`) around these methods. Relayer records,
//! bindings and identity claims live in a [`RecordStore`]; the ledger itself
//! keeps the minimum stake and the audit totals.

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    constants::MAX_RELAYER_FEE_RATE_BPS,
    error::RegistryError,
    registry::records::RecordStore,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Relayer {
    /// Name record handle the relayer proved control of at registration
    pub identity: [u8; 32],
    /// Governance-token units available for fee deduction, stake included
    pub balance: u64,
    /// Advertised relayer fee in basis points
    pub fee_rate_bps: Option<u16>,
    /// Addresses acting for this relayer, the relayer itself included
    pub subaddresses: BTreeSet<Pubkey>,
    pub registered_at: i64,
}

/// Running totals used to audit `sum(balance)`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub total_credited: u128,
    pub total_debited: u128,
    pub total_nullified: u128,
}

impl LedgerTotals {
    /// What `sum(balance)` over all relayers must equal.
    pub fn outstanding(&self) -> u128 {
        self.total_credited
            .saturating_sub(self.total_debited)
            .saturating_sub(self.total_nullified)
    }
}

/// Arguments of a self-service registration.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub identity: [u8; 32],
    pub stake: u64,
    pub subaddresses: Vec<Pubkey>,
    pub fee_rate_bps: Option<u16>,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayerLedger {
    pub min_stake_amount: u64,
    pub totals: LedgerTotals,
}

impl RelayerLedger {
    pub fn new(min_stake_amount: u64) -> Self {
        Self {
            min_stake_amount,
            ..Self::default()
        }
    }

    /// Relayer an address acts for, if any.
    pub fn owner_of(records: &dyn RecordStore, address: &Pubkey) -> Result<Option<Pubkey>, RegistryError> {
        records.subaddress_owner(address)
    }

    pub fn is_relayer(records: &dyn RecordStore, address: &Pubkey) -> Result<bool, RegistryError> {
        Ok(records.subaddress_owner(address)?.is_some())
    }

    pub fn is_relayer_registered(
        records: &dyn RecordStore,
        relayer: &Pubkey,
        address: &Pubkey,
    ) -> Result<bool, RegistryError> {
        Ok(records.subaddress_owner(address)? == Some(*relayer))
    }

    /// Identity hash a relayer registered under.
    pub fn get_relayer_identity(records: &dyn RecordStore, relayer: &Pubkey) -> Result<Option<[u8; 32]>, RegistryError> {
        Ok(records.relayer(relayer)?.map(|record| record.identity))
    }

    /// Balance of the relayer `address` acts for; 0 for unknown addresses.
    pub fn balance_of(records: &dyn RecordStore, address: &Pubkey) -> Result<u64, RegistryError> {
        let Some(owner) = records.subaddress_owner(address)? else {
            return Ok(0);
        };
        Ok(records.relayer(&owner)?.map(|relayer| relayer.balance).unwrap_or(0))
    }

    /// Records a new relayer whose identity ownership was already verified.
    pub fn register(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        registration: &Registration,
        now: i64,
    ) -> Result<(), RegistryError> {
        let mut bound = BTreeSet::new();
        bound.insert(*caller);
        for subaddress in &registration.subaddresses {
            if !bound.insert(*subaddress) {
                msg!("❌ Duplicate sub-address {}", subaddress);
                return Err(RegistryError::InvalidParameter);
            }
        }

        let mut caller_bound = false;
        for address in &bound {
            match records.subaddress_owner(address)? {
                Some(owner) if owner != *caller => {
                    msg!("❌ {} is already bound to relayer {}", address, owner);
                    return Err(RegistryError::SubaddressOwnedByOther);
                }
                Some(_) => caller_bound |= address == caller,
                None => {}
            }
        }
        if caller_bound || records.relayer(caller)?.is_some() {
            msg!("❌ {} is already registered", caller);
            return Err(RegistryError::AlreadyRegistered);
        }
        if let Some(holder) = records.identity_holder(&registration.identity)? {
            msg!("❌ Identity already registered by {}", holder);
            return Err(RegistryError::AlreadyRegistered);
        }
        if registration.stake < self.min_stake_amount {
            msg!("❌ Stake {} below minimum {}", registration.stake, self.min_stake_amount);
            return Err(RegistryError::BelowMinimumStake);
        }
        if matches!(registration.fee_rate_bps, Some(rate) if rate > MAX_RELAYER_FEE_RATE_BPS) {
            return Err(RegistryError::InvalidParameter);
        }

        self.add_credit(registration.stake)?;
        for address in &bound {
            records.put_subaddress_owner(*address, Some(*caller));
        }
        records.put_identity_holder(registration.identity, *caller);
        records.put_relayer(
            *caller,
            Relayer {
                identity: registration.identity,
                balance: registration.stake,
                fee_rate_bps: registration.fee_rate_bps,
                subaddresses: bound,
                registered_at: now,
            },
        );
        msg!(
            "✅ Relayer {} registered with stake {} and {} sub-addresses",
            caller,
            registration.stake,
            registration.subaddresses.len()
        );
        Ok(())
    }

    pub fn register_subaddress(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        relayer: &Pubkey,
        subaddress: &Pubkey,
    ) -> Result<(), RegistryError> {
        if caller != relayer {
            msg!("❌ Only the relayer may add sub-addresses");
            return Err(RegistryError::Unauthorized);
        }
        let mut record = records.relayer(relayer)?.ok_or(RegistryError::RelayerNotFound)?;
        match records.subaddress_owner(subaddress)? {
            Some(owner) if owner == *relayer => return Ok(()),
            Some(owner) => {
                msg!("❌ {} is already bound to relayer {}", subaddress, owner);
                return Err(RegistryError::SubaddressOwnedByOther);
            }
            None => {}
        }

        record.subaddresses.insert(*subaddress);
        records.put_subaddress_owner(*subaddress, Some(*relayer));
        records.put_relayer(*relayer, record);
        msg!("✅ Sub-address {} bound to {}", subaddress, relayer);
        Ok(())
    }

    /// Unbinds `subaddress`; callable by the sub-address itself or its relayer.
    pub fn unregister_subaddress(
        &mut self,
        records: &mut dyn RecordStore,
        caller: &Pubkey,
        subaddress: &Pubkey,
    ) -> Result<Pubkey, RegistryError> {
        let owner = records
            .subaddress_owner(subaddress)?
            .ok_or(RegistryError::SubaddressNotFound)?;
        if *caller != *subaddress && *caller != owner {
            msg!("❌ {} may not unbind {}", caller, subaddress);
            return Err(RegistryError::Unauthorized);
        }
        if *subaddress == owner {
            return Err(RegistryError::CannotUnregisterRelayer);
        }

        records.put_subaddress_owner(*subaddress, None);
        if let Some(mut record) = records.relayer(&owner)? {
            record.subaddresses.remove(subaddress);
            records.put_relayer(owner, record);
        }
        msg!("✅ Sub-address {} unbound from {}", subaddress, owner);
        Ok(owner)
    }

    /// Increases a registered relayer's balance by exactly `amount`.
    pub fn credit_balance(
        &mut self,
        records: &mut dyn RecordStore,
        relayer: &Pubkey,
        amount: u64,
    ) -> Result<u64, RegistryError> {
        if amount == 0 {
            return Err(RegistryError::InvalidAmount);
        }
        let mut record = records.relayer(relayer)?.ok_or(RegistryError::RelayerNotFound)?;
        record.balance = record
            .balance
            .checked_add(amount)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        self.add_credit(amount)?;
        let balance = record.balance;
        records.put_relayer(*relayer, record);
        msg!("➕ Relayer {} credited {} (balance {})", relayer, amount, balance);
        Ok(balance)
    }

    pub fn debit_balance(
        &mut self,
        records: &mut dyn RecordStore,
        relayer: &Pubkey,
        amount: u64,
    ) -> Result<u64, RegistryError> {
        let mut record = records.relayer(relayer)?.ok_or(RegistryError::RelayerNotFound)?;
        if amount > record.balance {
            msg!("❌ Debit {} exceeds balance {} of {}", amount, record.balance, relayer);
            return Err(RegistryError::InsufficientBalance);
        }
        self.totals.total_debited = self
            .totals
            .total_debited
            .checked_add(amount as u128)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        record.balance -= amount;
        let balance = record.balance;
        records.put_relayer(*relayer, record);
        msg!("➖ Relayer {} debited {} (balance {})", relayer, amount, balance);
        Ok(balance)
    }

    /// Zeroes a relayer's balance; returns the amount removed.
    pub fn nullify_balance(&mut self, records: &mut dyn RecordStore, relayer: &Pubkey) -> Result<u64, RegistryError> {
        let mut record = records.relayer(relayer)?.ok_or(RegistryError::RelayerNotFound)?;
        let removed = std::mem::take(&mut record.balance);
        self.totals.total_nullified = self
            .totals
            .total_nullified
            .checked_add(removed as u128)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        records.put_relayer(*relayer, record);
        msg!("⛔ Relayer {} nullified, {} removed", relayer, removed);
        Ok(removed)
    }

    pub fn set_min_stake_amount(&mut self, amount: u64) -> Result<(), RegistryError> {
        if amount == 0 {
            return Err(RegistryError::InvalidParameter);
        }
        msg!("🔄 Minimum stake: {} → {}", self.min_stake_amount, amount);
        self.min_stake_amount = amount;
        Ok(())
    }

    fn add_credit(&mut self, amount: u64) -> Result<(), RegistryError> {
        self.totals.total_credited = self
            .totals
            .total_credited
            .checked_add(amount as u128)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        Ok(())
    }
}
