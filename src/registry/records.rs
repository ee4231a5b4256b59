//! Per-participant records.
//!
//! Relayers, sub-address bindings, identity claims and stake accounts are kept
//! one record per key, outside the [`Registry`](super::Registry) value. An
//! operation reads and writes only the records of the participants it names,
//! so its cost does not depend on how many participants exist.
//!
//! Writes go through [`StagedRecords`] first and reach the backing store only
//! when the whole operation succeeded.

use std::collections::BTreeMap;

use solana_program::pubkey::Pubkey;

use crate::{
    error::RegistryError,
    registry::{Relayer, StakeAccount},
};

/// Keyed storage of participant records.
///
/// Reads may fail when the backing storage cannot produce the record (an
/// account that was not passed in, or one that does not decode). Writes are
/// buffered by the implementation and cannot fail.
pub trait RecordStore {
    fn relayer(&self, relayer: &Pubkey) -> Result<Option<Relayer>, RegistryError>;
    /// Relayer `address` acts for; a relayer is bound to itself.
    fn subaddress_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>, RegistryError>;
    fn identity_holder(&self, identity: &[u8; 32]) -> Result<Option<Pubkey>, RegistryError>;
    fn stake_account(&self, staker: &Pubkey) -> Result<Option<StakeAccount>, RegistryError>;

    fn put_relayer(&mut self, relayer: Pubkey, record: Relayer);
    /// `None` unbinds the address.
    fn put_subaddress_owner(&mut self, address: Pubkey, owner: Option<Pubkey>);
    fn put_identity_holder(&mut self, identity: [u8; 32], relayer: Pubkey);
    fn put_stake_account(&mut self, staker: Pubkey, account: StakeAccount);
}

/// Record writes not yet applied to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub relayers: BTreeMap<Pubkey, Relayer>,
    pub subaddress_owners: BTreeMap<Pubkey, Option<Pubkey>>,
    pub identities: BTreeMap<[u8; 32], Pubkey>,
    pub stake_accounts: BTreeMap<Pubkey, StakeAccount>,
}

impl RecordChanges {
    /// Number of records written.
    pub fn len(&self) -> usize {
        self.relayers.len()
            + self.subaddress_owners.len()
            + self.identities.len()
            + self.stake_accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn apply_to(self, store: &mut dyn RecordStore) {
        for (relayer, record) in self.relayers {
            store.put_relayer(relayer, record);
        }
        for (address, owner) in self.subaddress_owners {
            store.put_subaddress_owner(address, owner);
        }
        for (identity, relayer) in self.identities {
            store.put_identity_holder(identity, relayer);
        }
        for (staker, account) in self.stake_accounts {
            store.put_stake_account(staker, account);
        }
    }
}

/// Overlay of pending writes over a read-only store.
///
/// Reads see the pending writes first. Dropping the overlay discards them.
pub struct StagedRecords<'a> {
    base: &'a dyn RecordStore,
    changes: RecordChanges,
}

impl<'a> StagedRecords<'a> {
    pub fn new(base: &'a dyn RecordStore) -> Self {
        Self {
            base,
            changes: RecordChanges::default(),
        }
    }

    pub fn changes(&self) -> &RecordChanges {
        &self.changes
    }

    pub fn into_changes(self) -> RecordChanges {
        self.changes
    }
}

impl RecordStore for StagedRecords<'_> {
    fn relayer(&self, relayer: &Pubkey) -> Result<Option<Relayer>, RegistryError> {
        match self.changes.relayers.get(relayer) {
            Some(record) => Ok(Some(record.clone())),
            None => self.base.relayer(relayer),
        }
    }

    fn subaddress_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>, RegistryError> {
        match self.changes.subaddress_owners.get(address) {
            Some(owner) => Ok(*owner),
            None => self.base.subaddress_owner(address),
        }
    }

    fn identity_holder(&self, identity: &[u8; 32]) -> Result<Option<Pubkey>, RegistryError> {
        match self.changes.identities.get(identity) {
            Some(holder) => Ok(Some(*holder)),
            None => self.base.identity_holder(identity),
        }
    }

    fn stake_account(&self, staker: &Pubkey) -> Result<Option<StakeAccount>, RegistryError> {
        match self.changes.stake_accounts.get(staker) {
            Some(account) => Ok(Some(account.clone())),
            None => self.base.stake_account(staker),
        }
    }

    fn put_relayer(&mut self, relayer: Pubkey, record: Relayer) {
        self.changes.relayers.insert(relayer, record);
    }

    fn put_subaddress_owner(&mut self, address: Pubkey, owner: Option<Pubkey>) {
        self.changes.subaddress_owners.insert(address, owner);
    }

    fn put_identity_holder(&mut self, identity: [u8; 32], relayer: Pubkey) {
        self.changes.identities.insert(identity, relayer);
    }

    fn put_stake_account(&mut self, staker: Pubkey, account: StakeAccount) {
        self.changes.stake_accounts.insert(staker, account);
    }
}

/// Record store held in memory. Used off-chain and by tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRecords {
    pub relayers: BTreeMap<Pubkey, Relayer>,
    pub subaddress_owners: BTreeMap<Pubkey, Pubkey>,
    pub identities: BTreeMap<[u8; 32], Pubkey>,
    pub stake_accounts: BTreeMap<Pubkey, StakeAccount>,
}

impl MemoryRecords {
    /// Sum of all relayer balances.
    pub fn total_relayer_balance(&self) -> u128 {
        self.relayers.values().map(|r| r.balance as u128).sum()
    }

    /// Sum of settled, unclaimed rewards over all stake accounts.
    pub fn total_accumulated_rewards(&self) -> u128 {
        self.stake_accounts
            .values()
            .map(|a| a.accumulated_rewards as u128)
            .sum()
    }
}

impl RecordStore for MemoryRecords {
    fn relayer(&self, relayer: &Pubkey) -> Result<Option<Relayer>, RegistryError> {
        Ok(self.relayers.get(relayer).cloned())
    }

    fn subaddress_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>, RegistryError> {
        Ok(self.subaddress_owners.get(address).copied())
    }

    fn identity_holder(&self, identity: &[u8; 32]) -> Result<Option<Pubkey>, RegistryError> {
        Ok(self.identities.get(identity).copied())
    }

    fn stake_account(&self, staker: &Pubkey) -> Result<Option<StakeAccount>, RegistryError> {
        Ok(self.stake_accounts.get(staker).cloned())
    }

    fn put_relayer(&mut self, relayer: Pubkey, record: Relayer) {
        self.relayers.insert(relayer, record);
    }

    fn put_subaddress_owner(&mut self, address: Pubkey, owner: Option<Pubkey>) {
        match owner {
            Some(owner) => self.subaddress_owners.insert(address, owner),
            None => self.subaddress_owners.remove(&address),
        };
    }

    fn put_identity_holder(&mut self, identity: [u8; 32], relayer: Pubkey) {
        self.identities.insert(identity, relayer);
    }

    fn put_stake_account(&mut self, staker: Pubkey, account: StakeAccount) {
        self.stake_accounts.insert(staker, account);
    }
}
