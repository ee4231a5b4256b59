//! Participant record PDAs
//!
//! Each participant record lives in its own program-owned account:
//! - relayer: `[RELAYER_RECORD_SEED_PREFIX, relayer]` holding a [`Relayer`]
//! - address binding: `[SUBADDRESS_RECORD_SEED_PREFIX, address]` holding `Option<Pubkey>`
//! - identity claim: `[IDENTITY_RECORD_SEED_PREFIX, identity]` holding the relayer key
//! - stake account: `[STAKE_ACCOUNT_SEED_PREFIX, staker]` holding a [`StakeAccount`]
//!
//! An instruction passes the record accounts of the participants it names.
//! An account at the right address that holds no data reads as an absent
//! record and is created, at the caller's expense, on its first write.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::{
        IDENTITY_RECORD_SEED_PREFIX, RELAYER_RECORD_SEED_PREFIX, STAKE_ACCOUNT_SEED_PREFIX,
        SUBADDRESS_RECORD_SEED_PREFIX,
    },
    error::RegistryError,
    registry::{RecordChanges, RecordStore, Relayer, StakeAccount},
    utils::{
        serialization::{create_pda_account, serialize_to_account},
        validation::validate_writable,
    },
};

pub fn relayer_record_address(program_id: &Pubkey, relayer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RELAYER_RECORD_SEED_PREFIX, relayer.as_ref()], program_id)
}

pub fn subaddress_record_address(program_id: &Pubkey, address: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SUBADDRESS_RECORD_SEED_PREFIX, address.as_ref()], program_id)
}

pub fn identity_record_address(program_id: &Pubkey, identity: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[IDENTITY_RECORD_SEED_PREFIX, identity], program_id)
}

pub fn stake_account_address(program_id: &Pubkey, staker: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STAKE_ACCOUNT_SEED_PREFIX, staker.as_ref()], program_id)
}

/// [`RecordStore`] over the record accounts passed with an instruction.
///
/// Reads decode the matching account. Writes are held until [`commit`],
/// which creates missing accounts and serializes every written record.
///
/// [`commit`]: AccountRecords::commit
pub struct AccountRecords<'a, 'b> {
    program_id: Pubkey,
    accounts: &'a [AccountInfo<'b>],
    pending: RecordChanges,
}

impl<'a, 'b> AccountRecords<'a, 'b> {
    pub fn new(program_id: &Pubkey, accounts: &'a [AccountInfo<'b>]) -> Self {
        Self {
            program_id: *program_id,
            accounts,
            pending: RecordChanges::default(),
        }
    }

    fn find(&self, address: &Pubkey) -> Result<&'a AccountInfo<'b>, RegistryError> {
        self.accounts
            .iter()
            .find(|account| account.key == address)
            .ok_or_else(|| {
                msg!("❌ Record account {} not provided", address);
                RegistryError::RecordAccountMissing
            })
    }

    fn read<T: BorshDeserialize>(&self, prefix: &[u8], key: &[u8]) -> Result<Option<T>, RegistryError> {
        let (address, _) = Pubkey::find_program_address(&[prefix, key], &self.program_id);
        let account = self.find(&address)?;
        if account.data_is_empty() {
            return Ok(None);
        }
        if account.owner != &self.program_id {
            msg!("❌ Record account {} not owned by this program", address);
            return Err(RegistryError::InvalidStateAccount);
        }
        let data = account
            .try_borrow_data()
            .map_err(|_| RegistryError::InvalidStateAccount)?;
        T::deserialize(&mut &data[..]).map(Some).map_err(|e| {
            msg!("❌ Failed to deserialize record {}: {}", address, e);
            RegistryError::InvalidStateAccount
        })
    }

    fn write<T: BorshSerialize>(
        &self,
        prefix: &[u8],
        key: &[u8],
        value: &T,
        payer: &AccountInfo<'b>,
        system_program: &AccountInfo<'b>,
    ) -> ProgramResult {
        let (address, bump) = Pubkey::find_program_address(&[prefix, key], &self.program_id);
        let account = self.find(&address)?;
        validate_writable(account, "Record account")?;

        if account.data_is_empty() {
            let space = value.try_to_vec()?.len();
            create_pda_account(&self.program_id, account, payer, system_program, space, &[prefix, key, &[bump]])?;
            msg!("✅ Record account created: {}", address);
        } else if account.owner != &self.program_id {
            msg!("❌ Record account {} not owned by this program", address);
            return Err(RegistryError::InvalidStateAccount.into());
        }
        serialize_to_account(value, account, payer, system_program)
    }

    /// Writes every pending record, creating accounts funded by `payer`.
    pub fn commit(self, payer: &AccountInfo<'b>, system_program: &AccountInfo<'b>) -> ProgramResult {
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = &self.pending;
        for (relayer, record) in &pending.relayers {
            self.write(RELAYER_RECORD_SEED_PREFIX, relayer.as_ref(), record, payer, system_program)?;
        }
        for (address, owner) in &pending.subaddress_owners {
            self.write(SUBADDRESS_RECORD_SEED_PREFIX, address.as_ref(), owner, payer, system_program)?;
        }
        for (identity, relayer) in &pending.identities {
            self.write(IDENTITY_RECORD_SEED_PREFIX, identity, relayer, payer, system_program)?;
        }
        for (staker, account) in &pending.stake_accounts {
            self.write(STAKE_ACCOUNT_SEED_PREFIX, staker.as_ref(), account, payer, system_program)?;
        }
        msg!("💾 {} participant records saved", pending.len());
        Ok(())
    }
}

impl RecordStore for AccountRecords<'_, '_> {
    fn relayer(&self, relayer: &Pubkey) -> Result<Option<Relayer>, RegistryError> {
        match self.pending.relayers.get(relayer) {
            Some(record) => Ok(Some(record.clone())),
            None => self.read(RELAYER_RECORD_SEED_PREFIX, relayer.as_ref()),
        }
    }

    fn subaddress_owner(&self, address: &Pubkey) -> Result<Option<Pubkey>, RegistryError> {
        match self.pending.subaddress_owners.get(address) {
            Some(owner) => Ok(*owner),
            None => Ok(self
                .read::<Option<Pubkey>>(SUBADDRESS_RECORD_SEED_PREFIX, address.as_ref())?
                .flatten()),
        }
    }

    fn identity_holder(&self, identity: &[u8; 32]) -> Result<Option<Pubkey>, RegistryError> {
        match self.pending.identities.get(identity) {
            Some(holder) => Ok(Some(*holder)),
            None => self.read(IDENTITY_RECORD_SEED_PREFIX, identity),
        }
    }

    fn stake_account(&self, staker: &Pubkey) -> Result<Option<StakeAccount>, RegistryError> {
        match self.pending.stake_accounts.get(staker) {
            Some(account) => Ok(Some(account.clone())),
            None => self.read(STAKE_ACCOUNT_SEED_PREFIX, staker.as_ref()),
        }
    }

    fn put_relayer(&mut self, relayer: Pubkey, record: Relayer) {
        self.pending.relayers.insert(relayer, record);
    }

    fn put_subaddress_owner(&mut self, address: Pubkey, owner: Option<Pubkey>) {
        self.pending.subaddress_owners.insert(address, owner);
    }

    fn put_identity_holder(&mut self, identity: [u8; 32], relayer: Pubkey) {
        self.pending.identities.insert(identity, relayer);
    }

    fn put_stake_account(&mut self, staker: Pubkey, account: StakeAccount) {
        self.pending.stake_accounts.insert(staker, account);
    }
}

/// Decodes a record account's data, for clients and tests.
pub fn decode_record<T: BorshDeserialize>(data: &[u8]) -> Result<T, ProgramError> {
    T::deserialize(&mut &data[..]).map_err(|_| ProgramError::InvalidAccountData)
}
