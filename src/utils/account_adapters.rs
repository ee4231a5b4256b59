//! Account-backed implementations of the registry collaborator traits.

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::VAULT_AUTHORITY_SEED_PREFIX,
    error::RegistryError,
    registry::{IdentityResolver, PriceFeed, PriceObservation, TokenVault},
    state::{NameRecord, PriceFeedAccount},
    utils::reentrancy_protection::{unpack_token_account, SafeTokenTransfer},
};

/// Governance-token vault moved through SPL token CPIs.
///
/// Deposits come from `user_token_account` signed by `user`; withdrawals go to
/// `user_token_account` signed by the vault authority PDA.
pub struct SplTokenVault<'a, 'b> {
    pub vault: &'a AccountInfo<'b>,
    pub vault_authority: &'a AccountInfo<'b>,
    pub user: &'a AccountInfo<'b>,
    pub user_token_account: &'a AccountInfo<'b>,
    pub token_program: &'a AccountInfo<'b>,
    pub vault_authority_bump: u8,
}

impl<'a, 'b> SplTokenVault<'a, 'b> {
    fn transfer_in(&self, amount: u64) -> Result<(), ProgramError> {
        let ix = spl_token::instruction::transfer(
            self.token_program.key,
            self.user_token_account.key,
            self.vault.key,
            self.user.key,
            &[],
            amount,
        )?;
        SafeTokenTransfer::new(self.vault, amount as i128, "vault deposit").execute_with_protection(|| {
            invoke(
                &ix,
                &[
                    self.user_token_account.clone(),
                    self.vault.clone(),
                    self.user.clone(),
                    self.token_program.clone(),
                ],
            )
        })
    }

    fn transfer_out(&self, amount: u64) -> Result<(), ProgramError> {
        let ix = spl_token::instruction::transfer(
            self.token_program.key,
            self.vault.key,
            self.user_token_account.key,
            self.vault_authority.key,
            &[],
            amount,
        )?;
        let bump = [self.vault_authority_bump];
        let seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED_PREFIX, &bump];
        SafeTokenTransfer::new(self.vault, -(amount as i128), "vault withdrawal").execute_with_protection(|| {
            invoke_signed(
                &ix,
                &[
                    self.vault.clone(),
                    self.user_token_account.clone(),
                    self.vault_authority.clone(),
                    self.token_program.clone(),
                ],
                &[seeds],
            )
        })
    }
}

impl<'a, 'b> TokenVault for SplTokenVault<'a, 'b> {
    fn deposit(&mut self, from: &Pubkey, amount: u64) -> Result<(), RegistryError> {
        if from != self.user.key || !self.user.is_signer {
            msg!("❌ Deposit source {} did not sign", from);
            return Err(RegistryError::Unauthorized);
        }
        self.transfer_in(amount).map_err(|e| {
            msg!("❌ Vault deposit of {} failed: {}", amount, e);
            RegistryError::TokenTransferFailed
        })
    }

    fn withdraw(&mut self, to: &Pubkey, amount: u64) -> Result<(), RegistryError> {
        let destination = unpack_token_account(self.user_token_account)
            .map_err(|_| RegistryError::TokenTransferFailed)?;
        if destination.owner != *to {
            msg!("❌ Destination token account is owned by {}, not {}", destination.owner, to);
            return Err(RegistryError::Unauthorized);
        }
        self.transfer_out(amount).map_err(|e| {
            msg!("❌ Vault withdrawal of {} failed: {}", amount, e);
            RegistryError::TokenTransferFailed
        })
    }

    fn balance(&self) -> Result<u64, RegistryError> {
        unpack_token_account(self.vault)
            .map(|account| account.amount)
            .map_err(|_| RegistryError::InvalidExternalAccount)
    }
}

/// Resolves identities from a single name record account.
pub struct NameRecordResolver {
    record: NameRecord,
}

impl NameRecordResolver {
    /// Reads the record if `account` is owned by the naming service.
    pub fn from_account(account: &AccountInfo, name_service_program: &Pubkey) -> Result<Self, RegistryError> {
        if account.owner != name_service_program {
            msg!("❌ Name record {} not owned by {}", account.key, name_service_program);
            return Err(RegistryError::InvalidExternalAccount);
        }
        let data = account
            .try_borrow_data()
            .map_err(|_| RegistryError::InvalidExternalAccount)?;
        let record = NameRecord::deserialize(&mut &data[..])
            .map_err(|_| RegistryError::InvalidExternalAccount)?;
        Ok(Self { record })
    }
}

impl IdentityResolver for NameRecordResolver {
    fn owner_of(&self, identity: &[u8; 32]) -> Option<Pubkey> {
        (self.record.identity == *identity).then_some(self.record.owner)
    }
}

/// Price histories read from feed accounts passed with the instruction.
#[derive(Debug, Clone, Default)]
pub struct AccountPriceFeed {
    feeds: Vec<PriceFeedAccount>,
}

impl AccountPriceFeed {
    /// Parses every account; all must be owned by the price feed program.
    pub fn from_accounts(accounts: &[AccountInfo], price_feed_program: &Pubkey) -> Result<Self, RegistryError> {
        let mut feeds = Vec::with_capacity(accounts.len());
        for account in accounts {
            if account.owner != price_feed_program {
                msg!("❌ Price feed {} not owned by {}", account.key, price_feed_program);
                return Err(RegistryError::InvalidExternalAccount);
            }
            let data = account
                .try_borrow_data()
                .map_err(|_| RegistryError::InvalidExternalAccount)?;
            let feed = PriceFeedAccount::deserialize(&mut &data[..])
                .map_err(|_| RegistryError::InvalidExternalAccount)?;
            feeds.push(feed);
        }
        Ok(Self { feeds })
    }
}

impl PriceFeed for AccountPriceFeed {
    fn observations(&self, token: &Pubkey, fee_tier: u32) -> Result<Vec<PriceObservation>, RegistryError> {
        let feed = self
            .feeds
            .iter()
            .find(|feed| feed.token == *token && feed.fee_tier == fee_tier)
            .ok_or_else(|| {
                msg!("❌ No price feed for {} at tier {}", token, fee_tier);
                RegistryError::OracleUnavailable
            })?;
        if feed.observations.windows(2).any(|pair| pair[0].timestamp >= pair[1].timestamp) {
            msg!("❌ Price feed for {} is not ordered", token);
            return Err(RegistryError::OracleUnavailable);
        }
        Ok(feed.observations.clone())
    }
}
