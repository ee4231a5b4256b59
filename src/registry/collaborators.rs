//! Interfaces to the systems the registry depends on but does not own.
//!
//! The registry core talks to the token vault, the naming service and the
//! price oracle only through these traits. On chain they are backed by account
//! adapters (`utils::account_adapters`); in tests by in-memory doubles.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::RegistryError;

/// Governance-token custody used by every operation that moves tokens.
///
/// Both transfers are all-or-nothing: an `Err` means no tokens moved.
pub trait TokenVault {
    /// Moves `amount` tokens from `from` into the vault.
    fn deposit(&mut self, from: &Pubkey, amount: u64) -> Result<(), RegistryError>;

    /// Moves `amount` tokens from the vault to `to`.
    fn withdraw(&mut self, to: &Pubkey, amount: u64) -> Result<(), RegistryError>;

    /// Current vault balance.
    fn balance(&self) -> Result<u64, RegistryError>;
}

/// Naming-service lookup used to prove that a registrant controls an identity.
pub trait IdentityResolver {
    /// Owner of the name record `identity`, if the record exists.
    fn owner_of(&self, identity: &[u8; 32]) -> Option<Pubkey>;
}

/// One cumulative price sample.
///
/// `cumulative_price` is the running sum of `price * seconds`, where price is
/// quoted in native units scaled by `PRICE_SCALE`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceObservation {
    pub timestamp: i64,
    pub cumulative_price: u128,
}

/// Source of cumulative price observations per token and fee tier.
pub trait PriceFeed {
    /// Observations for `(token, fee_tier)` sorted by ascending timestamp.
    fn observations(
        &self,
        token: &Pubkey,
        fee_tier: u32,
    ) -> Result<Vec<PriceObservation>, RegistryError>;
}
