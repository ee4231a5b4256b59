//! Layouts of accounts owned by collaborator programs.
//!
//! The registry only reads these; ownership by the configured program is
//! checked before any field is trusted.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::registry::PriceObservation;

/// Naming-service record: `owner` controls `identity`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub identity: [u8; 32],
    pub owner: Pubkey,
}

/// Cumulative price history of one token on one fee tier.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PriceFeedAccount {
    pub token: Pubkey,
    pub fee_tier: u32,
    /// Ascending by timestamp
    pub observations: Vec<PriceObservation>,
}
