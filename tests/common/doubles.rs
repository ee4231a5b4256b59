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

//! # In-Memory Collaborator Doubles
//!
//! Test implementations of the registry's collaborator traits so the core
//! can be exercised without a runtime.

use std::collections::HashMap;

use relayer_registry::{
    registry::{Authorizer, IdentityResolver, PriceFeed, PriceObservation, TokenVault},
    RegistryError,
};
use solana_program::pubkey::Pubkey;

/// Token vault backed by a holder → balance map.
///
/// Deposits draw from the holder's balance, withdrawals pay into it. Setting
/// `failing` makes every transfer fail without moving anything.
#[derive(Debug, Default, Clone)]
pub struct MockVault {
    pub holdings: HashMap<Pubkey, u64>,
    pub vault_balance: u64,
    pub failing: bool,
    pub deposits: u32,
    pub withdrawals: u32,
}

#[allow(dead_code)]
impl MockVault {
    pub fn fund(&mut self, holder: &Pubkey, amount: u64) {
        *self.holdings.entry(*holder).or_default() += amount;
    }

    pub fn holding(&self, holder: &Pubkey) -> u64 {
        self.holdings.get(holder).copied().unwrap_or(0)
    }
}

impl TokenVault for MockVault {
    fn deposit(&mut self, from: &Pubkey, amount: u64) -> Result<(), RegistryError> {
        if self.failing {
            return Err(RegistryError::TokenTransferFailed);
        }
        let holding = self.holdings.entry(*from).or_default();
        if *holding < amount {
            return Err(RegistryError::TokenTransferFailed);
        }
        *holding -= amount;
        self.vault_balance += amount;
        self.deposits += 1;
        Ok(())
    }

    fn withdraw(&mut self, to: &Pubkey, amount: u64) -> Result<(), RegistryError> {
        if self.failing || self.vault_balance < amount {
            return Err(RegistryError::TokenTransferFailed);
        }
        self.vault_balance -= amount;
        *self.holdings.entry(*to).or_default() += amount;
        self.withdrawals += 1;
        Ok(())
    }

    fn balance(&self) -> Result<u64, RegistryError> {
        Ok(self.vault_balance)
    }
}

/// Name service lookup from a fixed identity → owner table.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentityResolver {
    pub owners: HashMap<[u8; 32], Pubkey>,
}

#[allow(dead_code)]
impl StaticIdentityResolver {
    pub fn insert(&mut self, identity: [u8; 32], owner: Pubkey) {
        self.owners.insert(identity, owner);
    }
}

impl IdentityResolver for StaticIdentityResolver {
    fn owner_of(&self, identity: &[u8; 32]) -> Option<Pubkey> {
        self.owners.get(identity).copied()
    }
}

/// Price feed serving canned observations per `(token, fee_tier)`.
#[derive(Debug, Default, Clone)]
pub struct DummyPriceFeed {
    pub feeds: HashMap<(Pubkey, u32), Vec<PriceObservation>>,
}

#[allow(dead_code)]
impl DummyPriceFeed {
    pub fn set(&mut self, token: Pubkey, fee_tier: u32, observations: Vec<PriceObservation>) {
        self.feeds.insert((token, fee_tier), observations);
    }

    /// Two observations `period` seconds apart ending at `now` with a constant price.
    pub fn set_flat_price(&mut self, token: Pubkey, fee_tier: u32, price: u128, now: i64, period: u32) {
        self.set(
            token,
            fee_tier,
            vec![
                PriceObservation {
                    timestamp: now - period as i64,
                    cumulative_price: 0,
                },
                PriceObservation {
                    timestamp: now,
                    cumulative_price: price * period as u128,
                },
            ],
        );
    }

    pub fn remove(&mut self, token: &Pubkey, fee_tier: u32) {
        self.feeds.remove(&(*token, fee_tier));
    }
}

impl PriceFeed for DummyPriceFeed {
    fn observations(&self, token: &Pubkey, fee_tier: u32) -> Result<Vec<PriceObservation>, RegistryError> {
        self.feeds
            .get(&(*token, fee_tier))
            .cloned()
            .ok_or(RegistryError::OracleUnavailable)
    }
}

/// Authorizer with fixed role holders.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticAuthorizer {
    pub governance: Pubkey,
    pub withdrawal_router: Pubkey,
    pub stake_source: Pubkey,
}

impl Authorizer for StaticAuthorizer {
    fn is_governance(&self, caller: &Pubkey) -> bool {
        *caller == self.governance
    }

    fn is_withdrawal_router(&self, caller: &Pubkey) -> bool {
        *caller == self.withdrawal_router
    }

    fn is_stake_source(&self, caller: &Pubkey) -> bool {
        *caller == self.stake_source
    }
}
