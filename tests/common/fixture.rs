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

//! # Registry Fixture
//!
//! Builds an initialized in-memory `Registry` and its participant records,
//! wired to the doubles, plus helpers for the recurring registration and
//! pool setup steps.

use chrono::{TimeZone, Utc};
use relayer_registry::registry::{
    InitializeParams, MemoryRecords, OracleParamsUpdate, PoolId, PoolRegistration, Registration, Registry,
    Relayer, StakeAccount,
};
use solana_program::pubkey::Pubkey;

use super::doubles::{DummyPriceFeed, MockVault, StaticIdentityResolver};

pub const MIN_STAKE: u64 = 100;
pub const GOVERNANCE_DECIMALS: u8 = 9;
pub const TWAP_PERIOD: u32 = 600;
pub const GOVERNANCE_FEE_TIER: u32 = 10_000;
pub const FEE_UPDATE_INTERVAL: i64 = 3_600;
/// 0.001 native token per governance token, scaled by `PRICE_SCALE`
pub const GOVERNANCE_PRICE: u128 = 1_000_000_000_000_000;
pub const POOL_DENOMINATION: u64 = 1_000_000_000;
pub const POOL_FEE_BPS: u32 = 30;
/// Fee of the default native pool at `GOVERNANCE_PRICE` with 9-decimal governance tokens
pub const EXPECTED_POOL_FEE: u64 = 3_000_000_000;

pub struct RegistryFixture {
    pub registry: Registry,
    pub records: MemoryRecords,
    pub governance: Pubkey,
    pub router: Pubkey,
    pub stake_source: Pubkey,
    pub token_mint: Pubkey,
    pub vault: MockVault,
    pub resolver: StaticIdentityResolver,
    pub feed: DummyPriceFeed,
    pub now: i64,
}

#[allow(dead_code)]
impl RegistryFixture {
    pub fn new() -> Self {
        Self::with_decimals(GOVERNANCE_DECIMALS)
    }

    /// Fixture whose governance mint has `decimals` decimals.
    pub fn with_decimals(decimals: u8) -> Self {
        let governance = Pubkey::new_unique();
        let router = Pubkey::new_unique();
        let stake_source = Pubkey::new_unique();
        let token_mint = Pubkey::new_unique();
        let now = Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            .timestamp();

        let mut registry = Registry::default();
        registry
            .initialize(
                &Self::params(governance, router, stake_source, token_mint),
                Pubkey::new_unique(),
                decimals,
            )
            .expect("initialize registry");

        let mut feed = DummyPriceFeed::default();
        feed.set_flat_price(token_mint, GOVERNANCE_FEE_TIER, GOVERNANCE_PRICE, now, TWAP_PERIOD);

        Self {
            registry,
            records: MemoryRecords::default(),
            governance,
            router,
            stake_source,
            token_mint,
            vault: MockVault::default(),
            resolver: StaticIdentityResolver::default(),
            feed,
            now,
        }
    }

    pub fn params(governance: Pubkey, router: Pubkey, stake_source: Pubkey, token_mint: Pubkey) -> InitializeParams {
        InitializeParams {
            governance,
            withdrawal_router: router,
            stake_source,
            token_mint,
            name_service_program: Pubkey::new_unique(),
            price_feed_program: Pubkey::new_unique(),
            min_stake_amount: MIN_STAKE,
            oracle: OracleParamsUpdate {
                twap_period: Some(TWAP_PERIOD),
                governance_fee_tier: Some(GOVERNANCE_FEE_TIER),
                fee_update_interval: Some(FEE_UPDATE_INTERVAL),
            },
        }
    }

    /// Registration for a fresh identity owned by `relayer` in the resolver.
    pub fn registration_for(&mut self, relayer: &Pubkey, stake: u64, subaddresses: Vec<Pubkey>) -> Registration {
        let identity = Pubkey::new_unique().to_bytes();
        self.resolver.insert(identity, *relayer);
        Registration {
            identity,
            stake,
            subaddresses,
            fee_rate_bps: Some(50),
        }
    }

    /// Funds and registers a new relayer; returns its key.
    pub fn register_relayer(&mut self, stake: u64, subaddresses: Vec<Pubkey>) -> Pubkey {
        let relayer = Pubkey::new_unique();
        self.vault.fund(&relayer, stake);
        let registration = self.registration_for(&relayer, stake, subaddresses);
        self.registry
            .register(
                &mut self.records,
                &relayer,
                &registration,
                &self.resolver,
                &mut self.vault,
                self.now,
            )
            .expect("register relayer");
        relayer
    }

    /// Registers the default native pool; returns its id.
    pub fn register_native_pool(&mut self) -> PoolId {
        let registration = PoolRegistration {
            pool_address: Pubkey::new_unique(),
            token_address: Pubkey::default(),
            is_non_native_token: false,
            swap_fee_tier: 0,
            denomination: POOL_DENOMINATION,
            token_decimals: 9,
            protocol_fee_bps: POOL_FEE_BPS,
        };
        self.registry
            .register_pool(&self.governance, &registration)
            .expect("register pool")
    }

    /// Registers a non-native pool with a flat price feed for its token.
    pub fn register_token_pool(&mut self, token_price: u128, token_decimals: u8, denomination: u64) -> PoolId {
        let token = Pubkey::new_unique();
        let registration = PoolRegistration {
            pool_address: Pubkey::new_unique(),
            token_address: token,
            is_non_native_token: true,
            swap_fee_tier: 3_000,
            denomination,
            token_decimals,
            protocol_fee_bps: POOL_FEE_BPS,
        };
        self.feed.set_flat_price(token, 3_000, token_price, self.now, TWAP_PERIOD);
        self.registry
            .register_pool(&self.governance, &registration)
            .expect("register pool")
    }

    pub fn stake(&mut self, staker: &Pubkey, amount: u64) {
        let source = self.stake_source;
        self.registry
            .update_staked_balance(&mut self.records, &source, staker, amount)
            .expect("update staked balance");
    }

    /// Router credits `relayer` with a fee paid from the router's holdings.
    pub fn credit(&mut self, relayer: &Pubkey, amount: u64) -> u64 {
        let router = self.router;
        self.vault.fund(&router, amount);
        self.registry
            .credit_balance(&mut self.records, &router, relayer, amount, &mut self.vault)
            .expect("credit balance")
    }

    /// Moves the clock and re-publishes the governance price at the new time.
    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
        self.feed
            .set_flat_price(self.token_mint, GOVERNANCE_FEE_TIER, GOVERNANCE_PRICE, self.now, TWAP_PERIOD);
    }

    pub fn relayer(&self, relayer: &Pubkey) -> Option<&Relayer> {
        self.records.relayers.get(relayer)
    }

    pub fn stake_account(&self, staker: &Pubkey) -> Option<&StakeAccount> {
        self.records.stake_accounts.get(staker)
    }

    pub fn is_relayer(&self, address: &Pubkey) -> bool {
        self.records.subaddress_owners.contains_key(address)
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.registry
            .get_relayer_balance(&self.records, address)
            .expect("read relayer balance")
    }

    pub fn pending(&self, staker: &Pubkey) -> u64 {
        self.registry
            .pending_rewards(&self.records, staker)
            .expect("read pending rewards")
    }

    /// `sum(balance) == credited - debited - nullified`
    pub fn assert_ledger_balanced(&self) {
        assert_eq!(
            self.records.total_relayer_balance(),
            self.registry.ledger.totals.outstanding(),
            "ledger balances diverged from running totals"
        );
    }
}
