//! Per-pool withdrawal fee oracle.
//!
//! Fees are denominated in the governance token and derived from
//! time-weighted average prices of the pool token and the governance token,
//! both quoted in native units. Any caller may refresh a pool; a refresh that
//! would store a zero fee is rejected.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::{
    constants::{
        DEFAULT_FEE_UPDATE_INTERVAL, DEFAULT_GOVERNANCE_FEE_TIER, DEFAULT_GOVERNANCE_TOKEN_DECIMALS,
        DEFAULT_TWAP_PERIOD, FEE_DIVIDER, MAX_POOLS, MAX_TOKEN_DECIMALS, MAX_PROTOCOL_FEE_BPS,
        PRICE_SCALE,
    },
    error::RegistryError,
    registry::collaborators::{PriceFeed, PriceObservation},
};

pub type PoolId = u32;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolFeeRecord {
    pub pool_address: Pubkey,
    pub token_address: Pubkey,
    /// False for pools of the native asset, which is priced at exactly one native unit
    pub is_non_native_token: bool,
    /// Selects the price feed tier queried for `token_address`
    pub swap_fee_tier: u32,
    /// Pool denomination in token base units
    pub denomination: u64,
    pub token_decimals: u8,
    pub protocol_fee_bps: u32,
    /// Last computed fee in governance-token base units; zero until the first refresh
    pub current_fee: u64,
    pub last_updated: i64,
}

/// Governance-supplied pool parameters.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PoolRegistration {
    pub pool_address: Pubkey,
    pub token_address: Pubkey,
    pub is_non_native_token: bool,
    pub swap_fee_tier: u32,
    pub denomination: u64,
    pub token_decimals: u8,
    pub protocol_fee_bps: u32,
}

/// Oracle parameter changes; `None` keeps the current value.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct OracleParamsUpdate {
    pub twap_period: Option<u32>,
    pub governance_fee_tier: Option<u32>,
    pub fee_update_interval: Option<i64>,
}

/// Result of a batch refresh. Each pool is refreshed independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchUpdateReport {
    pub updated: Vec<(PoolId, u64)>,
    pub failed: Vec<(PoolId, RegistryError)>,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeeOracle {
    pub governance_token: Pubkey,
    /// Read from the governance mint at initialization
    pub governance_token_decimals: u8,
    pub governance_fee_tier: u32,
    /// TWAP window in seconds
    pub twap_period: u32,
    /// Fees older than this are refreshed before they are charged
    pub fee_update_interval: i64,
    pub pools: Vec<PoolFeeRecord>,
}

impl Default for FeeOracle {
    fn default() -> Self {
        Self::new(Pubkey::default(), DEFAULT_GOVERNANCE_TOKEN_DECIMALS)
    }
}

impl FeeOracle {
    pub fn new(governance_token: Pubkey, governance_token_decimals: u8) -> Self {
        Self {
            governance_token,
            governance_token_decimals,
            governance_fee_tier: DEFAULT_GOVERNANCE_FEE_TIER,
            twap_period: DEFAULT_TWAP_PERIOD,
            fee_update_interval: DEFAULT_FEE_UPDATE_INTERVAL,
            pools: Vec::new(),
        }
    }

    pub fn pool(&self, pool_id: PoolId) -> Result<&PoolFeeRecord, RegistryError> {
        self.pools
            .get(pool_id as usize)
            .ok_or(RegistryError::PoolNotFound)
    }

    pub fn pool_id_of(&self, pool_address: &Pubkey) -> Option<PoolId> {
        self.pools
            .iter()
            .position(|pool| pool.pool_address == *pool_address)
            .map(|index| index as PoolId)
    }

    /// Adds a pool, or supersedes the parameters of an already known pool.
    pub fn register_pool(&mut self, registration: &PoolRegistration) -> Result<PoolId, RegistryError> {
        if registration.denomination == 0
            || registration.protocol_fee_bps == 0
            || registration.protocol_fee_bps > MAX_PROTOCOL_FEE_BPS
            || registration.token_decimals > MAX_TOKEN_DECIMALS
        {
            msg!("❌ Invalid pool parameters for {}", registration.pool_address);
            return Err(RegistryError::InvalidParameter);
        }

        if let Some(pool_id) = self.pool_id_of(&registration.pool_address) {
            let record = &mut self.pools[pool_id as usize];
            record.token_address = registration.token_address;
            record.is_non_native_token = registration.is_non_native_token;
            record.swap_fee_tier = registration.swap_fee_tier;
            record.denomination = registration.denomination;
            record.token_decimals = registration.token_decimals;
            record.protocol_fee_bps = registration.protocol_fee_bps;
            msg!("🔄 Pool {} ({}) parameters superseded", pool_id, registration.pool_address);
            return Ok(pool_id);
        }

        if self.pools.len() >= MAX_POOLS {
            msg!("❌ Pool limit of {} reached", MAX_POOLS);
            return Err(RegistryError::InvalidParameter);
        }
        let pool_id = PoolId::try_from(self.pools.len()).map_err(|_| RegistryError::ArithmeticOverflow)?;
        self.pools.push(PoolFeeRecord {
            pool_address: registration.pool_address,
            token_address: registration.token_address,
            is_non_native_token: registration.is_non_native_token,
            swap_fee_tier: registration.swap_fee_tier,
            denomination: registration.denomination,
            token_decimals: registration.token_decimals,
            protocol_fee_bps: registration.protocol_fee_bps,
            current_fee: 0,
            last_updated: 0,
        });
        msg!("✅ Pool {} registered as id {}", registration.pool_address, pool_id);
        Ok(pool_id)
    }

    pub fn apply_params(&mut self, update: &OracleParamsUpdate) -> Result<(), RegistryError> {
        if update.twap_period == Some(0)
            || update.governance_fee_tier == Some(0)
            || matches!(update.fee_update_interval, Some(interval) if interval <= 0)
        {
            return Err(RegistryError::InvalidParameter);
        }
        if let Some(period) = update.twap_period {
            msg!("🔄 TWAP period: {} → {}", self.twap_period, period);
            self.twap_period = period;
        }
        if let Some(tier) = update.governance_fee_tier {
            msg!("🔄 Governance fee tier: {} → {}", self.governance_fee_tier, tier);
            self.governance_fee_tier = tier;
        }
        if let Some(interval) = update.fee_update_interval {
            msg!("🔄 Fee update interval: {} → {}", self.fee_update_interval, interval);
            self.fee_update_interval = interval;
        }
        Ok(())
    }

    pub fn get_fee_for_pool_id(&self, pool_id: PoolId) -> Result<u64, RegistryError> {
        Ok(self.pool(pool_id)?.current_fee)
    }

    /// Recomputes and stores the fee of one pool.
    pub fn update_fee_of_pool(
        &mut self,
        pool_id: PoolId,
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<u64, RegistryError> {
        let fee = self.compute_fee(self.pool(pool_id)?, feed, now)?;
        let record = &mut self.pools[pool_id as usize];
        record.current_fee = fee;
        record.last_updated = now;
        msg!("💱 Pool {} fee updated to {}", pool_id, fee);
        Ok(fee)
    }

    /// Refreshes each listed pool independently; failures do not stop the batch.
    pub fn update_fees_of_pools(
        &mut self,
        pool_ids: &[PoolId],
        feed: &dyn PriceFeed,
        now: i64,
    ) -> BatchUpdateReport {
        let mut report = BatchUpdateReport::default();
        for &pool_id in pool_ids {
            match self.update_fee_of_pool(pool_id, feed, now) {
                Ok(fee) => report.updated.push((pool_id, fee)),
                Err(e) => {
                    msg!("⚠️ Pool {} fee update failed: {}", pool_id, e);
                    report.failed.push((pool_id, e));
                }
            }
        }
        report
    }

    pub fn update_all_fees(&mut self, feed: &dyn PriceFeed, now: i64) -> BatchUpdateReport {
        let ids: Vec<PoolId> = (0..self.pools.len() as PoolId).collect();
        self.update_fees_of_pools(&ids, feed, now)
    }

    /// Fee to charge now, refreshing it first when it is missing or stale.
    pub fn fee_with_refresh(
        &mut self,
        pool_id: PoolId,
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<u64, RegistryError> {
        let record = self.pool(pool_id)?;
        let age = now.saturating_sub(record.last_updated);
        if record.current_fee == 0 || age > self.fee_update_interval {
            return self.update_fee_of_pool(pool_id, feed, now);
        }
        Ok(record.current_fee)
    }

    fn compute_fee(
        &self,
        record: &PoolFeeRecord,
        feed: &dyn PriceFeed,
        now: i64,
    ) -> Result<u64, RegistryError> {
        let governance_price = twap(
            &feed.observations(&self.governance_token, self.governance_fee_tier)?,
            self.twap_period,
            now,
        )?;
        let token_price = if record.is_non_native_token {
            twap(
                &feed.observations(&record.token_address, record.swap_fee_tier)?,
                self.twap_period,
                now,
            )?
        } else {
            PRICE_SCALE
        };
        pool_fee(record, self.governance_token_decimals, governance_price, token_price)
    }
}

/// Time-weighted average price over the trailing `period` seconds.
pub fn twap(observations: &[PriceObservation], period: u32, now: i64) -> Result<u128, RegistryError> {
    let latest = observations.last().ok_or(RegistryError::OracleUnavailable)?;
    if now.saturating_sub(latest.timestamp) > period as i64 {
        msg!("❌ Price feed stale: last observation at {}", latest.timestamp);
        return Err(RegistryError::OracleUnavailable);
    }
    let window_start = latest.timestamp.saturating_sub(period as i64);
    let base = observations
        .iter()
        .rev()
        .find(|observation| observation.timestamp <= window_start)
        .ok_or(RegistryError::OracleUnavailable)?;

    let elapsed = latest.timestamp - base.timestamp;
    if elapsed <= 0 {
        return Err(RegistryError::OracleUnavailable);
    }
    let cumulative_delta = latest
        .cumulative_price
        .checked_sub(base.cumulative_price)
        .ok_or(RegistryError::OracleUnavailable)?;
    Ok(cumulative_delta / elapsed as u128)
}

/// Converts a pool denomination into a governance-token fee.
///
/// `governance_decimals` are the decimals of the governance mint the fee is
/// paid in.
pub fn pool_fee(
    record: &PoolFeeRecord,
    governance_decimals: u8,
    governance_price: u128,
    token_price: u128,
) -> Result<u64, RegistryError> {
    if token_price == 0 || governance_price == 0 {
        return Err(RegistryError::OracleUnavailable);
    }
    let ratio = governance_price
        .checked_mul(PRICE_SCALE)
        .ok_or(RegistryError::ArithmeticOverflow)?
        / token_price;
    if ratio == 0 {
        return Err(RegistryError::ZeroFeeResult);
    }

    let in_governance_units = (record.denomination as u128)
        .checked_mul(PRICE_SCALE)
        .ok_or(RegistryError::ArithmeticOverflow)?
        / ratio;
    let rescaled = in_governance_units
        .checked_mul(decimal_factor(governance_decimals)?)
        .ok_or(RegistryError::ArithmeticOverflow)?
        / decimal_factor(record.token_decimals)?;
    let fee = rescaled
        .checked_mul(record.protocol_fee_bps as u128)
        .ok_or(RegistryError::ArithmeticOverflow)?
        / FEE_DIVIDER;

    if fee == 0 {
        msg!("❌ Fee for pool {} floored to zero", record.pool_address);
        return Err(RegistryError::ZeroFeeResult);
    }
    u64::try_from(fee).map_err(|_| RegistryError::ArithmeticOverflow)
}

fn decimal_factor(decimals: u8) -> Result<u128, RegistryError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(RegistryError::ArithmeticOverflow)
}
