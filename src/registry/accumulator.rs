//! Reward-per-token staking accumulator.
//!
//! Rewards arrive continuously and are spread over stakers in proportion to
//! stake-time without iterating over stakers. A single global value,
//! `reward_per_token_stored`, grows by `amount * SCALE / total_staked` on every
//! reward; each account remembers the value it last settled against and
//! accrues `staked * (stored - paid) / SCALE` when checkpointed.
//!
//! The accumulator holds only the global values. Stake accounts are loaded by
//! the caller and passed in, so every operation touches one account.
//!
//! All divisions floor, so the sum of settled rewards never exceeds what was
//! added.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::msg;

use crate::{constants::SCALE, error::RegistryError};

/// Per-staker settlement record.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeAccount {
    /// Mirrored from the external staking system
    pub staked_amount: u64,
    /// Accumulator value this account last settled against
    pub reward_per_token_paid: u128,
    /// Settled but unclaimed rewards
    pub accumulated_rewards: u64,
}

/// Outcome of a governance forced downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DowngradeOutcome {
    /// Account was ahead of the accumulator and got rebased without accrual
    Rebased { forfeited_delta: u128 },
    /// Account was consistent; a normal checkpoint ran
    Checkpointed { accrued: u64 },
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StakingAccumulator {
    pub reward_per_token_stored: u128,
    pub total_staked: u64,
    /// Rewards that arrived while nothing was staked, waiting for the first staker
    pub undistributed: u64,
    pub total_rewards_added: u64,
    pub total_rewards_claimed: u64,
    /// Burns actually applied to the accumulator, in token units
    pub total_burned: u64,
}

impl StakingAccumulator {
    /// Adds `amount` of reward for current stakers.
    ///
    /// With nothing staked the reward is parked in `undistributed` and folded
    /// into the accumulator once stake exists again.
    pub fn notify_reward_added(&mut self, amount: u64) -> Result<(), RegistryError> {
        if amount == 0 {
            return Ok(());
        }
        self.total_rewards_added = self
            .total_rewards_added
            .checked_add(amount)
            .ok_or(RegistryError::ArithmeticOverflow)?;

        if self.total_staked == 0 {
            self.undistributed = self
                .undistributed
                .checked_add(amount)
                .ok_or(RegistryError::ArithmeticOverflow)?;
            msg!("📥 Reward {} parked, nothing staked (undistributed {})", amount, self.undistributed);
            return Ok(());
        }

        let increment = per_token(amount, self.total_staked)?;
        self.reward_per_token_stored = self
            .reward_per_token_stored
            .checked_add(increment)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        msg!(
            "📥 Reward {} over {} staked, reward per token {}",
            amount,
            self.total_staked,
            self.reward_per_token_stored
        );
        Ok(())
    }

    /// Settles `account` against the current accumulator value.
    ///
    /// Fails with `ArithmeticUnderflow` if a burn pushed the accumulator below
    /// the account's paid value; the account is left untouched in that case.
    pub fn checkpoint(&self, account: &mut StakeAccount) -> Result<u64, RegistryError> {
        let stored = self.reward_per_token_stored;
        let accrued = accrued(account, stored)?;
        account.accumulated_rewards = account
            .accumulated_rewards
            .checked_add(accrued)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        account.reward_per_token_paid = stored;
        Ok(accrued)
    }

    /// Checkpoints `account`, then mirrors its new stake.
    ///
    /// A checkpoint that underflows is resolved with a forced downgrade so the
    /// stake change itself always goes through.
    pub fn update_staked_balance(
        &mut self,
        account: &mut StakeAccount,
        new_amount: u64,
    ) -> Result<(), RegistryError> {
        match self.checkpoint(account) {
            Ok(_) => {}
            Err(RegistryError::ArithmeticUnderflow) => {
                msg!("⚠️ Checkpoint underflow, downgrading");
                self.force_downgrade(account)?;
            }
            Err(e) => return Err(e),
        }

        let old_amount = account.staked_amount;
        self.total_staked = self
            .total_staked
            .checked_sub(old_amount)
            .and_then(|total| total.checked_add(new_amount))
            .ok_or(RegistryError::ArithmeticOverflow)?;
        account.staked_amount = new_amount;
        msg!("🔒 Stake {} → {} (total {})", old_amount, new_amount, self.total_staked);

        self.distribute_parked()?;
        Ok(())
    }

    /// Settles `account` and resets its unclaimed rewards to zero.
    ///
    /// Returns the amount the caller must pay out. Zero means nothing to claim.
    pub fn claim(&mut self, account: &mut StakeAccount) -> Result<u64, RegistryError> {
        self.checkpoint(account)?;
        let amount = account.accumulated_rewards;
        if amount == 0 {
            return Ok(0);
        }
        self.total_rewards_claimed = self
            .total_rewards_claimed
            .checked_add(amount)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        account.accumulated_rewards = 0;
        Ok(amount)
    }

    /// Resolves an account that is ahead of the accumulator without reverting.
    pub fn force_downgrade(&self, account: &mut StakeAccount) -> Result<DowngradeOutcome, RegistryError> {
        let stored = self.reward_per_token_stored;
        if account.reward_per_token_paid > stored {
            let forfeited_delta = account.reward_per_token_paid - stored;
            account.reward_per_token_paid = stored;
            msg!("⬇️ Downgraded by {} per token", forfeited_delta);
            return Ok(DowngradeOutcome::Rebased { forfeited_delta });
        }
        let accrued = self.checkpoint(account)?;
        Ok(DowngradeOutcome::Checkpointed { accrued })
    }

    /// Socializes a loss of `amount` across stakers by lowering the accumulator.
    ///
    /// Returns the accumulator decrease actually applied (floored, saturating
    /// at zero). Only the token amount that decrease represents is added to
    /// `total_burned`; with nothing staked nothing is applied.
    pub fn add_burn_rewards(&mut self, amount: u64) -> Result<u128, RegistryError> {
        if amount == 0 {
            return Ok(0);
        }
        if self.total_staked == 0 {
            msg!("ℹ️ Nothing staked, burn of {} not applied", amount);
            return Ok(0);
        }
        let requested = per_token(amount, self.total_staked)?;
        let decrease = requested.min(self.reward_per_token_stored);
        let applied = if decrease == requested {
            amount
        } else {
            let tokens = decrease
                .checked_mul(self.total_staked as u128)
                .ok_or(RegistryError::ArithmeticOverflow)?
                / SCALE;
            u64::try_from(tokens).map_err(|_| RegistryError::ArithmeticOverflow)?
        };

        self.total_burned = self
            .total_burned
            .checked_add(applied)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        self.reward_per_token_stored -= decrease;
        msg!(
            "🔥 Burned {} of {} requested, reward per token now {}",
            applied,
            amount,
            self.reward_per_token_stored
        );
        Ok(decrease)
    }

    /// Overwrites the accumulator. Governance-only corrective action.
    pub fn reset_reward_per_token(&mut self, value: u128) {
        msg!("🛠️ Reward per token reset: {} → {}", self.reward_per_token_stored, value);
        self.reward_per_token_stored = value;
    }

    /// Unclaimed rewards of `account` including the not yet settled delta.
    pub fn pending_rewards(&self, account: &StakeAccount) -> u64 {
        let delta = accrued(account, self.reward_per_token_stored).unwrap_or(0);
        account.accumulated_rewards.saturating_add(delta)
    }

    fn distribute_parked(&mut self) -> Result<(), RegistryError> {
        if self.undistributed == 0 || self.total_staked == 0 {
            return Ok(());
        }
        let increment = per_token(self.undistributed, self.total_staked)?;
        self.reward_per_token_stored = self
            .reward_per_token_stored
            .checked_add(increment)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        msg!("📤 Distributed {} parked rewards", self.undistributed);
        self.undistributed = 0;
        Ok(())
    }
}

fn per_token(amount: u64, total_staked: u64) -> Result<u128, RegistryError> {
    (amount as u128)
        .checked_mul(SCALE)
        .map(|scaled| scaled / total_staked as u128)
        .ok_or(RegistryError::ArithmeticOverflow)
}

fn accrued(account: &StakeAccount, stored: u128) -> Result<u64, RegistryError> {
    let delta = stored
        .checked_sub(account.reward_per_token_paid)
        .ok_or(RegistryError::ArithmeticUnderflow)?;
    let amount = (account.staked_amount as u128)
        .checked_mul(delta)
        .ok_or(RegistryError::ArithmeticOverflow)?
        / SCALE;
    u64::try_from(amount).map_err(|_| RegistryError::ArithmeticOverflow)
}
