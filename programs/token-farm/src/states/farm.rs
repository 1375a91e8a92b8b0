use crate::error::ErrorCode;
use crate::math::AccrualCalculator;
use crate::states::{StakerInfo, StakerRegistry};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Farm Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a farm. `initialize` is the only transition and it is one-way.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FarmStatus {
    /// Allocated (or never touched); every field is zero.
    #[default]
    Uninitialized,
    /// Configured; staking instructions are accepted.
    Active,
}

/// Immutable configuration written once by `initialize`.
#[derive(Clone, Debug, PartialEq)]
pub struct FarmConfig {
    pub bump: u8,
    pub creator: Pubkey,
    pub seed: u64,
    pub operator: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub staker_registry: Pubkey,
    pub reward_per_height: u64,
}

/// One farm instance: a stake mint, a reward mint and an emission rate.
///
/// Every farm is a PDA of this program derived from
/// `FARM_SEED + creator + seed.to_le_bytes()`, so any number of farms share the
/// program's code while each keeps its own accounts. The farm PDA is both the
/// authority of its stake vault and (once handed over) the reward mint authority.
///
/// All accrual goes through [`Farm::settle`]:
///
/// ```text
/// pending += reward_per_height * (height - checkpoint) * balance / total_staking_balance
/// checkpoint = height
/// ```
///
/// with heights measured in slots.
#[account]
#[derive(Default, Debug)]
pub struct Farm {
    /// PDA bump for this account.
    pub bump: u8,

    /// Whether `initialize` has run.
    pub status: FarmStatus,

    /// Signer namespace of the PDA (the factory authority for factory-made farms).
    pub creator: Pubkey,

    /// Per-creator instance number, part of the PDA seeds.
    pub seed: u64,

    /// Wallet allowed to run `distribute_rewards_all`.
    pub operator: Pubkey,

    /// Mint of the token stakers lock.
    pub stake_mint: Pubkey,

    /// Mint of the token paid out as reward. The farm PDA must be its mint authority.
    pub reward_mint: Pubkey,

    /// Farm-owned token account escrowing all stake.
    pub stake_vault: Pubkey,

    /// Append-only list of stakers.
    pub staker_registry: Pubkey,

    /// Reward base units emitted per slot, split across stakers by share.
    pub reward_per_height: u64,

    /// Sum of every staker's `balance`; always equals the vault balance.
    pub total_staking_balance: u64,

    /// Slot at which the farm became active.
    pub created_at_height: u64,

    /// Slot of the last `distribute_rewards_all` pass (0 if none).
    pub last_distribution_height: u64,

    /// Total reward minted through claims.
    pub total_rewards_claimed: u64,
}

impl Farm {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 1: status
    /// - 32: creator
    /// - 8: seed
    /// - 32 * 5: operator, stake mint, reward mint, stake vault, registry
    /// - 8 * 5: five `u64` counters
    pub const LEN: usize = 8 + 1 + 1 + 32 + 8 + 32 * 5 + 8 * 5;

    pub fn is_active(&self) -> bool {
        self.status == FarmStatus::Active
    }

    /// Writes the configuration and moves the farm to `Active`.
    pub fn activate(&mut self, config: FarmConfig, at_height: u64) -> Result<()> {
        require!(
            self.status == FarmStatus::Uninitialized,
            ErrorCode::AlreadyInitialized
        );

        self.bump = config.bump;
        self.creator = config.creator;
        self.seed = config.seed;
        self.operator = config.operator;
        self.stake_mint = config.stake_mint;
        self.reward_mint = config.reward_mint;
        self.stake_vault = config.stake_vault;
        self.staker_registry = config.staker_registry;
        self.reward_per_height = config.reward_per_height;
        self.total_staking_balance = 0;
        self.created_at_height = at_height;
        self.last_distribution_height = 0;
        self.total_rewards_claimed = 0;
        self.status = FarmStatus::Active;
        Ok(())
    }

    /// What `staker.pending` would be if settled at `at_height`, without
    /// touching the record. Saturates at `u64::MAX`.
    pub fn projected_pending(&self, staker: &StakerInfo, at_height: u64) -> u64 {
        let elapsed = AccrualCalculator::elapsed(staker.checkpoint, at_height);
        let increment = AccrualCalculator::accrued(
            self.reward_per_height,
            elapsed,
            staker.balance,
            self.total_staking_balance,
        );
        staker.pending.saturating_add(increment)
    }

    /// Adds the reward accrued since the staker's checkpoint to `pending` and
    /// moves the checkpoint to `at_height`. Settling twice at one height is a no-op.
    ///
    /// Infallible, so the `record_*` operations run it only once every check
    /// that can fail has passed.
    pub fn settle(&self, staker: &mut StakerInfo, at_height: u64) {
        staker.pending = self.projected_pending(staker, at_height);
        staker.checkpoint = staker.checkpoint.max(at_height);
    }

    /// Books a deposit of `amount` for `staker`.
    ///
    /// The staker is settled on its pre-deposit balance and the pre-deposit
    /// total, so the new stake does not earn for the past. A first-time staker
    /// is appended to `registry`.
    pub fn record_deposit(
        &mut self,
        registry: &mut StakerRegistry,
        staker: &mut StakerInfo,
        amount: u64,
        at_height: u64,
    ) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(self.is_active(), ErrorCode::FarmNotActive);

        let balance = staker
            .balance
            .checked_add(amount)
            .ok_or(error!(ErrorCode::MathOverflow))?;
        let total = self
            .total_staking_balance
            .checked_add(amount)
            .ok_or(error!(ErrorCode::MathOverflow))?;

        if !staker.has_staked {
            staker.registry_index = registry.register(staker.owner)?;
            staker.has_staked = true;
        }

        self.settle(staker, at_height);
        staker.balance = balance;
        staker.is_staking = true;
        self.total_staking_balance = total;
        Ok(())
    }

    /// Books the withdrawal of the staker's whole balance and returns it.
    /// `pending` is settled and kept.
    pub fn record_withdrawal(&mut self, staker: &mut StakerInfo, at_height: u64) -> Result<u64> {
        require!(self.is_active(), ErrorCode::FarmNotActive);
        require!(staker.balance > 0, ErrorCode::NothingStaked);

        let amount = staker.balance;
        let total = self
            .total_staking_balance
            .checked_sub(amount)
            .ok_or(error!(ErrorCode::MathOverflow))?;

        self.settle(staker, at_height);
        staker.balance = 0;
        staker.is_staking = false;
        self.total_staking_balance = total;
        Ok(amount)
    }

    /// Settles the staker, zeroes its `pending` and returns the amount to mint.
    pub fn record_claim(&mut self, staker: &mut StakerInfo, at_height: u64) -> Result<u64> {
        require!(self.is_active(), ErrorCode::FarmNotActive);

        self.settle(staker, at_height);
        let amount = staker.pending;
        staker.pending = 0;
        staker.total_claimed = staker.total_claimed.saturating_add(amount);
        self.total_rewards_claimed = self.total_rewards_claimed.saturating_add(amount);
        Ok(amount)
    }

    /// Settles every registered staker that still has a stake, in registry
    /// order, and returns how many were settled.
    ///
    /// `stakers` must be the records of every registry entry, in registry order.
    /// Nothing is written unless every record checks out.
    pub fn distribute(
        &mut self,
        registry: &StakerRegistry,
        stakers: &mut [&mut StakerInfo],
        at_height: u64,
    ) -> Result<u32> {
        require!(self.is_active(), ErrorCode::FarmNotActive);
        require!(
            stakers.len() == registry.len(),
            ErrorCode::RegistryMismatch
        );
        for (expected, staker) in registry.stakers.iter().zip(stakers.iter()) {
            require_keys_eq!(staker.owner, *expected, ErrorCode::RegistryMismatch);
            require_keys_eq!(staker.farm, registry.farm, ErrorCode::RegistryMismatch);
        }

        let mut count: u32 = 0;
        for staker in stakers.iter_mut().filter(|staker| staker.is_staking) {
            self.settle(staker, at_height);
            count += 1;
        }
        self.last_distribution_height = at_height;
        Ok(count)
    }
}

pub fn derive_farm_address(creator: &Pubkey, seed: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            crate::FARM_SEED.as_bytes(),
            creator.as_ref(),
            &seed.to_le_bytes(),
        ],
        &crate::ID,
    )
}

pub fn derive_stake_vault_address(farm: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[crate::STAKE_VAULT_SEED.as_bytes(), farm.as_ref()],
        &crate::ID,
    )
}
