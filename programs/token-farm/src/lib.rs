use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

declare_id!("E6CvCtfzyxrxJjqgXk1BPFnn4QCwo8mJmSh5tRociabo");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "token-farm",
    project_url: "https://github.com/token-farm/token-farm",
    contacts: "email:security@token-farm.dev",
    policy: "https://github.com/token-farm/token-farm/blob/main/SECURITY.md"
}

pub const FARM_SEED: &str = "farm";
pub const STAKE_VAULT_SEED: &str = "stake_vault";

pub mod error;
pub mod instructions;
pub mod math;
pub mod states;
pub mod utils;

use instructions::*;

#[program]
pub mod token_farm {

    use super::*;

    pub fn initialize(ctx: Context<Initialize>, seed: u64, reward_per_height: u64) -> Result<()> {
        instructions::initialize(ctx, seed, reward_per_height)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit(ctx, amount)
    }

    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw(ctx)
    }

    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        instructions::claim_rewards(ctx)
    }

    pub fn distribute_rewards_all<'info>(
        ctx: Context<'_, '_, 'info, 'info, DistributeRewardsAll<'info>>,
    ) -> Result<()> {
        instructions::distribute_rewards_all(ctx)
    }
}
