use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

declare_id!("CciYo6bivUDXeyKKUdP9f7oDVAXkvC9K5sQtcXLREwxi");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "farm-factory",
    project_url: "https://github.com/token-farm/token-farm",
    contacts: "email:security@token-farm.dev",
    policy: "https://github.com/token-farm/token-farm/blob/main/SECURITY.md"
}

pub const FACTORY_SEED: &str = "farm_factory";
pub const FACTORY_AUTHORITY_SEED: &str = "factory_authority";

pub mod error;
pub mod instructions;
pub mod states;

use instructions::*;

#[program]
pub mod farm_factory {

    use super::*;

    pub fn initialize_factory(ctx: Context<InitializeFactory>, farm_program: Pubkey) -> Result<()> {
        instructions::initialize_factory(ctx, farm_program)
    }

    pub fn create_farm(ctx: Context<CreateFarm>, reward_per_height: u64) -> Result<()> {
        instructions::create_farm(ctx, reward_per_height)
    }
}
