use crate::states::*;
use crate::{FARM_SEED, STAKE_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialize`.
///
/// This handler:
/// - Allocates the farm PDA under `FARM_SEED + creator + seed`.
/// - Allocates the (empty) staker registry and the stake vault, both owned by the farm.
/// - Records the immutable configuration and activates the farm.
///
/// The factory calls this through CPI with its authority PDA as `creator`; a
/// standalone farm simply passes the payer as `creator` too.
#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct Initialize<'info> {
    /// Funds the new accounts and becomes the farm operator.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Namespace of the farm PDA. Must sign so nobody can squat another creator's seeds.
    pub creator: Signer<'info>,

    /// Farm state. `init_if_needed` so that a second call reaches the handler
    /// and fails with `AlreadyInitialized`.
    #[account(
        init_if_needed,
        seeds = [
            FARM_SEED.as_bytes(),
            creator.key().as_ref(),
            &seed.to_le_bytes(),
        ],
        bump,
        payer = payer,
        space = Farm::LEN
    )]
    pub farm: Box<Account<'info, Farm>>,

    /// Append-only staker list, empty at creation.
    #[account(
        init_if_needed,
        seeds = [
            STAKER_REGISTRY_SEED.as_bytes(),
            farm.key().as_ref()
        ],
        bump,
        payer = payer,
        space = StakerRegistry::space(0)
    )]
    pub staker_registry: Box<Account<'info, StakerRegistry>>,

    /// Mint stakers lock.
    #[account(mint::token_program = stake_token_program)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Mint paid out as reward. Its mint authority is handed to the farm afterwards.
    /// May live under a different token program than `stake_mint`.
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Farm-owned vault escrowing all stake.
    #[account(
        init_if_needed,
        seeds = [
            STAKE_VAULT_SEED.as_bytes(),
            farm.key().as_ref()
        ],
        bump,
        payer = payer,
        token::mint = stake_mint,
        token::authority = farm,
        token::token_program = stake_token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program owning `stake_mint` and the vault.
    pub stake_token_program: Interface<'info, TokenInterface>,

    /// Solana System Program.
    pub system_program: Program<'info, System>,
}

/// Configures a freshly allocated farm and moves it to `Active`.
///
/// # Parameters
/// - `seed`: per-creator instance number, part of the farm address.
/// - `reward_per_height`: reward base units emitted per slot; immutable afterwards.
///
/// # Fails
/// - `AlreadyInitialized` if the farm at this address is already active.
pub fn initialize(ctx: Context<Initialize>, seed: u64, reward_per_height: u64) -> Result<()> {
    let height = Clock::get()?.slot;
    let farm_key = ctx.accounts.farm.key();

    ctx.accounts.farm.activate(
        FarmConfig {
            bump: ctx.bumps.farm,
            creator: ctx.accounts.creator.key(),
            seed,
            operator: ctx.accounts.payer.key(),
            stake_mint: ctx.accounts.stake_mint.key(),
            reward_mint: ctx.accounts.reward_mint.key(),
            stake_vault: ctx.accounts.stake_vault.key(),
            staker_registry: ctx.accounts.staker_registry.key(),
            reward_per_height,
        },
        height,
    )?;

    let staker_registry = &mut ctx.accounts.staker_registry;
    staker_registry.bump = ctx.bumps.staker_registry;
    staker_registry.farm = farm_key;
    msg!("Farm initialized at slot {}", height);

    emit!(FarmInitialized {
        farm: farm_key,
        creator: ctx.accounts.creator.key(),
        operator: ctx.accounts.payer.key(),
        stake_mint: ctx.accounts.stake_mint.key(),
        reward_mint: ctx.accounts.reward_mint.key(),
        reward_per_height,
    });
    Ok(())
}
