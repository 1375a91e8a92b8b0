use crate::states::*;
use crate::{FACTORY_AUTHORITY_SEED, FACTORY_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenInterface};
use token_farm::cpi::accounts::Initialize;

/// Accounts context for `create_farm`.
///
/// The farm, registry and vault are passed uninitialized; the farm program
/// checks their seeds when it allocates them under the factory authority and
/// the current `farm_count`.
#[derive(Accounts)]
pub struct CreateFarm<'info> {
    /// Pays for the new farm and becomes its operator.
    #[account(mut)]
    pub operator: Signer<'info>,

    #[account(
        mut,
        seeds = [FACTORY_SEED.as_bytes()],
        bump = factory.bump,
    )]
    pub factory: Box<Account<'info, FarmFactory>>,

    /// CHECK: PDA signer, creator namespace of every factory farm.
    #[account(
        seeds = [FACTORY_AUTHORITY_SEED.as_bytes()],
        bump = factory.authority_bump,
    )]
    pub factory_authority: UncheckedAccount<'info>,

    /// CHECK: allocated and seed-checked by the farm program.
    #[account(mut)]
    pub farm: UncheckedAccount<'info>,

    /// CHECK: allocated and seed-checked by the farm program.
    #[account(mut)]
    pub staker_registry: UncheckedAccount<'info>,

    /// CHECK: allocated and seed-checked by the farm program.
    #[account(mut)]
    pub stake_vault: UncheckedAccount<'info>,

    #[account(mint::token_program = stake_token_program)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Any token program; the farm only needs it to be a mint.
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: compared with `factory.farm_program` in the handler.
    pub farm_program: UncheckedAccount<'info>,

    /// Owns `stake_mint`; the farm's vault is created under it.
    pub stake_token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Spawns a new farm running the factory's logic program.
///
/// The farm is configured with the given mints and `reward_per_height` and
/// activated in the same instruction. Its reward mint authority still has to
/// be handed to the farm before anyone can claim.
///
/// # Fails
/// - `LogicNotSet` if the factory has no farm program.
/// - `InvalidFarmProgram` if `farm_program` is not the stored one.
/// - `MathOverflow` if the farm counter is exhausted.
pub fn create_farm(ctx: Context<CreateFarm>, reward_per_height: u64) -> Result<()> {
    ctx.accounts
        .factory
        .ensure_logic(&ctx.accounts.farm_program.key())?;

    let seed = ctx.accounts.factory.next_farm_seed();
    let authority_bump = ctx.accounts.factory.authority_bump;
    let signer_seeds: &[&[&[u8]]] = &[&[FACTORY_AUTHORITY_SEED.as_bytes(), &[authority_bump]]];

    let cpi_accounts = Initialize {
        payer: ctx.accounts.operator.to_account_info(),
        creator: ctx.accounts.factory_authority.to_account_info(),
        farm: ctx.accounts.farm.to_account_info(),
        staker_registry: ctx.accounts.staker_registry.to_account_info(),
        stake_mint: ctx.accounts.stake_mint.to_account_info(),
        reward_mint: ctx.accounts.reward_mint.to_account_info(),
        stake_vault: ctx.accounts.stake_vault.to_account_info(),
        stake_token_program: ctx.accounts.stake_token_program.to_account_info(),
        system_program: ctx.accounts.system_program.to_account_info(),
    };
    token_farm::cpi::initialize(
        CpiContext::new_with_signer(
            ctx.accounts.farm_program.to_account_info(),
            cpi_accounts,
            signer_seeds,
        ),
        seed,
        reward_per_height,
    )?;

    let farm_index = ctx.accounts.factory.record_farm_created()?;
    msg!(
        "Farm {} created with index {}",
        ctx.accounts.farm.key(),
        farm_index
    );

    emit!(FarmCreated {
        factory: ctx.accounts.factory.key(),
        farm: ctx.accounts.farm.key(),
        operator: ctx.accounts.operator.key(),
        stake_mint: ctx.accounts.stake_mint.key(),
        reward_mint: ctx.accounts.reward_mint.key(),
        reward_per_height,
        farm_index,
    });
    Ok(())
}
