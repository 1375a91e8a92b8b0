use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::mint_to_user;
use crate::FARM_SEED;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Mint the caller's accrued reward.
///
/// Works with or without an active stake: a staker that already withdrew still
/// holds whatever it accrued before leaving.
///
/// Funds movement:
/// - `pending` reward is minted from `reward_mint` → staker's reward ATA,
///   signed by the farm PDA as mint authority.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// Staker claiming (payer for ATA creation if needed).
    #[account(mut)]
    pub staker: Signer<'info>,

    /// Farm paying the reward.
    #[account(
        mut,
        constraint = farm.is_active() @ ErrorCode::FarmNotActive,
    )]
    pub farm: Box<Account<'info, Farm>>,

    /// Per-staker record. Allocated on demand for a caller that never deposited.
    #[account(
        init_if_needed,
        seeds = [
            STAKER_INFO_SEED.as_bytes(),
            farm.key().as_ref(),
            staker.key().as_ref()
        ],
        bump,
        payer = staker,
        space = StakerInfo::LEN
    )]
    pub staker_info: Box<Account<'info, StakerInfo>>,

    /// Reward mint configured on the farm.
    #[account(mut, address = farm.reward_mint @ ErrorCode::InvalidMint)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Staker's reward ATA; created on demand.
    #[account(
        init_if_needed,
        payer = staker,
        associated_token::mint = reward_mint,
        associated_token::authority = staker,
        associated_token::token_program = token_program,
    )]
    pub staker_reward_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program owning the reward mint.
    pub token_program: Interface<'info, TokenInterface>,

    /// Associated Token Program (for ATA init).
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// System Program (record and ATA allocation).
    pub system_program: Program<'info, System>,
}

/// Settles the caller, mints its whole `pending` and resets it to zero.
///
/// A zero claim succeeds without touching the mint, including for a caller
/// that never deposited.
///
/// # Fails
/// - `MintFailed` if there is something to mint but the farm is not the
///   reward mint authority. The instruction aborts and `pending` is kept.
pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
    let height = Clock::get()?.slot;
    let farm_key = ctx.accounts.farm.key();
    ctx.accounts.staker_info.bind(
        farm_key,
        ctx.accounts.staker.key(),
        ctx.bumps.staker_info,
    );

    let amount = ctx
        .accounts
        .farm
        .record_claim(&mut ctx.accounts.staker_info, height)?;

    if amount > 0 {
        require!(
            ctx.accounts.reward_mint.mint_authority == COption::Some(farm_key),
            ErrorCode::MintFailed
        );

        let farm = &ctx.accounts.farm;
        let seed = farm.seed.to_le_bytes();
        mint_to_user(
            farm.to_account_info(),
            ctx.accounts.reward_mint.to_account_info(),
            ctx.accounts.staker_reward_token.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            amount,
            &[&[
                FARM_SEED.as_bytes(),
                farm.creator.as_ref(),
                &seed,
                &[farm.bump],
            ]],
        )?;
    }

    emit!(RewardsClaimed {
        farm: farm_key,
        staker: ctx.accounts.staker.key(),
        amount,
    });
    Ok(())
}
