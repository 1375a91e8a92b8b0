use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::transfer_from_vault_to_user;
use crate::FARM_SEED;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Take back the whole stake. Partial withdrawals are not supported.
///
/// Reward accrued up to this slot is settled into `pending` and stays
/// claimable after the stake is gone.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Staker withdrawing.
    #[account(mut)]
    pub staker: Signer<'info>,

    /// Farm holding the stake; its PDA signs the vault transfer.
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

    /// Stake mint configured on the farm.
    #[account(address = farm.stake_mint @ ErrorCode::InvalidMint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Staker's destination token account.
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = staker,
    )]
    pub staker_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Farm vault paying the stake back.
    #[account(mut, address = farm.stake_vault @ ErrorCode::InvalidVault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program owning the stake mint.
    pub token_program: Interface<'info, TokenInterface>,

    /// System Program (record allocation).
    pub system_program: Program<'info, System>,
}

/// Withdraws the caller's full balance.
///
/// # Fails
/// - `NothingStaked` if the caller has no balance, including a caller that
///   never deposited (its freshly allocated record is rolled back).
pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let height = Clock::get()?.slot;
    ctx.accounts.staker_info.bind(
        ctx.accounts.farm.key(),
        ctx.accounts.staker.key(),
        ctx.bumps.staker_info,
    );

    let amount = ctx
        .accounts
        .farm
        .record_withdrawal(&mut ctx.accounts.staker_info, height)?;

    let farm = &ctx.accounts.farm;
    let seed = farm.seed.to_le_bytes();
    transfer_from_vault_to_user(
        farm.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.staker_stake_token.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.stake_mint.decimals,
        &[&[
            FARM_SEED.as_bytes(),
            farm.creator.as_ref(),
            &seed,
            &[farm.bump],
        ]],
    )?;

    #[cfg(feature = "enable-log")]
    msg!(
        "withdraw staker:{} amount:{} pending:{} total:{}",
        ctx.accounts.staker.key(),
        amount,
        ctx.accounts.staker_info.pending,
        farm.total_staking_balance
    );

    emit!(Withdrawn {
        farm: farm.key(),
        staker: ctx.accounts.staker.key(),
        amount,
    });
    Ok(())
}
