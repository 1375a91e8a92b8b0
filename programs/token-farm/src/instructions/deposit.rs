use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{realloc_with_rent, transfer_from_user_to_vault};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Lock stake tokens in a farm.
///
/// The staker's record is created on the first deposit, and the staker is
/// appended to the farm's registry at the same time (the registry account grows
/// by one key, paid by the staker).
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Staker locking tokens (payer for its record and registry growth).
    #[account(mut)]
    pub staker: Signer<'info>,

    /// Farm being staked into; must be active.
    #[account(
        mut,
        constraint = farm.is_active() @ ErrorCode::FarmNotActive,
    )]
    pub farm: Box<Account<'info, Farm>>,

    /// The farm's staker registry.
    #[account(
        mut,
        address = farm.staker_registry @ ErrorCode::RegistryMismatch,
    )]
    pub staker_registry: Box<Account<'info, StakerRegistry>>,

    /// Per-staker record (derived by STAKER_INFO_SEED + farm + staker).
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

    /// Staker's source token account.
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = staker,
    )]
    pub staker_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Farm vault receiving the stake.
    #[account(mut, address = farm.stake_vault @ ErrorCode::InvalidVault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program owning the stake mint.
    pub token_program: Interface<'info, TokenInterface>,

    /// System Program (record creation, registry growth).
    pub system_program: Program<'info, System>,
}

/// Deposits `amount` stake tokens.
///
/// Steps:
/// 1) Reject a zero amount or a source account that cannot cover it.
/// 2) On first deposit, bind the record and grow the registry by one key.
/// 3) Move the tokens into the vault and measure what the vault received.
/// 4) Settle accrued reward on the pre-deposit balance and total.
/// 5) Credit the received amount to the staker balance and the farm total.
/// 6) Emit `Deposited` with the credited amount.
///
/// Only the vault delta is credited, so a Token-2022 mint withholding a
/// transfer fee never lets the books exceed the vault.
///
/// # Fails
/// - `InvalidAmount` if `amount == 0` or the vault received nothing.
/// - `TransferFailed` if the staker's token account holds less than `amount`.
pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InvalidAmount);
    require!(
        ctx.accounts.staker_stake_token.amount >= amount,
        ErrorCode::TransferFailed
    );

    let height = Clock::get()?.slot;
    let farm_key = ctx.accounts.farm.key();
    let staker_key = ctx.accounts.staker.key();

    ctx.accounts
        .staker_info
        .bind(farm_key, staker_key, ctx.bumps.staker_info);

    if !ctx.accounts.staker_info.has_staked {
        realloc_with_rent(
            ctx.accounts.staker_registry.to_account_info(),
            ctx.accounts.staker.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            StakerRegistry::space(ctx.accounts.staker_registry.len() + 1),
        )?;
    }

    let vault_before = ctx.accounts.stake_vault.amount;
    transfer_from_user_to_vault(
        ctx.accounts.staker.to_account_info(),
        ctx.accounts.staker_stake_token.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.stake_mint.decimals,
    )?;
    ctx.accounts.stake_vault.reload()?;
    let received = ctx
        .accounts
        .stake_vault
        .amount
        .checked_sub(vault_before)
        .ok_or(error!(ErrorCode::MathOverflow))?;

    ctx.accounts.farm.record_deposit(
        &mut ctx.accounts.staker_registry,
        &mut ctx.accounts.staker_info,
        received,
        height,
    )?;

    #[cfg(feature = "enable-log")]
    msg!(
        "deposit staker:{} amount:{} received:{} balance:{} pending:{} total:{}",
        staker_key,
        amount,
        received,
        ctx.accounts.staker_info.balance,
        ctx.accounts.staker_info.pending,
        ctx.accounts.farm.total_staking_balance
    );

    emit!(Deposited {
        farm: farm_key,
        staker: staker_key,
        amount: received,
    });
    Ok(())
}
