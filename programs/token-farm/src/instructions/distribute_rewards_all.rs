use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;

//
// ──────────────────────────────────────────────────────────────────────────────
// DistributeRewardsAll Instruction
// ──────────────────────────────────────────────────────────────────────────────
//

/// Settle accrued reward for every staker of a farm in one pass.
///
/// Restricted to the farm operator. Pure bookkeeping: nothing is minted or
/// transferred, each active staker's `pending` simply catches up to this slot.
///
/// Remaining accounts: the `StakerInfo` of every registry entry, writable, in
/// registry order. The pass is linear in the registry size and is bounded by
/// the transaction's account and compute limits; a pass that runs out of
/// budget aborts and settles nobody.
#[derive(Accounts)]
pub struct DistributeRewardsAll<'info> {
    /// Farm operator.
    #[account(
        constraint = operator.key() == farm.operator @ ErrorCode::Unauthorized
    )]
    pub operator: Signer<'info>,

    /// Farm being settled.
    #[account(
        mut,
        constraint = farm.is_active() @ ErrorCode::FarmNotActive,
    )]
    pub farm: Box<Account<'info, Farm>>,

    /// The farm's staker registry (enumeration order).
    #[account(address = farm.staker_registry @ ErrorCode::RegistryMismatch)]
    pub staker_registry: Box<Account<'info, StakerRegistry>>,
}

/// Settles every registered staker with a stake at the current slot.
///
/// Registry entries that withdrew are skipped but must still be passed.
///
/// # Fails
/// - `Unauthorized` if the signer is not the farm operator.
/// - `RegistryMismatch` if the remaining accounts are not exactly the
///   registry's records in order, or are not writable.
pub fn distribute_rewards_all<'info>(
    ctx: Context<'_, '_, 'info, 'info, DistributeRewardsAll<'info>>,
) -> Result<()> {
    let height = Clock::get()?.slot;
    let farm_key = ctx.accounts.farm.key();

    let mut records = Vec::with_capacity(ctx.remaining_accounts.len());
    for account_info in ctx.remaining_accounts.iter() {
        require!(account_info.is_writable, ErrorCode::RegistryMismatch);
        records.push(Account::<StakerInfo>::try_from(account_info)?);
    }

    let settled = {
        let mut stakers: Vec<&mut StakerInfo> =
            records.iter_mut().map(|record| &mut **record).collect();
        ctx.accounts
            .farm
            .distribute(&ctx.accounts.staker_registry, &mut stakers, height)?
    };

    for record in records.iter() {
        #[cfg(feature = "enable-log")]
        msg!(
            "settled staker:{} pending:{} checkpoint:{}",
            record.owner,
            record.pending,
            record.checkpoint
        );
        record.exit(&crate::ID)?;
    }

    emit!(RewardsDistributed {
        farm: farm_key,
        height,
        settled,
    });
    Ok(())
}
