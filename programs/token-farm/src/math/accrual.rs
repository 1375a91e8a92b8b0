//! Reward accrual calculations

/// Computes how much reward a staker earned between two settlements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccrualCalculator;

impl AccrualCalculator {
    /// Reward owed to `balance` for the `elapsed` heights since its checkpoint,
    /// given the farm emits `reward_per_height` split across `total_staking_balance`.
    ///
    /// `reward_per_height * elapsed * balance / total_staking_balance`, truncated.
    ///
    /// The share is taken from the *current* total and applied to the whole
    /// unsettled interval. This is only exact while the total has not changed
    /// since the checkpoint, so stakers that settle rarely can gain or lose
    /// relative to a time-weighted model.
    ///
    /// Saturates at `u64::MAX`: a reward too large to represent must never keep
    /// a staker from settling, and so from withdrawing. An empty farm accrues
    /// nothing.
    pub fn accrued(
        reward_per_height: u64,
        elapsed: u64,
        balance: u64,
        total_staking_balance: u64,
    ) -> u64 {
        if total_staking_balance == 0 || balance == 0 || elapsed == 0 {
            return 0;
        }
        // rate * elapsed always fits in u128.
        let emitted = reward_per_height as u128 * elapsed as u128;
        let total = total_staking_balance as u128;
        let balance = balance as u128;
        // emitted * balance / total without the u128 product overflowing.
        let increment = (emitted / total)
            .checked_mul(balance)
            .and_then(|whole| whole.checked_add((emitted % total) * balance / total));
        increment.map_or(u64::MAX, |v| u64::try_from(v).unwrap_or(u64::MAX))
    }

    /// Heights elapsed between a checkpoint and the settlement height.
    ///
    /// A settlement height behind the checkpoint counts as no time elapsed, so a
    /// checkpoint never moves backwards.
    pub fn elapsed(checkpoint: u64, at_height: u64) -> u64 {
        at_height.saturating_sub(checkpoint)
    }
}
