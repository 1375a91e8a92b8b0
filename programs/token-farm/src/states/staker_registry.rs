use crate::error::ErrorCode;
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakerRegistry Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive a farm's staker registry.
pub const STAKER_REGISTRY_SEED: &str = "staker_registry";

/// Append-only list of every wallet that ever deposited into a farm, in the
/// order of their first deposit.
///
/// The order has no ranking meaning; it is the enumeration order used by
/// `distribute_rewards_all`. The account grows by one key per new staker.
#[account]
#[derive(Default, Debug)]
pub struct StakerRegistry {
    /// PDA bump for this account.
    pub bump: u8,

    /// Farm this registry belongs to.
    pub farm: Pubkey,

    /// Staker wallets, in first-deposit order.
    pub stakers: Vec<Pubkey>,
}

impl StakerRegistry {
    /// Serialized size of an empty registry.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32: farm
    /// - 4: vec length prefix
    pub const BASE_LEN: usize = 8 + 1 + 32 + 4;

    /// Account size needed to hold `count` stakers.
    pub fn space(count: usize) -> usize {
        Self::BASE_LEN + 32 * count
    }

    /// Appends `staker` and returns its index.
    ///
    /// Callers guard against duplicates with `StakerInfo::has_staked`; the list
    /// itself is never scanned.
    pub fn register(&mut self, staker: Pubkey) -> Result<u32> {
        let index =
            u32::try_from(self.stakers.len()).map_err(|_| error!(ErrorCode::MathOverflow))?;
        self.stakers.push(staker);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.stakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakers.is_empty()
    }
}

pub fn derive_staker_registry_address(farm: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[STAKER_REGISTRY_SEED.as_bytes(), farm.as_ref()],
        &crate::ID,
    )
}
