use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakerInfo Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive each staker's record, per farm.
pub const STAKER_INFO_SEED: &str = "staker";

/// Stores staking and reward accounting for a single staker of a single farm.
///
/// Each staker has one `StakerInfo` per farm, derived from:
/// `STAKER_INFO_SEED + farm_pubkey + owner_pubkey`.
///
/// The record is created by the first deposit (or by a claim from a wallet that
/// never deposited, in which case it stays unregistered) and never closed: after a full
/// withdrawal the balance is zero but the registry entry and any unclaimed
/// reward remain.
#[account]
#[derive(Default, Debug)]
pub struct StakerInfo {
    /// PDA bump for this account.
    pub bump: u8,

    /// Farm this record belongs to.
    pub farm: Pubkey,

    /// Staker (wallet) this record belongs to.
    pub owner: Pubkey,

    /// Stake tokens currently escrowed in the farm vault for this staker.
    pub balance: u64,

    /// Accrued but unclaimed reward, in reward mint base units.
    /// Only ever decreases when a claim resets it to zero.
    pub pending: u64,

    /// Slot at which `pending` was last settled.
    pub checkpoint: u64,

    /// `true` iff `balance > 0`.
    pub is_staking: bool,

    /// Set on the first deposit and never cleared; guards the registry append.
    pub has_staked: bool,

    /// Position of `owner` in the farm's staker registry.
    pub registry_index: u32,

    /// Total reward minted to this staker over its lifetime.
    pub total_claimed: u64,
}

impl StakerInfo {
    /// Fixed serialized size of the account (for allocation at first deposit).
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: farm, owner
    /// - 8 * 3: balance, pending, checkpoint
    /// - 1 + 1: two booleans
    /// - 4: registry index
    /// - 8: total claimed
    pub const LEN: usize = 8 + 1 + 32 * 2 + 8 * 3 + 1 + 1 + 4 + 8;

    pub fn new(farm: Pubkey, owner: Pubkey, bump: u8) -> Self {
        StakerInfo {
            bump,
            farm,
            owner,
            ..Default::default()
        }
    }

    /// Fills in the identity of a freshly allocated record. No-op once bound.
    pub fn bind(&mut self, farm: Pubkey, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.bump = bump;
            self.farm = farm;
            self.owner = owner;
        }
    }
}

pub fn derive_staker_info_address(farm: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[STAKER_INFO_SEED.as_bytes(), farm.as_ref(), owner.as_ref()],
        &crate::ID,
    )
}
