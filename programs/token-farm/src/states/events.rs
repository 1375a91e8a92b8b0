use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track farm state changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when a farm is configured and becomes active.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FarmInitialized {
    /// The farm PDA.
    pub farm: Pubkey,
    /// Signer namespace the farm PDA was derived under.
    pub creator: Pubkey,
    /// Wallet allowed to run reward distribution.
    pub operator: Pubkey,
    /// Mint stakers lock.
    pub stake_mint: Pubkey,
    /// Mint paid out as reward.
    pub reward_mint: Pubkey,
    /// Reward base units emitted per slot.
    pub reward_per_height: u64,
}

/// Emitted when a staker locks tokens.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Deposited {
    pub farm: Pubkey,
    pub staker: Pubkey,
    /// Stake tokens moved into the vault (base units).
    pub amount: u64,
}

/// Emitted when a staker takes back its whole stake.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Withdrawn {
    pub farm: Pubkey,
    pub staker: Pubkey,
    /// Stake tokens returned from the vault (base units).
    pub amount: u64,
}

/// Emitted when a staker mints its accrued reward.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsClaimed {
    pub farm: Pubkey,
    pub staker: Pubkey,
    /// Reward tokens minted (base units). May be zero.
    pub amount: u64,
}

/// Emitted once per `distribute_rewards_all` pass.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsDistributed {
    pub farm: Pubkey,
    /// Slot every active staker was settled at.
    pub height: u64,
    /// Number of stakers settled (registry entries with a stake).
    pub settled: u32,
}
