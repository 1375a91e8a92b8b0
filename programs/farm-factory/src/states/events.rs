use anchor_lang::prelude::*;

/// Emitted once when the factory singleton is created.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FactoryInitialized {
    pub factory: Pubkey,
    pub admin: Pubkey,
    /// Farm logic every instance will run.
    pub farm_program: Pubkey,
}

/// Emitted for every farm the factory spawns.
///
/// The instruction has no return value; clients learn the new farm address
/// from this event in the transaction logs.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct FarmCreated {
    pub factory: Pubkey,
    /// The new farm PDA.
    pub farm: Pubkey,
    /// Caller of `create_farm`; operator of the new farm.
    pub operator: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_per_height: u64,
    /// Seed the farm was derived with.
    pub farm_index: u64,
}
