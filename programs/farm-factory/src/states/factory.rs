use crate::error::ErrorCode;
use crate::{FACTORY_AUTHORITY_SEED, FACTORY_SEED};
use anchor_lang::prelude::*;

/// Singleton registry of the canonical farm logic.
///
/// Every farm spawned here runs the same `farm_program`; each one gets its own
/// state under `FARM_SEED + factory authority + farm_count`, so a counter value
/// is never reused and every instance address is fresh.
#[account]
#[derive(Default, Debug)]
pub struct FarmFactory {
    /// PDA bump of this account.
    pub bump: u8,
    /// Bump of the authority PDA that signs as the farms' creator.
    pub authority_bump: u8,
    /// Wallet that initialized the factory.
    pub admin: Pubkey,
    /// Program id of the farm logic every instance shares.
    pub farm_program: Pubkey,
    /// Number of farms created so far; seed of the next one.
    pub farm_count: u64,
}

impl FarmFactory {
    pub const LEN: usize = 8 + 1 + 1 + 32 + 32 + 8;

    /// Fails unless a logic program is stored and `program` is that program.
    pub fn ensure_logic(&self, program: &Pubkey) -> Result<()> {
        require!(self.farm_program != Pubkey::default(), ErrorCode::LogicNotSet);
        require_keys_eq!(*program, self.farm_program, ErrorCode::InvalidFarmProgram);
        Ok(())
    }

    /// Seed of the farm that the next `create_farm` will initialize.
    pub fn next_farm_seed(&self) -> u64 {
        self.farm_count
    }

    /// Consumes the current seed. Returns the index of the farm just created.
    pub fn record_farm_created(&mut self) -> Result<u64> {
        let index = self.farm_count;
        self.farm_count = index.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        Ok(index)
    }
}

pub fn derive_factory_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FACTORY_SEED.as_bytes()], &crate::ID)
}

/// The PDA every factory farm is namespaced under.
pub fn derive_factory_authority_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FACTORY_AUTHORITY_SEED.as_bytes()], &crate::ID)
}
