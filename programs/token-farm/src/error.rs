use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Nothing staked to withdraw")]
    NothingStaked,

    #[msg("Stake token transfer failed")]
    TransferFailed,

    #[msg("Reward mint refused to mint; the farm is not its mint authority")]
    MintFailed,

    #[msg("Farm is already initialized")]
    AlreadyInitialized,

    #[msg("Signer is not the farm operator")]
    Unauthorized,

    #[msg("Farm is not active")]
    FarmNotActive,

    #[msg("Staker accounts do not match the staker registry")]
    RegistryMismatch,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,

    #[msg("Mint does not match the farm configuration")]
    InvalidMint,

    #[msg("Invalid vault account")]
    InvalidVault,
}
