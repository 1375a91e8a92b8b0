use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Farm logic program is not set on the factory")]
    LogicNotSet,

    #[msg("Program does not match the factory's farm logic")]
    InvalidFarmProgram,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,
}
