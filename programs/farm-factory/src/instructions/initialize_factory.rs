use crate::states::*;
use crate::{FACTORY_AUTHORITY_SEED, FACTORY_SEED};
use anchor_lang::prelude::*;

/// Accounts context for `initialize_factory`.
#[derive(Accounts)]
pub struct InitializeFactory<'info> {
    /// Pays for the factory account and becomes its admin.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Singleton factory state. Plain `init`: a second call fails.
    #[account(
        init,
        seeds = [FACTORY_SEED.as_bytes()],
        bump,
        payer = admin,
        space = FarmFactory::LEN
    )]
    pub factory: Box<Account<'info, FarmFactory>>,

    /// Signs farm creation on behalf of the factory.
    /// CHECK: PDA holding no data, only its seeds are used.
    #[account(
        seeds = [FACTORY_AUTHORITY_SEED.as_bytes()],
        bump,
    )]
    pub factory_authority: UncheckedAccount<'info>,

    /// Solana System Program.
    pub system_program: Program<'info, System>,
}

/// Stores the canonical farm logic program.
///
/// A default `farm_program` is accepted; `create_farm` then fails with
/// `LogicNotSet`.
pub fn initialize_factory(ctx: Context<InitializeFactory>, farm_program: Pubkey) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    factory.bump = ctx.bumps.factory;
    factory.authority_bump = ctx.bumps.factory_authority;
    factory.admin = ctx.accounts.admin.key();
    factory.farm_program = farm_program;
    factory.farm_count = 0;
    msg!("Factory initialized with farm program {}", farm_program);

    emit!(FactoryInitialized {
        factory: factory.key(),
        admin: factory.admin,
        farm_program,
    });
    Ok(())
}
