use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

/// Hands the mint authority of `mint` from `current_authority` to `new_authority`.
///
/// This is how a farm becomes able to mint its reward.
pub fn set_mint_authority_instr(
    token_program: &Pubkey,
    mint: &Pubkey,
    current_authority: &Pubkey,
    new_authority: &Pubkey,
) -> Result<Instruction> {
    let instruction = if *token_program == spl_token::id() {
        spl_token::instruction::set_authority(
            token_program,
            mint,
            Some(new_authority),
            spl_token::instruction::AuthorityType::MintTokens,
            current_authority,
            &[],
        )?
    } else {
        spl_token_2022::instruction::set_authority(
            token_program,
            mint,
            Some(new_authority),
            spl_token_2022::instruction::AuthorityType::MintTokens,
            current_authority,
            &[],
        )?
    };
    Ok(instruction)
}
