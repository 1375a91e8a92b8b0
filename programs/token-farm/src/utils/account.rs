use anchor_lang::prelude::*;
use anchor_lang::system_program;

/// Resizes a program-owned account to `new_len`, topping its lamports up to
/// the rent-exempt minimum from `payer` first.
pub fn realloc_with_rent<'a>(
    account: AccountInfo<'a>,
    payer: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    new_len: usize,
) -> Result<()> {
    let rent_due = Rent::get()?
        .minimum_balance(new_len)
        .saturating_sub(account.lamports());
    if rent_due > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program,
                system_program::Transfer {
                    from: payer,
                    to: account.clone(),
                },
            ),
            rent_due,
        )?;
    }
    account.realloc(new_len, false)?;
    Ok(())
}
