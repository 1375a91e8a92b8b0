use anchor_lang::{AccountDeserialize, AnchorDeserialize, Discriminator};
use anyhow::{format_err, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use farm_factory::{FACTORY_AUTHORITY_SEED, FACTORY_SEED};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_token_2022::{extension::StateWithExtensions, state::Mint};
use token_farm::{
    states::{STAKER_INFO_SEED, STAKER_REGISTRY_SEED},
    FARM_SEED, STAKE_VAULT_SEED,
};

const PROGRAM_DATA_PREFIX: &str = "Program data: ";

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Finds the first Anchor event of type `T` in a transaction's logs.
///
/// Events are `Program data: ` lines carrying base64 of discriminator + borsh
/// payload; lines of other events (including CPI'd programs) are skipped.
pub fn parse_event<T: AnchorDeserialize + Discriminator>(logs: &[String]) -> Option<T> {
    logs.iter()
        .filter_map(|line| line.strip_prefix(PROGRAM_DATA_PREFIX))
        .filter_map(|payload| STANDARD.decode(payload).ok())
        .find_map(|data| {
            let body = data.strip_prefix(T::DISCRIMINATOR)?;
            T::deserialize(&mut &body[..]).ok()
        })
}

/// Program owning `mint`: classic SPL Token or Token-2022.
pub fn get_token_program(rpc_client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    let account = rpc_client.get_account(mint)?;
    if account.owner != spl_token::id() && account.owner != spl_token_2022::id() {
        return Err(format_err!("{} is not a token mint", mint));
    }
    Ok(account.owner)
}

pub fn get_mint_authority(rpc_client: &RpcClient, mint: &Pubkey) -> Result<Option<Pubkey>> {
    let account = rpc_client.get_account(mint)?;
    let state = StateWithExtensions::<Mint>::unpack(&account.data)?;
    Ok(state.base.mint_authority.into())
}

pub fn get_factory_address(program_id: &Pubkey) -> Pubkey {
    let (factory, _bump) = Pubkey::find_program_address(&[FACTORY_SEED.as_bytes()], program_id);
    factory
}

pub fn get_factory_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[FACTORY_AUTHORITY_SEED.as_bytes()], program_id);
    authority
}

pub fn get_farm_address(program_id: &Pubkey, creator: &Pubkey, seed: u64) -> Pubkey {
    let (farm, _bump) = Pubkey::find_program_address(
        &[FARM_SEED.as_bytes(), creator.as_ref(), &seed.to_le_bytes()],
        program_id,
    );
    farm
}

pub fn get_staker_registry_address(program_id: &Pubkey, farm: &Pubkey) -> Pubkey {
    let (registry, _bump) = Pubkey::find_program_address(
        &[STAKER_REGISTRY_SEED.as_bytes(), farm.as_ref()],
        program_id,
    );
    registry
}

pub fn get_stake_vault_address(program_id: &Pubkey, farm: &Pubkey) -> Pubkey {
    let (vault, _bump) =
        Pubkey::find_program_address(&[STAKE_VAULT_SEED.as_bytes(), farm.as_ref()], program_id);
    vault
}

pub fn get_staker_info_address(program_id: &Pubkey, farm: &Pubkey, owner: &Pubkey) -> Pubkey {
    let (staker_info, _bump) = Pubkey::find_program_address(
        &[STAKER_INFO_SEED.as_bytes(), farm.as_ref(), owner.as_ref()],
        program_id,
    );
    staker_info
}
