use anchor_client::{Client, Cluster};
use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};
use std::rc::Rc;

use farm_factory::accounts as factory_accounts;
use farm_factory::instruction as factory_instructions;

use crate::instructions::utils::{
    get_factory_address, get_factory_authority_address, get_farm_address,
    get_stake_vault_address, get_staker_registry_address,
};

use super::super::{read_keypair_file, ClientConfig};

pub fn initialize_factory_instr(
    config: &ClientConfig,
    farm_program: Pubkey,
) -> Result<Vec<Instruction>> {
    let admin = read_keypair_file(&config.admin_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(admin));
    let program = client.program(config.farm_factory_program)?;

    let instructions = program
        .request()
        .accounts(factory_accounts::InitializeFactory {
            admin: program.payer(),
            factory: get_factory_address(&program.id()),
            factory_authority: get_factory_authority_address(&program.id()),
            system_program: system_program::id(),
        })
        .args(factory_instructions::InitializeFactory { farm_program })
        .instructions()?;
    Ok(instructions)
}

/// Builds `create_farm` for the farm the factory will derive from `farm_index`
/// (its current `farm_count`). Returns the expected farm address as well.
pub fn create_farm_instr(
    config: &ClientConfig,
    farm_index: u64,
    stake_mint: Pubkey,
    reward_mint: Pubkey,
    stake_token_program: Pubkey,
    reward_per_height: u64,
) -> Result<(Pubkey, Vec<Instruction>)> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    let program = client.program(config.farm_factory_program)?;

    let farm_program = config.token_farm_program;
    let factory_authority = get_factory_authority_address(&program.id());
    let farm = get_farm_address(&farm_program, &factory_authority, farm_index);

    let instructions = program
        .request()
        .accounts(factory_accounts::CreateFarm {
            operator: program.payer(),
            factory: get_factory_address(&program.id()),
            factory_authority,
            farm,
            staker_registry: get_staker_registry_address(&farm_program, &farm),
            stake_vault: get_stake_vault_address(&farm_program, &farm),
            stake_mint,
            reward_mint,
            farm_program,
            stake_token_program,
            system_program: system_program::id(),
        })
        .args(factory_instructions::CreateFarm { reward_per_height })
        .instructions()?;
    Ok((farm, instructions))
}
