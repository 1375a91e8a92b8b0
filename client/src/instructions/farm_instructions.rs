use anchor_client::{Client, Cluster};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::rc::Rc;

use token_farm::accounts as farm_accounts;
use token_farm::instruction as farm_instructions;

use crate::instructions::utils::{
    get_farm_address, get_stake_vault_address, get_staker_info_address,
    get_staker_registry_address,
};

use super::super::{read_keypair_file, ClientConfig};

/// Farm accounts a staking instruction needs, resolved once from the farm state.
pub struct FarmAccounts {
    pub farm: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub staker_registry: Pubkey,
    pub stake_token_program: Pubkey,
    pub reward_token_program: Pubkey,
}

/// Standalone farm: the payer is both creator and operator.
pub fn initialize_farm_instr(
    config: &ClientConfig,
    stake_mint: Pubkey,
    reward_mint: Pubkey,
    stake_token_program: Pubkey,
    seed: u64,
    reward_per_height: u64,
) -> Result<(Pubkey, Vec<Instruction>)> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    let program = client.program(config.token_farm_program)?;

    let creator = program.payer();
    let farm = get_farm_address(&program.id(), &creator, seed);
    let instructions = program
        .request()
        .accounts(farm_accounts::Initialize {
            payer: program.payer(),
            creator,
            farm,
            staker_registry: get_staker_registry_address(&program.id(), &farm),
            stake_mint,
            reward_mint,
            stake_vault: get_stake_vault_address(&program.id(), &farm),
            stake_token_program,
            system_program: system_program::id(),
        })
        .args(farm_instructions::Initialize {
            seed,
            reward_per_height,
        })
        .instructions()?;
    Ok((farm, instructions))
}

pub fn deposit_instr(
    config: &ClientConfig,
    farm: &FarmAccounts,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    let program = client.program(config.token_farm_program)?;

    let staker = program.payer();
    let instructions = program
        .request()
        .accounts(farm_accounts::Deposit {
            staker,
            farm: farm.farm,
            staker_registry: farm.staker_registry,
            staker_info: get_staker_info_address(&program.id(), &farm.farm, &staker),
            stake_mint: farm.stake_mint,
            staker_stake_token: get_associated_token_address_with_program_id(
                &staker,
                &farm.stake_mint,
                &farm.stake_token_program,
            ),
            stake_vault: farm.stake_vault,
            token_program: farm.stake_token_program,
            system_program: system_program::id(),
        })
        .args(farm_instructions::Deposit { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn withdraw_instr(config: &ClientConfig, farm: &FarmAccounts) -> Result<Vec<Instruction>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    let program = client.program(config.token_farm_program)?;

    let staker = program.payer();
    let instructions = program
        .request()
        .accounts(farm_accounts::Withdraw {
            staker,
            farm: farm.farm,
            staker_info: get_staker_info_address(&program.id(), &farm.farm, &staker),
            stake_mint: farm.stake_mint,
            staker_stake_token: get_associated_token_address_with_program_id(
                &staker,
                &farm.stake_mint,
                &farm.stake_token_program,
            ),
            stake_vault: farm.stake_vault,
            token_program: farm.stake_token_program,
            system_program: system_program::id(),
        })
        .args(farm_instructions::Withdraw {})
        .instructions()?;
    Ok(instructions)
}

pub fn claim_rewards_instr(config: &ClientConfig, farm: &FarmAccounts) -> Result<Vec<Instruction>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    let program = client.program(config.token_farm_program)?;

    let staker = program.payer();
    let instructions = program
        .request()
        .accounts(farm_accounts::ClaimRewards {
            staker,
            farm: farm.farm,
            staker_info: get_staker_info_address(&program.id(), &farm.farm, &staker),
            reward_mint: farm.reward_mint,
            staker_reward_token: get_associated_token_address_with_program_id(
                &staker,
                &farm.reward_mint,
                &farm.reward_token_program,
            ),
            token_program: farm.reward_token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(farm_instructions::ClaimRewards {})
        .instructions()?;
    Ok(instructions)
}

/// `stakers` is the registry content, in registry order; each record is
/// appended as a writable remaining account.
pub fn distribute_rewards_all_instr(
    config: &ClientConfig,
    farm: &FarmAccounts,
    stakers: &[Pubkey],
) -> Result<Vec<Instruction>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    let program = client.program(config.token_farm_program)?;

    let mut instructions = program
        .request()
        .accounts(farm_accounts::DistributeRewardsAll {
            operator: program.payer(),
            farm: farm.farm,
            staker_registry: farm.staker_registry,
        })
        .args(farm_instructions::DistributeRewardsAll {})
        .instructions()?;

    instructions[0].accounts.extend(stakers.iter().map(|owner| {
        AccountMeta::new(
            get_staker_info_address(&program.id(), &farm.farm, owner),
            false,
        )
    }));
    Ok(instructions)
}
