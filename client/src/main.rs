use anyhow::{format_err, Result};
use clap::Parser;
use colorful::{Color, Colorful};
use configparser::ini::Ini;
use farm_factory::states::{FarmCreated, FarmFactory};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::path::PathBuf;
use std::str::FromStr;
use token_farm::states::{Farm, StakerInfo, StakerRegistry};

mod instructions;
use instructions::factory_instructions::*;
use instructions::farm_instructions::*;
use instructions::rpc::*;
use instructions::token_instructions::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    token_farm_program: Pubkey,
    farm_factory_program: Pubkey,
}

fn required(config: &Ini, key: &str) -> Result<String> {
    let value = config
        .get("Global", key)
        .ok_or_else(|| format_err!("{} is missing from [Global]", key))?;
    if value.is_empty() {
        return Err(format_err!("{} must not be empty", key));
    }
    Ok(value)
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config.load(client_config).map_err(|e| format_err!(e))?;
    parse_cfg(&config)
}

fn parse_cfg(config: &Ini) -> Result<ClientConfig> {
    Ok(ClientConfig {
        http_url: required(config, "http_url")?,
        ws_url: required(config, "ws_url")?,
        payer_path: required(config, "payer_path")?,
        admin_path: required(config, "admin_path")?,
        token_farm_program: Pubkey::from_str(&required(config, "token_farm_program")?)?,
        farm_factory_program: Pubkey::from_str(&required(config, "farm_factory_program")?)?,
    })
}

/// Resolves a leading `~/` against the home directory, as a shell would.
fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home =
                dirs::home_dir().ok_or_else(|| format_err!("no home directory for {}", path))?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    let path = expand_home(s)?;
    solana_sdk::signature::read_keypair_file(&path)
        .map_err(|_| format_err!("failed to read keypair from {}", path.display()))
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: FarmCommands,
}

#[derive(Debug, Parser)]
pub enum FarmCommands {
    /// Create the factory, pointing it at the farm program.
    InitializeFactory {
        /// Defaults to `token_farm_program` from the config.
        #[arg(long)]
        farm_program: Option<Pubkey>,
    },
    /// Spawn a farm through the factory.
    CreateFarm {
        #[arg(long)]
        stake_mint: Pubkey,
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        reward_per_height: u64,
        /// Also hand the reward mint authority (held by the payer) to the new farm.
        #[arg(long)]
        transfer_mint_authority: bool,
    },
    /// Create a farm without the factory, namespaced under the payer.
    InitializeFarm {
        #[arg(long)]
        stake_mint: Pubkey,
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        reward_per_height: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    TransferMintAuthority {
        #[arg(long)]
        farm: Pubkey,
    },
    Deposit {
        #[arg(long)]
        farm: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    Withdraw {
        #[arg(long)]
        farm: Pubkey,
    },
    ClaimRewards {
        #[arg(long)]
        farm: Pubkey,
    },
    DistributeRewardsAll {
        #[arg(long)]
        farm: Pubkey,
    },
    ShowFarm {
        #[arg(long)]
        farm: Pubkey,
    },
    ShowStaker {
        #[arg(long)]
        farm: Pubkey,
        /// Defaults to the payer.
        #[arg(long)]
        owner: Option<Pubkey>,
    },
}

fn send_instructions(
    rpc_client: &RpcClient,
    payer: &Keypair,
    instructions: &[Instruction],
) -> Result<Signature> {
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &[payer],
        recent_hash,
    );
    send_txn(rpc_client, &txn, true)
}

fn load_farm(
    rpc_client: &RpcClient,
    config: &ClientConfig,
    farm: Pubkey,
) -> Result<(Farm, FarmAccounts)> {
    let account = get_account(rpc_client, &farm)?;
    if account.owner != config.token_farm_program {
        return Err(format_err!("{} is not owned by the farm program", farm));
    }
    let state: Farm = deserialize_anchor_account(&account)?;
    let accounts = FarmAccounts {
        farm,
        stake_mint: state.stake_mint,
        reward_mint: state.reward_mint,
        stake_vault: state.stake_vault,
        staker_registry: state.staker_registry,
        stake_token_program: get_token_program(rpc_client, &state.stake_mint)?,
        reward_token_program: get_token_program(rpc_client, &state.reward_mint)?,
    };
    Ok((state, accounts))
}

fn load_registry(rpc_client: &RpcClient, registry: &Pubkey) -> Result<StakerRegistry> {
    deserialize_anchor_account(&get_account(rpc_client, registry)?)
}

/// Both mints must live under one token program; `initialize` takes a single one.
fn transfer_mint_authority(
    rpc_client: &RpcClient,
    payer: &Keypair,
    reward_mint: &Pubkey,
    farm: &Pubkey,
) -> Result<()> {
    if get_mint_authority(rpc_client, reward_mint)? == Some(*farm) {
        println!("{}", "farm already holds the mint authority".color(Color::Yellow));
        return Ok(());
    }
    let token_program = get_token_program(rpc_client, reward_mint)?;
    let instruction =
        set_mint_authority_instr(&token_program, reward_mint, &payer.pubkey(), farm)?;
    let signature = send_instructions(rpc_client, payer, &[instruction])?;
    println!(
        "{} {} -> {} ({})",
        "mint authority transferred".color(Color::Green),
        reward_mint,
        farm,
        signature
    );
    Ok(())
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let config = load_cfg(client_config)?;
    let payer = read_keypair_file(&config.payer_path)?;
    let rpc_client = RpcClient::new(config.http_url.to_string());

    let opts = Opts::parse();
    match opts.command {
        FarmCommands::InitializeFactory { farm_program } => {
            let admin = read_keypair_file(&config.admin_path)?;
            let farm_program = farm_program.unwrap_or(config.token_farm_program);
            let instructions = initialize_factory_instr(&config, farm_program)?;
            let signature = send_instructions(&rpc_client, &admin, &instructions)?;
            println!(
                "{} {} ({})",
                "factory initialized:".color(Color::Green),
                get_factory_address(&config.farm_factory_program),
                signature
            );
        }
        FarmCommands::CreateFarm {
            stake_mint,
            reward_mint,
            reward_per_height,
            transfer_mint_authority: hand_over,
        } => {
            let factory_address = get_factory_address(&config.farm_factory_program);
            let factory: FarmFactory =
                deserialize_anchor_account(&get_account(&rpc_client, &factory_address)?)?;
            let stake_token_program = get_token_program(&rpc_client, &stake_mint)?;
            let (expected_farm, instructions) = create_farm_instr(
                &config,
                factory.farm_count,
                stake_mint,
                reward_mint,
                stake_token_program,
                reward_per_height,
            )?;
            let signature = send_instructions(&rpc_client, &payer, &instructions)?;

            let logs = get_transaction_logs(&rpc_client, &signature)?;
            let created: FarmCreated = parse_event(&logs)
                .ok_or_else(|| format_err!("no FarmCreated event in {}", signature))?;
            if created.farm != expected_farm {
                return Err(format_err!(
                    "factory created {} but {} was expected",
                    created.farm,
                    expected_farm
                ));
            }
            println!(
                "{} {} (index {}, {})",
                "farm created:".color(Color::Green),
                created.farm,
                created.farm_index,
                signature
            );
            if hand_over {
                transfer_mint_authority(&rpc_client, &payer, &reward_mint, &created.farm)?;
            }
        }
        FarmCommands::InitializeFarm {
            stake_mint,
            reward_mint,
            reward_per_height,
            seed,
        } => {
            let stake_token_program = get_token_program(&rpc_client, &stake_mint)?;
            let (farm, instructions) = initialize_farm_instr(
                &config,
                stake_mint,
                reward_mint,
                stake_token_program,
                seed,
                reward_per_height,
            )?;
            let signature = send_instructions(&rpc_client, &payer, &instructions)?;
            println!(
                "{} {} ({})",
                "farm initialized:".color(Color::Green),
                farm,
                signature
            );
        }
        FarmCommands::TransferMintAuthority { farm } => {
            let (state, _) = load_farm(&rpc_client, &config, farm)?;
            transfer_mint_authority(&rpc_client, &payer, &state.reward_mint, &farm)?;
        }
        FarmCommands::Deposit { farm, amount } => {
            let (_, accounts) = load_farm(&rpc_client, &config, farm)?;
            let instructions = deposit_instr(&config, &accounts, amount)?;
            let signature = send_instructions(&rpc_client, &payer, &instructions)?;
            println!("{}", signature);
        }
        FarmCommands::Withdraw { farm } => {
            let (_, accounts) = load_farm(&rpc_client, &config, farm)?;
            let instructions = withdraw_instr(&config, &accounts)?;
            let signature = send_instructions(&rpc_client, &payer, &instructions)?;
            println!("{}", signature);
        }
        FarmCommands::ClaimRewards { farm } => {
            let (_, accounts) = load_farm(&rpc_client, &config, farm)?;
            let instructions = claim_rewards_instr(&config, &accounts)?;
            let signature = send_instructions(&rpc_client, &payer, &instructions)?;
            println!("{}", signature);
        }
        FarmCommands::DistributeRewardsAll { farm } => {
            let (_, accounts) = load_farm(&rpc_client, &config, farm)?;
            let registry = load_registry(&rpc_client, &accounts.staker_registry)?;
            let instructions =
                distribute_rewards_all_instr(&config, &accounts, &registry.stakers)?;
            let signature = send_instructions(&rpc_client, &payer, &instructions)?;
            println!(
                "settled {} registered stakers ({})",
                registry.stakers.len(),
                signature
            );
        }
        FarmCommands::ShowFarm { farm } => {
            let (state, accounts) = load_farm(&rpc_client, &config, farm)?;
            let registry = load_registry(&rpc_client, &accounts.staker_registry)?;
            println!("{:#?}", state);
            println!("stakers ({}):", registry.stakers.len());
            for (index, owner) in registry.stakers.iter().enumerate() {
                println!("  {:>4} {}", index, owner);
            }
        }
        FarmCommands::ShowStaker { farm, owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let (state, _) = load_farm(&rpc_client, &config, farm)?;
            let address = get_staker_info_address(&config.token_farm_program, &farm, &owner);
            let info: StakerInfo =
                deserialize_anchor_account(&get_account(&rpc_client, &address)?)?;
            let slot = rpc_client.get_slot()?;
            let projected = state.projected_pending(&info, slot);
            println!("{:#?}", info);
            println!(
                "{} {} at slot {}",
                "claimable now:".color(Color::Green),
                projected,
                slot
            );
        }
    }
    Ok(())
}
