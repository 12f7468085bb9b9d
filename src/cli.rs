//! `ttz` command-line surface and command handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ethers::providers::{JsonRpcClient, Provider};
use ethers::types::Address;
use ethers::utils::format_units;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::blockchain::abi::{ensure_erc20_reads, erc20_abi, load_abi};
use crate::blockchain::contract::ProjectContract;
use crate::blockchain::ethereum::EthereumClient;
use crate::blockchain::traits::ChainReader;
use crate::blockchain::watcher::{until_interrupted, watch_blocks};
use crate::core::config::{resolve_config_path, Web3Config};
use crate::core::errors::AppError;
use crate::core::state::ChainState;
use crate::security::env_manager::Credentials;
use crate::security::signer::load_signer;
use crate::theme::Theme;

/// TTZ token console
#[derive(Debug, Parser)]
#[command(name = "ttz", about = "Read chain state and the TTZ token contract", version)]
pub struct Cli {
    /// TOML config file (falls back to TTZ_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read gas price and block number
    Status,
    /// Read token metadata from the contract
    Token {
        /// JSON ABI file (defaults to the built-in ERC20 ABI)
        #[arg(long)]
        abi: Option<PathBuf>,
    },
    /// Read the token balance of an address
    Balance {
        #[arg(long)]
        address: String,
        #[arg(long)]
        abi: Option<PathBuf>,
    },
    /// Follow new blocks over WebSocket until Ctrl-C
    Watch {
        /// Stop after this many blocks
        #[arg(long)]
        blocks: Option<usize>,
    },
    /// Print the UI theme
    Theme,
    /// Validate and print the configuration (secrets redacted)
    Config,
}

/// Everything a command needs, loaded once at startup.
pub struct Session {
    pub config: Web3Config,
    pub creds: Credentials,
}

impl Session {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = resolve_config_path(config_path);
        let config = Web3Config::load(path.as_deref()).context("failed to load configuration")?;
        Ok(Self { config, creds: Credentials::from_env() })
    }
}

/// Run one command and return its JSON output.
pub async fn run(cli: Cli) -> Result<Value> {
    match cli.command {
        Commands::Theme => Ok(serde_json::to_value(Theme::default())?),
        Commands::Config => {
            let ctx = Session::load(cli.config)?;
            Ok(serde_json::to_value(ctx.config.describe(&ctx.creds))?)
        }
        Commands::Status => {
            let ctx = Session::load(cli.config)?;
            let client = connect(&ctx).await?;
            status(&client).await
        }
        Commands::Token { abi } => {
            let ctx = Session::load(cli.config)?;
            let client = connect(&ctx).await?;
            token(&ctx, &client, abi.as_deref()).await
        }
        Commands::Balance { address, abi } => {
            let owner = Address::from_str(address.trim())
                .map_err(|e| AppError::InvalidAddress(format!("'{}': {}", address, e)))?;
            let ctx = Session::load(cli.config)?;
            let client = connect(&ctx).await?;
            balance(&ctx, &client, owner, abi.as_deref()).await
        }
        Commands::Watch { blocks } => {
            let ctx = Session::load(cli.config)?;
            let url = ctx.config.wss_endpoint(&ctx.creds)?;
            let mut state = ChainState::new();
            let mut applied = 0usize;
            let interrupted = until_interrupted(
                watch_blocks(&url, &mut state, blocks, &mut applied),
                tokio::signal::ctrl_c(),
            )
            .await?;
            Ok(json!({ "blocks_applied": applied, "interrupted": interrupted, "state": state }))
        }
    }
}

async fn connect(ctx: &Session) -> Result<EthereumClient> {
    let url = ctx.config.https_endpoint(&ctx.creds)?;
    Ok(EthereumClient::connect(&url).await?)
}

/// `status`: refresh gas price and block number.
pub async fn status<P: JsonRpcClient + 'static>(client: &EthereumClient<P>) -> Result<Value> {
    let mut state = ChainState::new();
    state.refresh(client).await?;
    Ok(json!({
        "network": client.network_name(),
        "chain_id": client.chain_id(),
        "state": state,
    }))
}

/// `token`: refresh, build the handle with the fresh gas price, then read
/// the token metadata into the state.
pub async fn token<P: JsonRpcClient + 'static>(
    ctx: &Session,
    client: &EthereumClient<P>,
    abi_path: Option<&Path>,
) -> Result<Value> {
    let mut state = ChainState::new();
    state.refresh(client).await?;
    let contract = build_contract(ctx, client, &state, abi_path)?;
    let token = contract.sync_token_info(&mut state).await?;
    Ok(json!({
        "contract": contract.address(),
        "from": contract.from_address(),
        "gas_price_wei": contract.gas_price().to_string(),
        "token": token,
        "state": state,
    }))
}

/// `balance`: token balance of `owner`, labelled with the on-chain symbol.
pub async fn balance<P: JsonRpcClient + 'static>(
    ctx: &Session,
    client: &EthereumClient<P>,
    owner: Address,
    abi_path: Option<&Path>,
) -> Result<Value> {
    let mut state = ChainState::new();
    state.refresh(client).await?;
    let contract = build_contract(ctx, client, &state, abi_path)?;
    let balance = contract.balance_of(owner).await?;
    let decimals = contract.decimals().await?;
    let symbol = contract.symbol().await?;
    Ok(json!({
        "owner": owner,
        "symbol": symbol,
        "balance": balance.to_string(),
        "balance_formatted": format_units(balance, u32::from(decimals))?,
    }))
}

fn build_contract<P: JsonRpcClient + 'static>(
    ctx: &Session,
    client: &EthereumClient<P>,
    state: &ChainState,
    abi_path: Option<&Path>,
) -> Result<ProjectContract<Provider<P>>> {
    let abi = match abi_path {
        Some(p) => load_abi(p)?,
        None => erc20_abi()?,
    };
    ensure_erc20_reads(&abi)?;
    let signer = load_signer(&ctx.creds, client.chain_id())?;
    let contract = ProjectContract::new(client.provider(), abi, &ctx.config, state)?;
    contract.verify_signer(signer.as_ref())?;
    Ok(contract)
}
