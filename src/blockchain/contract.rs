//! Handle for the TTZ ERC20 token contract.
//!
//! The handle is built once, after the chain state holds a gas price. Every
//! call it makes carries the gas wallet as `from` and the gas price fixed at
//! construction time.

use ethers::{
    abi::{Abi, Detokenize, Tokenize},
    contract::{Contract, ContractCall},
    providers::Middleware,
    signers::LocalWallet,
    types::{Address, U256},
    utils::format_units,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::config::Web3Config;
use crate::core::errors::{AppError, Result};
use crate::core::state::ChainState;
use crate::security::signer::ensure_signer_matches;

/// Contract calls bid this multiple of the observed gas price.
pub const GAS_PRICE_MULTIPLIER: u64 = 2;
pub const GWEI_IN_WEI: u64 = 1_000_000_000;

/// Gas price forwarded to the contract binding: `2 × G × 10^9` wei for an
/// observed price of `G` gwei. Sub-wei fractions are truncated.
pub fn contract_gas_price(gas_price_gwei: Option<Decimal>) -> Result<U256> {
    let gwei = gas_price_gwei.ok_or(AppError::GasPriceUnavailable)?;
    if gwei.is_sign_negative() && !gwei.is_zero() {
        return Err(AppError::InvalidGasPrice(format!("{} gwei is negative", gwei)));
    }
    let wei = gwei
        .checked_mul(Decimal::from(GAS_PRICE_MULTIPLIER))
        .and_then(|d| d.checked_mul(Decimal::from(GWEI_IN_WEI)))
        .ok_or_else(|| AppError::InvalidGasPrice(format!("{} gwei overflows", gwei)))?;
    let wei = wei
        .trunc()
        .to_u128()
        .ok_or_else(|| AppError::InvalidGasPrice(format!("{} wei does not fit u128", wei)))?;
    Ok(U256::from(wei))
}

/// Token metadata as read from the contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Base units, decimal string.
    pub total_supply: String,
    /// Whole tokens, scaled by `decimals`.
    pub total_supply_formatted: String,
}

pub struct ProjectContract<M> {
    contract: Contract<M>,
    from: Address,
    gas_price: U256,
}

impl<M: Middleware + 'static> ProjectContract<M> {
    /// Fails with [`AppError::GasPriceUnavailable`] when `state` has no gas price yet.
    pub fn new(client: Arc<M>, abi: Abi, config: &Web3Config, state: &ChainState) -> Result<Self> {
        let gas_price = contract_gas_price(state.gas_price_gwei())?;
        let contract = Contract::new(config.contract_address, abi, client);
        info!(
            address = ?config.contract_address,
            from = ?config.gas_wallet_address,
            %gas_price,
            "token contract handle created"
        );
        Ok(Self { contract, from: config.gas_wallet_address, gas_price })
    }

    /// Check that the gas wallet key, if one is configured, controls `from`.
    /// The handle only reads, so the wallet itself is not kept.
    pub fn verify_signer(&self, signer: Option<&LocalWallet>) -> Result<()> {
        if let Some(wallet) = signer {
            ensure_signer_matches(wallet, self.from)?;
        }
        Ok(())
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn from_address(&self) -> Address {
        self.from
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn abi(&self) -> &Abi {
        self.contract.abi()
    }

    /// Build a call with `from` and `gas_price` applied.
    pub fn prepare<A: Tokenize, D: Detokenize>(&self, method: &str, args: A) -> Result<ContractCall<M, D>> {
        let call = self
            .contract
            .method::<A, D>(method, args)
            .map_err(|e| AppError::Abi(format!("{}: {}", method, e)))?;
        Ok(call.from(self.from).gas_price(self.gas_price))
    }

    async fn read<A: Tokenize, D: Detokenize>(&self, method: &str, args: A) -> Result<D> {
        let call = self.prepare::<A, D>(method, args)?;
        debug!(method, "eth_call");
        call.call().await.map_err(|e| AppError::Contract(format!("{} failed: {}", method, e)))
    }

    pub async fn name(&self) -> Result<String> {
        self.read("name", ()).await
    }

    pub async fn symbol(&self) -> Result<String> {
        self.read("symbol", ()).await
    }

    pub async fn decimals(&self) -> Result<u8> {
        self.read("decimals", ()).await
    }

    pub async fn total_supply(&self) -> Result<U256> {
        self.read("totalSupply", ()).await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.read("balanceOf", owner).await
    }

    /// Read name, symbol, decimals and supply, and store them in `state`.
    pub async fn sync_token_info(&self, state: &mut ChainState) -> Result<TokenInfo> {
        let name = self.name().await?;
        let symbol = self.symbol().await?;
        let decimals = self.decimals().await?;
        let total_supply = self.total_supply().await?;

        let total_supply_formatted = format_units(total_supply, u32::from(decimals))
            .map_err(|e| AppError::Contract(format!("cannot format total supply: {}", e)))?;
        state.set_token_info(name.clone(), symbol.clone(), total_supply);

        Ok(TokenInfo {
            name,
            symbol,
            decimals,
            total_supply: total_supply.to_string(),
            total_supply_formatted,
        })
    }
}
