//! Chain and token state owned by the caller.
//!
//! There is no global store: whoever drives the console creates a
//! [`ChainState`] once and passes it by reference to the operations that
//! read or update it.

use chrono::{DateTime, Utc};
use ethers::types::U256;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::blockchain::traits::ChainReader;
use crate::core::errors::{AppError, Result};

pub const TOKEN_NAME: &str = "TutorZ Token";
pub const TOKEN_SYMBOL: &str = "TTZ";

/// Decimal places between wei and gwei.
pub const GWEI_DECIMALS: u32 = 9;

/// 10^24 base units (one million tokens at 18 decimals).
pub fn initial_total_supply() -> U256 {
    U256::exp10(24)
}

/// Fields are written only through the setters, which validate them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainState {
    /// Gas price in gwei. `None` until read from the chain.
    gas_price_gwei: Option<Decimal>,
    block_number: Option<u64>,

    token_name: String,
    token_symbol: String,
    #[serde(serialize_with = "serialize_u256_decimal")]
    total_supply: U256,

    /// When gas price and block number were last refreshed.
    updated_at: Option<DateTime<Utc>>,
}

impl ChainState {
    pub fn new() -> Self {
        Self {
            gas_price_gwei: None,
            block_number: None,
            token_name: TOKEN_NAME.to_string(),
            token_symbol: TOKEN_SYMBOL.to_string(),
            total_supply: initial_total_supply(),
            updated_at: None,
        }
    }

    pub fn gas_price_gwei(&self) -> Option<Decimal> {
        self.gas_price_gwei
    }

    pub fn block_number(&self) -> Option<u64> {
        self.block_number
    }

    pub fn token_name(&self) -> &str {
        &self.token_name
    }

    pub fn token_symbol(&self) -> &str {
        &self.token_symbol
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Stamp the state as refreshed now.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    pub fn set_gas_price_gwei(&mut self, gwei: Decimal) -> Result<()> {
        if gwei.is_sign_negative() && !gwei.is_zero() {
            return Err(AppError::InvalidGasPrice(format!("{} gwei is negative", gwei)));
        }
        self.gas_price_gwei = Some(gwei);
        Ok(())
    }

    pub fn set_gas_price_wei(&mut self, wei: U256) -> Result<()> {
        let gwei = gwei_from_wei(wei)?;
        self.set_gas_price_gwei(gwei)
    }

    pub fn set_block_number(&mut self, block_number: u64) {
        self.block_number = Some(block_number);
    }

    pub fn set_token_info(&mut self, name: String, symbol: String, total_supply: U256) {
        debug!(%name, %symbol, %total_supply, "token info updated");
        self.token_name = name;
        self.token_symbol = symbol;
        self.total_supply = total_supply;
    }

    /// Read gas price and block number from the chain. Nothing is written
    /// unless both reads succeed.
    pub async fn refresh(&mut self, reader: &dyn ChainReader) -> Result<()> {
        let gas_price_wei = reader.get_gas_price().await?;
        let block_number = reader.get_block_number().await?;
        let gwei = gwei_from_wei(gas_price_wei)?;

        self.set_gas_price_gwei(gwei)?;
        self.set_block_number(block_number);
        self.touch();
        info!(
            network = reader.network_name(),
            block_number,
            gas_price_gwei = %gwei,
            "chain state refreshed"
        );
        Ok(())
    }
}

impl Default for ChainState {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a wei amount into gwei without losing precision.
pub fn gwei_from_wei(wei: U256) -> Result<Decimal> {
    if wei > U256::from(i128::MAX as u128) {
        return Err(AppError::InvalidGasPrice(format!("{} wei is out of range", wei)));
    }
    let raw = wei.as_u128() as i128;
    Decimal::try_from_i128_with_scale(raw, GWEI_DECIMALS)
        .map(|d| d.normalize())
        .map_err(|e| AppError::InvalidGasPrice(format!("{} wei is out of range: {}", wei, e)))
}

fn serialize_u256_decimal<S: Serializer>(v: &U256, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&v.to_string())
}
