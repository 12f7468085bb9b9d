//! Static web3 configuration: RPC endpoints and the two well-known addresses.
//!
//! Values come from built-in defaults, an optional TOML file and `TTZ_*`
//! environment overrides, in that order. Secrets never live here; see
//! [`crate::security::env_manager::Credentials`].

use ethers::types::Address;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::core::errors::{AppError, Result};
use crate::security::env_manager::Credentials;
use crate::security::redaction::redact_url;

pub const DEFAULT_HTTPS_PROVIDER: &str = "https://eth-goerli.g.alchemy.com/v2/";
pub const DEFAULT_WSS_PROVIDER: &str = "wss://eth-goerli.g.alchemy.com/v2/";
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x9f0e1d5e10f212a0c6c2b191e72452fdc9835814";
pub const DEFAULT_GAS_WALLET_ADDRESS: &str = "0xb842ffb5196a0ee01546478e1a993a3e16e0445d";

pub const CONFIG_PATH_VAR: &str = "TTZ_CONFIG";
pub const HTTPS_PROVIDER_VAR: &str = "TTZ_HTTPS_PROVIDER";
pub const WSS_PROVIDER_VAR: &str = "TTZ_WSS_PROVIDER";
pub const CONTRACT_ADDRESS_VAR: &str = "TTZ_CONTRACT_ADDRESS";
pub const GAS_WALLET_ADDRESS_VAR: &str = "TTZ_GAS_WALLET_ADDRESS";

/// Config file layout before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWeb3Config {
    #[serde(default = "RawWeb3Config::default_https_provider")]
    pub https_provider: String,

    /// Reading real-time events needs a WebSocket endpoint.
    #[serde(default = "RawWeb3Config::default_wss_provider")]
    pub wss_provider: String,

    #[serde(default = "RawWeb3Config::default_contract_address")]
    pub contract_address: String,

    /// Wallet that pays transaction fees (gas).
    #[serde(default = "RawWeb3Config::default_gas_wallet_address")]
    pub gas_wallet_address: String,
}

impl RawWeb3Config {
    fn default_https_provider() -> String { DEFAULT_HTTPS_PROVIDER.to_string() }
    fn default_wss_provider() -> String { DEFAULT_WSS_PROVIDER.to_string() }
    fn default_contract_address() -> String { DEFAULT_CONTRACT_ADDRESS.to_string() }
    fn default_gas_wallet_address() -> String { DEFAULT_GAS_WALLET_ADDRESS.to_string() }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content)?;
        if value.get("private_key").is_some() {
            return Err(AppError::Config(
                "private_key must not be stored in the config file; set TTZ_PRIVATE_KEY".to_string(),
            ));
        }
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw = Self::from_toml_str(&content)?;
        info!("Loaded config file {}", path.display());
        Ok(raw)
    }

    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            (HTTPS_PROVIDER_VAR, &mut self.https_provider),
            (WSS_PROVIDER_VAR, &mut self.wss_provider),
            (CONTRACT_ADDRESS_VAR, &mut self.contract_address),
            (GAS_WALLET_ADDRESS_VAR, &mut self.gas_wallet_address),
        ];
        for (var, slot) in overrides {
            if let Ok(v) = std::env::var(var) {
                if !v.trim().is_empty() {
                    debug!("config override from {}", var);
                    *slot = v.trim().to_string();
                }
            }
        }
    }

    pub fn validate(&self) -> Result<Web3Config> {
        let https_provider = parse_endpoint("https_provider", &self.https_provider, &["https", "http"])?;
        let wss_provider = parse_endpoint("wss_provider", &self.wss_provider, &["wss", "ws"])?;
        let contract_address = parse_address("contract_address", &self.contract_address)?;
        if contract_address.is_zero() {
            return Err(AppError::InvalidAddress("contract_address is the zero address".to_string()));
        }
        let gas_wallet_address = parse_address("gas_wallet_address", &self.gas_wallet_address)?;
        Ok(Web3Config { https_provider, wss_provider, contract_address, gas_wallet_address })
    }
}

impl Default for RawWeb3Config {
    fn default() -> Self {
        Self {
            https_provider: Self::default_https_provider(),
            wss_provider: Self::default_wss_provider(),
            contract_address: Self::default_contract_address(),
            gas_wallet_address: Self::default_gas_wallet_address(),
        }
    }
}

/// Validated configuration record.
#[derive(Debug, Clone, PartialEq)]
pub struct Web3Config {
    pub https_provider: Url,
    pub wss_provider: Url,
    pub contract_address: Address,
    pub gas_wallet_address: Address,
}

impl Web3Config {
    /// Every key the configuration surface exposes. `private_key` is served
    /// by the secret store, not by this struct.
    pub const KEYS: [&'static str; 5] =
        ["https_provider", "wss_provider", "contract_address", "gas_wallet_address", "private_key"];

    /// Built-in defaults with no file and no environment overrides applied.
    pub fn builtin() -> Result<Self> {
        RawWeb3Config::default().validate()
    }

    /// Defaults, then the file at `path` (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut raw = match path {
            Some(p) => RawWeb3Config::from_file(p)?,
            None => RawWeb3Config::default(),
        };
        raw.apply_env_overrides();
        raw.validate()
    }

    /// HTTPS endpoint with the provider API key appended, if one is configured.
    pub fn https_endpoint(&self, creds: &Credentials) -> Result<Url> {
        with_api_key(&self.https_provider, creds.rpc_api_key.as_ref())
    }

    pub fn wss_endpoint(&self, creds: &Credentials) -> Result<Url> {
        with_api_key(&self.wss_provider, creds.rpc_api_key.as_ref())
    }

    /// Key/value view for display. Secrets are reported as set or unset only.
    pub fn describe(&self, creds: &Credentials) -> BTreeMap<&'static str, String> {
        let secret_state = |s: Option<&SecretString>| {
            if s.is_some() { "<redacted>".to_string() } else { "<unset>".to_string() }
        };
        let mut out = BTreeMap::new();
        out.insert("https_provider", redact_url(&self.https_provider));
        out.insert("wss_provider", redact_url(&self.wss_provider));
        out.insert("contract_address", format!("{:?}", self.contract_address));
        out.insert("gas_wallet_address", format!("{:?}", self.gas_wallet_address));
        out.insert("private_key", secret_state(creds.private_key.as_ref()));
        out
    }
}

/// `--config` wins over `TTZ_CONFIG`.
pub fn resolve_config_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    cli.or_else(|| std::env::var(CONFIG_PATH_VAR).ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

fn parse_endpoint(key: &str, value: &str, schemes: &[&str]) -> Result<Url> {
    let url = Url::parse(value.trim())
        .map_err(|e| AppError::InvalidUrl(format!("{}: {}", key, e)))?;
    if !schemes.contains(&url.scheme()) {
        return Err(AppError::InvalidUrl(format!(
            "{} must use one of {:?}, got '{}'",
            key,
            schemes,
            url.scheme()
        )));
    }
    Ok(url)
}

fn parse_address(key: &str, value: &str) -> Result<Address> {
    let v = value.trim();
    if v.len() != 42 || !v.starts_with("0x") {
        return Err(AppError::InvalidAddress(format!(
            "{} must be a 0x-prefixed 20-byte hex address, got '{}'",
            key, v
        )));
    }
    Address::from_str(v).map_err(|e| AppError::InvalidAddress(format!("{} '{}': {}", key, v, e)))
}

fn with_api_key(base: &Url, key: Option<&SecretString>) -> Result<Url> {
    let Some(key) = key else {
        return Ok(base.clone());
    };
    let mut s = base.as_str().to_string();
    if !s.ends_with('/') {
        s.push('/');
    }
    s.push_str(key.expose_secret());
    // url::ParseError does not echo its input, so the key stays out of the message.
    Url::parse(&s).map_err(|e| AppError::InvalidUrl(format!("endpoint with API key: {}", e)))
}
