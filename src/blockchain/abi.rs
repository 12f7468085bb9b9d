use ethers::abi::{parse_abi, Abi};
use std::path::Path;
use tracing::info;

use crate::core::errors::{AppError, Result};

/// Read-only ERC20 surface the console calls.
pub const ERC20_READ_ABI: &[&str] = &[
    "function name() external view returns (string)",
    "function symbol() external view returns (string)",
    "function decimals() external view returns (uint8)",
    "function totalSupply() external view returns (uint256)",
    "function balanceOf(address owner) external view returns (uint256)",
];

pub const ERC20_READ_FUNCTIONS: &[&str] = &["name", "symbol", "decimals", "totalSupply", "balanceOf"];

/// Built-in ERC20 read ABI, used when no ABI file is supplied.
pub fn erc20_abi() -> Result<Abi> {
    parse_abi(ERC20_READ_ABI).map_err(|e| AppError::Abi(format!("built-in ERC20 ABI: {}", e)))
}

/// Parse a JSON ABI. Accepts a bare ABI array or a build artifact with an
/// `abi` field (Hardhat/Truffle layout).
pub fn parse_abi_json(content: &str) -> Result<Abi> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let abi_value = match value {
        serde_json::Value::Object(mut obj) => obj
            .remove("abi")
            .ok_or_else(|| AppError::Abi("JSON object has no `abi` field".to_string()))?,
        other => other,
    };
    serde_json::from_value(abi_value).map_err(|e| AppError::Abi(format!("malformed ABI: {}", e)))
}

pub fn load_abi(path: &Path) -> Result<Abi> {
    let content = std::fs::read_to_string(path)?;
    let abi = parse_abi_json(&content)?;
    info!("Loaded ABI from {} ({} functions)", path.display(), abi.functions().count());
    Ok(abi)
}

/// Fail early when a supplied ABI lacks one of the ERC20 reads.
pub fn ensure_erc20_reads(abi: &Abi) -> Result<()> {
    let missing: Vec<&str> =
        ERC20_READ_FUNCTIONS.iter().copied().filter(|f| abi.function(f).is_err()).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Abi(format!("ABI is missing ERC20 functions: {}", missing.join(", "))))
    }
}
