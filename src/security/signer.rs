//! Gas wallet signer, derived from the secret store when a key is present.

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::core::errors::{AppError, Result};
use crate::security::env_manager::Credentials;
use crate::security::secret::PrivateKey;

/// Build the gas wallet signer. Returns `Ok(None)` when no private key is
/// configured, which leaves the console in read-only mode.
pub fn load_signer(creds: &Credentials, chain_id: u64) -> Result<Option<LocalWallet>> {
    let Some(secret) = creds.private_key.as_ref() else {
        debug!("no private key configured; running read-only");
        return Ok(None);
    };
    let key = PrivateKey::from_hex(secret.expose_secret())?;
    let wallet = wallet_from_key(&key, chain_id)?;
    info!(address = ?wallet.address(), chain_id, "gas wallet signer loaded");
    Ok(Some(wallet))
}

/// Do NOT log key material.
pub fn wallet_from_key(key: &PrivateKey, chain_id: u64) -> Result<LocalWallet> {
    let wallet = key
        .with_secret(|bytes| LocalWallet::from_bytes(bytes))
        .map_err(|e| AppError::Signer(format!("Invalid private key: {}", e)))?;
    Ok(wallet.with_chain_id(chain_id))
}

/// The signer must control the configured gas wallet.
pub fn ensure_signer_matches(wallet: &LocalWallet, expected: Address) -> Result<()> {
    if wallet.address() != expected {
        return Err(AppError::Signer(format!(
            "private key controls {:?}, but the configured gas wallet is {:?}",
            wallet.address(),
            expected
        )));
    }
    Ok(())
}
