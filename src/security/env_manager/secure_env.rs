//! 安全环境变量访问
//!
//! Secrets are only ever read from the process environment. Nothing here
//! falls back to a literal.

use secrecy::{Secret, SecretString};

/// Environment variable holding the hex-encoded gas wallet key.
pub const PRIVATE_KEY_VAR: &str = "TTZ_PRIVATE_KEY";
/// Environment variable holding the RPC provider API key.
pub const RPC_API_KEY_VAR: &str = "TTZ_RPC_API_KEY";

fn non_empty_var(name: &str) -> Option<SecretString> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(Secret::new(v.trim().to_string())),
        _ => None,
    }
}

/// fetch gas wallet private key. Unset or blank means read-only mode.
pub fn get_private_key() -> Option<SecretString> {
    non_empty_var(PRIVATE_KEY_VAR)
}

/// fetch RPC API key
pub fn get_rpc_api_key() -> Option<SecretString> {
    non_empty_var(RPC_API_KEY_VAR)
}

/// Secrets loaded once at startup and handed to whoever needs them.
#[derive(Debug, Default)]
pub struct Credentials {
    pub private_key: Option<SecretString>,
    pub rpc_api_key: Option<SecretString>,
}

impl Credentials {
    pub fn from_env() -> Self {
        let creds = Self { private_key: get_private_key(), rpc_api_key: get_rpc_api_key() };
        tracing::debug!(
            has_private_key = creds.private_key.is_some(),
            has_rpc_api_key = creds.rpc_api_key.is_some(),
            "credentials loaded from environment"
        );
        creds
    }
}
