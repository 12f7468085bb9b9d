//! Small helpers and aliases for secret material that must be zeroized on drop.
use secrecy::{ExposeSecret, Secret};
use zeroize::{Zeroize, Zeroizing};

use crate::core::errors::{AppError, Result};

/// Common alias for secret byte buffers which will be zeroed when dropped.
pub type SecretVec = Zeroizing<Vec<u8>>;

/// A 32-byte secp256k1 signing key.
pub struct PrivateKey(Secret<[u8; 32]>);

impl PrivateKey {
    pub fn new(k: [u8; 32]) -> Self {
        Self(Secret::new(k))
    }

    /// Scoped access to the underlying secret bytes.
    pub fn with_secret<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[u8; 32]) -> R,
    {
        f(self.0.expose_secret())
    }

    /// Parse a hex-encoded key, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes: SecretVec = Zeroizing::new(
            hex::decode(digits)
                .map_err(|e| AppError::Signer(format!("Private key is not valid hex: {}", e)))?,
        );
        Self::try_from_slice(&bytes)
    }

    /// Try to construct a PrivateKey from a byte slice (must be 32 bytes).
    pub fn try_from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != 32 {
            return Err(AppError::Signer("Private key must be 32 bytes".to_string()));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(slice);
        let key = PrivateKey::new(arr);
        arr.zeroize();
        Ok(key)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}
