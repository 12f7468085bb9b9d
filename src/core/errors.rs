use thiserror::Error;

/// Error type shared by every library operation.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The contract handle was requested before any gas price was recorded.
    #[error("Gas price unavailable: refresh chain state before constructing the contract")]
    GasPriceUnavailable,

    #[error("Invalid gas price: {0}")]
    InvalidGasPrice(String),

    /// Blockchain interaction errors.
    #[error("Blockchain error: {0}")]
    Blockchain(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AppError {
    /// 判断是否为可重试error
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Blockchain(_))
    }

    /// Errors caused by local input rather than the network.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::InvalidAddress(_)
                | AppError::InvalidUrl(_)
                | AppError::Toml(_)
        )
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config_error() {
        let err = AppError::Config("missing contract".to_string());
        assert_eq!(format!("{}", err), "Configuration error: missing contract");
    }

    #[test]
    fn test_gas_price_unavailable_message() {
        let msg = AppError::GasPriceUnavailable.to_string();
        assert!(msg.contains("Gas price unavailable"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AppError::Blockchain("timeout".into()).is_retryable());
        assert!(!AppError::GasPriceUnavailable.is_retryable());
        assert!(AppError::InvalidUrl("x".into()).is_config_error());
        assert!(!AppError::Contract("revert".into()).is_config_error());
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
