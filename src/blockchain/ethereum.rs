use async_trait::async_trait;
use ethers::{
    prelude::JsonRpcClient,
    providers::{Http, Middleware, Provider},
    types::U256,
};
use reqwest::Url;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

use super::traits::ChainReader;
use crate::core::errors::{AppError, Result};
use crate::security::redaction::redact_url;

/// Map a chain id to the short network name used in logs and output.
pub fn network_name_for(chain_id: u64) -> String {
    match chain_id {
        1 => "ethereum".to_string(),
        5 => "goerli".to_string(),
        11155111 => "sepolia".to_string(),
        137 => "polygon".to_string(),
        80001 => "mumbai".to_string(),
        _ => format!("ethereum-{}", chain_id),
    }
}

#[derive(Clone, Debug)]
pub struct EthereumClient<P: JsonRpcClient = Http> {
    provider: Arc<Provider<P>>,
    network_name: String,
    chain_id: u64,
}

impl EthereumClient<Http> {
    /// Connect over HTTP(S) and resolve the chain id.
    pub async fn connect(rpc_url: &Url) -> Result<Self> {
        let shown = redact_url(rpc_url);
        info!("Connecting to Ethereum network: {}", shown);

        // Build a reqwest client with a short timeout; allow proxy environment vars.
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(10));
        if let Ok(proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("HTTP_PROXY")) {
            if let Ok(p) = reqwest::Proxy::all(proxy) {
                builder = builder.proxy(p);
            }
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Blockchain(format!("Failed to build HTTP client: {}", e)))?;

        let provider = Provider::new(Http::new_with_client(rpc_url.clone(), client));

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| {
                AppError::Blockchain(format!(
                    "Failed to get chain ID from {}: {}. Check the endpoint, API key and network access.",
                    shown, e
                ))
            })?
            .as_u64();

        let network_name = network_name_for(chain_id);
        info!("Connected to {} (Chain ID: {})", network_name, chain_id);

        Ok(Self { provider: Arc::new(provider), network_name, chain_id })
    }
}

impl<P> EthereumClient<P>
where
    P: JsonRpcClient,
{
    /// Creates a new EthereumClient with a given provider.
    /// This is useful for testing with a `MockProvider`.
    pub fn new_with_provider(provider: Provider<P>) -> Self {
        Self::new_with_chain_id(provider, 1)
    }

    pub fn new_with_chain_id(provider: Provider<P>, chain_id: u64) -> Self {
        Self { provider: Arc::new(provider), network_name: network_name_for(chain_id), chain_id }
    }

    /// Shared handle used to build contract bindings.
    pub fn provider(&self) -> Arc<Provider<P>> {
        Arc::clone(&self.provider)
    }
}

#[async_trait]
impl<P> ChainReader for EthereumClient<P>
where
    P: JsonRpcClient + 'static,
{
    async fn get_gas_price(&self) -> Result<U256> {
        let v = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| AppError::Blockchain(format!("Failed to get gas price: {}", e)))?;
        debug!("get_gas_price got = 0x{:x}", v);
        Ok(v)
    }

    async fn get_block_number(&self) -> Result<u64> {
        let block_number = self.provider.get_block_number().await.map_err(|e| {
            AppError::Blockchain(format!("Failed to get block number: {}", e))
        })?;
        debug!("get_block_number got = {}", block_number);
        Ok(block_number.as_u64())
    }

    fn network_name(&self) -> &str {
        &self.network_name
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
