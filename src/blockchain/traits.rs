use async_trait::async_trait;
use ethers::types::U256;

use crate::core::errors::Result;

/// Read-only view of a chain: the two scalars the console tracks.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current gas price in wei, as reported by the node.
    async fn get_gas_price(&self) -> Result<U256>;

    /// Gets the current block number.
    async fn get_block_number(&self) -> Result<u64>;

    /// Returns the name of the network (e.g., "ethereum", "goerli").
    fn network_name(&self) -> &str;

    fn chain_id(&self) -> u64;
}
