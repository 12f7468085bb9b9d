// tests/util.rs
// Shared test helpers for integration tests
#![allow(dead_code)]

use ethers::abi::{encode, Token};
use ethers::providers::{MockProvider, Provider};
use ethers::types::{Bytes, U256, U64};
use ttz_console::blockchain::ethereum::EthereumClient;

/// Every environment variable the console reads.
pub const TTZ_VARS: &[&str] = &[
    "TTZ_CONFIG",
    "TTZ_HTTPS_PROVIDER",
    "TTZ_WSS_PROVIDER",
    "TTZ_CONTRACT_ADDRESS",
    "TTZ_GAS_WALLET_ADDRESS",
    "TTZ_PRIVATE_KEY",
    "TTZ_RPC_API_KEY",
];

/// Remove every TTZ_* variable so tests start from built-in defaults.
pub fn clear_ttz_env() {
    for var in TTZ_VARS {
        std::env::remove_var(var);
    }
}

/// Client over a fresh `MockProvider`; the mock is returned so tests can
/// queue responses. Responses are served last-in, first-out.
pub fn mock_client() -> (EthereumClient<MockProvider>, MockProvider) {
    let mock = MockProvider::new();
    let client = EthereumClient::new_with_chain_id(Provider::new(mock.clone()), 5);
    (client, mock)
}

pub fn push_block_number(mock: &MockProvider, n: u64) {
    mock.push::<U64, _>(U64::from(n)).unwrap();
}

pub fn push_gas_price(mock: &MockProvider, wei: u64) {
    mock.push::<U256, _>(U256::from(wei)).unwrap();
}

/// Queue an `eth_call` result ABI-encoding `tokens`.
pub fn push_call_result(mock: &MockProvider, tokens: &[Token]) {
    mock.push::<Bytes, _>(Bytes::from(encode(tokens))).unwrap();
}
