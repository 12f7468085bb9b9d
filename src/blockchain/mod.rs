pub mod abi;
pub mod contract;
pub mod ethereum;
pub mod traits;
pub mod watcher;

pub use contract::{contract_gas_price, ProjectContract, TokenInfo};
pub use ethereum::EthereumClient;
pub use traits::ChainReader;
