pub mod config;
pub mod errors;
pub mod state;

pub use config::Web3Config;
pub use errors::{AppError, Result};
pub use state::ChainState;
