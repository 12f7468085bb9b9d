mod util;

use ethers::abi::Token;
use ethers::providers::{MockProvider, Provider};
use ethers::types::{Address, U256};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use secrecy::Secret;
use std::str::FromStr;
use std::sync::Arc;
use test_case::test_case;
use ttz_console::blockchain::abi::erc20_abi;
use ttz_console::blockchain::contract::{contract_gas_price, ProjectContract};
use ttz_console::core::config::Web3Config;
use ttz_console::core::errors::AppError;
use ttz_console::core::state::ChainState;
use ttz_console::security::env_manager::Credentials;
use ttz_console::security::signer::load_signer;

fn state_with_gas(gwei: &str) -> ChainState {
    let mut state = ChainState::new();
    state.set_gas_price_gwei(Decimal::from_str(gwei).unwrap()).unwrap();
    state
}

fn build(
    mock: MockProvider,
    state: &ChainState,
) -> Result<ProjectContract<Provider<MockProvider>>, AppError> {
    let config = Web3Config::builtin().unwrap();
    ProjectContract::new(Arc::new(Provider::new(mock)), erc20_abi().unwrap(), &config, state)
}

#[test_case("1", 2_000_000_000 ; "one gwei")]
#[test_case("30", 60_000_000_000 ; "typical gwei")]
#[test_case("0.5", 1_000_000_000 ; "fractional gwei")]
#[test_case("0", 0 ; "zero gwei")]
fn forwarded_gas_price_is_twice_g_times_1e9(gwei: &str, expected_wei: u64) {
    let state = state_with_gas(gwei);
    let contract = build(MockProvider::new(), &state).unwrap();
    assert_eq!(contract.gas_price(), U256::from(expected_wei));
    assert_eq!(contract_gas_price(state.gas_price_gwei()).unwrap(), U256::from(expected_wei));
}

#[test]
fn construction_without_gas_price_is_an_error() {
    let state = ChainState::new();
    let err = build(MockProvider::new(), &state).err().unwrap();
    assert!(matches!(err, AppError::GasPriceUnavailable));
}

#[test]
fn handle_targets_configured_contract_and_gas_wallet() {
    let config = Web3Config::builtin().unwrap();
    let contract = build(MockProvider::new(), &state_with_gas("2")).unwrap();
    assert_eq!(contract.address(), config.contract_address);
    assert_eq!(contract.from_address(), config.gas_wallet_address);
    assert!(contract.abi().function("totalSupply").is_ok());
}

#[tokio::test]
async fn sync_token_info_reads_and_stores_metadata() {
    let mock = MockProvider::new();
    // Calls run name, symbol, decimals, totalSupply; queue in reverse.
    let supply = U256::exp10(24);
    util::push_call_result(&mock, &[Token::Uint(supply)]);
    util::push_call_result(&mock, &[Token::Uint(U256::from(18u8))]);
    util::push_call_result(&mock, &[Token::String("TTZ".into())]);
    util::push_call_result(&mock, &[Token::String("TutorZ Token".into())]);

    let mut state = state_with_gas("3");
    let contract = build(mock, &state).unwrap();
    let info = contract.sync_token_info(&mut state).await.unwrap();

    assert_eq!(info.name, "TutorZ Token");
    assert_eq!(info.symbol, "TTZ");
    assert_eq!(info.decimals, 18);
    assert_eq!(info.total_supply, "1000000000000000000000000");
    assert!(info.total_supply_formatted.starts_with("1000000."));
    assert_eq!(state.total_supply(), supply);
    assert_eq!(state.token_symbol(), "TTZ");
}

#[tokio::test]
async fn balance_of_decodes_uint() {
    let mock = MockProvider::new();
    util::push_call_result(&mock, &[Token::Uint(U256::from(42u64))]);
    let contract = build(mock, &state_with_gas("1")).unwrap();
    let balance = contract.balance_of(Address::repeat_byte(0x33)).await.unwrap();
    assert_eq!(balance, U256::from(42u64));
}

#[tokio::test]
async fn call_without_response_is_contract_error() {
    let contract = build(MockProvider::new(), &state_with_gas("1")).unwrap();
    let err = contract.total_supply().await.unwrap_err();
    assert!(matches!(err, AppError::Contract(_)));
}

#[test]
fn signer_must_control_gas_wallet() {
    let creds = Credentials { private_key: Some(Secret::new("11".repeat(32))), rpc_api_key: None };
    let signer = load_signer(&creds, 5).unwrap();
    let contract = build(MockProvider::new(), &state_with_gas("1")).unwrap();
    let err = contract.verify_signer(signer.as_ref()).unwrap_err();
    assert!(matches!(err, AppError::Signer(_)));
}

#[test]
fn read_only_mode_needs_no_signer() {
    let contract = build(MockProvider::new(), &state_with_gas("1")).unwrap();
    assert!(contract.verify_signer(None).is_ok());
}

#[test]
fn matching_signer_is_accepted_and_handle_is_unchanged() {
    let key = "11".repeat(32);
    let creds = Credentials { private_key: Some(Secret::new(key)), rpc_api_key: None };
    let signer = load_signer(&creds, 5).unwrap().unwrap();
    let mut config = Web3Config::builtin().unwrap();
    config.gas_wallet_address = ethers::signers::Signer::address(&signer);

    let contract = ProjectContract::new(
        Arc::new(Provider::new(MockProvider::new())),
        erc20_abi().unwrap(),
        &config,
        &state_with_gas("1"),
    )
    .unwrap();
    contract.verify_signer(Some(&signer)).unwrap();
    assert_eq!(contract.from_address(), config.gas_wallet_address);
}
