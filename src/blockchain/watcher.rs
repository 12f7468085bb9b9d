//! Follow new blocks over the WebSocket endpoint.

use ethers::{
    providers::{Middleware, Provider, Ws},
    types::{Block, H256},
};
use futures::{Future, Stream, StreamExt};
use reqwest::Url;
use tracing::{info, warn};

use super::ethereum::EthereumClient;
use super::traits::ChainReader;
use crate::core::errors::{AppError, Result};
use crate::core::state::ChainState;
use crate::security::redaction::redact_url;

/// Record each block from `blocks` in `state`, re-reading the gas price per
/// block. A gas price that cannot be read or stored is logged and the
/// previous value kept. Stops after `limit` blocks, or when the stream ends.
///
/// `applied` is bumped per block, so the count survives the future being
/// dropped mid-stream.
pub async fn apply_block_stream<S>(
    blocks: S,
    state: &mut ChainState,
    reader: &dyn ChainReader,
    limit: Option<usize>,
    applied: &mut usize,
) -> Result<()>
where
    S: Stream<Item = Block<H256>>,
{
    let mut blocks = Box::pin(blocks);
    let mut seen = 0usize;

    while let Some(block) = blocks.next().await {
        let Some(number) = block.number else {
            warn!("received block without a number; skipping");
            continue;
        };
        state.set_block_number(number.as_u64());

        let gas = reader.get_gas_price().await.and_then(|wei| state.set_gas_price_wei(wei));
        if let Err(e) = gas {
            warn!("gas price refresh failed at block {}: {}", number, e);
        }
        state.touch();
        info!(
            block_number = number.as_u64(),
            gas_price_gwei = ?state.gas_price_gwei(),
            "new block"
        );

        *applied += 1;
        seen += 1;
        if limit.is_some_and(|l| seen >= l) {
            break;
        }
    }
    Ok(())
}

/// Subscribe to new heads on `wss_url` and feed them into `state`.
pub async fn watch_blocks(
    wss_url: &Url,
    state: &mut ChainState,
    limit: Option<usize>,
    applied: &mut usize,
) -> Result<()> {
    let shown = redact_url(wss_url);
    info!("Subscribing to new blocks on {}", shown);

    let provider = Provider::<Ws>::connect(wss_url.as_str())
        .await
        .map_err(|e| AppError::Blockchain(format!("WebSocket connect to {} failed: {}", shown, e)))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| AppError::Blockchain(format!("Failed to get chain ID: {}", e)))?
        .as_u64();

    let client = EthereumClient::new_with_chain_id(provider, chain_id);
    let provider = client.provider();
    let blocks = provider
        .subscribe_blocks()
        .await
        .map_err(|e| AppError::Blockchain(format!("Block subscription failed: {}", e)))?;

    apply_block_stream(blocks, state, &client, limit, applied).await
}

/// Drive `watch` until it finishes or `interrupt` resolves. Returns `true`
/// when interrupted. If the interrupt source itself fails, the failure is
/// logged and `watch` runs to completion.
pub async fn until_interrupted<W, I>(watch: W, interrupt: I) -> Result<bool>
where
    W: Future<Output = Result<()>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(watch);
    tokio::select! {
        res = &mut watch => res.map(|()| false),
        sig = interrupt => match sig {
            Ok(()) => {
                info!("interrupted; stopping block watcher");
                Ok(true)
            }
            Err(e) => {
                warn!("cannot listen for Ctrl-C: {}; watching until the block limit", e);
                (&mut watch).await.map(|()| false)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ethers::types::{U256, U64};
    use rust_decimal::Decimal;
    use std::time::Duration;

    struct FixedReader {
        gas_price: Option<U256>,
    }

    #[async_trait]
    impl ChainReader for FixedReader {
        async fn get_gas_price(&self) -> Result<U256> {
            self.gas_price.ok_or_else(|| AppError::Blockchain("node unavailable".into()))
        }
        async fn get_block_number(&self) -> Result<u64> {
            Ok(0)
        }
        fn network_name(&self) -> &str {
            "test"
        }
        fn chain_id(&self) -> u64 {
            1
        }
    }

    fn block(n: Option<u64>) -> Block<H256> {
        Block { number: n.map(U64::from), ..Default::default() }
    }

    #[tokio::test]
    async fn applies_blocks_until_limit() {
        let reader = FixedReader { gas_price: Some(U256::from(7_000_000_000u64)) };
        let mut state = ChainState::new();
        let mut applied = 0;
        let blocks = futures::stream::iter(vec![block(Some(10)), block(Some(11)), block(Some(12))]);

        apply_block_stream(blocks, &mut state, &reader, Some(2), &mut applied).await.unwrap();
        assert_eq!(applied, 2);
        assert_eq!(state.block_number(), Some(11));
        assert_eq!(state.gas_price_gwei(), Some(Decimal::from(7)));
        assert!(state.updated_at().is_some());
    }

    #[tokio::test]
    async fn skips_pending_blocks_and_keeps_gas_on_error() {
        let reader = FixedReader { gas_price: None };
        let mut state = ChainState::new();
        state.set_gas_price_gwei(Decimal::from(3)).unwrap();
        let mut applied = 0;
        let blocks = futures::stream::iter(vec![block(None), block(Some(42))]);

        apply_block_stream(blocks, &mut state, &reader, None, &mut applied).await.unwrap();
        assert_eq!(applied, 1);
        assert_eq!(state.block_number(), Some(42));
        assert_eq!(state.gas_price_gwei(), Some(Decimal::from(3)));
    }

    #[tokio::test]
    async fn out_of_range_gas_price_is_logged_not_fatal() {
        let reader = FixedReader { gas_price: Some(U256::MAX) };
        let mut state = ChainState::new();
        state.set_gas_price_gwei(Decimal::from(5)).unwrap();
        let mut applied = 0;
        let blocks = futures::stream::iter(vec![block(Some(1)), block(Some(2))]);

        apply_block_stream(blocks, &mut state, &reader, None, &mut applied).await.unwrap();
        assert_eq!(applied, 2);
        assert_eq!(state.block_number(), Some(2));
        assert_eq!(state.gas_price_gwei(), Some(Decimal::from(5)));
    }

    #[tokio::test]
    async fn count_survives_interrupt() {
        let reader = FixedReader { gas_price: Some(U256::from(1_000_000_000u64)) };
        let mut state = ChainState::new();
        let mut applied = 0;
        let blocks = futures::stream::iter(vec![block(Some(10)), block(Some(11))])
            .chain(futures::stream::pending());

        let interrupted = until_interrupted(
            apply_block_stream(blocks, &mut state, &reader, None, &mut applied),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            },
        )
        .await
        .unwrap();

        assert!(interrupted);
        assert_eq!(applied, 2);
        assert_eq!(state.block_number(), Some(11));
    }

    #[tokio::test]
    async fn failed_interrupt_source_lets_watch_finish() {
        let reader = FixedReader { gas_price: Some(U256::from(1_000_000_000u64)) };
        let mut state = ChainState::new();
        let mut applied = 0;
        let blocks = futures::stream::iter(vec![block(Some(1)), block(Some(2)), block(Some(3))]);

        let interrupted = until_interrupted(
            apply_block_stream(blocks, &mut state, &reader, Some(3), &mut applied),
            futures::future::ready(Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler"))),
        )
        .await
        .unwrap();

        assert!(!interrupted);
        assert_eq!(applied, 3);
        assert_eq!(state.block_number(), Some(3));
    }
}
