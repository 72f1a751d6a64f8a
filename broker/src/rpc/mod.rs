//! Request handlers exposed to the RPC layer.

pub mod trade_history;
pub mod watch_market;

use std::sync::Arc;

use common::logger::{TraceId, root_span};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::capacity::{CapacityAggregator, CapacityCalculator, TradingCapacitiesResult};
use crate::config::BrokerConfig;
use crate::engine::EngineRegistry;
use crate::error::BrokerError;
use crate::funds::CommittedFundsSource;
use crate::orderbook::OrderBookRegistry;

pub use trade_history::{StaticTradeHistory, TradeHistory, TradeHistorySource};
pub use watch_market::{EventType, MarketEvent, MarketEventOrder, Side, WatchMarketResponse};

/// Broker-facing handlers over the registries built at startup.
pub struct BrokerService {
    capacities: CapacityAggregator,
    orderbooks: Arc<OrderBookRegistry>,
    trades: Arc<dyn TradeHistorySource>,
    watch_buffer: usize,
}

impl BrokerService {
    pub fn new(
        cfg: &BrokerConfig,
        engines: Arc<EngineRegistry>,
        orderbooks: Arc<OrderBookRegistry>,
        funds: Arc<dyn CommittedFundsSource>,
        trades: Arc<dyn TradeHistorySource>,
    ) -> Self {
        Self {
            capacities: CapacityAggregator::new(
                engines,
                Arc::clone(&orderbooks),
                funds,
                CapacityCalculator::from_config(cfg),
            ),
            orderbooks,
            trades,
            watch_buffer: cfg.watch_buffer,
        }
    }

    pub async fn get_trading_capacities(
        &self,
        market: &str,
    ) -> Result<TradingCapacitiesResult, BrokerError> {
        let span = root_span("GetTradingCapacities", &TraceId::new());
        span.record("market", market);

        self.capacities
            .get_trading_capacities(market)
            .instrument(span)
            .await
    }

    pub async fn get_trade_history(&self) -> Result<TradeHistory, BrokerError> {
        let span = root_span("GetTradeHistory", &TraceId::new());

        trade_history::get_trade_history(self.trades.as_ref())
            .instrument(span)
            .await
    }

    pub async fn watch_market(
        &self,
        market: &str,
    ) -> Result<mpsc::Receiver<WatchMarketResponse>, BrokerError> {
        let span = root_span("WatchMarket", &TraceId::new());
        span.record("market", market);

        watch_market::watch_market(&self.orderbooks, market, self.watch_buffer)
            .instrument(span)
            .await
    }
}
