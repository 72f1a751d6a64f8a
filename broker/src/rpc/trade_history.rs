use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::error::BrokerError;

/// Completed trades as recorded by the order worker. Records are forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeHistory {
    pub orders: Vec<serde_json::Value>,
    pub fills: Vec<serde_json::Value>,
}

#[async_trait]
pub trait TradeHistorySource: Send + Sync + 'static {
    async fn get_trades(&self) -> anyhow::Result<TradeHistory>;
}

#[instrument(skip_all)]
pub async fn get_trade_history(
    source: &dyn TradeHistorySource,
) -> Result<TradeHistory, BrokerError> {
    source.get_trades().await.map_err(|e| {
        error!(error = ?e, "Received error when grabbing trades");
        BrokerError::TradeHistoryFailed(e.to_string())
    })
}

/// Serves a fixed history.
#[derive(Debug, Clone, Default)]
pub struct StaticTradeHistory {
    history: TradeHistory,
}

impl StaticTradeHistory {
    pub fn new(history: TradeHistory) -> Self {
        Self { history }
    }
}

#[async_trait]
impl TradeHistorySource for StaticTradeHistory {
    async fn get_trades(&self) -> anyhow::Result<TradeHistory> {
        Ok(self.history.clone())
    }
}
