use std::future::Future;
use std::time::Duration;

use common::logger::warn_if_slow;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::capacity::types::{Capacities, CapacityReport};
use crate::config::BrokerConfig;
use crate::engine::Engine;
use crate::error::EngineQueryError;

/// Computes the capacity report of a single asset from its engine.
///
/// Engine failures never escape: they become a `FAILED` report so the
/// sibling leg of the market is still served.
#[derive(Debug, Clone)]
pub struct CapacityCalculator {
    query_timeout: Duration,
    slow_query_warn: Duration,
}

impl CapacityCalculator {
    pub fn new(query_timeout: Duration, slow_query_warn: Duration) -> Self {
        Self {
            query_timeout,
            slow_query_warn,
        }
    }

    pub fn from_config(cfg: &BrokerConfig) -> Self {
        Self::new(cfg.engine_query_timeout(), cfg.slow_query_warn())
    }

    /// `outstanding_send` / `outstanding_receive` are quantum amounts already
    /// committed to open orders on this asset.
    #[instrument(
        skip(self, engine),
        fields(symbol = %symbol, %outstanding_send, %outstanding_receive),
        level = "debug"
    )]
    pub async fn get_capacities(
        &self,
        engine: &dyn Engine,
        symbol: &str,
        outstanding_send: Decimal,
        outstanding_receive: Decimal,
    ) -> CapacityReport {
        match self
            .compute(engine, symbol, outstanding_send, outstanding_receive)
            .await
        {
            Ok(capacities) => CapacityReport::Ok(capacities),
            Err(e) => {
                warn!(symbol, error = %e, "failed to get channel capacities from engine");
                CapacityReport::failed(symbol, e.to_string())
            }
        }
    }

    async fn compute(
        &self,
        engine: &dyn Engine,
        symbol: &str,
        outstanding_send: Decimal,
        outstanding_receive: Decimal,
    ) -> Result<Capacities, EngineQueryError> {
        let quantums_per_common = engine.quantums_per_common();
        if quantums_per_common == 0 {
            return Err(EngineQueryError::InvalidQuantumsPerCommon {
                symbol: symbol.to_string(),
                value: quantums_per_common,
            });
        }
        let per_common = Decimal::from(quantums_per_common);

        let (open, pending) = futures::try_join!(
            self.query(
                symbol,
                "engine_open_channel_capacities",
                engine.get_open_channel_capacities()
            ),
            self.query(
                symbol,
                "engine_pending_channel_capacities",
                engine.get_pending_channel_capacities()
            ),
        )?;

        debug!(?open, ?pending, "channel capacities received");

        let to_common = |quanta: Decimal| (quanta / per_common).normalize();
        let available = |balance: u64, committed: Decimal| {
            Decimal::from(balance)
                .checked_sub(committed)
                .map(to_common)
                .ok_or_else(|| EngineQueryError::CapacityOutOfRange {
                    symbol: symbol.to_string(),
                    balance,
                    committed,
                })
        };

        Ok(Capacities {
            symbol: symbol.to_string(),
            available_send_capacity: available(open.active.local_balance, outstanding_send)?,
            available_receive_capacity: available(open.active.remote_balance, outstanding_receive)?,
            inactive_send_capacity: to_common(open.inactive.local_balance.into()),
            inactive_receive_capacity: to_common(open.inactive.remote_balance.into()),
            pending_send_capacity: to_common(pending.local_balance.into()),
            pending_receive_capacity: to_common(pending.remote_balance.into()),
            outstanding_send_capacity: to_common(outstanding_send),
            outstanding_receive_capacity: to_common(outstanding_receive),
        })
    }

    async fn query<T, F>(
        &self,
        symbol: &str,
        label: &'static str,
        fut: F,
    ) -> Result<T, EngineQueryError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        let timed = tokio::time::timeout(self.query_timeout, fut);
        match warn_if_slow(label, self.slow_query_warn, timed).await {
            Ok(res) => res.map_err(EngineQueryError::Failed),
            Err(_) => Err(EngineQueryError::Timeout {
                symbol: symbol.to_string(),
                timeout_ms: self.query_timeout.as_millis() as u64,
            }),
        }
    }
}
