use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::capacity::calculator::CapacityCalculator;
use crate::capacity::types::TradingCapacitiesResult;
use crate::engine::EngineRegistry;
use crate::error::BrokerError;
use crate::funds::{CommittedFundsSource, FundsDirection};
use crate::market::Market;
use crate::orderbook::OrderBookRegistry;

/// Serves trading capacities for both legs of a tracked market.
///
/// Request validation and committed-funds failures abort the request.
/// Engine failures only mark the affected leg as `FAILED`.
pub struct CapacityAggregator {
    engines: Arc<EngineRegistry>,
    orderbooks: Arc<OrderBookRegistry>,
    funds: Arc<dyn CommittedFundsSource>,
    calculator: CapacityCalculator,
}

impl CapacityAggregator {
    pub fn new(
        engines: Arc<EngineRegistry>,
        orderbooks: Arc<OrderBookRegistry>,
        funds: Arc<dyn CommittedFundsSource>,
        calculator: CapacityCalculator,
    ) -> Self {
        Self {
            engines,
            orderbooks,
            funds,
            calculator,
        }
    }

    #[instrument(skip(self), fields(market = %market))]
    pub async fn get_trading_capacities(
        &self,
        market: &str,
    ) -> Result<TradingCapacitiesResult, BrokerError> {
        if !self.orderbooks.contains(market) {
            return Err(BrokerError::UnknownMarket(market.to_string()));
        }

        let market = Market::parse(market)?;

        let base_engine = self
            .engines
            .lookup(&market.base)
            .ok_or_else(|| BrokerError::NoEngineAvailable(market.base.clone()))?;
        let counter_engine = self
            .engines
            .lookup(&market.counter)
            .ok_or_else(|| BrokerError::NoEngineAvailable(market.counter.clone()))?;

        // base -> counter: receive base, send counter. counter -> base is the mirror.
        let base_to_counter = FundsDirection::new(&market.base, &market.counter);
        let counter_to_base = FundsDirection::new(&market.counter, &market.base);

        let (base_to_counter_funds, counter_to_base_funds) = futures::try_join!(
            self.funds.calculate_active_funds(&market, &base_to_counter),
            self.funds.calculate_active_funds(&market, &counter_to_base),
        )
        .map_err(BrokerError::CommittedFundsQueryFailed)?;

        base_to_counter_funds
            .validate()
            .and_then(|()| counter_to_base_funds.validate())
            .map_err(BrokerError::CommittedFundsQueryFailed)?;

        let base_send = counter_to_base_funds.outbound;
        let base_receive = base_to_counter_funds.inbound;
        let counter_send = base_to_counter_funds.outbound;
        let counter_receive = counter_to_base_funds.inbound;

        debug!(
            %base_send,
            %base_receive,
            %counter_send,
            %counter_receive,
            "outstanding funds resolved"
        );

        let (base_symbol_capacities, counter_symbol_capacities) = futures::join!(
            self.calculator.get_capacities(
                base_engine.as_ref(),
                &market.base,
                base_send,
                base_receive
            ),
            self.calculator.get_capacities(
                counter_engine.as_ref(),
                &market.counter,
                counter_send,
                counter_receive
            ),
        );

        info!(
            base = ?base_symbol_capacities.status(),
            counter = ?counter_symbol_capacities.status(),
            "trading capacities computed"
        );

        Ok(TradingCapacitiesResult {
            base_symbol_capacities,
            counter_symbol_capacities,
        })
    }
}
