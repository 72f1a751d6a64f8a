//! Trading capacity: how much liquidity the broker can quote on each leg
//! of a market, given live channel balances and funds already committed
//! to open orders.

pub mod aggregator;
pub mod calculator;
pub mod types;

pub use aggregator::CapacityAggregator;
pub use calculator::CapacityCalculator;
pub use types::{
    Capacities, CapacityReport, CapacityStatus, FailedCapacities, TradingCapacitiesResult,
};
