
use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use broker::capacity::{CapacityAggregator, CapacityCalculator, CapacityReport, CapacityStatus};
use broker::engine::{Engine, EngineRegistry};
use broker::error::BrokerError;
use broker::funds::{CommittedFunds, FundsDirection};
use broker::market::Market;
use broker::orderbook::{MemoryOrderBookStore, OrderBookRegistry};

use mocks::{MockEngine, RecordingFunds};

const MARKET: &str = "BTC/LTC";

struct Fixture {
    btc: Arc<MockEngine>,
    ltc: Arc<MockEngine>,
    funds: Arc<RecordingFunds>,
    tracked: Vec<&'static str>,
    register_btc: bool,
    register_ltc: bool,
}

impl Fixture {
    fn new() -> Self {
        Self {
            btc: Arc::new(MockEngine::standard()),
            ltc: Arc::new(MockEngine::standard()),
            funds: Arc::new(committed_funds()),
            tracked: vec![MARKET],
            register_btc: true,
            register_ltc: true,
        }
    }

    fn aggregator(&self) -> CapacityAggregator {
        let mut engines = EngineRegistry::new();
        if self.register_btc {
            engines.register("BTC", Arc::clone(&self.btc) as Arc<dyn Engine>);
        }
        if self.register_ltc {
            engines.register("LTC", Arc::clone(&self.ltc) as Arc<dyn Engine>);
        }

        let mut orderbooks = OrderBookRegistry::new();
        for market in &self.tracked {
            orderbooks.register(
                Market::parse(market).unwrap(),
                Arc::new(MemoryOrderBookStore::new(4)),
            );
        }

        CapacityAggregator::new(
            Arc::new(engines),
            Arc::new(orderbooks),
            Arc::clone(&self.funds) as _,
            CapacityCalculator::new(Duration::from_secs(5), Duration::from_secs(60)),
        )
    }
}

/// Base send 1000, base receive 2000, counter send 3000, counter receive 4000.
fn committed_funds() -> RecordingFunds {
    RecordingFunds::new()
        .with(
            FundsDirection::new("BTC", "LTC"),
            CommittedFunds::new(dec!(2000), dec!(3000)),
        )
        .with(
            FundsDirection::new("LTC", "BTC"),
            CommittedFunds::new(dec!(4000), dec!(1000)),
        )
}

#[tokio::test]
async fn untracked_market_is_rejected_before_any_query() {
    let mut fx = Fixture::new();
    fx.tracked = vec!["ABC/DXS"];

    let err = fx.aggregator().get_trading_capacities(MARKET).await.unwrap_err();

    assert!(matches!(err, BrokerError::UnknownMarket(_)));
    assert_eq!(err.to_string(), "BTC/LTC is not being tracked as a market.");
    assert!(fx.funds.recorded().is_empty());
    assert_eq!(fx.btc.calls() + fx.ltc.calls(), 0);
}

#[tokio::test]
async fn missing_base_engine_is_reported() {
    let mut fx = Fixture::new();
    fx.register_btc = false;

    let err = fx.aggregator().get_trading_capacities(MARKET).await.unwrap_err();
    assert_eq!(err.to_string(), "No engine available for BTC");
}

#[tokio::test]
async fn missing_counter_engine_is_reported() {
    let mut fx = Fixture::new();
    fx.register_ltc = false;

    let err = fx.aggregator().get_trading_capacities(MARKET).await.unwrap_err();
    assert_eq!(err.to_string(), "No engine available for LTC");
}

#[tokio::test]
async fn base_engine_is_checked_first_when_both_are_missing() {
    let mut fx = Fixture::new();
    fx.register_btc = false;
    fx.register_ltc = false;

    let err = fx.aggregator().get_trading_capacities(MARKET).await.unwrap_err();
    assert!(matches!(err, BrokerError::NoEngineAvailable(ref s) if s == "BTC"));
    assert!(fx.funds.recorded().is_empty());
}

#[tokio::test]
async fn queries_committed_funds_for_both_directions() {
    let fx = Fixture::new();
    fx.aggregator().get_trading_capacities(MARKET).await.unwrap();

    let mut directions: Vec<_> = fx
        .funds
        .recorded()
        .into_iter()
        .map(|(market, direction)| {
            assert_eq!(market, Market::new("BTC", "LTC"));
            (direction.inbound_symbol, direction.outbound_symbol)
        })
        .collect();
    directions.sort();

    assert_eq!(
        directions,
        vec![
            ("BTC".to_string(), "LTC".to_string()),
            ("LTC".to_string(), "BTC".to_string()),
        ]
    );
}

#[tokio::test]
async fn routes_outstanding_funds_to_each_leg() {
    let fx = Fixture::new();
    let result = fx.aggregator().get_trading_capacities(MARKET).await.unwrap();

    let base = result.base_symbol_capacities.capacities().expect("base ok");
    assert_eq!(base.symbol, "BTC");
    assert_eq!(base.outstanding_send_capacity.to_string(), "0.00001");
    assert_eq!(base.outstanding_receive_capacity.to_string(), "0.00002");

    let counter = result.counter_symbol_capacities.capacities().expect("counter ok");
    assert_eq!(counter.symbol, "LTC");
    assert_eq!(counter.outstanding_send_capacity.to_string(), "0.00003");
    assert_eq!(counter.outstanding_receive_capacity.to_string(), "0.00004");

    // 500 - 3000 and 1000 - 4000 quanta: over-committed, reported as-is.
    assert_eq!(counter.available_send_capacity.to_string(), "-0.000025");
    assert_eq!(counter.available_receive_capacity.to_string(), "-0.00003");

    assert_eq!(fx.btc.open_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(fx.ltc.pending_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn base_engine_failure_does_not_affect_counter_leg() {
    let mut fx = Fixture::new();
    fx.btc = Arc::new(MockEngine::failing("connection refused"));

    let result = fx.aggregator().get_trading_capacities(MARKET).await.unwrap();

    assert_eq!(
        result.base_symbol_capacities,
        CapacityReport::failed("BTC", "connection refused")
    );
    assert_eq!(result.counter_symbol_capacities.status(), CapacityStatus::Ok);
    assert_eq!(result.counter_symbol_capacities.symbol(), "LTC");
}

#[tokio::test]
async fn counter_engine_failure_does_not_affect_base_leg() {
    let mut fx = Fixture::new();
    fx.ltc = Arc::new(MockEngine::failing("Something Failed"));

    let result = fx.aggregator().get_trading_capacities(MARKET).await.unwrap();

    assert_eq!(result.base_symbol_capacities.status(), CapacityStatus::Ok);
    assert_eq!(result.counter_symbol_capacities.error(), Some("Something Failed"));
}

#[tokio::test]
async fn both_legs_may_fail_and_the_result_is_still_complete() {
    let mut fx = Fixture::new();
    fx.btc = Arc::new(MockEngine::failing("btc down"));
    fx.ltc = Arc::new(MockEngine::failing("ltc down"));

    let result = fx.aggregator().get_trading_capacities(MARKET).await.unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["baseSymbolCapacities"]["status"], "FAILED");
    assert_eq!(json["baseSymbolCapacities"]["error"], "btc down");
    assert_eq!(json["counterSymbolCapacities"]["status"], "FAILED");
    assert_eq!(json["counterSymbolCapacities"]["error"], "ltc down");
}

#[tokio::test]
async fn committed_funds_failure_aborts_the_request() {
    let mut fx = Fixture::new();
    fx.funds = Arc::new(RecordingFunds::failing("order worker unavailable"));

    let err = fx.aggregator().get_trading_capacities(MARKET).await.unwrap_err();

    assert!(matches!(err, BrokerError::CommittedFundsQueryFailed(_)));
    assert!(err.to_string().contains("order worker unavailable"));
    assert_eq!(fx.btc.calls() + fx.ltc.calls(), 0);
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let fx = Fixture::new();
    let aggregator = fx.aggregator();

    let first = aggregator.get_trading_capacities(MARKET).await.unwrap();
    let second = aggregator.get_trading_capacities(MARKET).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn legs_are_queried_concurrently() {
    // Each engine's open-channel query blocks until the other one has started.
    let barrier = Arc::new(Barrier::new(2));
    let mut btc = MockEngine::standard();
    btc.rendezvous = Some(Arc::clone(&barrier));
    let mut ltc = MockEngine::standard();
    ltc.rendezvous = Some(barrier);

    let mut fx = Fixture::new();
    fx.btc = Arc::new(btc);
    fx.ltc = Arc::new(ltc);

    let result = fx.aggregator().get_trading_capacities(MARKET).await.unwrap();

    assert_eq!(result.base_symbol_capacities.status(), CapacityStatus::Ok);
    assert_eq!(result.counter_symbol_capacities.status(), CapacityStatus::Ok);
}

#[tokio::test]
async fn negative_committed_funds_abort_the_request() {
    let mut fx = Fixture::new();
    fx.funds = Arc::new(
        RecordingFunds::new()
            .with(
                FundsDirection::new("BTC", "LTC"),
                CommittedFunds::new(dec!(2000), dec!(3000)),
            )
            .with(
                FundsDirection::new("LTC", "BTC"),
                CommittedFunds::new(dec!(4000), dec!(-500)),
            ),
    );

    let err = fx.aggregator().get_trading_capacities(MARKET).await.unwrap_err();

    assert!(matches!(err, BrokerError::CommittedFundsQueryFailed(_)));
    assert!(err.to_string().contains("outbound amount -500 is negative"));
    assert_eq!(fx.btc.calls() + fx.ltc.calls(), 0);
}
