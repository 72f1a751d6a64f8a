use std::sync::Arc;

use broker::{
    config::BrokerConfig,
    engine::{ChannelBalance, Engine, EngineRegistry, OpenChannelCapacities, StaticEngine},
    funds::{CommittedFunds, FundsDirection, StaticCommittedFunds},
    market::Market,
    orderbook::{MemoryOrderBookStore, OrderBookRegistry},
    rpc::{BrokerService, StaticTradeHistory},
};
use common::logger::init_logger;

const SATOSHIS_PER_BTC: u64 = 100_000_000;
const LITOSHIS_PER_LTC: u64 = 100_000_000;

/// Demo registries: one BTC/LTC market backed by in-memory engines.
fn demo_service(cfg: &BrokerConfig) -> anyhow::Result<BrokerService> {
    let btc = StaticEngine::new(SATOSHIS_PER_BTC).with_balances(
        OpenChannelCapacities {
            active: ChannelBalance::new(25_000_000, 10_000_000),
            inactive: ChannelBalance::new(1_000_000, 0),
        },
        ChannelBalance::new(5_000_000, 0),
    );
    let ltc = StaticEngine::new(LITOSHIS_PER_LTC).with_balances(
        OpenChannelCapacities {
            active: ChannelBalance::new(900_000_000, 450_000_000),
            inactive: ChannelBalance::default(),
        },
        ChannelBalance::default(),
    );

    let engines = EngineRegistry::new()
        .with("BTC", Arc::new(btc) as Arc<dyn Engine>)
        .with("LTC", Arc::new(ltc) as Arc<dyn Engine>);

    let market = Market::parse("BTC/LTC")?;
    let orderbooks = OrderBookRegistry::new()
        .with(market, Arc::new(MemoryOrderBookStore::new(cfg.watch_buffer)));

    let funds = StaticCommittedFunds::new()
        .with(
            FundsDirection::new("BTC", "LTC"),
            CommittedFunds::parse("2000000", "150000000")?,
        )
        .with(
            FundsDirection::new("LTC", "BTC"),
            CommittedFunds::parse("0", "3000000")?,
        );

    Ok(BrokerService::new(
        cfg,
        Arc::new(engines),
        Arc::new(orderbooks),
        Arc::new(funds),
        Arc::new(StaticTradeHistory::default()),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = BrokerConfig::from_env();
    init_logger("broker", cfg.log_json);

    tracing::info!(?cfg, "Starting broker capacity service...");

    let market = std::env::args().nth(1).unwrap_or_else(|| "BTC/LTC".to_string());

    let service = demo_service(&cfg)?;
    let capacities = service.get_trading_capacities(&market).await?;

    println!("{}", serde_json::to_string_pretty(&capacities)?);

    Ok(())
}
