//! Relays order book changes of one market to a subscriber.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::BrokerError;
use crate::orderbook::{OrderBookRegistry, StoreEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Bid,
    Ask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Add,
    Delete,
}

/// Value stored for an order in the order book store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    base_amount: String,
    counter_amount: String,
    side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEventOrder {
    pub order_id: String,
    pub base_amount: String,
    pub counter_amount: String,
    pub side: Side,
}

impl MarketEventOrder {
    pub fn from_storage(key: &str, value: &str) -> anyhow::Result<Self> {
        let stored: StoredOrder = serde_json::from_str(value)?;
        Ok(Self {
            order_id: key.to_string(),
            base_amount: stored.base_amount,
            counter_amount: stored.counter_amount,
            side: stored.side,
        })
    }

    pub fn into_market_event(self) -> MarketEvent {
        MarketEvent::Order(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketEvent {
    Order(MarketEventOrder),
    #[serde(rename_all = "camelCase")]
    Removed { order_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchMarketResponse {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub market_event: MarketEvent,
}

/// Translates a store change; `None` when the stored value cannot be read.
pub fn to_response(event: StoreEvent) -> Option<WatchMarketResponse> {
    match event {
        StoreEvent::Put { key, value } => match MarketEventOrder::from_storage(&key, &value) {
            Ok(order) => Some(WatchMarketResponse {
                event_type: EventType::Add,
                market_event: order.into_market_event(),
            }),
            Err(e) => {
                warn!(order_id = %key, error = %e, "skipping unreadable order book entry");
                None
            }
        },
        StoreEvent::Del { key } => Some(WatchMarketResponse {
            event_type: EventType::Delete,
            market_event: MarketEvent::Removed { order_id: key },
        }),
    }
}

/// Starts relaying `market`'s live order book events.
///
/// Dropping the returned receiver cancels the relay. The relay runs as a
/// task on the calling Tokio runtime.
pub async fn watch_market(
    orderbooks: &OrderBookRegistry,
    market: &str,
    buffer: usize,
) -> Result<mpsc::Receiver<WatchMarketResponse>, BrokerError> {
    let book = orderbooks
        .lookup(market)
        .ok_or_else(|| BrokerError::UnknownMarket(market.to_string()))?;

    // Subscribe before spawning so no event published after this call is missed.
    let live = book.store.live_stream();
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let span = info_span!("watch_market", market = %market);

    tokio::spawn(relay(live, tx).instrument(span));

    Ok(rx)
}

async fn relay(
    mut live: broadcast::Receiver<StoreEvent>,
    tx: mpsc::Sender<WatchMarketResponse>,
) {
    info!("market watch started");

    loop {
        tokio::select! {
            _ = tx.closed() => {
                info!("market watch cancelled by subscriber");
                break;
            }
            event = live.recv() => match event {
                Ok(event) => {
                    let Some(response) = to_response(event) else {
                        continue;
                    };
                    debug!(event_type = ?response.event_type, "relaying market event");
                    if tx.send(response).await.is_err() {
                        info!("market watch cancelled by subscriber");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "market watch lagged behind order book store");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("order book store closed its live stream");
                    break;
                }
            }
        }
    }
}
