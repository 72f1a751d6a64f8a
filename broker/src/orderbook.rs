//! Order books tracked by this broker.
//!
//! Capacity queries only check that a market is tracked. The market watch
//! handler additionally subscribes to the book's live stream.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::market::Market;

/// Raw change on an order book store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Put { key: String, value: String },
    Del { key: String },
}

pub trait OrderBookStore: Send + Sync + 'static {
    /// Live stream of changes made after the call.
    fn live_stream(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Store that only broadcasts; nothing is retained.
pub struct MemoryOrderBookStore {
    tx: broadcast::Sender<StoreEvent>,
}

impl MemoryOrderBookStore {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to current subscribers. Returns how many received it.
    pub fn publish(&self, event: StoreEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl OrderBookStore for MemoryOrderBookStore {
    fn live_stream(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

#[derive(Clone)]
pub struct OrderBook {
    pub market: Market,
    pub store: Arc<dyn OrderBookStore>,
}

/// Market id → order book, built once at startup.
#[derive(Clone, Default)]
pub struct OrderBookRegistry {
    books: HashMap<String, OrderBook>,
}

impl OrderBookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, market: Market, store: Arc<dyn OrderBookStore>) {
        self.books.insert(market.id(), OrderBook { market, store });
    }

    pub fn with(mut self, market: Market, store: Arc<dyn OrderBookStore>) -> Self {
        self.register(market, store);
        self
    }

    pub fn lookup(&self, market: &str) -> Option<&OrderBook> {
        self.books.get(market)
    }

    pub fn contains(&self, market: &str) -> bool {
        self.books.contains_key(market)
    }
}
