//! Payment-channel engine interface.
//!
//! One engine serves exactly one asset. Engines are registered at startup
//! and shared read-only by every capacity query.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::StaticEngine;

/// Local/remote split of channel funds, in quantum units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBalance {
    pub local_balance: u64,
    pub remote_balance: u64,
}

impl ChannelBalance {
    pub fn new(local_balance: u64, remote_balance: u64) -> Self {
        Self {
            local_balance,
            remote_balance,
        }
    }
}

/// Balances of all open channels, split by whether they can route right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenChannelCapacities {
    pub active: ChannelBalance,
    pub inactive: ChannelBalance,
}

/// Abstraction over a payment-channel client for a single asset.
///
/// Implementations own transport and error formats; failures are surfaced
/// as `anyhow` errors whose message is shown to the caller verbatim.
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    async fn get_open_channel_capacities(&self) -> anyhow::Result<OpenChannelCapacities>;

    async fn get_pending_channel_capacities(&self) -> anyhow::Result<ChannelBalance>;

    /// Number of quantum units in one display unit (e.g. satoshis per BTC).
    fn quantums_per_common(&self) -> u64;
}

/// Symbol → engine mapping, built once at startup.
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn Engine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, symbol: impl Into<String>, engine: Arc<dyn Engine>) {
        self.engines.insert(symbol.into(), engine);
    }

    pub fn with(mut self, symbol: impl Into<String>, engine: Arc<dyn Engine>) -> Self {
        self.register(symbol, engine);
        self
    }

    pub fn lookup(&self, symbol: &str) -> Option<Arc<dyn Engine>> {
        self.engines.get(symbol).cloned()
    }
}
