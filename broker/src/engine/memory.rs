use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ChannelBalance, Engine, OpenChannelCapacities};

#[derive(Debug, Clone, Default)]
struct Balances {
    open: OpenChannelCapacities,
    pending: ChannelBalance,
    offline: Option<String>,
}

/// In-memory engine with settable balances.
///
/// Used by the demo binary and by tests that need a well-behaved engine.
/// `set_offline` makes every query fail with the given message until
/// `set_online` is called.
pub struct StaticEngine {
    quantums_per_common: u64,
    balances: RwLock<Balances>,
}

impl StaticEngine {
    pub fn new(quantums_per_common: u64) -> Self {
        Self {
            quantums_per_common,
            balances: RwLock::new(Balances::default()),
        }
    }

    pub fn with_balances(self, open: OpenChannelCapacities, pending: ChannelBalance) -> Self {
        {
            let mut b = self.balances.write();
            b.open = open;
            b.pending = pending;
        }
        self
    }

    pub fn set_open(&self, open: OpenChannelCapacities) {
        self.balances.write().open = open;
    }

    pub fn set_offline(&self, reason: impl Into<String>) {
        self.balances.write().offline = Some(reason.into());
    }

    pub fn set_online(&self) {
        self.balances.write().offline = None;
    }

    fn check_online(&self) -> anyhow::Result<()> {
        match &self.balances.read().offline {
            Some(reason) => Err(anyhow!("{reason}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Engine for StaticEngine {
    async fn get_open_channel_capacities(&self) -> anyhow::Result<OpenChannelCapacities> {
        self.check_online()?;
        Ok(self.balances.read().open)
    }

    async fn get_pending_channel_capacities(&self) -> anyhow::Result<ChannelBalance> {
        self.check_online()?;
        Ok(self.balances.read().pending)
    }

    fn quantums_per_common(&self) -> u64 {
        self.quantums_per_common
    }
}
