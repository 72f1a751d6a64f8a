//! Funds already committed to outstanding orders.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, anyhow, ensure};
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::market::Market;

/// Trading direction: which asset the broker receives and which it sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FundsDirection {
    pub inbound_symbol: String,
    pub outbound_symbol: String,
}

impl FundsDirection {
    pub fn new(inbound_symbol: impl Into<String>, outbound_symbol: impl Into<String>) -> Self {
        Self {
            inbound_symbol: inbound_symbol.into(),
            outbound_symbol: outbound_symbol.into(),
        }
    }
}

/// Quantum amounts reserved by open orders in one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommittedFunds {
    pub inbound: Decimal,
    pub outbound: Decimal,
}

impl CommittedFunds {
    pub fn new(inbound: Decimal, outbound: Decimal) -> Self {
        Self { inbound, outbound }
    }

    /// Parses the decimal strings produced by the order worker.
    pub fn parse(inbound: &str, outbound: &str) -> anyhow::Result<Self> {
        let inbound = Decimal::from_str(inbound)
            .with_context(|| format!("inbound amount {inbound:?} is not a decimal"))?;
        let outbound = Decimal::from_str(outbound)
            .with_context(|| format!("outbound amount {outbound:?} is not a decimal"))?;
        let funds = Self { inbound, outbound };
        funds.validate()?;
        Ok(funds)
    }

    /// Committed amounts are quantities of quanta and can never be negative.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.inbound.is_sign_negative() || self.inbound.is_zero(),
            "inbound amount {} is negative",
            self.inbound
        );
        ensure!(
            !self.outbound.is_sign_negative() || self.outbound.is_zero(),
            "outbound amount {} is negative",
            self.outbound
        );
        Ok(())
    }
}

#[async_trait]
pub trait CommittedFundsSource: Send + Sync + 'static {
    async fn calculate_active_funds(
        &self,
        market: &Market,
        direction: &FundsDirection,
    ) -> anyhow::Result<CommittedFunds>;
}

/// Fixed committed funds keyed by direction. Unknown directions report zero.
#[derive(Debug, Clone, Default)]
pub struct StaticCommittedFunds {
    funds: HashMap<FundsDirection, CommittedFunds>,
    failure: Option<String>,
}

impl StaticCommittedFunds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, direction: FundsDirection, funds: CommittedFunds) -> Self {
        self.funds.insert(direction, funds);
        self
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            funds: HashMap::new(),
            failure: Some(reason.into()),
        }
    }
}

#[async_trait]
impl CommittedFundsSource for StaticCommittedFunds {
    async fn calculate_active_funds(
        &self,
        _market: &Market,
        direction: &FundsDirection,
    ) -> anyhow::Result<CommittedFunds> {
        if let Some(reason) = &self.failure {
            return Err(anyhow!("{reason}"));
        }
        Ok(self.funds.get(direction).copied().unwrap_or_default())
    }
}
