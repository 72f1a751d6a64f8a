use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityStatus {
    Ok,
    Failed,
}

/// Capacities of one asset, all in display units.
///
/// `available_*` may be negative when open orders commit more than the
/// active channels hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacities {
    pub symbol: String,
    pub available_send_capacity: Decimal,
    pub available_receive_capacity: Decimal,
    pub inactive_send_capacity: Decimal,
    pub inactive_receive_capacity: Decimal,
    pub pending_send_capacity: Decimal,
    pub pending_receive_capacity: Decimal,
    pub outstanding_send_capacity: Decimal,
    pub outstanding_receive_capacity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCapacities {
    pub symbol: String,
    pub error: String,
}

/// Per-asset outcome. Serialized with a `status` of `OK` or `FAILED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CapacityReport {
    #[serde(rename = "OK")]
    Ok(Capacities),

    #[serde(rename = "FAILED")]
    Failed(FailedCapacities),
}

impl CapacityReport {
    pub fn failed(symbol: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failed(FailedCapacities {
            symbol: symbol.into(),
            error: error.into(),
        })
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Ok(c) => &c.symbol,
            Self::Failed(f) => &f.symbol,
        }
    }

    pub fn status(&self) -> CapacityStatus {
        match self {
            Self::Ok(_) => CapacityStatus::Ok,
            Self::Failed(_) => CapacityStatus::Failed,
        }
    }

    pub fn capacities(&self) -> Option<&Capacities> {
        match self {
            Self::Ok(c) => Some(c),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(f) => Some(&f.error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingCapacitiesResult {
    pub base_symbol_capacities: CapacityReport,
    pub counter_symbol_capacities: CapacityReport,
}
