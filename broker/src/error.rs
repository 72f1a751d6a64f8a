use thiserror::Error;

/// Request-level failures. Any of these aborts the whole call.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("invalid market: {0}")]
    InvalidMarket(String),

    #[error("{0} is not being tracked as a market.")]
    UnknownMarket(String),

    #[error("No engine available for {0}")]
    NoEngineAvailable(String),

    #[error("committed funds query failed: {0}")]
    CommittedFundsQueryFailed(#[source] anyhow::Error),

    #[error("{0}")]
    TradeHistoryFailed(String),
}

/// Failure of a single engine balance query.
///
/// Never escapes the capacity calculator: it is rendered into the
/// `error` field of a failed capacity report.
#[derive(Error, Debug)]
pub enum EngineQueryError {
    #[error("{symbol} engine query timed out after {timeout_ms}ms")]
    Timeout { symbol: String, timeout_ms: u64 },

    #[error(transparent)]
    Failed(#[from] anyhow::Error),

    #[error("{symbol} capacity out of range: {balance} minus committed {committed}")]
    CapacityOutOfRange {
        symbol: String,
        balance: u64,
        committed: rust_decimal::Decimal,
    },

    #[error("{symbol} engine reported an invalid quantumsPerCommon of {value}")]
    InvalidQuantumsPerCommon { symbol: String, value: u64 },
}
