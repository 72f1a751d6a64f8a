use std::time::Duration;

use tracing::warn;

#[derive(Clone, Debug)]
pub struct BrokerConfig {
    /// Upper bound on a single engine balance query.
    ///
    /// An engine that does not answer in time is reported as `FAILED`
    /// for its asset; the other leg of the market is unaffected.
    pub engine_query_timeout_ms: u64,

    /// Engine queries slower than this are logged on the `performance` target.
    pub slow_query_warn_ms: u64,

    /// Per-subscriber buffer of market watch streams.
    ///
    /// Once full, the relay waits for the subscriber before reading
    /// further order book events.
    pub watch_buffer: usize,

    /// Emit JSON logs instead of the pretty formatter.
    pub log_json: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            engine_query_timeout_ms: 5_000,
            slow_query_warn_ms: 500,
            watch_buffer: 64,
            log_json: false,
        }
    }
}

impl BrokerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparseable values
    /// fall back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_json = lookup("BROKER_LOG_JSON")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
            || lookup("APP_ENV").as_deref() == Some("production");

        Self {
            engine_query_timeout_ms: parse_or(
                &lookup,
                "BROKER_ENGINE_QUERY_TIMEOUT_MS",
                defaults.engine_query_timeout_ms,
            ),
            slow_query_warn_ms: parse_or(
                &lookup,
                "BROKER_SLOW_QUERY_WARN_MS",
                defaults.slow_query_warn_ms,
            ),
            watch_buffer: parse_or(&lookup, "BROKER_WATCH_BUFFER", defaults.watch_buffer),
            log_json,
        }
    }

    pub fn engine_query_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_query_timeout_ms)
    }

    pub fn slow_query_warn(&self) -> Duration {
        Duration::from_millis(self.slow_query_warn_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = %raw, %default, "invalid config value; using default");
                default
            }
        },
    }
}
