use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

pub const PAIR_SEPARATOR: char = '/';

/// Ordered pair of asset symbols, written `BASE/COUNTER` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    pub base: String,
    pub counter: String,
}

impl Market {
    pub fn new(base: impl Into<String>, counter: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            counter: counter.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, BrokerError> {
        let mut parts = raw.split(PAIR_SEPARATOR);
        let (Some(base), Some(counter), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(BrokerError::InvalidMarket(format!(
                "{raw} must be of the form BASE{PAIR_SEPARATOR}COUNTER"
            )));
        };

        if base.is_empty() || counter.is_empty() {
            return Err(BrokerError::InvalidMarket(format!(
                "{raw} has an empty symbol"
            )));
        }
        if base == counter {
            return Err(BrokerError::InvalidMarket(format!(
                "{raw} trades {base} against itself"
            )));
        }

        Ok(Self::new(base, counter))
    }

    pub fn id(&self) -> String {
        format!("{}{}{}", self.base, PAIR_SEPARATOR, self.counter)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, PAIR_SEPARATOR, self.counter)
    }
}
