use serde::{Deserialize, Serialize};
use std::fmt;

/// Security type code for exchange-listed futures
pub const SECURITY_TYPE_FUTURE: &str = "FUT";

/// An exchange-listed instrument as it is addressed on the wire.
///
/// Immutable once constructed; the strategy supplies one per subscription
/// or order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    symbol: String,
    maturity_month_year: String,
    exchange_code: String,
    security_type: String,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        maturity_month_year: impl Into<String>,
        exchange_code: impl Into<String>,
        security_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            maturity_month_year: maturity_month_year.into(),
            exchange_code: exchange_code.into(),
            security_type: security_type.into(),
        }
    }

    /// Futures contract listed on `exchange_code` (e.g. `CME`)
    pub fn future(
        symbol: impl Into<String>,
        maturity_month_year: impl Into<String>,
        exchange_code: impl Into<String>,
    ) -> Self {
        Self::new(
            symbol,
            maturity_month_year,
            exchange_code,
            SECURITY_TYPE_FUTURE,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Contract month in `YYYYMM` form
    pub fn maturity_month_year(&self) -> &str {
        &self.maturity_month_year
    }

    pub fn exchange_code(&self) -> &str {
        &self.exchange_code
    }

    pub fn security_type(&self) -> &str {
        &self.security_type
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}/{})",
            self.symbol, self.maturity_month_year, self.exchange_code, self.security_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_constructor() {
        let instrument = Instrument::future("ES", "202612", "CME");
        assert_eq!(instrument.symbol(), "ES");
        assert_eq!(instrument.maturity_month_year(), "202612");
        assert_eq!(instrument.exchange_code(), "CME");
        assert_eq!(instrument.security_type(), "FUT");
        assert_eq!(instrument.to_string(), "ES 202612 (CME/FUT)");
    }
}
