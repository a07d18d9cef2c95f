use serde::Serialize;

/// Instrument key that skips the lookup table; the caller supplies the pip value.
pub const CUSTOM_INSTRUMENT: &str = "custom";

pub const DEFAULT_PIP_DECIMAL: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstrumentSpec {
    pub symbol: &'static str,
    pub name: &'static str,
    /// Value of one pip per standard lot, in account currency.
    pub pip_value: f64,
    /// Price increment that counts as one pip.
    pub pip_decimal: f64,
}

const fn spec(
    symbol: &'static str,
    name: &'static str,
    pip_value: f64,
    pip_decimal: f64,
) -> InstrumentSpec {
    InstrumentSpec {
        symbol,
        name,
        pip_value,
        pip_decimal,
    }
}

pub const INSTRUMENTS: &[InstrumentSpec] = &[
    spec("EURUSD", "EUR/USD", 10.0, 0.0001),
    spec("GBPUSD", "GBP/USD", 10.0, 0.0001),
    spec("USDJPY", "USD/JPY", 8.5, 0.01),
    spec("AUDUSD", "AUD/USD", 10.0, 0.0001),
    spec("USDCAD", "USD/CAD", 10.0, 0.0001),
    spec("USDCHF", "USD/CHF", 10.0, 0.0001),
    spec("NZDUSD", "NZD/USD", 10.0, 0.0001),
    spec("EURJPY", "EUR/JPY", 8.5, 0.01),
    spec("GBPJPY", "GBP/JPY", 8.5, 0.01),
    spec("XAUUSD", "Gold (XAU/USD)", 10.0, 0.1),
    spec("DAX40", "DAX 40", 1.0, 1.0),
    spec("SP500", "S&P 500", 1.0, 1.0),
    spec("NASDAQ100", "NASDAQ 100", 1.0, 1.0),
    spec("CAC40", "CAC 40", 1.0, 1.0),
];

pub fn lookup(symbol: &str) -> Option<&'static InstrumentSpec> {
    INSTRUMENTS
        .iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(symbol.trim()))
}

pub fn is_known(symbol: &str) -> bool {
    lookup(symbol).is_some()
}
