use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of a logged trade. Serialized as `"Buy"` / `"Sell"` to match
/// journal documents written by earlier versions of the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeType {
    #[default]
    Buy,
    Sell,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "Buy",
            TradeType::Sell => "Sell",
        }
    }
}

impl FromStr for TradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "long" => Ok(TradeType::Buy),
            "sell" | "short" => Ok(TradeType::Sell),
            other => Err(format!("unknown trade type '{}'", other)),
        }
    }
}
