use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::TradeType;

/// Opaque identity of a journal entry, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TradeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TradeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(default = "TradeId::generate")]
    pub id: TradeId,
    pub date: NaiveDate,
    pub asset: String,
    pub trade_type: TradeType,
    #[serde(default)]
    pub setup: String,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    #[serde(default)]
    pub rrr: String,
    pub position_size: f64,
    #[serde(default)]
    pub result_euro: f64,
    #[serde(default)]
    pub result_percentage: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "is_draft", default)]
    pub is_draft: bool,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.result_euro > 0.0
    }

    pub fn is_closed(&self) -> bool {
        !self.is_draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_legacy_document_without_id() {
        let json = r#"{
            "date": "2024-03-01",
            "asset": "EURUSD",
            "tradeType": "Buy",
            "setup": "breakout",
            "entryPrice": 1.105,
            "stopLoss": 1.103,
            "takeProfit": 1.109,
            "rrr": "1:2",
            "positionSize": 0.5,
            "resultEuro": 40,
            "resultPercentage": 0.4,
            "comment": "",
            "is_draft": false,
            "timestamp": "2024-03-01T09:30:00.000Z"
        }"#;
        let r: TradeRecord = serde_json::from_str(json).unwrap();
        assert!(!r.id.as_str().is_empty());
        assert_eq!(r.trade_type, TradeType::Buy);
        assert_eq!(r.result_euro, 40.0);
        assert!(r.is_win());
        assert!(r.is_closed());
    }

    #[test]
    fn writes_draft_flag_in_snake_case() {
        let json = r#"{
            "date": "2024-03-01", "asset": "DAX40", "tradeType": "Sell",
            "entryPrice": 18000, "stopLoss": 18050, "takeProfit": 17900,
            "positionSize": 1, "is_draft": true,
            "timestamp": "2024-03-01T09:30:00Z"
        }"#;
        let r: TradeRecord = serde_json::from_str(json).unwrap();
        assert!(r.is_draft);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["is_draft"], true);
        assert_eq!(v["tradeType"], "Sell");
        assert!(v.get("entryPrice").is_some());
        assert_eq!(v["setup"], "");
    }
}
