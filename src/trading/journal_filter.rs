use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::TradeType;
use crate::trading::trade_record::TradeRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Timestamp,
    Date,
    ResultEuro,
    ResultPercentage,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "timestamp" => Ok(SortKey::Timestamp),
            "date" => Ok(SortKey::Date),
            "resulteuro" | "result_euro" | "pnl" => Ok(SortKey::ResultEuro),
            "resultpercentage" | "result_percentage" | "pct" => Ok(SortKey::ResultPercentage),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalFilter {
    pub asset: Option<String>,
    pub trade_type: Option<TradeType>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl JournalFilter {
    fn matches(&self, t: &TradeRecord) -> bool {
        let asset_ok = match self.asset.as_deref() {
            Some(a) if !a.is_empty() => t.asset == a,
            _ => true,
        };
        let type_ok = self.trade_type.map_or(true, |tt| t.trade_type == tt);
        asset_ok && type_ok
    }
}

fn compare(a: &TradeRecord, b: &TradeRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::ResultEuro => a.result_euro.total_cmp(&b.result_euro),
        SortKey::ResultPercentage => a.result_percentage.total_cmp(&b.result_percentage),
    }
}

/// The journal list view: drafts included, filtered then sorted.
pub fn filter_and_sort<'a>(
    trades: &'a [TradeRecord],
    filter: &JournalFilter,
) -> Vec<&'a TradeRecord> {
    let mut out: Vec<&TradeRecord> = trades.iter().filter(|t| filter.matches(t)).collect();
    out.sort_by(|a, b| {
        let ord = compare(a, b, filter.sort_by);
        match filter.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_trade;
    use chrono::Duration;

    fn journal() -> Vec<TradeRecord> {
        let mut trades = vec![
            make_trade("2024-01-03", "EURUSD", 10.0),
            make_trade("2024-01-01", "DAX40", -20.0),
            make_trade("2024-01-02", "EURUSD", 35.0),
        ];
        trades[1].trade_type = TradeType::Sell;
        trades[2].is_draft = true;
        for (i, t) in trades.iter_mut().enumerate() {
            t.timestamp = t.timestamp + Duration::minutes(i as i64);
            t.result_percentage = t.result_euro / 10.0;
        }
        trades
    }

    #[test]
    fn default_is_newest_first_including_drafts() {
        let trades = journal();
        let out = filter_and_sort(&trades, &JournalFilter::default());
        assert_eq!(out.len(), 3);
        assert!(out[0].timestamp >= out[1].timestamp);
        assert!(out[1].timestamp >= out[2].timestamp);
        assert!(out.iter().any(|t| t.is_draft));
    }

    #[test]
    fn filters_by_asset_and_type() {
        let trades = journal();
        let f = JournalFilter {
            asset: Some("EURUSD".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&trades, &f).len(), 2);

        let f = JournalFilter {
            trade_type: Some(TradeType::Sell),
            ..Default::default()
        };
        let out = filter_and_sort(&trades, &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].asset, "DAX40");

        let f = JournalFilter {
            asset: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&trades, &f).len(), 3);
    }

    #[test]
    fn sorts_by_numeric_and_date_keys() {
        let trades = journal();
        let f = JournalFilter {
            sort_by: SortKey::ResultEuro,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let pnl: Vec<f64> = filter_and_sort(&trades, &f).iter().map(|t| t.result_euro).collect();
        assert_eq!(pnl, vec![-20.0, 10.0, 35.0]);

        let f = JournalFilter {
            sort_by: SortKey::Date,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let dates: Vec<String> = filter_and_sort(&trades, &f)
            .iter()
            .map(|t| t.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);

        let f = JournalFilter {
            sort_by: SortKey::ResultPercentage,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&trades, &f)[0].result_percentage, 3.5);
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!("pnl".parse::<SortKey>().unwrap(), SortKey::ResultEuro);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("size".parse::<SortKey>().is_err());
    }
}
