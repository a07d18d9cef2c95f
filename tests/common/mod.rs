use chrono::NaiveDate;
use pip_journal::models::TradeType;
use pip_journal::trading::TradeForm;

/// A complete journal form for `asset` with the given result.
pub fn make_form(date: &str, asset: &str, side: TradeType, pnl: f64) -> TradeForm {
    TradeForm {
        date: Some(date.parse::<NaiveDate>().unwrap()),
        asset: asset.to_string(),
        custom_asset: String::new(),
        trade_type: side,
        setup: "pullback".to_string(),
        entry_price: Some(1.2650),
        stop_loss: Some(1.2620),
        take_profit: Some(1.2710),
        rrr: "1:2".to_string(),
        position_size: Some(0.3),
        result_euro: Some(pnl),
        result_percentage: Some(pnl / 100.0),
        comment: String::new(),
    }
}
