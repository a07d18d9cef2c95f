use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::config::Config;
use crate::core::sessions::default_sessions;
use crate::models::TradeType;
use crate::trading::trade_form::TradeForm;
use crate::trading::trade_record::{TradeId, TradeRecord};

/// A UTC instant on 2024-01-15 at the given wall-clock time.
pub fn utc_at(hour: u32, minute: u32) -> DateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap();
    Utc.from_utc_datetime(&naive)
}

pub fn make_trade(date: &str, asset: &str, result_euro: f64) -> TradeRecord {
    TradeRecord {
        id: TradeId::generate(),
        date: date.parse().unwrap(),
        asset: asset.to_string(),
        trade_type: TradeType::Buy,
        setup: String::new(),
        entry_price: 1.1050,
        stop_loss: 1.1030,
        take_profit: 1.1090,
        rrr: "1:2".to_string(),
        position_size: 0.5,
        result_euro,
        result_percentage: result_euro / 100.0,
        comment: String::new(),
        is_draft: false,
        timestamp: utc_at(12, 0),
    }
}

pub fn make_trades(pnls: &[f64]) -> Vec<TradeRecord> {
    pnls.iter()
        .enumerate()
        .map(|(i, &p)| make_trade(&format!("2024-01-{:02}", i + 1), "EURUSD", p))
        .collect()
}

pub fn sample_form() -> TradeForm {
    TradeForm {
        date: NaiveDate::from_ymd_opt(2024, 2, 12),
        asset: "EURUSD".to_string(),
        custom_asset: String::new(),
        trade_type: TradeType::Buy,
        setup: "London breakout".to_string(),
        entry_price: Some(1.0780),
        stop_loss: Some(1.0760),
        take_profit: Some(1.0820),
        rrr: "1:2".to_string(),
        position_size: Some(0.25),
        result_euro: Some(50.0),
        result_percentage: Some(0.5),
        comment: String::new(),
    }
}

pub fn default_test_config() -> Config {
    Config {
        journal_dir: std::env::temp_dir()
            .join(format!("pip_journal_test_{}", std::process::id()))
            .to_string_lossy()
            .to_string(),
        cloud_backend_url: "http://127.0.0.1:9".to_string(),
        default_capital: 1000.0,
        default_risk_pct: 1.0,
        default_instrument: "EURUSD".to_string(),
        sessions: default_sessions(),
        display_tz: "UTC".to_string(),
        log_level: "INFO".to_string(),
    }
}
