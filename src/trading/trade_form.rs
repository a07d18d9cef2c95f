use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};
use crate::models::{instrument, TradeType};
use crate::trading::trade_record::{TradeId, TradeRecord};

pub const OTHER_ASSET: &str = "other";

/// Raw journal-form input. Numeric fields are optional so that a missing
/// value can be reported instead of silently defaulting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeForm {
    pub date: Option<NaiveDate>,
    pub asset: String,
    pub custom_asset: String,
    pub trade_type: TradeType,
    pub setup: String,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub rrr: String,
    pub position_size: Option<f64>,
    pub result_euro: Option<f64>,
    pub result_percentage: Option<f64>,
    pub comment: String,
}

impl TradeForm {
    /// Pre-fills a form from an existing record. Assets outside the
    /// instrument table go through the custom field.
    pub fn from_record(r: &TradeRecord) -> Self {
        let (asset, custom_asset) = if instrument::is_known(&r.asset) {
            (r.asset.clone(), String::new())
        } else {
            (OTHER_ASSET.to_string(), r.asset.clone())
        };

        Self {
            date: Some(r.date),
            asset,
            custom_asset,
            trade_type: r.trade_type,
            setup: r.setup.clone(),
            entry_price: Some(r.entry_price),
            stop_loss: Some(r.stop_loss),
            take_profit: Some(r.take_profit),
            rrr: r.rrr.clone(),
            position_size: Some(r.position_size),
            result_euro: Some(r.result_euro),
            result_percentage: Some(r.result_percentage),
            comment: r.comment.clone(),
        }
    }

    pub fn resolved_asset(&self) -> String {
        if self.asset.trim().eq_ignore_ascii_case(OTHER_ASSET) {
            self.custom_asset.trim().to_uppercase()
        } else {
            self.asset.trim().to_string()
        }
    }

    pub fn into_record(
        self,
        id: TradeId,
        timestamp: DateTime<Utc>,
        is_draft: bool,
    ) -> JournalResult<TradeRecord> {
        let date = self
            .date
            .ok_or_else(|| JournalError::InvalidInput("date is required".to_string()))?;

        let asset = self.resolved_asset();
        if asset.is_empty() {
            return Err(JournalError::InvalidInput("asset is required".to_string()));
        }

        let entry_price = required_positive("entry price", self.entry_price)?;
        let stop_loss = required_positive("stop loss", self.stop_loss)?;
        let take_profit = required_positive("take profit", self.take_profit)?;
        let position_size = required_positive("position size", self.position_size)?;
        let result_euro = optional_finite("result (EUR)", self.result_euro)?;
        let result_percentage = optional_finite("result (%)", self.result_percentage)?;

        Ok(TradeRecord {
            id,
            date,
            asset,
            trade_type: self.trade_type,
            setup: self.setup,
            entry_price,
            stop_loss,
            take_profit,
            rrr: self.rrr,
            position_size,
            result_euro,
            result_percentage,
            comment: self.comment,
            is_draft,
            timestamp,
        })
    }
}

fn required_positive(field: &str, value: Option<f64>) -> JournalResult<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(JournalError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            field, v
        ))),
        None => Err(JournalError::InvalidInput(format!("{} is required", field))),
    }
}

fn optional_finite(field: &str, value: Option<f64>) -> JournalResult<f64> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(JournalError::InvalidInput(format!(
            "{} must be a number, got {}",
            field, v
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_form;

    #[test]
    fn builds_record_from_valid_form() {
        let id = TradeId::generate();
        let r = sample_form().into_record(id.clone(), Utc::now(), false).unwrap();
        assert_eq!(r.id, id);
        assert_eq!(r.asset, "EURUSD");
        assert!(!r.is_draft);
    }

    #[test]
    fn other_asset_uses_uppercased_custom() {
        let mut form = sample_form();
        form.asset = OTHER_ASSET.to_string();
        form.custom_asset = "btcusd".to_string();
        let r = form.into_record(TradeId::generate(), Utc::now(), true).unwrap();
        assert_eq!(r.asset, "BTCUSD");
        assert!(r.is_draft);
    }

    #[test]
    fn other_asset_without_custom_is_rejected() {
        let mut form = sample_form();
        form.asset = OTHER_ASSET.to_string();
        let err = form.into_record(TradeId::generate(), Utc::now(), false);
        assert!(matches!(err, Err(JournalError::InvalidInput(_))));
    }

    #[test]
    fn missing_or_non_positive_prices_are_rejected() {
        let mut form = sample_form();
        form.stop_loss = None;
        assert!(matches!(
            form.into_record(TradeId::generate(), Utc::now(), false),
            Err(JournalError::InvalidInput(_))
        ));

        let mut form = sample_form();
        form.position_size = Some(0.0);
        assert!(matches!(
            form.into_record(TradeId::generate(), Utc::now(), false),
            Err(JournalError::InvalidInput(_))
        ));

        let mut form = sample_form();
        form.date = None;
        assert!(form.into_record(TradeId::generate(), Utc::now(), false).is_err());
    }

    #[test]
    fn results_default_to_zero() {
        let mut form = sample_form();
        form.result_euro = None;
        form.result_percentage = None;
        let r = form.into_record(TradeId::generate(), Utc::now(), false).unwrap();
        assert_eq!(r.result_euro, 0.0);
        assert_eq!(r.result_percentage, 0.0);
    }

    #[test]
    fn from_record_routes_unknown_assets_to_custom() {
        let mut form = sample_form();
        form.asset = OTHER_ASSET.to_string();
        form.custom_asset = "ethusd".to_string();
        let r = form.into_record(TradeId::generate(), Utc::now(), false).unwrap();

        let back = TradeForm::from_record(&r);
        assert_eq!(back.asset, OTHER_ASSET);
        assert_eq!(back.custom_asset, "ETHUSD");
        assert_eq!(back.resolved_asset(), "ETHUSD");
    }
}
