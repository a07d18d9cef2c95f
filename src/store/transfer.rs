use serde_json::Value;

use crate::error::{JournalError, JournalResult};
use crate::trading::trade_record::TradeRecord;

pub const EXPORT_FILE_NAME: &str = "journal_export.json";

pub fn export_json(trades: &[TradeRecord]) -> JournalResult<String> {
    Ok(serde_json::to_string_pretty(trades)?)
}

/// Parses an exported journal. Anything other than an array of trade
/// records is an `ImportFormat` error; nothing is applied here.
pub fn import_json(text: &str) -> JournalResult<Vec<TradeRecord>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| JournalError::ImportFormat(format!("not valid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(JournalError::ImportFormat(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| JournalError::ImportFormat(format!("entry {}: {}", i, e)))
        })
        .collect()
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
