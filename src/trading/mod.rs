pub mod journal_filter;
pub mod report;
pub mod trade_analyzer;
pub mod trade_form;
pub mod trade_record;

pub use journal_filter::{filter_and_sort, JournalFilter, SortKey, SortOrder};
pub use report::JournalReport;
pub use trade_form::TradeForm;
pub use trade_record::{TradeId, TradeRecord};
