pub mod journal_store;
pub mod storage;
pub mod transfer;

pub use journal_store::{JournalStore, GOAL_KEY, TRADES_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
