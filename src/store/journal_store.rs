use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{JournalError, JournalResult};
use crate::models::PerformanceGoal;
use crate::store::storage::Storage;
use crate::trading::trade_form::TradeForm;
use crate::trading::trade_record::{TradeId, TradeRecord};

pub const TRADES_KEY: &str = "tradingJournalEntries";
pub const GOAL_KEY: &str = "tradingPerformanceGoal";

type Listener = Box<dyn Fn(&[TradeRecord])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Document {
    Trades,
    Goal,
}

/// Owns the journal and the performance goal. Every mutation is committed
/// to storage before it becomes visible; a failed commit rolls it back.
pub struct JournalStore<S: Storage> {
    storage: S,
    trades: Vec<TradeRecord>,
    goal: PerformanceGoal,
    listeners: Vec<Listener>,
}

impl<S: Storage> JournalStore<S> {
    pub fn open(storage: S) -> JournalResult<Self> {
        let (mut trades, mut needs_write) = match storage.get(TRADES_KEY)? {
            Some(json) => read_trades(&json)?,
            None => (Vec::new(), false),
        };
        let goal = match storage.get(GOAL_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => PerformanceGoal::default(),
        };
        needs_write |= ensure_unique_ids(&mut trades);

        let mut store = Self {
            storage,
            trades,
            goal,
            listeners: Vec::new(),
        };
        if needs_write {
            store.commit(Document::Trades)?;
            info!("Assigned ids to journal entries stored without one");
        }

        info!("Journal opened with {} entries", store.trades.len());
        Ok(store)
    }

    pub fn get(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn goal(&self) -> PerformanceGoal {
        self.goal
    }

    pub fn find(&self, id: &TradeId) -> Option<&TradeRecord> {
        self.trades.iter().find(|t| &t.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn subscribe(&mut self, listener: impl Fn(&[TradeRecord]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn replace(&mut self, trades: Vec<TradeRecord>) -> JournalResult<()> {
        let count = trades.len();
        self.apply(Document::Trades, move |current, _| {
            *current = trades;
            ensure_unique_ids(current);
            Ok(())
        })?;
        info!("Journal replaced with {} entries", count);
        Ok(())
    }

    pub fn clear(&mut self) -> JournalResult<()> {
        self.replace(Vec::new())
    }

    pub fn add(&mut self, form: TradeForm, is_draft: bool) -> JournalResult<TradeId> {
        let record = form.into_record(TradeId::generate(), Utc::now(), is_draft)?;
        let id = record.id.clone();
        self.apply(Document::Trades, move |current, _| {
            current.insert(0, record);
            Ok(())
        })?;
        info!("{} {} added", if is_draft { "Draft" } else { "Trade" }, id);
        Ok(id)
    }

    /// Overwrites a trade's fields from `form`. The id and the creation
    /// timestamp are kept.
    pub fn update(&mut self, id: &TradeId, form: TradeForm, is_draft: bool) -> JournalResult<()> {
        let idx = self.position_of(id)?;
        let prev = &self.trades[idx];
        let record = form.into_record(prev.id.clone(), prev.timestamp, is_draft)?;
        self.apply(Document::Trades, move |current, _| {
            current[idx] = record;
            Ok(())
        })?;
        info!("Trade {} updated", id);
        Ok(())
    }

    pub fn delete(&mut self, id: &TradeId) -> JournalResult<TradeRecord> {
        let idx = self.position_of(id)?;
        let removed = self.trades[idx].clone();
        self.apply(Document::Trades, move |current, _| {
            current.remove(idx);
            Ok(())
        })?;
        info!("Trade {} deleted", id);
        Ok(removed)
    }

    pub fn set_goal(&mut self, goal: PerformanceGoal) -> JournalResult<()> {
        if !goal.is_valid() {
            return Err(JournalError::InvalidInput(
                "goal values must be numbers".to_string(),
            ));
        }
        self.apply(Document::Goal, move |_, current| {
            *current = goal;
            Ok(())
        })
    }

    fn position_of(&self, id: &TradeId) -> JournalResult<usize> {
        self.trades
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| JournalError::NotFound(id.to_string()))
    }

    fn apply<F>(&mut self, touched: Document, mutate: F) -> JournalResult<()>
    where
        F: FnOnce(&mut Vec<TradeRecord>, &mut PerformanceGoal) -> JournalResult<()>,
    {
        let prev_trades = self.trades.clone();
        let prev_goal = self.goal;

        let result = mutate(&mut self.trades, &mut self.goal).and_then(|_| self.commit(touched));
        if let Err(e) = result {
            warn!("Journal change rolled back: {}", e);
            self.trades = prev_trades;
            self.goal = prev_goal;
            return Err(e);
        }

        for listener in &self.listeners {
            listener(&self.trades);
        }
        Ok(())
    }

    // Writes the touched document only.
    fn commit(&mut self, touched: Document) -> JournalResult<()> {
        match touched {
            Document::Trades => {
                let trades = serde_json::to_string(&self.trades)?;
                self.storage.set(TRADES_KEY, &trades)?;
                debug!("Committed {} entries", self.trades.len());
            }
            Document::Goal => {
                let goal = serde_json::to_string(&self.goal)?;
                self.storage.set(GOAL_KEY, &goal)?;
                debug!("Committed performance goal");
            }
        }
        Ok(())
    }
}

/// Parses the trades document. The flag is set when some entry had no id
/// and was given one, which must be written back to stay stable.
fn read_trades(json: &str) -> JournalResult<(Vec<TradeRecord>, bool)> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let missing_ids = entries.iter().any(|e| e.get("id").is_none());
    let trades = serde_json::from_value(serde_json::Value::Array(entries))?;
    Ok((trades, missing_ids))
}

/// Gives a fresh id to any record whose id repeats an earlier one.
/// Returns whether anything changed.
fn ensure_unique_ids(trades: &mut [TradeRecord]) -> bool {
    let mut seen = HashSet::new();
    let mut changed = false;
    for t in trades.iter_mut() {
        if !seen.insert(t.id.clone()) {
            t.id = TradeId::generate();
            seen.insert(t.id.clone());
            changed = true;
        }
    }
    changed
}
