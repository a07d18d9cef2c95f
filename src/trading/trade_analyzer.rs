use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::TradeType;
use crate::trading::trade_record::TradeRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_trades: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub trade_count: usize,
    pub wins: usize,
    pub pnl: f64,
}

impl GroupStats {
    pub fn win_rate(&self) -> f64 {
        if self.trade_count > 0 {
            self.wins as f64 / self.trade_count as f64 * 100.0
        } else {
            0.0
        }
    }
}

fn closed(trades: &[TradeRecord]) -> impl Iterator<Item = &TradeRecord> {
    trades.iter().filter(|t| t.is_closed())
}

/// Headline figures over non-draft trades. Empty input gives all zeros.
pub fn aggregate(trades: &[TradeRecord]) -> SummaryStats {
    let mut total_trades = 0usize;
    let mut wins = 0usize;
    let mut total_pnl = 0.0;
    for t in closed(trades) {
        total_trades += 1;
        total_pnl += t.result_euro;
        if t.is_win() {
            wins += 1;
        }
    }

    let (win_rate, avg_pnl) = if total_trades > 0 {
        (
            wins as f64 / total_trades as f64 * 100.0,
            total_pnl / total_trades as f64,
        )
    } else {
        (0.0, 0.0)
    };

    SummaryStats {
        total_trades,
        win_rate,
        total_pnl,
        avg_pnl,
    }
}

/// Cumulative P&L by trade date. Trades on the same date keep their
/// original relative order.
pub fn equity_curve(trades: &[TradeRecord]) -> Vec<EquityPoint> {
    let mut sorted: Vec<&TradeRecord> = closed(trades).collect();
    sorted.sort_by_key(|t| t.date);

    let mut cumulative = 0.0;
    sorted
        .into_iter()
        .map(|t| {
            cumulative += t.result_euro;
            EquityPoint {
                date: t.date,
                equity: cumulative,
            }
        })
        .collect()
}

pub fn group_by<K, F>(trades: &[TradeRecord], key_fn: F) -> BTreeMap<K, GroupStats>
where
    K: Ord,
    F: Fn(&TradeRecord) -> K,
{
    let mut groups: BTreeMap<K, GroupStats> = BTreeMap::new();
    for t in closed(trades) {
        let entry = groups.entry(key_fn(t)).or_default();
        entry.trade_count += 1;
        entry.pnl += t.result_euro;
        if t.is_win() {
            entry.wins += 1;
        }
    }
    groups
}

pub fn by_asset(trades: &[TradeRecord]) -> BTreeMap<String, GroupStats> {
    group_by(trades, |t| t.asset.clone())
}

pub fn by_trade_type(trades: &[TradeRecord]) -> BTreeMap<TradeType, GroupStats> {
    group_by(trades, |t| t.trade_type)
}

/// Progress towards the P&L target, clamped to [0, 100]. A zero, negative
/// or non-finite target gives 0.
pub fn goal_progress(total_pnl: f64, target_pnl_euro: f64) -> f64 {
    if !target_pnl_euro.is_finite() || target_pnl_euro <= 0.0 || !total_pnl.is_finite() {
        return 0.0;
    }
    (total_pnl / target_pnl_euro * 100.0).clamp(0.0, 100.0)
}

pub fn max_drawdown(curve: &[EquityPoint]) -> f64 {
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for p in curve {
        peak = peak.max(p.equity);
        max_dd = max_dd.max(peak - p.equity);
    }
    max_dd
}

/// Gross profit over gross loss. Infinite with wins and no losses.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = closed(trades)
        .filter(|t| t.result_euro > 0.0)
        .map(|t| t.result_euro)
        .sum();
    let gross_loss: f64 = closed(trades)
        .filter(|t| t.result_euro < 0.0)
        .map(|t| t.result_euro)
        .sum::<f64>()
        .abs();

    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

pub fn best_trade(trades: &[TradeRecord]) -> Option<&TradeRecord> {
    closed(trades).max_by(|a, b| a.result_euro.total_cmp(&b.result_euro))
}

pub fn worst_trade(trades: &[TradeRecord]) -> Option<&TradeRecord> {
    closed(trades).min_by(|a, b| a.result_euro.total_cmp(&b.result_euro))
}
