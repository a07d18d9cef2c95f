use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{PerformanceGoal, TradeType};
use crate::trading::trade_analyzer::{self, EquityPoint, GroupStats, SummaryStats};
use crate::trading::trade_record::TradeRecord;

#[derive(Debug, Clone, Serialize)]
pub struct JournalReport {
    pub summary: SummaryStats,
    pub drafts: usize,

    // Goal
    pub goal: PerformanceGoal,
    pub goal_progress: f64,

    // Extremes
    pub best_trade: f64,
    pub worst_trade: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,

    // Breakdowns
    pub by_asset: BTreeMap<String, GroupStats>,
    pub by_trade_type: BTreeMap<TradeType, GroupStats>,

    pub equity_curve: Vec<EquityPoint>,
}

impl JournalReport {
    pub fn from_journal(trades: &[TradeRecord], goal: PerformanceGoal) -> Self {
        let summary = trade_analyzer::aggregate(trades);
        let equity_curve = trade_analyzer::equity_curve(trades);

        JournalReport {
            drafts: trades.iter().filter(|t| t.is_draft).count(),
            goal,
            goal_progress: trade_analyzer::goal_progress(summary.total_pnl, goal.target_pnl_euro),
            best_trade: trade_analyzer::best_trade(trades).map_or(0.0, |t| t.result_euro),
            worst_trade: trade_analyzer::worst_trade(trades).map_or(0.0, |t| t.result_euro),
            profit_factor: trade_analyzer::profit_factor(trades),
            max_drawdown: trade_analyzer::max_drawdown(&equity_curve),
            by_asset: trade_analyzer::by_asset(trades),
            by_trade_type: trade_analyzer::by_trade_type(trades),
            summary,
            equity_curve,
        }
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  JOURNAL REPORT");
        println!("{}", "=".repeat(60));
        println!();
        println!("  PERFORMANCE");
        println!("  ───────────────────────────────────");
        println!("  Trades:      {} ({} drafts excluded)", self.summary.total_trades, self.drafts);
        println!("  Win Rate:    {:.1}%", self.summary.win_rate);
        println!("  Total PnL:   €{:+.2}", self.summary.total_pnl);
        println!("  Avg PnL:     €{:+.2}", self.summary.avg_pnl);
        println!("  Best:        €{:+.2}", self.best_trade);
        println!("  Worst:       €{:+.2}", self.worst_trade);
        println!("  Profit Factor: {:.2}", self.profit_factor);
        println!("  Max DD:      €{:.2}", self.max_drawdown);
        println!();
        println!("  GOAL");
        println!("  ───────────────────────────────────");
        println!(
            "  Target:      €{:.2} on €{:.2} ({:.1}%)",
            self.goal.target_pnl_euro,
            self.goal.initial_capital,
            self.goal.target_return_pct()
        );
        println!("  Progress:    {:.1}%", self.goal_progress);

        if !self.by_asset.is_empty() {
            println!();
            println!("  BY ASSET");
            println!("  ───────────────────────────────────");
            let mut assets: Vec<_> = self.by_asset.iter().collect();
            assets.sort_by(|a, b| b.1.pnl.total_cmp(&a.1.pnl));
            for (asset, stats) in assets {
                println!(
                    "  {:>10}: {} trades | WR {:.0}% | PnL €{:+.2}",
                    asset,
                    stats.trade_count,
                    stats.win_rate(),
                    stats.pnl
                );
            }
        }

        if !self.by_trade_type.is_empty() {
            println!();
            println!("  BY SIDE");
            println!("  ───────────────────────────────────");
            for (side, stats) in &self.by_trade_type {
                println!(
                    "  {:>10}: {} trades | WR {:.0}% | PnL €{:+.2}",
                    side,
                    stats.trade_count,
                    stats.win_rate(),
                    stats.pnl
                );
            }
        }

        if let Some(last) = self.equity_curve.last() {
            println!();
            println!("  Equity on {}: €{:+.2}", last.date, last.equity);
        }

        println!("{}", "=".repeat(60));
    }
}
