use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use pip_journal::cloud::{self, CloudTransport, HttpCloudClient};
use pip_journal::config::Config;
use pip_journal::core::position_sizer::{
    compute_position, CalculatorInput, InstrumentChoice, StopLossMethod,
};
use pip_journal::core::sessions;
use pip_journal::models::instrument::{self, CUSTOM_INSTRUMENT};
use pip_journal::models::{PerformanceGoal, TradeType};
use pip_journal::store::{transfer, FileStorage, JournalStore};
use pip_journal::trading::{
    filter_and_sort, JournalFilter, JournalReport, SortKey, SortOrder, TradeForm, TradeId,
};

/// Trading journal and position-size calculator.
#[derive(Parser)]
#[command(name = "pip-journal")]
#[command(about = "Size positions, keep a trading journal, review your stats", long_about = None)]
struct Cli {
    /// Directory holding the journal files
    #[arg(long, env = "JOURNAL_DIR", default_value = "data")]
    dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute lot size for a given risk
    Calc {
        /// Account capital
        #[arg(long)]
        capital: Option<f64>,

        /// Risk per trade in percent
        #[arg(long)]
        risk: Option<f64>,

        /// Instrument symbol, or "custom"
        #[arg(long)]
        instrument: Option<String>,

        /// Pip value per lot for a custom instrument
        #[arg(long)]
        pip_value: Option<f64>,

        /// Pip size for a custom instrument
        #[arg(long)]
        pip_decimal: Option<f64>,

        /// Stop distance in pips
        #[arg(long, conflicts_with_all = ["entry", "stop"])]
        pips: Option<f64>,

        /// Entry price (price-based stop)
        #[arg(long)]
        entry: Option<f64>,

        /// Stop-loss price (price-based stop)
        #[arg(long)]
        stop: Option<f64>,

        /// Trade side for a price-based stop
        #[arg(long, default_value = "buy")]
        side: TradeType,
    },

    /// Log a trade (or save a draft)
    Add {
        #[command(flatten)]
        trade: TradeArgs,

        /// Save as draft (excluded from stats)
        #[arg(long)]
        draft: bool,
    },

    /// Edit a trade by id
    Edit {
        id: String,

        #[command(flatten)]
        trade: TradeArgs,

        /// Mark as draft
        #[arg(long, conflicts_with = "publish")]
        draft: bool,

        /// Mark as a real trade
        #[arg(long)]
        publish: bool,
    },

    /// Delete a trade by id
    Delete { id: String },

    /// List journal entries, drafts included
    List {
        #[arg(long)]
        asset: Option<String>,

        #[arg(long)]
        side: Option<TradeType>,

        /// timestamp, date, pnl or pct
        #[arg(long, default_value = "timestamp")]
        sort: SortKey,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,
    },

    /// Show journal analytics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or set the performance goal
    Goal {
        #[arg(long)]
        capital: Option<f64>,

        #[arg(long)]
        target: Option<f64>,
    },

    /// Market session status
    Sessions,

    /// List known instruments
    Instruments,

    /// Export the journal to a JSON file
    Export {
        #[arg(default_value = transfer::EXPORT_FILE_NAME)]
        path: String,
    },

    /// Replace the journal with a JSON export
    Import { path: String },

    /// Delete every journal entry
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Upload the journal to the cloud backend
    Push,

    /// Replace the journal with the cloud copy
    Pull,

    /// Show the connected cloud account
    Whoami,
}

#[derive(Args)]
struct TradeArgs {
    /// Trade date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Instrument symbol, or "other" with --custom-asset
    #[arg(long)]
    asset: Option<String>,

    #[arg(long)]
    custom_asset: Option<String>,

    #[arg(long)]
    side: Option<TradeType>,

    #[arg(long)]
    setup: Option<String>,

    #[arg(long)]
    entry: Option<f64>,

    #[arg(long)]
    stop: Option<f64>,

    #[arg(long)]
    tp: Option<f64>,

    #[arg(long)]
    rrr: Option<String>,

    /// Position size in lots
    #[arg(long)]
    size: Option<f64>,

    /// Result in account currency
    #[arg(long, allow_hyphen_values = true)]
    pnl: Option<f64>,

    /// Result in percent
    #[arg(long, allow_hyphen_values = true)]
    pct: Option<f64>,

    #[arg(long)]
    comment: Option<String>,
}

impl TradeArgs {
    fn apply(self, form: &mut TradeForm) {
        if let Some(v) = self.date {
            form.date = Some(v);
        }
        if let Some(v) = self.asset {
            form.asset = v;
        }
        if let Some(v) = self.custom_asset {
            form.custom_asset = v;
        }
        if let Some(v) = self.side {
            form.trade_type = v;
        }
        if let Some(v) = self.setup {
            form.setup = v;
        }
        if self.entry.is_some() {
            form.entry_price = self.entry;
        }
        if self.stop.is_some() {
            form.stop_loss = self.stop;
        }
        if self.tp.is_some() {
            form.take_profit = self.tp;
        }
        if let Some(v) = self.rrr {
            form.rrr = v;
        }
        if self.size.is_some() {
            form.position_size = self.size;
        }
        if self.pnl.is_some() {
            form.result_euro = self.pnl;
        }
        if self.pct.is_some() {
            form.result_percentage = self.pct;
        }
        if let Some(v) = self.comment {
            form.comment = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    let cli = Cli::parse();
    cfg.journal_dir = cli.dir;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Calc {
            capital,
            risk,
            instrument,
            pip_value,
            pip_decimal,
            pips,
            entry,
            stop,
            side,
        } => {
            let symbol = instrument.unwrap_or_else(|| cfg.default_instrument.clone());
            let instrument = if symbol.eq_ignore_ascii_case(CUSTOM_INSTRUMENT) {
                InstrumentChoice::Custom {
                    pip_value,
                    pip_decimal,
                }
            } else {
                InstrumentChoice::Listed(symbol)
            };
            let stop_loss = if entry.is_some() || stop.is_some() {
                StopLossMethod::PriceBased {
                    entry_price: entry,
                    stop_loss_price: stop,
                    trade_type: side,
                }
            } else {
                StopLossMethod::PipsDirect { pips }
            };
            let input = CalculatorInput {
                capital: capital.unwrap_or(cfg.default_capital),
                risk_percentage: risk.unwrap_or(cfg.default_risk_pct),
                instrument,
                stop_loss,
            };

            let r = compute_position(&input)?;
            println!("Lot size:       {:.2}", r.lot_size);
            println!("Pip value:      €{:.2}", r.pip_value);
            println!("Amount risked:  €{:.2}", r.amount_risked);
            println!("Stop distance:  {:.1} pips", r.pips);
        }

        Commands::Add { trade, draft } => {
            let mut store = open_store(&cfg)?;
            let mut form = TradeForm {
                date: Some(Utc::now().date_naive()),
                asset: cfg.default_instrument.clone(),
                ..Default::default()
            };
            trade.apply(&mut form);
            let id = store.add(form, draft)?;
            println!("{} saved: {}", if draft { "Draft" } else { "Trade" }, id);
        }

        Commands::Edit {
            id,
            trade,
            draft,
            publish,
        } => {
            let mut store = open_store(&cfg)?;
            let id = TradeId::from(id);
            let existing = store
                .find(&id)
                .with_context(|| format!("no trade with id {}", id))?;
            let is_draft = if publish {
                false
            } else {
                draft || existing.is_draft
            };
            let mut form = TradeForm::from_record(existing);
            trade.apply(&mut form);
            store.update(&id, form, is_draft)?;
            println!("Entry updated: {}", id);
        }

        Commands::Delete { id } => {
            let mut store = open_store(&cfg)?;
            let removed = store.delete(&TradeId::from(id))?;
            println!("Deleted {} {} on {}", removed.trade_type, removed.asset, removed.date);
        }

        Commands::List {
            asset,
            side,
            sort,
            order,
        } => {
            let store = open_store(&cfg)?;
            let filter = JournalFilter {
                asset,
                trade_type: side,
                sort_by: sort,
                sort_order: order,
            };
            let entries = filter_and_sort(store.get(), &filter);
            if entries.is_empty() {
                println!("No entries.");
            }
            for t in entries {
                println!(
                    "{}  {}  {:<10} {:<4}  €{:>+9.2}  {:>+6.2}%{}  [{}]",
                    t.date,
                    t.timestamp.format("%H:%M"),
                    t.asset,
                    t.trade_type,
                    t.result_euro,
                    t.result_percentage,
                    if t.is_draft { "  (draft)" } else { "" },
                    t.id
                );
            }
        }

        Commands::Stats { json } => {
            let store = open_store(&cfg)?;
            let report = JournalReport::from_journal(store.get(), store.goal());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print_summary();
            }
        }

        Commands::Goal { capital, target } => {
            let mut store = open_store(&cfg)?;
            if capital.is_some() || target.is_some() {
                let current = store.goal();
                store.set_goal(PerformanceGoal {
                    initial_capital: capital.unwrap_or(current.initial_capital),
                    target_pnl_euro: target.unwrap_or(current.target_pnl_euro),
                })?;
            }
            let goal = store.goal();
            println!(
                "Goal: €{:.2} on €{:.2} ({:.1}%)",
                goal.target_pnl_euro,
                goal.initial_capital,
                goal.target_return_pct()
            );
        }

        Commands::Sessions => {
            let now = Utc::now();
            let tz = cfg.display_tz();
            println!("Trading sessions (UTC), now {}", now.format("%H:%M"));
            let statuses = sessions::session_statuses(&cfg.sessions, Some(now));
            for (s, st) in cfg.sessions.iter().zip(&statuses) {
                let local = s
                    .local_window(tz, now.date_naive())
                    .map(|(o, c)| format!("  ({} {}-{})", tz, o.format("%H:%M"), c.format("%H:%M")))
                    .unwrap_or_default();
                println!(
                    "  {:<9} {:02}:00-{:02}:00  {:<6}{}",
                    st.name,
                    st.start_hour,
                    st.end_hour,
                    if st.is_open { "OPEN" } else { "CLOSED" },
                    local
                );
            }
            println!("{}", render_timeline(&cfg.sessions, now));
        }

        Commands::Instruments => {
            for s in instrument::INSTRUMENTS {
                println!(
                    "{:<10} {:<16} pip value {:>5.2}  pip {}",
                    s.symbol, s.name, s.pip_value, s.pip_decimal
                );
            }
        }

        Commands::Export { path } => {
            let store = open_store(&cfg)?;
            let json = transfer::export_json(store.get())?;
            std::fs::write(&path, json).with_context(|| format!("writing {}", path))?;
            println!("Exported {} entries to {}", store.get().len(), path);
        }

        Commands::Import { path } => {
            let mut store = open_store(&cfg)?;
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            let trades = transfer::import_json(&text)?;
            let count = trades.len();
            store.replace(trades)?;
            println!("Imported {} entries", count);
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to clear the journal without --yes");
            }
            let mut store = open_store(&cfg)?;
            store.clear()?;
            println!("All data has been cleared.");
        }

        Commands::Push => {
            let store = open_store(&cfg)?;
            let client = HttpCloudClient::new(&cfg)?;
            let n = cloud::push(&store, &client).await?;
            println!("Journal saved to cloud ({} entries)", n);
        }

        Commands::Pull => {
            let mut store = open_store(&cfg)?;
            let client = HttpCloudClient::new(&cfg)?;
            let n = cloud::pull(&mut store, &client).await?;
            println!("Journal loaded from cloud ({} entries)", n);
        }

        Commands::Whoami => {
            let client = HttpCloudClient::new(&cfg)?;
            match client.user_profile().await? {
                Some(name) => println!("Connected as {}", name),
                None => println!("Connected (no profile name)"),
            }
        }
    }

    Ok(())
}

fn open_store(cfg: &Config) -> Result<JournalStore<FileStorage>> {
    JournalStore::open(FileStorage::new(&cfg.journal_dir))
        .with_context(|| format!("opening journal in {}", cfg.journal_dir))
}

/// 48-column ASCII timeline, one row per session, `|` marks the current time.
fn render_timeline(list: &[sessions::MarketSession], now: chrono::DateTime<Utc>) -> String {
    const WIDTH: usize = 48;
    let col = |pct: f64| ((pct / 100.0) * WIDTH as f64).round() as usize;
    let marker = col(sessions::now_marker(now)).min(WIDTH - 1);

    let mut out = String::new();
    for s in list {
        let mut row = vec!['.'; WIDTH];
        for bar in sessions::timeline_bars(std::slice::from_ref(s)) {
            let start = col(bar.left);
            let end = col(bar.left + bar.width).min(WIDTH);
            for c in row.iter_mut().take(end).skip(start) {
                *c = '#';
            }
        }
        row[marker] = '|';
        out.push_str(&format!("  {:<9} {}\n", s.name, row.into_iter().collect::<String>()));
    }
    out.push_str(&format!("  {:<9} 00{:>10}06{:>10}12{:>10}18{:>10}24", "", "", "", "", ""));
    out
}
