//! fxjournal CLI: journal entry, statistics, export and import commands.
//!
//! Commands:
//! - `trade add|list|show|update|delete`: executed trades
//! - `missed add|list|delete`: trades spotted but not taken
//! - `backtest add|list|delete`: backtest screenshot library
//! - `stats`: aggregate performance statistics
//! - `charts`: chart series as JSON
//! - `export` / `import`: whole-journal backup and restore
//! - `csv`: flat trade tape for spreadsheets
//! - `usage`: record counts and storage size

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fxjournal_core::config::{default_config_file, JournalConfig};
use fxjournal_core::csv_export::write_trades_csv;
use fxjournal_core::domain::validate::{parse_optional_price, parse_price};
use fxjournal_core::domain::{
    BacktestDraft, Direction, EntryType, MediaBundle, MissedTrade, MissedTradeDraft, Outcome,
    RecordId, Timeframe, TimeframeScreenshots, Trade, TradeDraft, TradePatch, TradeType,
};
use fxjournal_core::format::{format_currency, format_percentage, format_pips};
use fxjournal_core::stats::{OutcomeBreakdown, TradeStats};
use fxjournal_core::{calculate_stats, generate_chart_data, JsonFileBackend, Journal};

#[derive(Parser)]
#[command(name = "fxjournal", about = "fxjournal: forex trading journal")]
struct Cli {
    /// Journal data file. Overrides `data_file` from the config.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file. Defaults to <config_dir>/fxjournal/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Executed trades.
    Trade {
        #[command(subcommand)]
        action: TradeAction,
    },
    /// Trades that were spotted but not taken.
    Missed {
        #[command(subcommand)]
        action: MissedAction,
    },
    /// Backtest screenshot library.
    Backtest {
        #[command(subcommand)]
        action: BacktestAction,
    },
    /// Print aggregate statistics.
    Stats {
        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print chart series as JSON.
    Charts {
        /// Last month of the trailing window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Export the whole journal.
    Export {
        /// Output file. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the journal with an exported artifact.
    Import {
        /// Artifact produced by `export`.
        file: PathBuf,
    },
    /// Write all trades as CSV.
    Csv {
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Report record counts and storage size.
    Usage,
}

#[derive(Subcommand)]
enum TradeAction {
    /// Log a trade.
    Add(TradeAddArgs),
    /// List trades in entry order.
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show one trade with matching backtests.
    Show { id: String },
    /// Change fields of a trade.
    Update(TradeUpdateArgs),
    /// Delete a trade. Unknown ids are ignored.
    Delete { id: String },
}

#[derive(Args)]
struct TradeAddArgs {
    /// Currency pair, e.g. EUR/USD.
    #[arg(long)]
    pair: String,
    /// Entry type: 2-touch, 3-touch, mechanical, breakout, retest, reversal.
    #[arg(long)]
    entry_type: EntryType,
    /// win, loss or breakeven.
    #[arg(long)]
    outcome: Outcome,
    /// buy or sell.
    #[arg(long)]
    direction: Direction,
    /// Entry time (YYYY-MM-DD HH:MM). Defaults to now.
    #[arg(long)]
    entry_time: Option<String>,
    #[arg(long)]
    entry: String,
    #[arg(long)]
    exit: String,
    #[arg(long)]
    volume: String,
    #[arg(long)]
    stop_loss: Option<String>,
    #[arg(long)]
    take_profit: Option<String>,
    /// Money at risk to the stop.
    #[arg(long)]
    sl_amount: Option<String>,
    /// Money to be made at the target.
    #[arg(long)]
    tp_amount: Option<String>,
    #[arg(long)]
    be_amount: Option<String>,
    /// Log as a missed trade instead of an executed one.
    #[arg(long, default_value_t = false)]
    missed: bool,
    #[arg(long, default_value = "")]
    notes: String,
    #[command(flatten)]
    media: MediaArgs,
}

#[derive(Args)]
struct MediaArgs {
    #[arg(long = "before-image")]
    before_images: Vec<String>,
    #[arg(long = "after-image")]
    after_images: Vec<String>,
    #[arg(long = "video")]
    videos: Vec<String>,
    #[arg(long)]
    audio: Option<String>,
    /// Timeframe screenshot as TIMEFRAME=IMAGE, e.g. 4h=charts/eurusd-4h.png.
    #[arg(long = "screenshot", value_parser = parse_screenshot)]
    screenshots: Vec<(Timeframe, String)>,
}

impl MediaArgs {
    fn bundle(&self) -> MediaBundle {
        MediaBundle {
            before_images: self.before_images.clone(),
            after_images: self.after_images.clone(),
            videos: self.videos.clone(),
            audio: self.audio.clone(),
        }
    }

    fn timeframes(&self) -> TimeframeScreenshots {
        let mut shots = TimeframeScreenshots::default();
        for (tf, image) in &self.screenshots {
            shots.set(*tf, Some(image.clone()));
        }
        shots
    }
}

#[derive(Args)]
struct TradeUpdateArgs {
    id: String,
    #[arg(long)]
    pair: Option<String>,
    #[arg(long)]
    entry_type: Option<EntryType>,
    #[arg(long)]
    outcome: Option<Outcome>,
    #[arg(long)]
    trade_type: Option<TradeType>,
    #[arg(long)]
    direction: Option<Direction>,
    #[arg(long)]
    entry_time: Option<String>,
    #[arg(long)]
    entry: Option<String>,
    #[arg(long)]
    exit: Option<String>,
    #[arg(long)]
    volume: Option<String>,
    /// New stop-loss price; pass an empty string to clear it.
    #[arg(long)]
    stop_loss: Option<String>,
    /// New take-profit price; pass an empty string to clear it.
    #[arg(long)]
    take_profit: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand)]
enum MissedAction {
    /// Log a missed trade.
    Add {
        #[arg(long)]
        pair: String,
        #[arg(long)]
        entry_type: EntryType,
        #[arg(long)]
        direction: Direction,
        /// When the setup was spotted (YYYY-MM-DD HH:MM). Defaults to now.
        #[arg(long)]
        spotted_at: Option<String>,
        #[arg(long)]
        entry: String,
        #[arg(long)]
        exit: String,
        /// Why the trade was not taken.
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[command(flatten)]
        media: MediaArgs,
    },
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum BacktestAction {
    /// Add a backtest screenshot.
    Add {
        #[arg(long)]
        pair: String,
        #[arg(long)]
        entry_type: EntryType,
        #[arg(long)]
        timeframe: Timeframe,
        /// Image reference (path or data URL).
        #[arg(long)]
        image: String,
        #[arg(long)]
        strategy: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List backtests, newest first. With --pair and --entry-type, only matches.
    List {
        #[arg(long, requires = "entry_type")]
        pair: Option<String>,
        #[arg(long, requires = "pair")]
        entry_type: Option<EntryType>,
    },
    Delete {
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    let data_file = cli.data.clone().unwrap_or_else(|| config.data_file.clone());
    debug!(data_file = %data_file.display(), "using journal file");
    let backend = JsonFileBackend::new(&data_file).pretty(config.pretty_export);
    let mut journal = Journal::open(backend)
        .with_context(|| format!("failed to open journal {}", data_file.display()))?;

    match cli.command {
        Commands::Trade { action } => run_trade(&mut journal, action, &config),
        Commands::Missed { action } => run_missed(&mut journal, action),
        Commands::Backtest { action } => run_backtest(&mut journal, action),
        Commands::Stats { json } => run_stats(&journal, json, &config),
        Commands::Charts { as_of } => run_charts(&journal, as_of.as_deref()),
        Commands::Export { output } => run_export(&journal, output.as_deref(), &config),
        Commands::Import { file } => run_import(&mut journal, &file),
        Commands::Csv { output } => {
            let trades = journal.all_trades();
            write_trades_csv(&output, &trades)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {} trade(s) to {}", trades.len(), output.display());
            Ok(())
        }
        Commands::Usage => run_usage(&journal, &data_file),
    }
}

/// An explicit `--config` must exist; the default location is optional.
fn load_config(explicit: Option<&Path>) -> Result<JournalConfig> {
    match explicit {
        Some(path) => JournalConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => JournalConfig::load_default().with_context(|| {
            let shown = default_config_file()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            format!("failed to load config {shown}")
        }),
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ─── trades ─────────────────────────────────────────────────────────

fn run_trade(
    journal: &mut Journal<JsonFileBackend>,
    action: TradeAction,
    config: &JournalConfig,
) -> Result<()> {
    match action {
        TradeAction::Add(args) => {
            let entry_time = parse_time(args.entry_time.as_deref())?;
            let mut draft = TradeDraft::new(
                args.pair,
                args.entry_type,
                args.outcome,
                args.direction,
                entry_time,
                parse_price("entry_price", &args.entry)?,
                parse_price("exit_price", &args.exit)?,
                parse_price("volume", &args.volume)?,
            );
            draft.stop_loss = optional_price("stop_loss", args.stop_loss.as_deref())?;
            draft.take_profit = optional_price("take_profit", args.take_profit.as_deref())?;
            draft.stop_loss_amount =
                optional_price("stop_loss_amount", args.sl_amount.as_deref())?.unwrap_or(0.0);
            draft.take_profit_amount =
                optional_price("take_profit_amount", args.tp_amount.as_deref())?.unwrap_or(0.0);
            draft.break_even_amount = optional_price("break_even_amount", args.be_amount.as_deref())?;
            if args.missed {
                draft.trade_type = TradeType::Missed;
            }
            draft.notes = args.notes;
            draft.media = args.media.bundle();
            draft.timeframe_screenshots = args.media.timeframes();

            let id = journal.add_trade(draft)?;
            println!("{id}");
        }
        TradeAction::List { json } => {
            let trades = journal.all_trades();
            if json {
                println!("{}", serde_json::to_string_pretty(&trades)?);
            } else {
                print_trades(&trades);
            }
        }
        TradeAction::Show { id } => {
            let id = RecordId::from(id);
            let Some(trade) = journal.get_trade(&id) else {
                bail!("trade '{id}' not found");
            };
            print_trade(&trade, config);
            let backtests = journal.backtests_for(&trade.pair, trade.entry_type);
            if !backtests.is_empty() {
                println!();
                println!("Matching backtests ({}):", backtests.len());
                for b in &backtests {
                    println!("  {:<8} {}", b.timeframe.label(), b.image);
                }
            }
        }
        TradeAction::Update(args) => {
            let id = RecordId::from(args.id.as_str());
            let patch = TradePatch {
                pair: args.pair,
                entry_type: args.entry_type,
                outcome: args.outcome,
                trade_type: args.trade_type,
                direction: args.direction,
                entry_time: args
                    .entry_time
                    .as_deref()
                    .map(|s| parse_time(Some(s)))
                    .transpose()?,
                entry_price: args
                    .entry
                    .as_deref()
                    .map(|s| parse_price("entry_price", s))
                    .transpose()?,
                exit_price: args
                    .exit
                    .as_deref()
                    .map(|s| parse_price("exit_price", s))
                    .transpose()?,
                volume: args
                    .volume
                    .as_deref()
                    .map(|s| parse_price("volume", s))
                    .transpose()?,
                stop_loss: args
                    .stop_loss
                    .as_deref()
                    .map(|s| parse_optional_price("stop_loss", s))
                    .transpose()?,
                take_profit: args
                    .take_profit
                    .as_deref()
                    .map(|s| parse_optional_price("take_profit", s))
                    .transpose()?,
                notes: args.notes,
                ..TradePatch::default()
            };
            if patch.is_empty() {
                bail!("nothing to update");
            }
            let trade = journal.update_trade(&id, patch)?;
            print_trade(&trade, config);
        }
        TradeAction::Delete { id } => report_delete(journal.delete_trade(&RecordId::from(id))?),
    }
    Ok(())
}

fn print_trades(trades: &[Trade]) {
    if trades.is_empty() {
        println!("No trades.");
        return;
    }
    println!(
        "{:<36} {:<16} {:<8} {:<4} {:<10} {:<9} {:>12} {:>6}",
        "Id", "Entry", "Pair", "Dir", "Type", "Outcome", "Pips", "R:R"
    );
    println!("{}", "-".repeat(108));
    for t in trades {
        println!(
            "{:<36} {:<16} {:<8} {:<4} {:<10} {:<9} {:>12} {:>6.2}",
            t.id.as_str(),
            t.entry_time.format("%Y-%m-%d %H:%M").to_string(),
            t.pair,
            t.direction.label(),
            t.entry_type.label(),
            t.outcome.label(),
            format_pips(t.pips(), Some(&t.pair)),
            t.risk_reward_ratio
        );
    }
}

fn print_trade(t: &Trade, config: &JournalConfig) {
    let level = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    println!("Id:            {}", t.id);
    println!("Pair:          {} ({})", t.pair, t.direction);
    println!("Entry type:    {}", t.entry_type);
    println!("Outcome:       {} ({})", t.outcome, t.trade_type);
    println!("Entry time:    {}", t.entry_time.format("%Y-%m-%d %H:%M"));
    println!("Entry / exit:  {} / {}", t.entry_price, t.exit_price);
    println!("SL / TP:       {} / {}", level(t.stop_loss), level(t.take_profit));
    println!("Volume:        {}", t.volume);
    println!("Pips:          {}", format_pips(t.pips(), Some(&t.pair)));
    println!("R:R:           {:.2}", t.risk_reward_ratio);
    println!(
        "Risk / reward: {} / {}",
        format_currency(t.stop_loss_amount, &config.currency),
        format_currency(t.take_profit_amount, &config.currency)
    );
    if let Some(be) = t.break_even_amount {
        println!("Break-even:    {}", format_currency(be, &config.currency));
    }
    if !t.media.is_empty() || t.timeframe_screenshots.count() > 0 {
        println!(
            "Media:         {} attachment(s), {} timeframe screenshot(s)",
            t.media.len(),
            t.timeframe_screenshots.count()
        );
    }
    if !t.notes.is_empty() {
        println!("Notes:         {}", t.notes);
    }
}

// ─── missed trades ──────────────────────────────────────────────────

fn run_missed(journal: &mut Journal<JsonFileBackend>, action: MissedAction) -> Result<()> {
    match action {
        MissedAction::Add {
            pair,
            entry_type,
            direction,
            spotted_at,
            entry,
            exit,
            reason,
            notes,
            media,
        } => {
            let mut draft = MissedTradeDraft::new(
                pair,
                entry_type,
                direction,
                parse_time(spotted_at.as_deref())?,
                parse_price("potential_entry", &entry)?,
                parse_price("potential_exit", &exit)?,
                reason,
            );
            draft.notes = notes;
            draft.media = media.bundle();
            draft.timeframe_screenshots = media.timeframes();
            println!("{}", journal.add_missed_trade(draft)?);
        }
        MissedAction::List { json } => {
            let missed = journal.all_missed_trades();
            if json {
                println!("{}", serde_json::to_string_pretty(&missed)?);
            } else {
                print_missed(&missed);
            }
        }
        MissedAction::Delete { id } => {
            report_delete(journal.delete_missed_trade(&RecordId::from(id))?)
        }
    }
    Ok(())
}

fn print_missed(missed: &[MissedTrade]) {
    if missed.is_empty() {
        println!("No missed trades.");
        return;
    }
    println!(
        "{:<36} {:<16} {:<8} {:<4} {:<10} {:>12}  Reason",
        "Id", "Spotted", "Pair", "Dir", "Type", "Potential"
    );
    println!("{}", "-".repeat(100));
    for m in missed {
        println!(
            "{:<36} {:<16} {:<8} {:<4} {:<10} {:>12}  {}",
            m.id.as_str(),
            m.spotted_at.format("%Y-%m-%d %H:%M").to_string(),
            m.pair,
            m.direction.label(),
            m.entry_type.label(),
            format_pips(m.potential_pips, Some(&m.pair)),
            m.reason
        );
    }
}

// ─── backtests ──────────────────────────────────────────────────────

fn run_backtest(journal: &mut Journal<JsonFileBackend>, action: BacktestAction) -> Result<()> {
    match action {
        BacktestAction::Add {
            pair,
            entry_type,
            timeframe,
            image,
            strategy,
            notes,
            tags,
        } => {
            let mut draft = BacktestDraft::new(pair, entry_type, timeframe, image);
            draft.strategy = strategy;
            draft.notes = notes;
            draft.tags = tags;
            println!("{}", journal.add_backtest(draft)?);
        }
        BacktestAction::List { pair, entry_type } => {
            let shots = match (pair, entry_type) {
                (Some(pair), Some(entry_type)) => journal.backtests_for(&pair, entry_type),
                _ => journal.all_backtests(),
            };
            if shots.is_empty() {
                println!("No backtests.");
            }
            for b in &shots {
                let tags = if b.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", b.tags.join(", "))
                };
                println!(
                    "{}  {:<8} {:<10} {:<6} {}{tags}",
                    b.id,
                    b.pair,
                    b.entry_type.label(),
                    b.timeframe.label(),
                    b.image
                );
            }
        }
        BacktestAction::Delete { id } => {
            report_delete(journal.delete_backtest(&RecordId::from(id))?)
        }
    }
    Ok(())
}

// ─── reports ────────────────────────────────────────────────────────

fn run_stats(journal: &Journal<JsonFileBackend>, json: bool, config: &JournalConfig) -> Result<()> {
    let stats = calculate_stats(&journal.all_trades());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats, &config.currency);
    }
    Ok(())
}

fn print_stats(stats: &TradeStats, currency: &str) {
    println!();
    println!("=== Journal Statistics ===");
    println!("Trades:         {}", stats.total_trades);
    println!(
        "W / L / BE:     {} / {} / {}",
        stats.wins, stats.losses, stats.breakeven
    );
    println!("Win Rate:       {}", format_percentage(stats.win_rate, 1));
    println!("Avg R:R:        {:.2}", stats.average_rr);
    println!("Profit Factor:  {:.2}", stats.profit_factor);
    println!("Total Profit:   {}", format_currency(stats.total_profit, currency));
    println!("Total Loss:     {}", format_currency(stats.total_loss, currency));
    println!();
    println!("--- By Entry Type ---");
    for (entry_type, b) in &stats.by_entry_type {
        print_breakdown(entry_type.label(), b);
    }
    if !stats.by_month.is_empty() {
        println!();
        println!("--- By Month ---");
        for (month, b) in &stats.by_month {
            print_breakdown(&month.label(), b);
        }
    }
    println!();
}

fn print_breakdown(label: &str, b: &OutcomeBreakdown) {
    println!(
        "{label:<12} {:>4} trades  {:>3}W {:>3}L {:>3}BE  {:>7}",
        b.total,
        b.wins,
        b.losses,
        b.breakeven,
        format_percentage(b.win_rate, 1)
    );
}

fn run_charts(journal: &Journal<JsonFileBackend>, as_of: Option<&str>) -> Result<()> {
    let as_of = match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{s}' (expected YYYY-MM-DD)"))?,
        None => chrono::Local::now().date_naive(),
    };
    let charts = generate_chart_data(&journal.all_trades(), as_of);
    println!("{}", serde_json::to_string_pretty(&charts)?);
    Ok(())
}

fn run_export(
    journal: &Journal<JsonFileBackend>,
    output: Option<&Path>,
    config: &JournalConfig,
) -> Result<()> {
    let artifact = if config.pretty_export {
        journal.export_all()?
    } else {
        journal.export_all_compact()?
    };
    match output {
        Some(path) => {
            std::fs::write(path, artifact)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => println!("{artifact}"),
    }
    Ok(())
}

fn run_import(journal: &mut Journal<JsonFileBackend>, file: &Path) -> Result<()> {
    let artifact = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let summary = journal.import_all(&artifact)?;
    println!(
        "Imported {} trade(s), {} missed trade(s), {} backtest(s)",
        summary.trades, summary.missed_trades, summary.backtests
    );
    if let Some(at) = summary.exported_at {
        println!("Artifact exported at {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}

fn run_usage(journal: &Journal<JsonFileBackend>, data_file: &Path) -> Result<()> {
    let usage = journal.usage()?;
    println!("Journal: {}", data_file.display());
    println!("Trades:         {}", usage.trades);
    println!("Missed trades:  {}", usage.missed_trades);
    println!("Backtests:      {}", usage.backtests);
    println!("Size:           {}", format_size(usage.bytes));
    Ok(())
}

// ─── helpers ────────────────────────────────────────────────────────

fn report_delete(removed: bool) {
    if removed {
        println!("Deleted.");
    } else {
        println!("No such record; nothing deleted.");
    }
}

fn optional_price(field: &'static str, input: Option<&str>) -> Result<Option<f64>> {
    match input {
        Some(s) => Ok(parse_optional_price(field, s)?),
        None => Ok(None),
    }
}

/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` or a bare date (midnight).
fn parse_time(input: Option<&str>) -> Result<NaiveDateTime> {
    let Some(s) = input else {
        return Ok(chrono::Local::now().naive_local());
    };
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Ok(t);
        }
    }
    bail!("invalid date-time '{s}' (expected YYYY-MM-DD HH:MM)")
}

fn parse_screenshot(s: &str) -> Result<(Timeframe, String), String> {
    let (tf, image) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TIMEFRAME=IMAGE, got '{s}'"))?;
    let tf: Timeframe = tf.parse().map_err(|e| format!("{e}"))?;
    if image.trim().is_empty() {
        return Err("screenshot image must not be empty".into());
    }
    Ok((tf, image.to_string()))
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
