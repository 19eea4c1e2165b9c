//! ChartLab CLI: indicator analysis over CSV or synthetic bars.
//!
//! Commands:
//! - `analyze` computes indicators for one or more symbols, prints the latest
//!   complete row per symbol, and optionally writes JSON/CSV reports
//! - `config` prints the default analysis config as TOML

use anyhow::{bail, Context, Result};
use chartlab_runner::{
    analyze_batch, write_report, AnalysisConfig, BarSource, LookbackPeriod, OutputConfig,
    OutputFormat, SymbolInput, SymbolReport,
};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chartlab",
    about = "ChartLab CLI: technical indicators for OHLCV series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators for CSV files and/or synthetic symbols.
    Analyze {
        /// Bar files as SYMBOL=PATH, or PATH (symbol taken from the file stem).
        files: Vec<String>,

        /// Symbol to analyze on deterministic synthetic bars (demo only).
        /// Repeat the flag for more symbols.
        #[arg(long, value_name = "SYMBOL", action = ArgAction::Append)]
        synthetic: Vec<String>,

        /// Synthetic start date (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-01")]
        start: String,

        /// Synthetic end date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Lookback period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max.
        #[arg(long)]
        period: Option<LookbackPeriod>,

        /// Path to a TOML analysis config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write one report per symbol in this format (overrides the config's output.format).
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Report directory (overrides the config's output.directory).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Process symbols one at a time instead of on the thread pool.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Print the default analysis config as TOML.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            files,
            synthetic,
            start,
            end,
            period,
            config,
            format,
            output_dir,
            sequential,
        } => run_analyze(AnalyzeArgs {
            files,
            synthetic,
            start,
            end,
            period,
            config,
            format: format.map(OutputFormat::from),
            output_dir,
            sequential,
        }),
        Commands::Config => {
            print!("{}", AnalysisConfig::default().to_toml()?);
            Ok(())
        }
    }
}

struct AnalyzeArgs {
    files: Vec<String>,
    synthetic: Vec<String>,
    start: String,
    end: Option<String>,
    period: Option<LookbackPeriod>,
    config: Option<PathBuf>,
    format: Option<OutputFormat>,
    output_dir: Option<PathBuf>,
    sequential: bool,
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    if args.files.is_empty() && args.synthetic.is_empty() {
        bail!("nothing to analyze: pass bar files or --synthetic SYMBOL");
    }

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(period) = args.period {
        config.period = period;
    }
    if args.sequential {
        config.parallel = false;
    }

    let mut inputs = Vec::new();
    for spec in &args.files {
        inputs.push(csv_input(spec)?);
    }
    if !args.synthetic.is_empty() {
        let start = parse_date(&args.start)?;
        let end = match args.end.as_deref() {
            Some(s) => parse_date(s)?,
            None => chrono::Local::now().date_naive(),
        };
        if end < start {
            bail!("--end {end} is before --start {start}");
        }
        for symbol in &args.synthetic {
            inputs.push(SymbolInput::new(
                symbol.as_str(),
                BarSource::Synthetic { start, end },
            ));
        }
    }

    info!(
        symbols = inputs.len(),
        period = %config.period,
        parallel = config.parallel,
        "starting analysis"
    );
    let outcome = analyze_batch(&inputs, &config);

    for report in &outcome.reports {
        print_summary(report);
    }

    if let Some(target) = export_target(&config, args.format, args.output_dir.as_deref()) {
        for report in &outcome.reports {
            let path = write_report(report, &target.directory, target.format)
                .with_context(|| format!("failed to export {}", report.symbol))?;
            println!("Report saved to: {}", path.display());
        }
    }

    if !outcome.is_complete() {
        for failure in &outcome.failures {
            eprintln!("Error for {}: {}", failure.symbol, failure.error);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Reports are written when the config has an `[output]` table or when
/// `--format` / `--output-dir` is given. Flags override the table.
fn export_target(
    config: &AnalysisConfig,
    format: Option<OutputFormat>,
    dir: Option<&Path>,
) -> Option<OutputConfig> {
    if config.output.is_none() && format.is_none() && dir.is_none() {
        return None;
    }
    let mut target = config.output.clone().unwrap_or_default();
    if let Some(format) = format {
        target.format = format;
    }
    if let Some(dir) = dir {
        target.directory = dir.to_path_buf();
    }
    Some(target)
}

/// `SYMBOL=PATH` or a bare path. A `<stem>.fundamentals.json` file beside the
/// bar file is attached when present.
fn csv_input(spec: &str) -> Result<SymbolInput> {
    let (symbol, path) = match spec.split_once('=') {
        Some((symbol, path)) if !symbol.is_empty() => (symbol.to_string(), PathBuf::from(path)),
        _ => {
            let path = PathBuf::from(spec);
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .with_context(|| format!("cannot infer a symbol from '{spec}'"))?
                .to_ascii_uppercase();
            (stem, path)
        }
    };

    let mut input = SymbolInput::new(symbol, BarSource::Csv(path.clone()));
    if let Some(fundamentals) = fundamentals_beside(&path) {
        input = input.with_fundamentals(fundamentals);
    }
    Ok(input)
}

fn fundamentals_beside(bar_file: &Path) -> Option<PathBuf> {
    let stem = bar_file.file_stem()?.to_str()?;
    let candidate = bar_file.with_file_name(format!("{stem}.fundamentals.json"));
    candidate.is_file().then_some(candidate)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn print_summary(report: &SymbolReport) {
    println!();
    println!(
        "=== {} ({:?}, period {}) ===",
        report.symbol, report.source, report.period
    );
    println!(
        "Bars:        {} loaded, {} in period, {} complete rows",
        report.loaded_bars, report.input_bars, report.kept_rows
    );
    println!(
        "Fingerprint: {}",
        report.fingerprint.get(..16).unwrap_or(&report.fingerprint)
    );
    println!(
        "Dataset:     {}",
        report.dataset_hash.get(..16).unwrap_or(&report.dataset_hash)
    );

    match report.series.last() {
        Some(row) => {
            println!("Latest:      {}", row.bar.timestamp);
            println!("  {:<16} {:>14.4}", "Close", row.bar.close);
            for (label, value) in report.columns.iter().zip(row.indicators.values()) {
                println!("  {label:<16} {value:>14.4}");
            }
        }
        None => println!("Latest:      (not enough history for a complete row)"),
    }

    if let Some(f) = &report.fundamentals {
        if let Some(cap) = f.market_cap {
            println!("  {:<16} {:>14.0}", "Market cap", cap);
        }
        if let Some(price) = f.price() {
            println!("  {:<16} {:>14.2}", "Price", price);
        }
        if let Some((pe, basis)) = f.pe_ratio() {
            println!("  {:<16} {:>14.2} ({basis:?})", "P/E", pe);
        }
        if let Some((eps, basis)) = f.eps() {
            println!("  {:<16} {:>14.2} ({basis:?})", "EPS", eps);
        }
    }
}
