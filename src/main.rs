//! Actuarial Calculators CLI
//!
//! Command-line interface for mortality tables, annuity valuation, option
//! pricing and portfolio statistics

use actuarial_calc::annuity::{
    evaluate_rows, parse_freq_factor, read_batch_csv, write_batch_csv, AnnuityEvaluator, AnnuityRequest,
};
use actuarial_calc::finance::{portfolio_metrics, price_option};
use actuarial_calc::life_table::{mortality_table_with, MortalityTable};
use actuarial_calc::report::{self, MortalitySummary, PresentValueSummary};
use actuarial_calc::CalcDefaults;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "actuarial-calc", version, about = "Actuarial and finance calculators")]
struct Cli {
    /// JSON file of default inputs
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a mortality table
    Mortality(MortalityArgs),
    /// Present value of an annuity
    Pv(PvArgs),
    /// Value a CSV of annuity requests in parallel
    PvBatch(BatchArgs),
    /// List the selectable mortality tables
    Tables,
    /// Black-Scholes price and Greeks
    #[command(name = "option")]
    PriceOption(OptionArgs),
    /// Return, volatility and Sharpe ratio of a portfolio
    Portfolio(PortfolioArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, clap::Args)]
struct MortalityArgs {
    #[arg(long)]
    from: Option<i32>,
    #[arg(long)]
    to: Option<i32>,
    /// Annual interest rate, e.g. 0.035
    #[arg(long)]
    rate: Option<f64>,
    #[arg(long)]
    table: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    /// Write the rows to a file
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,
    /// Export path; a timestamped name in the current directory otherwise
    #[arg(long, requires = "export")]
    output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct PvArgs {
    #[arg(long)]
    age: Option<i32>,
    /// Annual payment amount
    #[arg(long)]
    payment: Option<f64>,
    #[arg(long)]
    rate: Option<f64>,
    /// Term in years
    #[arg(long)]
    term: Option<u32>,
    /// Payments per year or a name such as "Monthly"
    #[arg(long)]
    frequency: Option<String>,
    #[arg(long)]
    table: Option<String>,
    #[arg(long)]
    gender: Option<String>,
}

#[derive(Debug, clap::Args)]
struct BatchArgs {
    /// CSV with columns age,payment,interest_rate,term,frequency,table_type,gender
    #[arg(long)]
    input: PathBuf,
    /// Results CSV; stdout otherwise
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct OptionArgs {
    /// call or put
    #[arg(long = "type")]
    option_type: String,
    #[arg(long)]
    spot: f64,
    #[arg(long)]
    strike: f64,
    /// Years to expiry
    #[arg(long)]
    expiry: f64,
    #[arg(long)]
    rate: f64,
    #[arg(long)]
    volatility: f64,
    #[arg(long, default_value_t = 0.0)]
    dividend: f64,
}

#[derive(Debug, clap::Args)]
struct PortfolioArgs {
    /// CSV of period returns, one column per asset, with a header row
    #[arg(long)]
    returns: PathBuf,
    /// Comma-separated weights; equal weights otherwise
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let defaults = match &cli.config {
        Some(path) => CalcDefaults::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CalcDefaults::default(),
    };

    match cli.command {
        Command::Mortality(args) => run_mortality(&defaults, args),
        Command::Pv(args) => run_pv(&defaults, args),
        Command::PvBatch(args) => run_batch(&defaults, args),
        Command::Tables => run_tables(&defaults),
        Command::PriceOption(args) => run_option(args),
        Command::Portfolio(args) => run_portfolio(args),
    }
}

fn run_mortality(defaults: &CalcDefaults, args: MortalityArgs) -> Result<()> {
    let assumptions = defaults.assumptions()?;
    let table = mortality_table_with(
        &assumptions,
        args.from.unwrap_or(defaults.age_from),
        args.to.unwrap_or(defaults.age_to),
        args.rate.unwrap_or(defaults.interest_rate),
        args.table.as_deref().unwrap_or(&defaults.table_type),
        args.gender.as_deref().unwrap_or(&defaults.gender),
    )?;

    print!("{}", report::mortality_text(&table));
    println!("\nSummary:");
    println!("{}", MortalitySummary::from_table(&table)?);

    if let Some(format) = args.export {
        export_table(&table, format, args.output)?;
    }
    Ok(())
}

fn export_table(table: &MortalityTable, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let extension = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    let path = output.unwrap_or_else(|| report::default_export_path(Path::new("."), extension));
    match format {
        ExportFormat::Csv => report::export_csv(table, &path)?,
        ExportFormat::Json => report::export_json(table, &path)?,
    }
    println!("\nData exported to: {}", path.display());
    Ok(())
}

fn run_pv(defaults: &CalcDefaults, args: PvArgs) -> Result<()> {
    let frequency = args.frequency.as_deref().unwrap_or(&defaults.frequency);
    let request = AnnuityRequest {
        age: args.age.unwrap_or(defaults.pv_age),
        payment: args.payment.unwrap_or(defaults.payment),
        interest_rate: args.rate.unwrap_or(defaults.interest_rate),
        term: args.term.unwrap_or(defaults.term),
        freq_factor: parse_freq_factor(frequency)?,
        table: args.table.as_deref().unwrap_or(&defaults.table_type).parse()?,
        gender: args.gender.as_deref().unwrap_or(&defaults.gender).parse()?,
    };

    let evaluator = AnnuityEvaluator::new(defaults.assumptions()?);
    let result = evaluator.evaluate(&request)?;
    let summary = PresentValueSummary::new(&request, &result);

    println!("Present Value:      {}", summary.present_value);
    println!("Expected Duration:  {}", summary.expected_duration);
    println!("Monthly Equivalent: {}", summary.monthly_equivalent);
    println!("\n{}", summary.narrative);
    Ok(())
}

fn run_batch(defaults: &CalcDefaults, args: BatchArgs) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let rows = read_batch_csv(file)?;

    let evaluator = AnnuityEvaluator::new(defaults.assumptions()?);
    let start = std::time::Instant::now();
    let results = evaluate_rows(&evaluator, &rows);
    log::info!("Batch valued in {:?}", start.elapsed());

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_batch_csv(file, &rows, &results)?;
            let failed = results.iter().filter(|r| r.is_err()).count();
            println!("{} rows valued ({} failed), written to {}", rows.len(), failed, path.display());
        }
        None => write_batch_csv(io::stdout().lock(), &rows, &results)?,
    }
    Ok(())
}

fn run_tables(defaults: &CalcDefaults) -> Result<()> {
    for info in defaults.assumptions()?.available_tables() {
        println!("{:<10} {:<22} {}", info.id, info.name, info.description);
    }
    Ok(())
}

fn run_option(args: OptionArgs) -> Result<()> {
    let quote = price_option(
        &args.option_type,
        args.spot,
        args.strike,
        args.expiry,
        args.rate,
        args.volatility,
        args.dividend,
    )?;

    println!("Price: {:.4}", quote.price);
    println!("Delta: {:.4}", quote.delta);
    println!("Gamma: {:.4}", quote.gamma);
    println!("Theta: {:.4} / day", quote.theta);
    println!("Vega:  {:.4} / 1% vol", quote.vega);
    Ok(())
}

fn run_portfolio(args: PortfolioArgs) -> Result<()> {
    let mut reader = csv::Reader::from_path(&args.returns)
        .with_context(|| format!("failed to open {}", args.returns.display()))?;
    let mut returns: Vec<Vec<f64>> = Vec::new();
    for record in reader.deserialize() {
        returns.push(record?);
    }
    if returns.is_empty() {
        bail!("{} contains no returns", args.returns.display());
    }

    let metrics = portfolio_metrics(&returns, args.weights.as_deref())?;
    println!("Expected Return: {:.4}%", metrics.expected_return * 100.0);
    println!("Volatility:      {:.4}%", metrics.volatility * 100.0);
    println!("Sharpe Ratio:    {:.4}", metrics.sharpe_ratio);
    Ok(())
}
