use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use report_pipeline::{Config, TransactionSource};
use tracing_subscriber::EnvFilter;
use transaction_import::ColumnMap;

/// Categorize bank transactions and write monthly budget reports.
#[derive(Parser, Debug)]
#[command(name = "budget-report", version, about)]
struct Args {
    /// Budget configuration file (accounts, categories, actions)
    #[arg(short, long)]
    budget: PathBuf,

    /// Transaction files, as PATH or PATH=ACCOUNT (CSV or JSON)
    #[arg(required = true)]
    transactions: Vec<String>,

    /// Directory the monthly reports are written to
    #[arg(short, long, default_value = "./reports")]
    out: PathBuf,

    /// CSV column index holding the transaction date
    #[arg(long, default_value_t = 0)]
    date_col: usize,

    /// CSV column index holding the transaction amount
    #[arg(long, default_value_t = 1)]
    amount_col: usize,

    /// CSV column index holding the transaction name
    #[arg(long, default_value_t = 2)]
    name_col: usize,

    /// Only include transactions on or after this date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Only include transactions on or before this date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Pretty-print the report JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config {
        budget_file: args.budget,
        transactions: args
            .transactions
            .iter()
            .map(|arg| TransactionSource::parse(arg))
            .collect(),
        output_dir: args.out,
        columns: ColumnMap {
            date: args.date_col,
            amount: args.amount_col,
            name: args.name_col,
        },
        start: args.start,
        end: args.end,
        pretty: args.pretty,
    };

    for path in report_pipeline::run(config)? {
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}
