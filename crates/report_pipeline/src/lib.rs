//! Pipeline orchestration: load the budget and transaction files, run
//! the categorization engine and write one JSON report per month.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use models::{MonthlyReport, Transaction};
use serde_json::Value;
use transaction_import::ColumnMap;

/// One transactions input file, optionally labelled with the account
/// it belongs to.
#[derive(Debug, Clone)]
pub struct TransactionSource {
    pub path: PathBuf,
    pub account: Option<String>,
}

impl TransactionSource {
    /// Parse a `PATH` or `PATH=ACCOUNT` command line argument.
    pub fn parse(arg: &str) -> Self {
        match arg.split_once('=') {
            Some((path, account)) if !account.is_empty() => Self {
                path: PathBuf::from(path),
                account: Some(account.to_string()),
            },
            _ => Self {
                path: PathBuf::from(arg),
                account: None,
            },
        }
    }
}

pub struct Config {
    pub budget_file: PathBuf,
    pub transactions: Vec<TransactionSource>,
    pub output_dir: PathBuf,
    pub columns: ColumnMap,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub pretty: bool,
}

/// Load inputs, run the pipeline and write the monthly reports.
/// Returns the paths written, in month order.
///
/// Reports are written one month at a time: a run that fails mid-way
/// leaves the files of already-completed months on disk.
pub fn run(cfg: Config) -> Result<Vec<PathBuf>> {
    let budget = budget_loader::load_budget(&cfg.budget_file)?;

    let mut txns: Vec<Transaction> = Vec::new();
    for source in &cfg.transactions {
        txns.extend(load_source(source, &cfg.columns)?);
    }
    let mut txns = transaction_import::filter_date_range(txns, cfg.start, cfg.end);
    engine::sort_by_date(&mut txns);

    let reports = engine::run_pipeline(&budget, txns)?;

    let mut written = Vec::with_capacity(reports.len());
    for report in &reports {
        written.push(write_report(&cfg.output_dir, report, cfg.pretty)?);
    }
    Ok(written)
}

fn load_source(source: &TransactionSource, columns: &ColumnMap) -> Result<Vec<Transaction>> {
    let is_json = source.path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        let mut txns = transaction_import::load_json(&source.path)?;
        // An explicit PATH=ACCOUNT label wins over whatever the file
        // carries, same as the CSV path.
        if let Some(account) = &source.account {
            for txn in &mut txns {
                txn.insert("account".to_string(), Value::String(account.clone()));
            }
        }
        Ok(txns)
    } else {
        transaction_import::load_csv(&source.path, columns, source.account.as_deref())
    }
}

/// Write one report as `<month>.json` in the output directory,
/// creating the directory when needed.
fn write_report(dir: &Path, report: &MonthlyReport, pretty: bool) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Creating output dir: {}", dir.display()))?;

    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    let path = dir.join(format!("{}.json", report.month));
    fs::write(&path, json).with_context(|| format!("Writing report file: {}", path.display()))?;
    Ok(path)
}
