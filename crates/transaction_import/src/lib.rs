//! Transaction file loading.
//!
//! Statement CSVs arrive with bank-specific layouts, so the canonical
//! `date`/`amount`/`name` fields are picked by configurable column
//! index while the header row names every carried-through column.
//! JSON inputs are taken as a flat array of transaction objects.

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use models::Transaction;
use serde_json::Value;

/// Column indices of the canonical CSV fields.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub date: usize,
    pub amount: usize,
    pub name: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: 0,
            amount: 1,
            name: 2,
        }
    }
}

/// Parse one CSV statement file.
///
/// The header row is consumed and names the carried-through columns
/// (falling back to `colN` for blank headers); the configured indices
/// overlay the canonical `date`, `amount` (parsed as a number) and
/// `name` fields. When `account` is given it labels every row.
pub fn load_csv<P: AsRef<Path>>(
    path: P,
    columns: &ColumnMap,
    account: Option<&str>,
) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Opening transactions file: {}", path.display()))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Reading CSV header in {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut txns = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        // Header is line 1, first data row is line 2.
        let line = idx + 2;
        let record =
            record.with_context(|| format!("Reading line {} in {}", line, path.display()))?;

        let mut txn = Transaction::new();
        for (col, value) in record.iter().enumerate() {
            let key = headers
                .get(col)
                .filter(|h| !h.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("col{col}"));
            txn.insert(key, Value::String(value.to_string()));
        }

        let date = field_at(&record, columns.date, "date", line, path)?;
        let amount_raw = field_at(&record, columns.amount, "amount", line, path)?;
        let name = field_at(&record, columns.name, "name", line, path)?;
        let amount: f64 = amount_raw.trim().parse().with_context(|| {
            format!(
                "Line {} in {}: amount '{}' is not a number",
                line,
                path.display(),
                amount_raw
            )
        })?;

        txn.insert("date".to_string(), Value::String(date.trim().to_string()));
        txn.insert("amount".to_string(), Value::from(amount));
        txn.insert("name".to_string(), Value::String(name.to_string()));
        if let Some(account) = account {
            txn.insert("account".to_string(), Value::String(account.to_string()));
        }
        txns.push(txn);
    }
    Ok(txns)
}

fn field_at<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    what: &str,
    line: usize,
    path: &Path,
) -> Result<&'r str> {
    record.get(col).ok_or_else(|| {
        anyhow!(
            "Line {} in {}: missing {} column {}",
            line,
            path.display(),
            what,
            col
        )
    })
}

/// Parse a JSON transactions file: a top-level array of flat objects.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading transactions file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing transactions JSON in {}", path.display()))?;
    let arr = value.as_array().ok_or_else(|| {
        anyhow!(
            "{}: expected a top-level array of transactions",
            path.display()
        )
    })?;
    arr.iter()
        .map(|entry| {
            entry.as_object().cloned().ok_or_else(|| {
                anyhow!("{}: transaction entries must be objects", path.display())
            })
        })
        .collect()
}

/// Keep transactions whose `date` falls inside the inclusive range.
/// Transactions with an unparseable date are dropped when any bound is
/// active.
pub fn filter_date_range(
    txns: Vec<Transaction>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Transaction> {
    if start.is_none() && end.is_none() {
        return txns;
    }
    txns.into_iter()
        .filter(|txn| {
            let parsed = txn
                .get("date")
                .and_then(Value::as_str)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            let Some(date) = parsed else {
                return false;
            };
            start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_load_csv_default_columns() {
        let file = csv_file(
            "Date,Amount,Description,Memo\n\
             2024-04-01,-5.00,Coffee Shop,morning\n\
             2024-04-02,2000.00,ACME PAYROLL,\n",
        );
        let txns = load_csv(file.path(), &ColumnMap::default(), Some("Visa")).unwrap();

        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].get("date").unwrap(), "2024-04-01");
        assert_eq!(txns[0].get("amount").and_then(Value::as_f64), Some(-5.0));
        assert_eq!(txns[0].get("name").unwrap(), "Coffee Shop");
        assert_eq!(txns[0].get("account").unwrap(), "Visa");
        // Header-named columns are carried through.
        assert_eq!(txns[0].get("Memo").unwrap(), "morning");
        assert_eq!(txns[0].get("Description").unwrap(), "Coffee Shop");
    }

    #[test]
    fn test_load_csv_custom_columns() {
        let file = csv_file(
            "Posted,Payee,Debit\n\
             2024-04-01,Corner Store,-12.34\n",
        );
        let columns = ColumnMap {
            date: 0,
            amount: 2,
            name: 1,
        };
        let txns = load_csv(file.path(), &columns, None).unwrap();

        assert_eq!(txns[0].get("name").unwrap(), "Corner Store");
        assert_eq!(txns[0].get("amount").and_then(Value::as_f64), Some(-12.34));
        assert!(txns[0].get("account").is_none());
    }

    #[test]
    fn test_load_csv_bad_amount_names_line() {
        let file = csv_file(
            "Date,Amount,Description\n\
             2024-04-01,five,Coffee Shop\n",
        );
        let err = load_csv(file.path(), &ColumnMap::default(), None).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Line 2"));
        assert!(msg.contains("five"));
    }

    #[test]
    fn test_load_csv_missing_column_is_error() {
        let file = csv_file("Date,Amount\n2024-04-01,-5.00\n");
        let columns = ColumnMap {
            date: 0,
            amount: 1,
            name: 5,
        };
        assert!(load_csv(file.path(), &columns, None).is_err());
    }

    #[test]
    fn test_load_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"date": "2024-04-01", "amount": -5.0, "name": "Coffee", "memo": "x"}}]"#
        )
        .unwrap();

        let txns = load_json(file.path()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].get("memo").unwrap(), "x");
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"transactions": []}}"#).unwrap();
        assert!(load_json(file.path()).is_err());
    }

    fn dated(dates: &[&str]) -> Vec<Transaction> {
        dates
            .iter()
            .map(|d| json!({"date": d}).as_object().unwrap().clone())
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_filter_date_range_inclusive() {
        let txns = dated(&["2024-03-31", "2024-04-01", "2024-04-30", "2024-05-01"]);
        let kept = filter_date_range(txns, Some(date("2024-04-01")), Some(date("2024-04-30")));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_date_range_one_sided() {
        let txns = dated(&["2024-03-31", "2024-04-01"]);
        let kept = filter_date_range(txns.clone(), Some(date("2024-04-01")), None);
        assert_eq!(kept.len(), 1);
        let kept = filter_date_range(txns, None, Some(date("2024-03-31")));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_filter_without_bounds_keeps_everything() {
        let txns = dated(&["bogus", "2024-04-01"]);
        assert_eq!(filter_date_range(txns, None, None).len(), 2);
    }
}
