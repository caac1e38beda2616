//! Monthly aggregation of categorized transactions.

use std::collections::{BTreeMap, HashMap};

use chrono::{SecondsFormat, Utc};
use models::{Category, MonthlyReport, Transaction};
use serde_json::{json, Map, Value};

use crate::categorize::UNCATEGORIZED;

/// Round to 2 decimal places for emission. Totals are rounded at
/// category level and again at type level; the small float
/// inconsistencies this can introduce are accepted behavior.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn amount(txn: &Transaction) -> f64 {
    txn.get("amount").and_then(Value::as_f64).unwrap_or(0.0)
}

/// `YYYY-MM` month key: the first 7 characters of the `date` field.
fn month_key(txn: &Transaction) -> String {
    let date = txn.get("date").and_then(Value::as_str).unwrap_or("");
    date.get(..7).unwrap_or(date).to_string()
}

/// Build one report per month, in ascending month order.
///
/// The input list is never mutated; emitted transaction bodies are
/// structural clones with the `category` field dropped (the grouping
/// position already carries it).
pub fn aggregate(txns: &[Transaction], categories: &[Category]) -> Vec<MonthlyReport> {
    let kinds: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.name.as_str(), c.kind.as_str()))
        .collect();

    let mut months: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in txns {
        months.entry(month_key(txn)).or_default().push(txn);
    }

    let last_updated = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    months
        .into_iter()
        .map(|(month, group)| build_report(month, &group, &kinds, &last_updated))
        .collect()
}

fn build_report(
    month: String,
    txns: &[&Transaction],
    kinds: &HashMap<&str, &str>,
    last_updated: &str,
) -> MonthlyReport {
    // Group by category, first-encounter order.
    let mut order: Vec<String> = Vec::new();
    let mut by_category: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for txn in txns {
        let category = txn
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        if !by_category.contains_key(&category) {
            order.push(category.clone());
        }
        by_category.entry(category).or_default().push(txn);
    }

    let mut summary: Map<String, Value> = Map::new();
    let mut transactions: Map<String, Value> = Map::new();
    let mut uncategorized_total = None;
    let mut uncategorized_bodies = None;

    for category in &order {
        let group = &by_category[category.as_str()];
        let total = round2(group.iter().map(|t| amount(t)).sum());
        let bodies: Vec<Value> = group.iter().map(|t| strip_category(t)).collect();

        if category == UNCATEGORIZED {
            uncategorized_total = Some(total);
            uncategorized_bodies = Some(Value::Array(bodies));
            continue;
        }

        // Categories assigned outside the budget (input data, replace
        // templates) have no declared type and land under "other".
        let kind = kinds.get(category.as_str()).copied().unwrap_or("other");
        let entry = summary
            .entry(kind.to_string())
            .or_insert_with(|| json!({"categories": {}, "total": 0.0}));
        entry["categories"][category.as_str()] = json!(total);

        let bucket = transactions
            .entry(kind.to_string())
            .or_insert_with(|| json!({}));
        bucket[category.as_str()] = Value::Array(bodies);
    }

    // Per-type totals over the already-rounded category totals.
    for entry in summary.values_mut() {
        let total = entry
            .get("categories")
            .and_then(Value::as_object)
            .map(|cats| cats.values().filter_map(Value::as_f64).sum::<f64>())
            .unwrap_or(0.0);
        entry["total"] = json!(round2(total));
    }

    let income_total = type_total(&summary, "income");
    let expense_total = type_total(&summary, "expense");
    let savings_total = round2(income_total + expense_total);
    let savings_rate = if income_total != 0.0 {
        round2(savings_total / income_total)
    } else {
        0.0
    };
    summary.insert(
        "savings".to_string(),
        json!({"total": savings_total, "rate": savings_rate}),
    );

    // Reinserting last keeps uncategorized the final key of both maps.
    if let Some(total) = uncategorized_total {
        summary.insert(UNCATEGORIZED.to_string(), json!(total));
    }
    if let Some(bodies) = uncategorized_bodies {
        transactions.insert(UNCATEGORIZED.to_string(), bodies);
    }

    MonthlyReport {
        last_updated: last_updated.to_string(),
        month,
        summary,
        transactions,
    }
}

fn type_total(summary: &Map<String, Value>, kind: &str) -> f64 {
    summary
        .get(kind)
        .and_then(|entry| entry.get("total"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn strip_category(txn: &Transaction) -> Value {
    let mut body = txn.clone();
    body.remove("category");
    Value::Object(body)
}
