//! Rule-based category assignment.

use models::{Category, Transaction};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::matcher;

/// Sentinel category for transactions matching no category rules.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Assign a category name to every transaction that does not already
/// carry one; transactions with a `category` field are never
/// re-evaluated.
///
/// Categories are evaluated in declared order. When several match, the
/// last one wins and a warning lists all of them so the operator can
/// tighten the rules.
pub fn categorize(txns: &mut [Transaction], categories: &[Category]) -> Result<()> {
    for txn in txns.iter_mut() {
        if txn.contains_key("category") {
            continue;
        }

        let mut matched: Vec<&str> = Vec::new();
        for category in categories {
            if matcher::rule_set_matches(txn, &category.includes, &category.excludes)? {
                matched.push(category.name.as_str());
            }
        }

        let assigned = match matched.last() {
            Some(last) => {
                if matched.len() > 1 {
                    warn!(
                        "Transaction '{}' ({}) matches multiple categories {:?}; keeping '{}'",
                        matcher::field_text(txn, "name"),
                        matcher::field_text(txn, "date"),
                        matched,
                        last
                    );
                }
                (*last).to_string()
            }
            None => UNCATEGORIZED.to_string(),
        };
        txn.insert("category".to_string(), Value::String(assigned));
    }
    Ok(())
}
