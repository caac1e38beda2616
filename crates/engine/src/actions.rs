//! Pre-categorization transaction rewriting (split, replace) and
//! post-categorization hide filtering.

use std::collections::HashSet;

use models::{Action, Transaction};
use serde_json::Value;

use crate::error::{ConfigError, Result, UnsupportedFeature};
use crate::matcher;

/// Apply split and replace actions to the working set.
///
/// Matched transactions are removed; every template in the action's
/// `into`/`with` list yields one replacement per match, cloned from
/// the original with the template's fields overlaid. Replacement
/// amounts are never reconciled against the original. The set is
/// re-sorted by date once all actions have run.
pub fn apply_pre_actions(mut txns: Vec<Transaction>, actions: &[Action]) -> Result<Vec<Transaction>> {
    for action in actions {
        let templates = match action.kind.as_str() {
            "split" => action.into.as_deref().ok_or(ConfigError::MissingReplacements {
                kind: "split",
                list: "into",
            })?,
            "replace" => action.with.as_deref().ok_or(ConfigError::MissingReplacements {
                kind: "replace",
                list: "with",
            })?,
            _ => continue,
        };

        let mut kept = Vec::with_capacity(txns.len());
        let mut replacements = Vec::new();
        for txn in txns {
            if matcher::rule_set_matches(&txn, &action.includes, &action.excludes)? {
                for template in templates {
                    replacements.push(build_replacement(&txn, template)?);
                }
            } else {
                kept.push(txn);
            }
        }
        kept.append(&mut replacements);
        txns = kept;
    }

    sort_by_date(&mut txns);
    Ok(txns)
}

/// Clone the matched original and overlay the template's fields. The
/// template must carry an exact numeric `amount`; percentage strings
/// and leftover-balancing are deliberately unsupported.
fn build_replacement(original: &Transaction, template: &Transaction) -> Result<Transaction> {
    match template.get("amount") {
        Some(Value::Number(_)) => {}
        Some(Value::String(s)) if s.trim_end().ends_with('%') => {
            return Err(UnsupportedFeature::PercentageAmount.into());
        }
        Some(other) => {
            return Err(ConfigError::InvalidReplacementAmount(other.to_string()).into());
        }
        None => return Err(UnsupportedFeature::MissingReplacementAmount.into()),
    }

    let mut replacement = original.clone();
    for (field, value) in template {
        replacement.insert(field.clone(), value.clone());
    }
    Ok(replacement)
}

/// Stable ascending sort by the `date` field. Transactions with a
/// missing or non-string date sort to the end, preserving their
/// relative order.
pub fn sort_by_date(txns: &mut [Transaction]) {
    txns.sort_by(|a, b| {
        let da = a.get("date").and_then(Value::as_str);
        let db = b.get("date").and_then(Value::as_str);
        match (da, db) {
            (Some(left), Some(right)) => left.cmp(right),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Drop every transaction selected by a hide action, preserving the
/// relative order of survivors.
///
/// A hide action selects the union of transactions whose assigned
/// `category` appears in its `categories` list and transactions
/// matching its include/exclude rules. Both selections are evaluated
/// against the categorized set.
pub fn apply_hide_actions(txns: Vec<Transaction>, actions: &[Action]) -> Result<Vec<Transaction>> {
    let mut hidden: HashSet<usize> = HashSet::new();
    for action in actions {
        if action.kind != "hide" {
            continue;
        }
        for (idx, txn) in txns.iter().enumerate() {
            let by_category = txn
                .get("category")
                .and_then(Value::as_str)
                .is_some_and(|assigned| action.categories.iter().any(|name| name == assigned));
            if by_category || matcher::rule_set_matches(txn, &action.includes, &action.excludes)? {
                hidden.insert(idx);
            }
        }
    }

    Ok(txns
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !hidden.contains(idx))
        .map(|(_, txn)| txn)
        .collect())
}
