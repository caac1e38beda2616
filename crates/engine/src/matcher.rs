//! Include/exclude rule evaluation against transaction records.

use models::{FieldRule, Transaction};
use regex::RegexBuilder;
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Coerce a transaction field to text for matching. Strings are taken
/// verbatim, other scalars use their JSON form, absent fields match as
/// the empty string.
pub fn field_text(txn: &Transaction, field: &str) -> String {
    match txn.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Case-insensitive regex search. Partial matches count; anchor the
/// pattern to force a full match.
pub(crate) fn search(text: &str, pattern: &str) -> Result<bool> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(re.is_match(text))
}

/// Evaluate one criterion value against a field's text. A string is a
/// single pattern; a list of strings requires every pattern to match.
fn criterion_matches(field: &str, text: &str, criterion: &Value) -> Result<bool> {
    match criterion {
        Value::String(pattern) => search(text, pattern),
        Value::Array(patterns) => {
            for pattern in patterns {
                let Value::String(pattern) = pattern else {
                    return Err(ConfigError::UnsupportedCriteria {
                        field: field.to_string(),
                    }
                    .into());
                };
                if !search(text, pattern)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(ConfigError::UnsupportedCriteria {
            field: field.to_string(),
        }
        .into()),
    }
}

/// One field rule fires only when every `(field, pattern)` entry in it
/// matches the transaction.
pub fn rule_matches(txn: &Transaction, rule: &FieldRule) -> Result<bool> {
    for (field, criterion) in rule {
        if !criterion_matches(field, &field_text(txn, field), criterion)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Full include/exclude evaluation. Excludes are checked first and any
/// firing exclude vetoes the match; otherwise any firing include is
/// sufficient.
pub fn rule_set_matches(
    txn: &Transaction,
    includes: &[FieldRule],
    excludes: &[FieldRule],
) -> Result<bool> {
    for rule in excludes {
        if rule_matches(txn, rule)? {
            return Ok(false);
        }
    }
    for rule in includes {
        if rule_matches(txn, rule)? {
            return Ok(true);
        }
    }
    Ok(false)
}
