//! Eager budget validation, run before any transaction is mutated.

use std::collections::HashSet;

use models::{Budget, FieldRule};
use regex::RegexBuilder;
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Check the budget configuration up front: recognized action types,
/// replacement lists present on split/replace actions, every account
/// and criterion pattern a compilable string (or list of strings),
/// category names unique (they are grouping keys in the reports).
pub fn validate(budget: &Budget) -> Result<()> {
    for account in &budget.accounts {
        compile_check(&account.name)?;
    }

    let mut seen = HashSet::new();
    for category in &budget.categories {
        if !seen.insert(category.name.as_str()) {
            return Err(ConfigError::DuplicateCategory(category.name.clone()).into());
        }
        validate_rules(&category.includes)?;
        validate_rules(&category.excludes)?;
    }

    for action in &budget.actions {
        match action.kind.as_str() {
            "split" => {
                if action.into.is_none() {
                    return Err(ConfigError::MissingReplacements {
                        kind: "split",
                        list: "into",
                    }
                    .into());
                }
            }
            "replace" => {
                if action.with.is_none() {
                    return Err(ConfigError::MissingReplacements {
                        kind: "replace",
                        list: "with",
                    }
                    .into());
                }
            }
            "hide" => {}
            other => return Err(ConfigError::UnknownActionType(other.to_string()).into()),
        }
        validate_rules(&action.includes)?;
        validate_rules(&action.excludes)?;
    }

    Ok(())
}

fn validate_rules(rules: &[FieldRule]) -> Result<()> {
    for rule in rules {
        for (field, criterion) in rule {
            match criterion {
                Value::String(pattern) => compile_check(pattern)?,
                Value::Array(patterns) => {
                    for pattern in patterns {
                        let Value::String(pattern) = pattern else {
                            return Err(ConfigError::UnsupportedCriteria {
                                field: field.clone(),
                            }
                            .into());
                        };
                        compile_check(pattern)?;
                    }
                }
                _ => {
                    return Err(ConfigError::UnsupportedCriteria {
                        field: field.clone(),
                    }
                    .into())
                }
            }
        }
    }
    Ok(())
}

fn compile_check(pattern: &str) -> Result<()> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(())
}
