//! Transaction categorization engine.
//!
//! One in-memory working set flows through fixed stages: account sign
//! normalization, split/replace rewriting, rule-based categorization,
//! hide filtering and monthly aggregation. Stages run sequentially
//! over the whole collection; the first fatal error aborts the run
//! with no report objects produced.

pub mod actions;
pub mod categorize;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod validate;

pub use crate::actions::{apply_hide_actions, apply_pre_actions, sort_by_date};
pub use crate::categorize::{categorize, UNCATEGORIZED};
pub use crate::error::{ConfigError, Error, Result, UnsupportedFeature};
pub use crate::matcher::rule_set_matches;
pub use crate::normalize::normalize_account_signs;
pub use crate::report::aggregate;
pub use crate::validate::validate;

use models::{Budget, MonthlyReport, Transaction};

/// Run the whole pipeline against one budget configuration.
///
/// The budget is validated before any transaction is touched;
/// normalization therefore runs exactly once per call.
pub fn run_pipeline(budget: &Budget, mut txns: Vec<Transaction>) -> Result<Vec<MonthlyReport>> {
    validate::validate(budget)?;
    normalize::normalize_account_signs(&mut txns, &budget.accounts)?;
    let mut txns = actions::apply_pre_actions(txns, &budget.actions)?;
    categorize::categorize(&mut txns, &budget.categories)?;
    let txns = actions::apply_hide_actions(txns, &budget.actions)?;
    Ok(report::aggregate(&txns, &budget.categories))
}
