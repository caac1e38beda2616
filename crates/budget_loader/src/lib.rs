//! Budget configuration loading.
//!
//! Reads the budget JSON file into a [`models::Budget`]. Missing
//! top-level keys (`accounts`, `categories`, `actions`) default to
//! empty lists; structural validation of the rules themselves is the
//! engine's job and runs before any transaction is touched.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use models::Budget;

/// Loads a budget definition from a JSON file.
pub fn load_budget<P: AsRef<Path>>(path: P) -> Result<Budget> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading budget file: {}", path.display()))?;
    parse_budget(&raw).with_context(|| format!("Parsing budget JSON in {}", path.display()))
}

/// Parses a budget definition from raw JSON text.
pub fn parse_budget(raw: &str) -> Result<Budget> {
    let budget: Budget = serde_json::from_str(raw)?;
    Ok(budget)
}
