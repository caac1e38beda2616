use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single transaction record.
///
/// Carried as a plain JSON object so that fields beyond the canonical
/// `date`/`amount`/`name` survive every pipeline stage unchanged. Key
/// order is preserved through to the emitted reports.
pub type Transaction = Map<String, Value>;

/// One include/exclude rule: transaction field name -> pattern.
///
/// A pattern value is a regex string, or a list of regex strings that
/// must all match the field. Every field listed in one rule must match
/// for the rule to fire.
pub type FieldRule = Map<String, Value>;

/// A named source of transactions. Accounts with type `credit` have
/// the sign of their transaction amounts flipped during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Pattern matched against the transaction `account` field.
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A named envelope with include/exclude matching rules and a semantic
/// type (`income`, `expense`, ...) used for report grouping.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub includes: Vec<FieldRule>,
    #[serde(default)]
    pub excludes: Vec<FieldRule>,
}

/// A configured transformation applied at a fixed pipeline stage:
/// `split` and `replace` rewrite transactions before categorization,
/// `hide` drops transactions after it.
#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub includes: Vec<FieldRule>,
    #[serde(default)]
    pub excludes: Vec<FieldRule>,
    /// Replacement templates for `split` actions.
    #[serde(default)]
    pub into: Option<Vec<Transaction>>,
    /// Replacement templates for `replace` actions.
    #[serde(default)]
    pub with: Option<Vec<Transaction>>,
    /// Category names selected by `hide` actions.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// The full budget configuration. Missing top-level keys default to
/// empty lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One emitted report document per month.
///
/// `summary` and `transactions` are order-preserving maps: the
/// `uncategorized` entry, when present, is always their last key.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    /// `YYYY-MM` grouping key, also the suggested output file stem.
    pub month: String,
    pub summary: Map<String, Value>,
    pub transactions: Map<String, Value>,
}
