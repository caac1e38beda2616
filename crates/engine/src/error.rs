use thiserror::Error;

/// Fatal pipeline error. Configuration mistakes and intentionally
/// unsupported features are distinct variants so callers can tell an
/// operator typo from a feature the engine refuses to implement.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("unsupported feature: {0}")]
    Unsupported(#[from] UnsupportedFeature),
}

/// A mistake in the budget configuration. Detected by eager validation
/// before any transaction is mutated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown action type '{0}' (expected split, replace or hide)")]
    UnknownActionType(String),
    #[error("unsupported criteria for field '{field}': pattern must be a string or a list of strings")]
    UnsupportedCriteria { field: String },
    #[error("'{kind}' action is missing its '{list}' replacement list")]
    MissingReplacements {
        kind: &'static str,
        list: &'static str,
    },
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("duplicate category name '{0}'")]
    DuplicateCategory(String),
    #[error("invalid replacement amount {0}: expected a number")]
    InvalidReplacementAmount(String),
}

/// A configuration shape the engine recognizes but deliberately does
/// not implement.
#[derive(Debug, Error)]
pub enum UnsupportedFeature {
    #[error("percentage amounts in split/replace templates are not implemented")]
    PercentageAmount,
    #[error("replacements must include exact amount")]
    MissingReplacementAmount,
}

pub type Result<T> = std::result::Result<T, Error>;
