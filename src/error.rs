use thiserror::Error;

use crate::types::Category;

/// Errors raised at the boundary of the engine: input validation, parsing and config.
/// The calculation itself never fails.
#[derive(Debug, Error)]
pub enum GhgError {
    #[error("negative quantity {quantity} for {category}/{item}")]
    NegativeQuantity {
        category: Category,
        item: String,
        quantity: f64,
    },
    #[error("quantity for {category}/{item} is not a finite number")]
    NonFiniteQuantity { category: Category, item: String },
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for GhgError {
    fn from(err: serde_json::Error) -> Self {
        GhgError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for GhgError {
    fn from(err: toml::de::Error) -> Self {
        GhgError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GhgError>;
