//! Error taxonomy for index computation and the similarity pipeline.
//!
//! Only configuration problems are fatal. Numeric degeneracies (zero
//! denominators, empty groups) are resolved inside each calculator and never
//! surface here.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EthnoError>;

#[derive(Debug, Error)]
pub enum EthnoError {
    /// A configured informant/taxon/use column is absent from the table.
    #[error("{context}: Missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        context: String,
        columns: Vec<String>,
    },

    #[error("{context}: no observation records")]
    EmptyTable { context: String },

    #[error("unknown index '{0}' (expected one of CI, FC, NU, UR, RFC, RI, UV, CV)")]
    UnknownIndex(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EthnoError {
    pub(crate) fn missing_columns(context: &str, columns: Vec<String>) -> Self {
        EthnoError::MissingColumns {
            context: context.to_string(),
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_every_column() {
        let err = EthnoError::missing_columns(
            "FC",
            vec!["informant".to_string(), "ailments_treated".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.contains("Missing required columns"));
        assert!(msg.contains("informant, ailments_treated"));
        assert!(msg.starts_with("FC"));
    }
}
