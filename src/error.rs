//! Error types for projection and indexing operations

use thiserror::Error;

/// Errors raised when a column selection cannot be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A requested column name does not exist in the source table
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// An indexed-record selection was requested with zero columns
    #[error("empty column selection")]
    EmptySelection,
}
