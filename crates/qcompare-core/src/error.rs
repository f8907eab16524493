//! Error types for the core crate.
//!
//! Ranking and comparison never fail; these errors only come from parsing
//! user input (filter forms, comparison slugs, option names).

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while interpreting user-supplied input.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A filter-form field could not be parsed or is out of range.
    #[error("Invalid filter value for {field}: {reason}")]
    InvalidCriteria { field: &'static str, reason: String },

    /// A comparison slug was not of the form `<a>-vs-<b>`.
    #[error("Invalid comparison '{0}': expected '<first>-vs-<second>'")]
    InvalidVersus(String),

    /// Unknown status filter name.
    #[error("Unknown status filter: '{0}' (expected all, online or offline)")]
    UnknownStatusFilter(String),

    /// Unknown sort key name.
    #[error("Unknown sort key: '{0}' (expected qubits, queue or price)")]
    UnknownSortKey(String),
}

impl CoreError {
    pub(crate) fn criteria(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidCriteria {
            field,
            reason: reason.into(),
        }
    }
}
