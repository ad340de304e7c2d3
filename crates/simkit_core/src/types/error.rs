//! Error types for date construction and parsing.

use thiserror::Error;

/// Date construction and parsing errors.
///
/// # Examples
///
/// ```
/// use simkit_core::types::error::DateError;
///
/// let err = DateError::InvalidDate { year: 2026, month: 2, day: 30 };
/// assert!(format!("{}", err).contains("2026-2-30"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The year/month/day combination does not form a valid calendar date.
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component (1-12).
        month: u32,
        /// Day component.
        day: u32,
    },

    /// The input string is not a valid ISO 8601 date.
    #[error("Cannot parse date from '{input}'")]
    ParseError {
        /// The offending input string.
        input: String,
    },
}
