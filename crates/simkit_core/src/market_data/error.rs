//! Market data error types.
//!
//! Structured error handling for forward curve and volatility surface
//! lookups.

use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidTime`: negative elapsed time queried on a curve
/// - `InvalidInterval`: volatility interval with `t1 <= t0` or `t0 < 0`
/// - `NegativeForwardVariance`: degenerate term structure over an interval
/// - `InsufficientData`: not enough pillars to construct an object
///
/// # Examples
///
/// ```
/// use simkit_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidTime { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Negative elapsed time.
    #[error("Invalid time: t = {t}")]
    InvalidTime {
        /// The invalid time value.
        t: f64,
    },

    /// Invalid forward volatility interval.
    #[error("Invalid interval: [{t0}, {t1}]")]
    InvalidInterval {
        /// Interval start.
        t0: f64,
        /// Interval end.
        t1: f64,
    },

    /// Total variance decreases over the interval, so no real forward
    /// volatility exists.
    #[error("Negative forward variance over [{t0}, {t1}]: {variance}")]
    NegativeForwardVariance {
        /// Interval start.
        t0: f64,
        /// Interval end.
        t1: f64,
        /// The offending forward variance.
        variance: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided.
        got: usize,
        /// Minimum number of points required.
        need: usize,
    },

    /// Pillar values must be strictly increasing in time.
    #[error("Pillar times not strictly increasing at index {index}")]
    UnsortedPillars {
        /// Index of the first out-of-order pillar.
        index: usize,
    },
}
