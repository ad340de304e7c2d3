//! Error types for the simulation engine.
//!
//! All engine failures are programming or configuration defects: the
//! simulation is deterministic given its inputs, so nothing here is
//! retried. A run either completes or aborts at the step it is on.

use simkit_core::market_data::MarketDataError;
use simkit_core::types::time::Date;
use thiserror::Error;

/// Simulation engine errors.
///
/// # Variants
///
/// - `Alignment`: path count not a multiple of the vector lane width;
///   raised at block construction before any state is created
/// - `FeatureFrozen` / `FeatureNotFrozen`: a process violated the
///   setup / freeze / evolve ordering protocol
/// - `UnknownDate` / `UnknownDimension` / `UnknownFeature`: lookup of
///   something never registered
/// - `EmptyTimeGrid` / `NoProcesses`: a run with nothing to simulate
/// - `DimensionMismatch` / `ProcessNotPrepared`: a process invoked against
///   storage it was not prepared for
/// - `InvalidConfig`: builder-level parameter validation
/// - `MarketData`: propagated collaborator failure (curve or surface)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Path count not a multiple of the vector lane width.
    #[error("Path count {paths} is not a multiple of the vector lane width {width}")]
    Alignment {
        /// The offending path count.
        paths: usize,
        /// The detected lane width W.
        width: usize,
    },

    /// Mutation attempted after the feature collection was finished.
    #[error("Feature '{feature}' mutated after setup finished")]
    FeatureFrozen {
        /// Name of the feature (or the collection itself).
        feature: &'static str,
    },

    /// Derived data queried before the feature collection was finished.
    #[error("Feature '{feature}' queried before setup finished")]
    FeatureNotFrozen {
        /// Name of the feature.
        feature: &'static str,
    },

    /// Feature type never registered with the collection.
    #[error("Feature '{feature}' was never registered")]
    UnknownFeature {
        /// Name of the feature type.
        feature: &'static str,
    },

    /// Date never registered on the time grid.
    #[error("Date {date} is not on the simulation time grid")]
    UnknownDate {
        /// The unregistered date.
        date: Date,
    },

    /// Dimension name never declared.
    #[error("Dimension '{name}' was never declared")]
    UnknownDimension {
        /// The undeclared name.
        name: String,
    },

    /// Freeze attempted with no registered dates.
    #[error("Cannot finish setup with an empty time grid")]
    EmptyTimeGrid,

    /// Run attempted with no registered processes.
    #[error("Cannot run a simulation with no path processes")]
    NoProcesses,

    /// Process invoked against a block with unexpected dimensions.
    #[error("Dimension mismatch: process expects {expected}, block provides {got}")]
    DimensionMismatch {
        /// Extent the process was prepared for.
        expected: usize,
        /// Extent the block actually has.
        got: usize,
    },

    /// Process evolved before its prepare phase ran.
    #[error("Process '{name}' invoked before prepare")]
    ProcessNotPrepared {
        /// The process name.
        name: String,
    },

    /// Invalid configuration parameter.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidConfig {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// Market data collaborator failure.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}
