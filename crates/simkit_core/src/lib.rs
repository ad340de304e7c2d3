//! # simkit_core
//!
//! Foundation layer for the simkit Monte Carlo simulation workspace.
//!
//! This crate provides the external collaborators the simulation engine
//! consumes but does not own:
//!
//! - [`types::time`]: type-safe dates and day count conventions
//! - [`market_data::curves`]: forward curves mapping elapsed time to the
//!   expected future level of an underlying
//! - [`market_data::surfaces`]: volatility surfaces exposing forward ATM
//!   volatility between two times
//!
//! The engine itself (block storage, features, processes, orchestration)
//! lives in `simkit_engine`; concrete stochastic models in `simkit_models`.
//!
//! # Examples
//!
//! ```
//! use simkit_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2026, 1, 1).unwrap();
//! let end = start.add_days(182);
//! let yf = DayCountConvention::Act365.year_fraction(start, end);
//! assert!((yf - 182.0 / 365.0).abs() < 1e-12);
//! ```

pub mod market_data;
pub mod types;

pub use market_data::{
    CurveFn, FlatForward, FlatVol, ForwardCurve, InterpolatedForward, MarketDataError, TermVol,
    VolatilitySurface,
};
pub use types::error::DateError;
pub use types::time::{Date, DayCountConvention};
