//! Market data collaborators consumed by the simulation engine.
//!
//! The engine treats market data as external services: a forward curve
//! mapping elapsed time to the expected future level of an underlying, and
//! a volatility surface exposing forward at-the-money volatility between
//! two times. Both are trait objects so callers can plug in their own
//! implementations.

pub mod curves;
pub mod error;
pub mod surfaces;

pub use curves::{CurveFn, FlatForward, ForwardCurve, InterpolatedForward};
pub use error::MarketDataError;
pub use surfaces::{FlatVol, TermVol, VolatilitySurface};
