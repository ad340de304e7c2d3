//! Core type definitions: dates, day count conventions, and their errors.

pub mod error;
pub mod time;

pub use error::DateError;
pub use time::{Date, DayCountConvention};
