//! Forward curve trait and implementations.
//!
//! A forward curve maps elapsed time (in years from the simulation anchor)
//! to the expected future level of an underlying. At `t = 0` it returns the
//! starting spot.

use super::error::MarketDataError;

/// Forward curve for a simulated underlying.
///
/// # Contract
///
/// - `forward(0.0)` is the current spot level
/// - `forward(t)` is defined for all `t >= 0` within the curve horizon
/// - queries with `t < 0` fail with `MarketDataError::InvalidTime`
///
/// # Examples
///
/// ```
/// use simkit_core::market_data::{FlatForward, ForwardCurve};
///
/// let curve = FlatForward::new(100.0);
/// assert_eq!(curve.forward(0.0).unwrap(), 100.0);
/// assert_eq!(curve.forward(2.5).unwrap(), 100.0);
/// ```
pub trait ForwardCurve: Send + Sync {
    /// Returns the expected forward level at elapsed time `t` (years).
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidTime` if `t < 0`.
    fn forward(&self, t: f64) -> Result<f64, MarketDataError>;
}

/// Flat forward curve: the same level at every horizon.
///
/// Useful for zero-rate/zero-dividend underlyings, prototyping, and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatForward {
    level: f64,
}

impl FlatForward {
    /// Constructs a flat curve at the given level.
    #[inline]
    pub fn new(level: f64) -> Self {
        Self { level }
    }

    /// Returns the constant level.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl ForwardCurve for FlatForward {
    fn forward(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidTime { t });
        }
        Ok(self.level)
    }
}

/// Adapter turning a caller-supplied closure into a [`ForwardCurve`].
///
/// # Examples
///
/// ```
/// use simkit_core::market_data::{CurveFn, ForwardCurve};
///
/// // Spot 100 growing at 5% continuously compounded.
/// let curve = CurveFn::new(|t| 100.0 * (0.05 * t).exp());
/// assert!((curve.forward(1.0).unwrap() - 105.127).abs() < 1e-3);
/// ```
pub struct CurveFn<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    f: F,
}

impl<F> CurveFn<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    /// Wraps a function of elapsed time as a forward curve.
    #[inline]
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ForwardCurve for CurveFn<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn forward(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidTime { t });
        }
        Ok((self.f)(t))
    }
}

/// Piecewise log-linear forward curve built from pillar points.
///
/// Pillar levels must be strictly positive. Interpolates `ln F(t)`
/// linearly between pillars, which keeps levels positive and reproduces
/// constant-growth curves exactly. Queries beyond
/// the last pillar extrapolate flat in the last log-slope; queries before
/// the first pillar use the first level.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedForward {
    times: Vec<f64>,
    log_levels: Vec<f64>,
}

impl InterpolatedForward {
    /// Constructs a curve from `(time, level)` pillars.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` with fewer than two pillars
    /// - `UnsortedPillars` if times are not strictly increasing
    /// - `InvalidTime` if the first pillar time is negative
    pub fn new(pillars: &[(f64, f64)]) -> Result<Self, MarketDataError> {
        if pillars.len() < 2 {
            return Err(MarketDataError::InsufficientData {
                got: pillars.len(),
                need: 2,
            });
        }
        if pillars[0].0 < 0.0 {
            return Err(MarketDataError::InvalidTime { t: pillars[0].0 });
        }
        for (i, window) in pillars.windows(2).enumerate() {
            if window[1].0 <= window[0].0 {
                return Err(MarketDataError::UnsortedPillars { index: i + 1 });
            }
        }
        Ok(Self {
            times: pillars.iter().map(|p| p.0).collect(),
            log_levels: pillars.iter().map(|p| p.1.ln()).collect(),
        })
    }
}

impl ForwardCurve for InterpolatedForward {
    fn forward(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidTime { t });
        }
        let n = self.times.len();
        if t <= self.times[0] {
            return Ok(self.log_levels[0].exp());
        }
        // Segment index: last pillar at or before t, clamped so queries
        // past the end reuse the final segment's slope.
        let hi = self.times.partition_point(|&x| x < t).min(n - 1);
        let lo = hi - 1;
        let w = (t - self.times[lo]) / (self.times[hi] - self.times[lo]);
        let log_level = self.log_levels[lo] + w * (self.log_levels[hi] - self.log_levels[lo]);
        Ok(log_level.exp())
    }
}
