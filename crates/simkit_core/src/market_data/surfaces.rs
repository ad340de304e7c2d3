//! Volatility surface trait and implementations.
//!
//! The simulation engine only needs forward at-the-money volatility between
//! two times on the simulation grid; smile and skew handling stay behind
//! the trait.

use super::error::MarketDataError;

/// At-the-money volatility surface for path simulation.
///
/// # Contract
///
/// - `forward_atm_vol(t0, t1)` returns the annualised forward ATM
///   volatility over `[t0, t1]`
/// - requires `0 <= t0 < t1`, otherwise `MarketDataError::InvalidInterval`
/// - a degenerate term structure (decreasing total variance) fails with
///   `MarketDataError::NegativeForwardVariance`; the run is expected to
///   abort rather than clamp
///
/// # Examples
///
/// ```
/// use simkit_core::market_data::{FlatVol, VolatilitySurface};
///
/// let surface = FlatVol::new(0.20);
/// assert_eq!(surface.forward_atm_vol(0.0, 1.0).unwrap(), 0.20);
/// ```
pub trait VolatilitySurface: Send + Sync {
    /// Returns the forward ATM volatility over `[t0, t1]` (annualised).
    fn forward_atm_vol(&self, t0: f64, t1: f64) -> Result<f64, MarketDataError>;
}

fn validate_interval(t0: f64, t1: f64) -> Result<(), MarketDataError> {
    if t0 < 0.0 || t1 <= t0 {
        return Err(MarketDataError::InvalidInterval { t0, t1 });
    }
    Ok(())
}

/// Flat volatility surface: constant ATM volatility at every horizon.
///
/// Forward volatility over any interval equals the spot volatility, so
/// this surface is the natural choice for tests and prototyping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatVol {
    sigma: f64,
}

impl FlatVol {
    /// Constructs a flat surface at the given annualised volatility.
    #[inline]
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }

    /// Returns the constant volatility.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl VolatilitySurface for FlatVol {
    fn forward_atm_vol(&self, t0: f64, t1: f64) -> Result<f64, MarketDataError> {
        validate_interval(t0, t1)?;
        Ok(self.sigma)
    }
}

/// ATM volatility term structure with forward volatility from total
/// variance differences.
///
/// Holds spot ATM volatilities at pillar expiries. Total variance
/// `w(t) = sigma(t)^2 * t` is interpolated linearly in time, and the
/// forward volatility over `[t0, t1]` is
/// `sqrt((w(t1) - w(t0)) / (t1 - t0))`.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVol {
    times: Vec<f64>,
    total_variances: Vec<f64>,
}

impl TermVol {
    /// Constructs a term structure from `(expiry, spot ATM vol)` pillars.
    ///
    /// # Errors
    ///
    /// - `InsufficientData` with no pillars
    /// - `UnsortedPillars` if expiries are not strictly increasing
    /// - `InvalidTime` if the first expiry is negative, or for a lone
    ///   pillar at zero expiry (it carries no variance information)
    pub fn new(pillars: &[(f64, f64)]) -> Result<Self, MarketDataError> {
        if pillars.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        if pillars[0].0 < 0.0 {
            return Err(MarketDataError::InvalidTime { t: pillars[0].0 });
        }
        if pillars.len() == 1 && pillars[0].0 == 0.0 {
            return Err(MarketDataError::InvalidTime { t: 0.0 });
        }
        for (i, window) in pillars.windows(2).enumerate() {
            if window[1].0 <= window[0].0 {
                return Err(MarketDataError::UnsortedPillars { index: i + 1 });
            }
        }
        Ok(Self {
            times: pillars.iter().map(|p| p.0).collect(),
            total_variances: pillars.iter().map(|p| p.1 * p.1 * p.0).collect(),
        })
    }

    /// Linearly interpolated total variance at `t`.
    ///
    /// Flat-variance-rate extrapolation on both sides: before the first
    /// pillar the variance accrues at the first pillar's rate, after the
    /// last at the final segment's rate.
    fn total_variance(&self, t: f64) -> f64 {
        let n = self.times.len();
        if n == 1 || t <= self.times[0] {
            let rate = self.total_variances[0] / self.times[0].max(f64::MIN_POSITIVE);
            return rate * t;
        }
        let hi = self.times.partition_point(|&x| x < t).min(n - 1);
        let lo = hi - 1;
        let slope =
            (self.total_variances[hi] - self.total_variances[lo]) / (self.times[hi] - self.times[lo]);
        self.total_variances[lo] + slope * (t - self.times[lo])
    }
}

impl VolatilitySurface for TermVol {
    fn forward_atm_vol(&self, t0: f64, t1: f64) -> Result<f64, MarketDataError> {
        validate_interval(t0, t1)?;
        let variance = (self.total_variance(t1) - self.total_variance(t0)) / (t1 - t0);
        if variance < 0.0 {
            return Err(MarketDataError::NegativeForwardVariance { t0, t1, variance });
        }
        Ok(variance.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_vol_constant() {
        let surface = FlatVol::new(0.25);
        assert_eq!(surface.sigma(), 0.25);
        assert_eq!(surface.forward_atm_vol(0.0, 0.5).unwrap(), 0.25);
        assert_eq!(surface.forward_atm_vol(1.0, 5.0).unwrap(), 0.25);
    }

    #[test]
    fn test_flat_vol_invalid_interval() {
        let surface = FlatVol::new(0.25);
        assert_eq!(
            surface.forward_atm_vol(1.0, 1.0),
            Err(MarketDataError::InvalidInterval { t0: 1.0, t1: 1.0 })
        );
        assert!(surface.forward_atm_vol(-0.1, 1.0).is_err());
        assert!(surface.forward_atm_vol(2.0, 1.0).is_err());
    }

    #[test]
    fn test_term_vol_flat_structure_recovers_spot_vol() {
        let surface = TermVol::new(&[(1.0, 0.2), (2.0, 0.2), (3.0, 0.2)]).unwrap();
        assert_relative_eq!(surface.forward_atm_vol(0.0, 1.0).unwrap(), 0.2);
        assert_relative_eq!(surface.forward_atm_vol(1.0, 3.0).unwrap(), 0.2);
        assert_relative_eq!(surface.forward_atm_vol(0.5, 2.5).unwrap(), 0.2);
    }

    #[test]
    fn test_term_vol_forward_variance_additivity() {
        let surface = TermVol::new(&[(1.0, 0.2), (2.0, 0.25)]).unwrap();
        // w(1) = 0.04, w(2) = 0.125: forward variance over [1, 2] is 0.085.
        let fwd = surface.forward_atm_vol(1.0, 2.0).unwrap();
        assert_relative_eq!(fwd, 0.085_f64.sqrt(), max_relative = 1e-12);

        // Piecing [0,1] and [1,2] back together recovers sigma(2).
        let v01 = surface.forward_atm_vol(0.0, 1.0).unwrap();
        let v12 = surface.forward_atm_vol(1.0, 2.0).unwrap();
        let recombined = ((v01 * v01 + v12 * v12) / 2.0).sqrt();
        assert_relative_eq!(recombined, 0.25, max_relative = 1e-12);
    }

    #[test]
    fn test_term_vol_degenerate_structure_fails() {
        // sigma falling fast enough that total variance decreases.
        let surface = TermVol::new(&[(1.0, 0.4), (2.0, 0.2)]).unwrap();
        let err = surface.forward_atm_vol(1.0, 2.0).unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::NegativeForwardVariance { .. }
        ));
    }

    #[test]
    fn test_term_vol_construction_errors() {
        assert_eq!(
            TermVol::new(&[]),
            Err(MarketDataError::InsufficientData { got: 0, need: 1 })
        );
        assert_eq!(
            TermVol::new(&[(1.0, 0.2), (1.0, 0.3)]),
            Err(MarketDataError::UnsortedPillars { index: 1 })
        );
    }

    #[test]
    fn test_term_vol_single_pillar() {
        let surface = TermVol::new(&[(2.0, 0.3)]).unwrap();
        assert_relative_eq!(surface.forward_atm_vol(0.0, 1.0).unwrap(), 0.3);
        assert_relative_eq!(surface.forward_atm_vol(0.5, 1.5).unwrap(), 0.3);
    }

    #[test]
    fn test_term_vol_lone_zero_expiry_pillar_rejected() {
        // A single pillar at t = 0 has zero total variance, which would
        // silently flatten every forward vol to zero.
        assert_eq!(
            TermVol::new(&[(0.0, 0.2)]),
            Err(MarketDataError::InvalidTime { t: 0.0 })
        );
        // With a later pillar fixing the slope, a zero-expiry pillar is fine.
        let surface = TermVol::new(&[(0.0, 0.2), (1.0, 0.2)]).unwrap();
        assert_relative_eq!(surface.forward_atm_vol(0.0, 1.0).unwrap(), 0.2);
    }
}
