//! Single-asset lognormal path process.
//!
//! Evolves one named underlying with an Euler scheme whose drift is
//! calibrated to an externally supplied forward curve and whose per-step
//! volatility comes from forward ATM volatility on the frozen time grid:
//!
//! ```text
//! level₀ = F(0)
//! levelᵢ = levelᵢ₋₁ + driftᵢ·Δtᵢ·levelᵢ₋₁ + volᵢ·√Δtᵢ·shockᵢ·levelᵢ₋₁
//! ```
//!
//! with `driftᵢ·Δtᵢ = F(tᵢ)/F(tᵢ₋₁) − 1`, so with zero shocks the path
//! reproduces the forward curve exactly at every step. Shocks are read
//! from the block slot and overwritten in place with the level.

use std::sync::Arc;

use simkit_core::market_data::{ForwardCurve, VolatilitySurface};
use simkit_core::types::time::Date;

use simkit_engine::block::PathBlock;
use simkit_engine::error::EngineError;
use simkit_engine::features::{FeatureCollection, PathMappingFeature, TimeStepsFeature};
use simkit_engine::process::PathProcess;

/// Lognormal model for one named underlying.
///
/// Owns its market data references and the per-step parameter arrays
/// derived in `prepare`; nothing is shared with other process instances.
/// Two instances declaring the same dimension name deliberately write the
/// same factor slot.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use simkit_core::market_data::{FlatForward, FlatVol};
/// use simkit_core::types::time::Date;
/// use simkit_models::LognormalProcess;
///
/// let start = Date::from_ymd(2026, 1, 1).unwrap();
/// let end = start.add_days(365);
/// let process = LognormalProcess::with_schedule(
///     "EQ.ACME",
///     Arc::new(FlatForward::new(100.0)),
///     Arc::new(FlatVol::new(0.2)),
///     start,
///     end,
///     52,
/// )
/// .unwrap();
/// assert_eq!(process.dates().len(), 53);
/// ```
pub struct LognormalProcess {
    name: String,
    curve: Arc<dyn ForwardCurve>,
    surface: Arc<dyn VolatilitySurface>,
    dates: Vec<Date>,
    factor: Option<usize>,
    spot: f64,
    /// Per-step deterministic growth `drift[i]·Δt[i]`; entry 0 unused.
    drift_dt: Vec<f64>,
    /// Per-step scaled volatility `vol[i]·√Δt[i]`; entry 0 unused.
    vol_step: Vec<f64>,
    prepared: bool,
}

impl LognormalProcess {
    /// Creates a process simulating on the given dates.
    ///
    /// The engine sorts and de-duplicates dates across all processes; the
    /// earliest date on the combined grid anchors `t = 0`.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidConfig` with fewer than two dates.
    pub fn new(
        name: impl Into<String>,
        curve: Arc<dyn ForwardCurve>,
        surface: Arc<dyn VolatilitySurface>,
        dates: Vec<Date>,
    ) -> Result<Self, EngineError> {
        if dates.len() < 2 {
            return Err(EngineError::InvalidConfig {
                name: "dates",
                value: format!("need at least 2 simulation dates, got {}", dates.len()),
            });
        }
        Ok(Self {
            name: name.into(),
            curve,
            surface,
            dates,
            factor: None,
            spot: 0.0,
            drift_dt: Vec::new(),
            vol_step: Vec::new(),
            prepared: false,
        })
    }

    /// Creates a process on an evenly spaced schedule of `steps` steps
    /// from `start` to `end` (inclusive).
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidConfig` when `end` is not after `start`, when
    /// `steps` is zero, or when `steps` exceeds the day span (which would
    /// collapse adjacent dates).
    pub fn with_schedule(
        name: impl Into<String>,
        curve: Arc<dyn ForwardCurve>,
        surface: Arc<dyn VolatilitySurface>,
        start: Date,
        end: Date,
        steps: usize,
    ) -> Result<Self, EngineError> {
        let span = end - start;
        if span <= 0 {
            return Err(EngineError::InvalidConfig {
                name: "end",
                value: format!("{} is not after {}", end, start),
            });
        }
        if steps == 0 || steps as i64 > span {
            return Err(EngineError::InvalidConfig {
                name: "steps",
                value: format!("{} not in [1, {}]", steps, span),
            });
        }
        let dates = (0..=steps)
            .map(|i| start.add_days((i as i64 * span / steps as i64) as u64))
            .collect();
        Self::new(name, curve, surface, dates)
    }

    /// The dimension name this process declares.
    #[inline]
    pub fn dimension(&self) -> &str {
        &self.name
    }

    /// The simulation dates this process registers.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The factor index assigned during setup, if any.
    #[inline]
    pub fn factor(&self) -> Option<usize> {
        self.factor
    }
}

impl PathProcess for LognormalProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup_features(&mut self, features: &mut FeatureCollection) -> Result<(), EngineError> {
        features
            .get_mut::<TimeStepsFeature>()?
            .add_dates(self.dates.iter().copied())?;
        self.factor = Some(
            features
                .get_mut::<PathMappingFeature>()?
                .add_dimension(&self.name)?,
        );
        Ok(())
    }

    fn prepare(&mut self, features: &FeatureCollection) -> Result<(), EngineError> {
        let grid = features.get::<TimeStepsFeature>()?;
        let times = grid.times()?;
        let dts = grid.time_steps()?;

        // The combined grid may be finer than this process's own dates
        // when other processes registered extra ones; parameters cover
        // every global step.
        let n = times.len();
        self.spot = self.curve.forward(0.0)?;
        self.drift_dt = vec![0.0; n];
        self.vol_step = vec![0.0; n];

        let mut forward_prev = self.spot;
        for i in 1..n {
            let forward = self.curve.forward(times[i])?;
            self.drift_dt[i] = forward / forward_prev - 1.0;
            self.vol_step[i] =
                self.surface.forward_atm_vol(times[i - 1], times[i])? * dts[i].sqrt();
            forward_prev = forward;
        }

        self.prepared = true;
        Ok(())
    }

    fn process(&self, block: &mut PathBlock) -> Result<(), EngineError> {
        let factor = match self.factor {
            Some(factor) if self.prepared => factor,
            _ => {
                return Err(EngineError::ProcessNotPrepared {
                    name: self.name.clone(),
                })
            }
        };
        if block.steps() != self.drift_dt.len() {
            return Err(EngineError::DimensionMismatch {
                expected: self.drift_dt.len(),
                got: block.steps(),
            });
        }
        if block.factors() <= factor {
            return Err(EngineError::DimensionMismatch {
                expected: factor + 1,
                got: block.factors(),
            });
        }

        let width = block.lane_width();
        let mut prev = vec![0.0; width];

        for group in 0..block.path_groups() {
            let lane = block.lane_mut(factor, 0, group);
            lane.fill(self.spot);
            prev.copy_from_slice(lane);

            for step in 1..block.steps() {
                let drift = self.drift_dt[step];
                let vol = self.vol_step[step];
                let lane = block.lane_mut(factor, step, group);
                for (slot, &level) in lane.iter_mut().zip(prev.iter()) {
                    let shock = *slot;
                    *slot = level + drift * level + vol * shock * level;
                }
                prev.copy_from_slice(lane);
            }
        }
        Ok(())
    }
}
