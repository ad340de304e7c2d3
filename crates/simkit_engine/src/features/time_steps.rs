//! Shared simulation time grid.
//!
//! Every process registers the dates it needs; the union, sorted and
//! de-duplicated, becomes the simulation grid. The first date anchors the
//! time axis at `t = 0`, and the freeze derives year fractions and step
//! widths with the externally supplied day count convention.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use simkit_core::types::time::Date;

use crate::error::EngineError;
use crate::features::collection::{Feature, FreezeContext};

/// Ascending, de-duplicated sequence of simulation dates and its derived
/// time arrays.
///
/// Pre-freeze, dates accumulate in a sorted set. On freeze:
///
/// - `times[i]` = year fraction from the anchor (so `times[0] == 0`)
/// - `time_steps[i]` = `times[i] - times[i-1]`, with `time_steps[0] == 0`
///
/// # Examples
///
/// ```
/// use simkit_engine::features::{FeatureCollection, TimeStepsFeature};
/// use simkit_core::types::time::{Date, DayCountConvention};
///
/// let mut features = FeatureCollection::new(DayCountConvention::Act365);
/// let d0 = Date::from_ymd(2026, 1, 1).unwrap();
///
/// let grid = features.get_mut::<TimeStepsFeature>().unwrap();
/// grid.add_dates([d0, d0.add_days(10), d0.add_days(30)]).unwrap();
///
/// features.finish_setup().unwrap();
///
/// let grid = features.get::<TimeStepsFeature>().unwrap();
/// assert_eq!(grid.date_index(d0.add_days(30)).unwrap(), 2);
/// assert_eq!(grid.times().unwrap()[1], 10.0 / 365.0);
/// ```
#[derive(Debug, Default)]
pub struct TimeStepsFeature {
    pending: BTreeSet<Date>,
    frozen: bool,
    dates: Vec<Date>,
    times: Vec<f64>,
    time_steps: Vec<f64>,
    index: HashMap<Date, usize>,
}

impl TimeStepsFeature {
    /// Registers a single date on the grid. Duplicates are absorbed.
    ///
    /// # Errors
    ///
    /// `EngineError::FeatureFrozen` after the freeze.
    pub fn add_date(&mut self, date: Date) -> Result<(), EngineError> {
        if self.frozen {
            return Err(EngineError::FeatureFrozen {
                feature: "TimeStepsFeature",
            });
        }
        self.pending.insert(date);
        Ok(())
    }

    /// Registers a batch of dates. Duplicates are absorbed.
    pub fn add_dates<I>(&mut self, dates: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = Date>,
    {
        if self.frozen {
            return Err(EngineError::FeatureFrozen {
                feature: "TimeStepsFeature",
            });
        }
        self.pending.extend(dates);
        Ok(())
    }

    /// Whether the grid has been frozen.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of grid points (post-freeze; 0 before).
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the grid holds no frozen points yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The grid index of a registered date.
    ///
    /// # Errors
    ///
    /// - `EngineError::FeatureNotFrozen` before the freeze
    /// - `EngineError::UnknownDate` for a date never registered
    pub fn date_index(&self, date: Date) -> Result<usize, EngineError> {
        self.require_frozen()?;
        self.index
            .get(&date)
            .copied()
            .ok_or(EngineError::UnknownDate { date })
    }

    /// The frozen date grid, ascending.
    pub fn dates(&self) -> Result<&[Date], EngineError> {
        self.require_frozen()?;
        Ok(&self.dates)
    }

    /// Year fractions from the anchor, `times[0] == 0`.
    pub fn times(&self) -> Result<&[f64], EngineError> {
        self.require_frozen()?;
        Ok(&self.times)
    }

    /// Step widths `times[i] - times[i-1]`, with `time_steps[0] == 0`.
    pub fn time_steps(&self) -> Result<&[f64], EngineError> {
        self.require_frozen()?;
        Ok(&self.time_steps)
    }

    fn require_frozen(&self) -> Result<(), EngineError> {
        if !self.frozen {
            return Err(EngineError::FeatureNotFrozen {
                feature: "TimeStepsFeature",
            });
        }
        Ok(())
    }
}

impl Feature for TimeStepsFeature {
    fn freeze(&mut self, ctx: &FreezeContext) -> Result<(), EngineError> {
        if self.frozen {
            return Ok(());
        }
        if self.pending.is_empty() {
            return Err(EngineError::EmptyTimeGrid);
        }

        self.dates = self.pending.iter().copied().collect();
        let anchor = self.dates[0];

        self.times = self
            .dates
            .iter()
            .map(|&d| ctx.day_count.year_fraction(anchor, d))
            .collect();

        self.time_steps = Vec::with_capacity(self.times.len());
        self.time_steps.push(0.0);
        for window in self.times.windows(2) {
            self.time_steps.push(window[1] - window[0]);
        }

        self.index = self
            .dates
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, i))
            .collect();

        self.pending.clear();
        self.frozen = true;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
