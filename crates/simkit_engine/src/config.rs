//! Simulation run configuration.

use simkit_core::types::time::DayCountConvention;

use crate::error::EngineError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 16_777_216;

/// Immutable configuration for one simulation run.
///
/// Use [`SimulationConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```
/// use simkit_engine::config::SimulationConfig;
/// use simkit_core::types::time::DayCountConvention;
///
/// let config = SimulationConfig::builder()
///     .n_paths(65_536)
///     .day_count(DayCountConvention::Act365)
///     .parallel(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.n_paths(), 65_536);
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationConfig {
    n_paths: usize,
    day_count: DayCountConvention,
    parallel: bool,
    blocks_per_thread: usize,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Total number of simulation paths.
    ///
    /// Lane-width alignment is checked at block construction, where the
    /// runtime-detected width is known.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Day count convention for the simulation time grid.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Whether blocks are dispatched across worker threads.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Target number of blocks per worker thread.
    ///
    /// The block set is partitioned into roughly this many blocks per
    /// available core; values above 1 give the scheduler slack for load
    /// balancing at the cost of per-block overhead.
    #[inline]
    pub fn blocks_per_thread(&self) -> usize {
        self.blocks_per_thread
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug)]
pub struct SimulationConfigBuilder {
    n_paths: usize,
    day_count: DayCountConvention,
    parallel: bool,
    blocks_per_thread: usize,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            n_paths: 0,
            day_count: DayCountConvention::default(),
            parallel: true,
            blocks_per_thread: 2,
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets the total path count.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = n_paths;
        self
    }

    /// Sets the day count convention (default ACT/365).
    #[inline]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Enables or disables parallel block dispatch (default enabled).
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the target number of blocks per worker thread (default 2).
    #[inline]
    pub fn blocks_per_thread(mut self, blocks_per_thread: usize) -> Self {
        self.blocks_per_thread = blocks_per_thread;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidConfig` when `n_paths` is zero or exceeds
    /// [`MAX_PATHS`], or when `blocks_per_thread` is zero.
    pub fn build(self) -> Result<SimulationConfig, EngineError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(EngineError::InvalidConfig {
                name: "n_paths",
                value: format!("{} not in [1, {}]", self.n_paths, MAX_PATHS),
            });
        }
        if self.blocks_per_thread == 0 {
            return Err(EngineError::InvalidConfig {
                name: "blocks_per_thread",
                value: "must be at least 1".to_string(),
            });
        }
        Ok(SimulationConfig {
            n_paths: self.n_paths,
            day_count: self.day_count,
            parallel: self.parallel,
            blocks_per_thread: self.blocks_per_thread,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SimulationConfig::builder().n_paths(1024).build().unwrap();
        assert_eq!(config.n_paths(), 1024);
        assert_eq!(config.day_count(), DayCountConvention::Act365);
        assert!(config.parallel());
        assert_eq!(config.blocks_per_thread(), 2);
    }

    #[test]
    fn test_builder_rejects_zero_blocks_per_thread() {
        let err = SimulationConfig::builder()
            .n_paths(1024)
            .blocks_per_thread(0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfig {
                name: "blocks_per_thread",
                ..
            }
        ));
    }

    #[test]
    fn test_builder_rejects_zero_paths() {
        let err = SimulationConfig::builder().build().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfig { name: "n_paths", .. }
        ));
    }

    #[test]
    fn test_builder_rejects_excessive_paths() {
        let err = SimulationConfig::builder()
            .n_paths(MAX_PATHS + 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));
    }

    #[test]
    fn test_builder_overrides() {
        let config = SimulationConfig::builder()
            .n_paths(64)
            .day_count(DayCountConvention::Act360)
            .parallel(false)
            .blocks_per_thread(4)
            .build()
            .unwrap();
        assert_eq!(config.day_count(), DayCountConvention::Act360);
        assert!(!config.parallel());
        assert_eq!(config.blocks_per_thread(), 4);
    }
}
