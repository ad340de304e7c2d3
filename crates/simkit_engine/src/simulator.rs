//! Simulation orchestrator.
//!
//! The orchestrator owns the run protocol:
//!
//! 1. every process registers its needs with the open feature collection,
//! 2. the collection is frozen exactly once, centrally,
//! 3. every process precomputes from the frozen features,
//! 4. the block set is built from the frozen dimensions,
//! 5. per block: shocks are pre-filled, then every process evolves its
//!    factor; blocks are dispatched across worker threads,
//! 6. the populated block set is returned to the caller.
//!
//! Any error aborts the run at the step it is on; block storage is
//! released by RAII on every exit path. There are no retries: the
//! simulation is deterministic given its inputs, so failures are
//! programming or configuration defects.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::block::PathBlock;
use crate::block_set::BlockSet;
use crate::config::SimulationConfig;
use crate::error::EngineError;
use crate::features::{FeatureCollection, PathMappingFeature, TimeStepsFeature};
use crate::lanes::lane_width;
use crate::process::PathProcess;
use crate::shocks::ShockSource;

/// Drives a set of path processes through the simulation protocol.
///
/// # Examples
///
/// ```no_run
/// use simkit_engine::config::SimulationConfig;
/// use simkit_engine::process::PathProcess;
/// use simkit_engine::shocks::NormalShocks;
/// use simkit_engine::simulator::Simulator;
///
/// # fn demo(mut processes: Vec<Box<dyn PathProcess>>) -> Result<(), simkit_engine::error::EngineError> {
/// let config = SimulationConfig::builder().n_paths(65_536).build()?;
/// let simulator = Simulator::new(config);
/// let block_set = simulator.run(&mut processes, &NormalShocks::new(42))?;
///
/// // Hand the populated set to the payoff layer.
/// for block in block_set.iter() {
///     let _ = block.paths();
/// }
/// # Ok(())
/// # }
/// ```
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Creates a simulator for the given configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// The configuration this simulator runs with.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs the full simulation and returns the populated block set.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from any phase: feature registration,
    /// the freeze, per-process preparation, block construction
    /// (`EngineError::Alignment` for a misaligned path count), shock
    /// filling, or evolution.
    pub fn run(
        &self,
        processes: &mut [Box<dyn PathProcess>],
        shocks: &dyn ShockSource,
    ) -> Result<BlockSet, EngineError> {
        if processes.is_empty() {
            return Err(EngineError::NoProcesses);
        }

        let mut features = FeatureCollection::new(self.config.day_count());
        for process in processes.iter_mut() {
            debug!(process = process.name(), "registering features");
            process.setup_features(&mut features)?;
        }

        // The one and only freeze. Processes must never call this.
        features.finish_setup()?;
        debug!("feature collection frozen");

        for process in processes.iter_mut() {
            debug!(process = process.name(), "preparing");
            process.prepare(&features)?;
        }

        let factors = features.get::<PathMappingFeature>()?.len();
        let steps = features.get::<TimeStepsFeature>()?.len();
        let target_blocks = self.config.blocks_per_thread() * num_cpus::get().max(1);
        let mut block_set =
            BlockSet::with_target_blocks(self.config.n_paths(), factors, steps, target_blocks)?;

        info!(
            n_paths = self.config.n_paths(),
            factors,
            steps,
            blocks = block_set.len(),
            lane_width = lane_width(),
            parallel = self.config.parallel(),
            "dispatching simulation"
        );

        let shared: &[Box<dyn PathProcess>] = processes;
        if self.config.parallel() {
            block_set
                .blocks_mut()
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(index, block)| simulate_block(index, block, shared, shocks))?;
        } else {
            for (index, block) in block_set.blocks_mut().iter_mut().enumerate() {
                simulate_block(index, block, shared, shocks)?;
            }
        }

        Ok(block_set)
    }
}

/// Pre-fills one block with shocks, then runs every process over it.
///
/// Processes run sequentially within a block; their factor indices are
/// disjoint (or deliberately shared by name), so the order does not
/// affect the result.
fn simulate_block(
    index: usize,
    block: &mut PathBlock,
    processes: &[Box<dyn PathProcess>],
    shocks: &dyn ShockSource,
) -> Result<(), EngineError> {
    shocks.fill(index, block)?;
    for process in processes {
        process.process(block)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shocks::ZeroShocks;

    /// Minimal process writing a constant into its factor, enough to
    /// exercise the protocol without a real model.
    struct ConstantProcess {
        name: String,
        level: f64,
        factor: Option<usize>,
        dates: Vec<simkit_core::types::time::Date>,
    }

    impl ConstantProcess {
        fn new(name: &str, level: f64, dates: Vec<simkit_core::types::time::Date>) -> Self {
            Self {
                name: name.to_string(),
                level,
                factor: None,
                dates,
            }
        }
    }

    impl PathProcess for ConstantProcess {
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
            // A real model precomputes per-step parameters here; the
            // protocol only requires that the grid is readable.
            features.get::<TimeStepsFeature>()?.times()?;
            Ok(())
        }

        fn process(&self, block: &mut PathBlock) -> Result<(), EngineError> {
            let factor = self.factor.ok_or_else(|| EngineError::ProcessNotPrepared {
                name: self.name.clone(),
            })?;
            for group in 0..block.path_groups() {
                for step in 0..block.steps() {
                    for v in block.lane_mut(factor, step, group) {
                        *v = self.level;
                    }
                }
            }
            Ok(())
        }
    }

    fn dates() -> Vec<simkit_core::types::time::Date> {
        let d0 = simkit_core::types::time::Date::from_ymd(2026, 1, 1).unwrap();
        vec![d0, d0.add_days(7), d0.add_days(14)]
    }

    #[test]
    fn test_run_populates_every_factor() {
        let config = SimulationConfig::builder()
            .n_paths(8 * lane_width())
            .build()
            .unwrap();
        let mut processes: Vec<Box<dyn PathProcess>> = vec![
            Box::new(ConstantProcess::new("A", 1.0, dates())),
            Box::new(ConstantProcess::new("B", 2.0, dates())),
        ];

        let set = Simulator::new(config)
            .run(&mut processes, &ZeroShocks)
            .unwrap();

        assert_eq!(set.factors(), 2);
        assert_eq!(set.steps(), 3);
        for path in [0, set.n_paths() - 1] {
            assert_eq!(set.value(0, 2, path), Some(1.0));
            assert_eq!(set.value(1, 2, path), Some(2.0));
        }
    }

    #[test]
    fn test_run_without_processes_fails() {
        let config = SimulationConfig::builder().n_paths(64).build().unwrap();
        let mut processes: Vec<Box<dyn PathProcess>> = Vec::new();
        assert_eq!(
            Simulator::new(config)
                .run(&mut processes, &ZeroShocks)
                .unwrap_err(),
            EngineError::NoProcesses
        );
    }

    #[test]
    fn test_misaligned_path_count_aborts_run() {
        let config = SimulationConfig::builder()
            .n_paths(8 * lane_width() + 1)
            .build()
            .unwrap();
        let mut processes: Vec<Box<dyn PathProcess>> =
            vec![Box::new(ConstantProcess::new("A", 1.0, dates()))];

        let err = Simulator::new(config)
            .run(&mut processes, &ZeroShocks)
            .unwrap_err();
        assert!(matches!(err, EngineError::Alignment { .. }));
    }

    #[test]
    fn test_shared_dimension_name_shares_factor() {
        // Two processes declaring the same name write to the same slot;
        // the later one wins within a block.
        let config = SimulationConfig::builder()
            .n_paths(4 * lane_width())
            .parallel(false)
            .build()
            .unwrap();
        let mut processes: Vec<Box<dyn PathProcess>> = vec![
            Box::new(ConstantProcess::new("SHARED", 1.0, dates())),
            Box::new(ConstantProcess::new("SHARED", 5.0, dates())),
        ];

        let set = Simulator::new(config)
            .run(&mut processes, &ZeroShocks)
            .unwrap();

        assert_eq!(set.factors(), 1);
        assert_eq!(set.value(0, 0, 0), Some(5.0));
    }

    #[test]
    fn test_blocks_per_thread_controls_partitioning() {
        let threads = num_cpus::get().max(1);
        // Enough path groups that the target is never clamped.
        let n_paths = 8 * threads * lane_width();

        let run = |blocks_per_thread: usize| {
            let config = SimulationConfig::builder()
                .n_paths(n_paths)
                .blocks_per_thread(blocks_per_thread)
                .build()
                .unwrap();
            let mut processes: Vec<Box<dyn PathProcess>> =
                vec![Box::new(ConstantProcess::new("A", 1.0, dates()))];
            Simulator::new(config)
                .run(&mut processes, &ZeroShocks)
                .unwrap()
        };

        assert_eq!(run(1).len(), threads);
        assert_eq!(run(4).len(), 4 * threads);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let run = |parallel: bool| {
            let config = SimulationConfig::builder()
                .n_paths(16 * lane_width())
                .parallel(parallel)
                .build()
                .unwrap();
            let mut processes: Vec<Box<dyn PathProcess>> =
                vec![Box::new(ConstantProcess::new("A", 3.0, dates()))];
            Simulator::new(config)
                .run(&mut processes, &ZeroShocks)
                .unwrap()
        };

        let par = run(true);
        let seq = run(false);
        for path in 0..par.n_paths() {
            for step in 0..par.steps() {
                assert_eq!(par.value(0, step, path), seq.value(0, step, path));
            }
        }
    }
}
