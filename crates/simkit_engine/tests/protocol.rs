//! Cross-module protocol tests: feature registration, central freeze,
//! shock pre-fill, and block dispatch working together.

use simkit_core::types::time::{Date, DayCountConvention};
use simkit_engine::block::PathBlock;
use simkit_engine::config::SimulationConfig;
use simkit_engine::error::EngineError;
use simkit_engine::features::{FeatureCollection, PathMappingFeature, TimeStepsFeature};
use simkit_engine::lanes::lane_width;
use simkit_engine::process::PathProcess;
use simkit_engine::shocks::NormalShocks;
use simkit_engine::simulator::Simulator;

/// Process that accumulates its shocks into a running sum per path,
/// making the output depend on every pre-filled variate. Any change in
/// dispatch-dependent shock delivery shows up as a numeric difference.
struct ShockSumProcess {
    name: String,
    dates: Vec<Date>,
    factor: Option<usize>,
}

impl ShockSumProcess {
    fn new(name: &str, dates: Vec<Date>) -> Self {
        Self {
            name: name.to_string(),
            dates,
            factor: None,
        }
    }
}

impl PathProcess for ShockSumProcess {
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
        features.get::<TimeStepsFeature>()?.times()?;
        Ok(())
    }

    fn process(&self, block: &mut PathBlock) -> Result<(), EngineError> {
        let factor = self.factor.ok_or_else(|| EngineError::ProcessNotPrepared {
            name: self.name.clone(),
        })?;
        let width = block.lane_width();
        let mut prev = vec![0.0; width];

        for group in 0..block.path_groups() {
            let lane = block.lane_mut(factor, 0, group);
            lane.fill(0.0);
            prev.copy_from_slice(lane);
            for step in 1..block.steps() {
                let lane = block.lane_mut(factor, step, group);
                for (slot, &acc) in lane.iter_mut().zip(prev.iter()) {
                    *slot += acc;
                }
                prev.copy_from_slice(lane);
            }
        }
        Ok(())
    }
}

fn weekly_dates(weeks: u64) -> Vec<Date> {
    let d0 = Date::from_ymd(2026, 1, 5).unwrap();
    (0..=weeks).map(|i| d0.add_days(7 * i)).collect()
}

fn run(parallel: bool, n_paths: usize, seed: u64) -> simkit_engine::block_set::BlockSet {
    let config = SimulationConfig::builder()
        .n_paths(n_paths)
        .day_count(DayCountConvention::Act365)
        .parallel(parallel)
        .build()
        .unwrap();
    let mut processes: Vec<Box<dyn PathProcess>> = vec![
        Box::new(ShockSumProcess::new("A", weekly_dates(12))),
        Box::new(ShockSumProcess::new("B", weekly_dates(12))),
    ];
    Simulator::new(config)
        .run(&mut processes, &NormalShocks::new(seed))
        .unwrap()
}

#[test]
fn parallel_run_is_bit_identical_to_sequential() {
    let n_paths = 64 * lane_width();
    let par = run(true, n_paths, 42);
    let seq = run(false, n_paths, 42);

    assert_eq!(par.len(), seq.len());
    for (a, b) in par.iter().zip(seq.iter()) {
        assert_eq!(a.paths(), b.paths());
        for factor in 0..a.factors() {
            // Bitwise comparison, not approximate.
            assert_eq!(a.factor_plane(factor), b.factor_plane(factor));
        }
    }
}

#[test]
fn repeat_runs_with_same_seed_are_identical() {
    let n_paths = 16 * lane_width();
    let first = run(true, n_paths, 7);
    let second = run(true, n_paths, 7);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.factor_plane(0), b.factor_plane(0));
    }
}

#[test]
fn different_seeds_produce_different_paths() {
    let n_paths = 16 * lane_width();
    let first = run(true, n_paths, 1);
    let second = run(true, n_paths, 2);
    let differs = first
        .iter()
        .zip(second.iter())
        .any(|(a, b)| a.factor_plane(0) != b.factor_plane(0));
    assert!(differs);
}

#[test]
fn distinct_processes_share_the_time_grid() {
    // Process B registers extra dates; both evolve on the union grid.
    let config = SimulationConfig::builder()
        .n_paths(8 * lane_width())
        .build()
        .unwrap();
    let extra = {
        let mut dates = weekly_dates(4);
        dates.push(dates[0].add_days(3));
        dates
    };
    let mut processes: Vec<Box<dyn PathProcess>> = vec![
        Box::new(ShockSumProcess::new("A", weekly_dates(4))),
        Box::new(ShockSumProcess::new("B", extra)),
    ];

    let set = Simulator::new(config)
        .run(&mut processes, &NormalShocks::new(3))
        .unwrap();

    // 5 weekly dates plus the extra mid-week one.
    assert_eq!(set.steps(), 6);
    assert_eq!(set.factors(), 2);
}

#[test]
fn returned_set_is_released_cleanly() {
    let mut set = run(true, 8 * lane_width(), 11);
    set.release();
    set.release();
    assert!(set.is_empty());
}
