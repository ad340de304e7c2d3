//! # simkit_engine
//!
//! Block-oriented Monte Carlo path simulation engine.
//!
//! The engine simulates future trajectories of financial risk factors for
//! derivative pricing. It owns three things:
//!
//! - **Storage**: [`block::PathBlock`] packs W paths per vector lane in a
//!   `[factor][step][path-group]` grid; [`block_set::BlockSet`] partitions
//!   the full path count into blocks sized for hardware parallelism.
//! - **Setup protocol**: [`features::FeatureCollection`] lets
//!   independently-written processes agree on a shared time grid
//!   ([`features::TimeStepsFeature`]) and a shared factor-index space
//!   ([`features::PathMappingFeature`]) through a deterministic two-phase
//!   register-then-freeze barrier.
//! - **Dispatch**: [`simulator::Simulator`] drives every
//!   [`process::PathProcess`] through setup, the single central freeze,
//!   preparation, and parallel block evolution.
//!
//! Random variate generation, calendar arithmetic and volatility surfaces
//! are external collaborators ([`shocks::ShockSource`] and the traits in
//! `simkit_core`); payoff evaluation consumes the populated block set and
//! is out of scope.
//!
//! # Architecture
//!
//! ```text
//! Simulator
//! ├── SimulationConfig      (paths, day count, dispatch mode)
//! ├── FeatureCollection     (open → finished, one-way)
//! │   ├── TimeStepsFeature  (shared date grid → times, Δt)
//! │   └── PathMappingFeature (name → dense factor index)
//! ├── BlockSet              (≈ 2× parallelism PathBlocks)
//! │   └── PathBlock         (W-lane-packed in-place storage)
//! └── per block: ShockSource::fill, then PathProcess::process
//! ```
//!
//! # Example
//!
//! ```
//! use simkit_engine::config::SimulationConfig;
//! use simkit_engine::lanes::lane_width;
//! use simkit_engine::simulator::Simulator;
//!
//! // Processes implement simkit_engine::process::PathProcess; see
//! // simkit_models for the lognormal single-asset model.
//! let config = SimulationConfig::builder()
//!     .n_paths(16 * lane_width())
//!     .build()
//!     .unwrap();
//! let simulator = Simulator::new(config);
//! let _ = simulator;
//! ```

pub mod block;
pub mod block_set;
pub mod config;
pub mod error;
pub mod features;
pub mod lanes;
pub mod process;
pub mod shocks;
pub mod simulator;

// Re-exports for convenient access
pub use block::PathBlock;
pub use block_set::BlockSet;
pub use config::{SimulationConfig, SimulationConfigBuilder, MAX_PATHS};
pub use error::EngineError;
pub use features::{Feature, FeatureCollection, FreezeContext, PathMappingFeature, TimeStepsFeature};
pub use lanes::lane_width;
pub use process::PathProcess;
pub use shocks::{NormalShocks, ShockSource, ZeroShocks};
pub use simulator::Simulator;
