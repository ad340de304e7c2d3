//! The path process contract.
//!
//! A path process is one pluggable stochastic-process model. New models
//! are added by implementing this trait; the orchestrator never changes.
//!
//! # Protocol
//!
//! The orchestrator drives every process through three strictly ordered
//! phases:
//!
//! 1. [`setup_features`](PathProcess::setup_features) — declare required
//!    dates and the factor dimension. The collection is still open; a
//!    process must never assume the freeze has already happened.
//! 2. The orchestrator freezes the collection **exactly once**, centrally,
//!    after every process has registered.
//! 3. [`prepare`](PathProcess::prepare) — read the finalised time arrays
//!    and precompute per-step model parameters.
//! 4. [`process`](PathProcess::process) — evolve the assigned factor
//!    across a block, in place. Called once per block, possibly from
//!    different threads for different blocks.

use crate::block::PathBlock;
use crate::error::EngineError;
use crate::features::FeatureCollection;

/// A pluggable stochastic-process model evolving one factor.
///
/// Implementations own their model parameters and any per-step arrays
/// derived in `prepare`; nothing is shared between process instances.
///
/// # Concurrency
///
/// `process` takes `&self` and is invoked concurrently across distinct
/// blocks. A process must confine its writes to its own factor index,
/// which the dense allocation in
/// [`PathMappingFeature`](crate::features::PathMappingFeature) guarantees
/// is collision-free.
pub trait PathProcess: Send + Sync {
    /// Human-readable name, used for logging and diagnostics.
    fn name(&self) -> &str;

    /// Registers this process's required dates and dimension with the
    /// open feature collection.
    fn setup_features(&mut self, features: &mut FeatureCollection) -> Result<(), EngineError>;

    /// Precomputes per-step parameters from the frozen collection.
    fn prepare(&mut self, features: &FeatureCollection) -> Result<(), EngineError>;

    /// Evolves this process's factor across every path group and step of
    /// the block, overwriting the pre-loaded shocks in place.
    fn process(&self, block: &mut PathBlock) -> Result<(), EngineError>;
}
