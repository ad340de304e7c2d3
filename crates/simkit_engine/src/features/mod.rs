//! Shared simulation features and their registry.
//!
//! Processes are written independently, yet must agree on a shared time
//! grid and a shared factor-index space. Features carry that shared state:
//! each process declares what it needs during setup, the orchestrator
//! freezes the collection exactly once, and evolution reads the frozen
//! results.

pub mod collection;
pub mod path_mapping;
pub mod time_steps;

pub use collection::{Feature, FeatureCollection, FreezeContext};
pub use path_mapping::PathMappingFeature;
pub use time_steps::TimeStepsFeature;
