//! # simkit_models
//!
//! Stochastic process models plugging into the simkit simulation engine.
//!
//! Each model implements [`simkit_engine::process::PathProcess`] and is
//! added to a run without touching the orchestrator. This crate ships the
//! single-asset lognormal model; multi-factor and stochastic-volatility
//! models follow the same contract.

pub mod lognormal;

pub use lognormal::LognormalProcess;
