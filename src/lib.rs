//! eWaterCycle plugin for the HBV rainfall-runoff model.
//!
//! The numerical model runs in an external engine, either inside a container image
//! or installed in-process. This crate prepares its inputs and drives it:
//!
//! - forcing containers and configuration serialisation come from [`hbv_core`]
//! - [`HbvModel`] writes `HBV_config.json`, starts the engine through an
//!   [`ExecutionStrategy`] and forwards BMI calls to it
//! - [`RunConfig`] describes a whole run in TOML

pub mod engine;
pub mod execution;
pub mod model;
pub mod run_config;

#[cfg(test)]
mod testing;

pub use engine::BmiEngine;
pub use execution::{
    ContainerExecution, ContainerImage, ContainerLauncher, EngineFactory, EngineRegistry,
    ExecutionStrategy, LocalExecution,
};
pub use model::HbvModel;
pub use run_config::{ExecutionConfig, RunConfig};

pub use hbv_core;
