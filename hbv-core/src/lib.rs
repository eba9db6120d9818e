//! Forcing ingestion and configuration serialisation for the HBV rainfall-runoff model.
//!
//! The HBV equations themselves run inside an external engine. This crate prepares
//! what that engine consumes: forcing datasets read from text files, and the
//! `HBV_config.json` document holding forcing paths, parameters and initial storages.

pub mod config;
pub mod forcing;
pub mod value;
pub mod variables;

pub mod errors;

pub use config::{HbvConfigBuilder, ModelArguments, ModelConfig};
pub use errors::{HbvError, HbvResult};
pub use forcing::{ForcingDataset, ForcingSource, HbvForcing, LumpedForcing};
pub use value::ScalarValue;
