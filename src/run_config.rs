//! TOML description of an HBV run.
//!
//! ```toml
//! cfg_dir = "/scratch/hbv/rhine"
//!
//! [forcing]
//! directory = "/data/forcing/rhine"
//! start_time = "2000-01-01T00:00:00Z"
//! end_time = "2001-01-01T00:00:00Z"
//!
//! [forcing.filenames]
//! pr = "pr.nc"
//! evspsblpot = "evspsblpot.nc"
//! tas = "tas.nc"
//!
//! [model]
//! parameters = [8, 0.5, 200, 2, 0.5, 4, 0.01, 0.001, 2.5]
//! initial_storage = [0, 100, 0, 5, 0]
//!
//! [execution]
//! kind = "container"
//! image = "ghcr.io/ewatercycle/hbv-bmi-grpc4bmi:latest"
//! ```
//!
//! Timestamps must be quoted ISO 8601 strings.

use crate::execution::{
    ContainerExecution, ContainerImage, ContainerLauncher, EngineRegistry, ExecutionStrategy,
    LocalExecution, DEFAULT_IMAGE, DEFAULT_LOCAL_ENGINE,
};
use crate::model::HbvModel;
use hbv_core::{HbvError, HbvResult, LumpedForcing, ModelArguments};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_engine() -> String {
    DEFAULT_LOCAL_ENGINE.to_string()
}

/// Where the engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExecutionConfig {
    Container {
        #[serde(default = "default_image")]
        image: String,
    },
    Local {
        #[serde(default = "default_engine")]
        engine: String,
    },
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig::Container {
            image: default_image(),
        }
    }
}

/// A complete run: forcing, model arguments and execution variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory the configuration file is written to.
    #[serde(default)]
    pub cfg_dir: Option<PathBuf>,
    pub forcing: LumpedForcing,
    #[serde(default)]
    pub model: ModelArguments,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> HbvResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> HbvResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Build the execution strategy described by this run.
    ///
    /// A container run needs a `launcher`; a local run looks its engine up in
    /// `registry`.
    pub fn strategy(
        &self,
        launcher: Option<Arc<dyn ContainerLauncher>>,
        registry: &EngineRegistry,
    ) -> HbvResult<Box<dyn ExecutionStrategy>> {
        match &self.execution {
            ExecutionConfig::Container { image } => {
                let launcher = launcher.ok_or_else(|| {
                    HbvError::Configuration(
                        "container execution requires a container launcher".to_string(),
                    )
                })?;
                Ok(Box::new(ContainerExecution::new(
                    ContainerImage::new(image.as_str()),
                    launcher,
                )))
            }
            ExecutionConfig::Local { engine } => {
                Ok(Box::new(LocalExecution::discover(registry, engine)?))
            }
        }
    }

    pub fn build_model(
        &self,
        launcher: Option<Arc<dyn ContainerLauncher>>,
        registry: &EngineRegistry,
    ) -> HbvResult<HbvModel<LumpedForcing>> {
        let strategy = self.strategy(launcher, registry)?;
        Ok(HbvModel::new(self.forcing.clone(), strategy))
    }

    /// Build the model and run [`HbvModel::setup`] with the configured arguments.
    pub fn setup_model(
        &self,
        launcher: Option<Arc<dyn ContainerLauncher>>,
        registry: &EngineRegistry,
    ) -> HbvResult<HbvModel<LumpedForcing>> {
        let cfg_dir = self
            .cfg_dir
            .as_deref()
            .ok_or_else(|| HbvError::Configuration("cfg_dir is not set".to_string()))?;
        let mut model = self.build_model(launcher, registry)?;
        model.setup(&self.model, cfg_dir)?;
        Ok(model)
    }
}
