//! Execution strategies for the HBV engine.
//!
//! The model wrapper does not care where the engine runs; it asks an
//! [`ExecutionStrategy`] for a [`BmiEngine`] handle once the configuration has been
//! written. Two strategies are provided:
//!
//! - [`ContainerExecution`]: runs a container image through a [`ContainerLauncher`],
//!   with the configuration directory mounted.
//! - [`LocalExecution`]: creates an engine installed in-process, looked up by name in
//!   an [`EngineRegistry`]. Lookup happens when the strategy is constructed, so a
//!   missing engine is reported before any configuration is written.

use crate::engine::BmiEngine;
use hbv_core::{HbvError, HbvResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Image published for the HBV engine with a gRPC BMI server.
pub const DEFAULT_IMAGE: &str = "ghcr.io/ewatercycle/hbv-bmi-grpc4bmi:latest";

/// Name under which the local HBV engine is registered.
pub const DEFAULT_LOCAL_ENGINE: &str = "HBV";

/// Strategy for starting the engine.
pub trait ExecutionStrategy {
    /// Short human readable description, used in logs.
    fn describe(&self) -> String;

    /// Start an engine that can read files in `cfg_dir`.
    fn start(&self, cfg_dir: &Path) -> HbvResult<Box<dyn BmiEngine>>;
}

// ============================================================================
// Container execution
// ============================================================================

/// Reference to a container image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerImage(String);

impl ContainerImage {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerImage {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE)
    }
}

impl fmt::Display for ContainerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Starts container images and connects to the engine inside.
///
/// Pulling images, choosing a container runtime and wiring the BMI transport are
/// the launcher's business.
pub trait ContainerLauncher {
    fn launch(&self, image: &ContainerImage, work_dir: &Path) -> HbvResult<Box<dyn BmiEngine>>;
}

/// Runs the engine inside a container image.
#[derive(Clone)]
pub struct ContainerExecution {
    image: ContainerImage,
    launcher: Arc<dyn ContainerLauncher>,
}

impl ContainerExecution {
    pub fn new(image: ContainerImage, launcher: Arc<dyn ContainerLauncher>) -> Self {
        Self { image, launcher }
    }

    /// Use the published HBV image.
    pub fn with_default_image(launcher: Arc<dyn ContainerLauncher>) -> Self {
        Self::new(ContainerImage::default(), launcher)
    }

    pub fn image(&self) -> &ContainerImage {
        &self.image
    }
}

impl ExecutionStrategy for ContainerExecution {
    fn describe(&self) -> String {
        format!("container image {}", self.image)
    }

    fn start(&self, cfg_dir: &Path) -> HbvResult<Box<dyn BmiEngine>> {
        debug!(image = %self.image, work_dir = %cfg_dir.display(), "Launching container");
        self.launcher.launch(&self.image, cfg_dir)
    }
}

// ============================================================================
// Local execution
// ============================================================================

/// Creates in-process engines.
pub trait EngineFactory {
    fn create(&self) -> HbvResult<Box<dyn BmiEngine>>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> HbvResult<Box<dyn BmiEngine>>,
{
    fn create(&self) -> HbvResult<Box<dyn BmiEngine>> {
        self()
    }
}

/// Engines installed in the current process, by name.
#[derive(Default)]
pub struct EngineRegistry {
    factories: HashMap<String, Arc<dyn EngineFactory>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine factory.
    ///
    /// # Errors
    ///
    /// Returns [`HbvError::Configuration`] if `name` is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: Arc<dyn EngineFactory>,
    ) -> HbvResult<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(HbvError::Configuration(format!(
                "engine '{}' is already registered",
                name
            )));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn EngineFactory>> {
        self.factories.get(name).cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered engine names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

/// Runs an engine installed in the current process.
#[derive(Clone)]
pub struct LocalExecution {
    engine_name: String,
    factory: Arc<dyn EngineFactory>,
}

impl LocalExecution {
    /// Look up `engine_name` in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`HbvError::DependencyMissing`] with install instructions if no
    /// engine with that name is registered.
    pub fn discover(registry: &EngineRegistry, engine_name: &str) -> HbvResult<Self> {
        match registry.get(engine_name) {
            Some(factory) => Ok(Self {
                engine_name: engine_name.to_string(),
                factory,
            }),
            None => {
                warn!(
                    engine = engine_name,
                    available = ?registry.names(),
                    "Local engine not installed"
                );
                Err(HbvError::DependencyMissing {
                    package: format!("{} bmi package", engine_name),
                    instruction: format!("pip install {}", engine_name),
                })
            }
        }
    }

    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }
}

impl ExecutionStrategy for LocalExecution {
    fn describe(&self) -> String {
        format!("local engine {}", self.engine_name)
    }

    fn start(&self, _cfg_dir: &Path) -> HbvResult<Box<dyn BmiEngine>> {
        self.factory.create()
    }
}
