//! The HBV model wrapper.
//!
//! [`HbvModel`] ties together a forcing source, an [`HbvConfigBuilder`] and an
//! [`ExecutionStrategy`]. The container and local variants differ only in the
//! strategy they are constructed with; configuration and parameter access are
//! shared.
//!
//! Lifecycle:
//!
//! 1. [`HbvModel::setup`] validates the arguments, writes `HBV_config.json`,
//!    starts the engine and initialises it from the written file.
//! 2. [`HbvModel::update`], [`HbvModel::get_value`], ... forward to the engine.
//! 3. [`HbvModel::finalize`] tears the engine down exactly once and releases it.

use crate::engine::BmiEngine;
use crate::execution::{
    ContainerExecution, ContainerLauncher, EngineRegistry, ExecutionStrategy, LocalExecution,
    DEFAULT_LOCAL_ENGINE,
};
use hbv_core::config::NamedValues;
use hbv_core::{ForcingSource, HbvConfigBuilder, HbvError, HbvResult, ModelArguments};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// An HBV model driven through an external engine.
pub struct HbvModel<F: ForcingSource> {
    forcing: F,
    config: HbvConfigBuilder,
    strategy: Box<dyn ExecutionStrategy>,
    engine: Option<Box<dyn BmiEngine>>,
}

impl<F: ForcingSource> HbvModel<F> {
    pub fn new(forcing: F, strategy: Box<dyn ExecutionStrategy>) -> Self {
        Self {
            forcing,
            config: HbvConfigBuilder::new(),
            strategy,
            engine: None,
        }
    }

    /// Model running the published HBV container image.
    pub fn container(forcing: F, launcher: Arc<dyn ContainerLauncher>) -> Self {
        Self::new(
            forcing,
            Box::new(ContainerExecution::with_default_image(launcher)),
        )
    }

    /// Model running the locally installed HBV engine.
    ///
    /// # Errors
    ///
    /// Returns [`HbvError::DependencyMissing`] if the engine is not registered.
    pub fn local(forcing: F, registry: &EngineRegistry) -> HbvResult<Self> {
        let strategy = LocalExecution::discover(registry, DEFAULT_LOCAL_ENGINE)?;
        Ok(Self::new(forcing, Box::new(strategy)))
    }

    pub fn forcing(&self) -> &F {
        &self.forcing
    }

    pub fn describe(&self) -> String {
        self.strategy.describe()
    }

    /// Write the configuration into `cfg_dir` and start the engine.
    ///
    /// Returns the configuration file and directory.
    pub fn setup(
        &mut self,
        arguments: &ModelArguments,
        cfg_dir: &Path,
    ) -> HbvResult<(PathBuf, PathBuf)> {
        if self.engine.is_some() {
            return Err(HbvError::Configuration(
                "model is already set up".to_string(),
            ));
        }

        let config_file = self
            .config
            .make_cfg_file(arguments, &self.forcing, cfg_dir)?;

        let mut engine = self.strategy.start(cfg_dir)?;
        engine.initialize(&config_file)?;
        info!(
            engine = %self.strategy.describe(),
            config = %config_file.display(),
            "Initialized HBV engine"
        );
        self.engine = Some(engine);

        Ok((config_file, cfg_dir.to_path_buf()))
    }

    /// Whether [`setup`](Self::setup) has started an engine.
    pub fn is_running(&self) -> bool {
        self.engine.is_some()
    }

    /// The (initial) parameters, by name.
    pub fn parameters(&self) -> NamedValues {
        self.config.parameters()
    }

    /// The (initial) storages, by name.
    pub fn states(&self) -> NamedValues {
        self.config.states()
    }

    pub fn parameter_values(&self) -> HbvResult<Vec<(&'static str, f64)>> {
        self.config.parameter_values()
    }

    pub fn state_values(&self) -> HbvResult<Vec<(&'static str, f64)>> {
        self.config.state_values()
    }

    fn engine(&self) -> HbvResult<&dyn BmiEngine> {
        self.engine
            .as_deref()
            .ok_or_else(|| HbvError::Configuration("model has not been set up".to_string()))
    }

    fn engine_mut(&mut self) -> HbvResult<&mut (dyn BmiEngine + 'static)> {
        self.engine
            .as_deref_mut()
            .ok_or_else(|| HbvError::Configuration("model has not been set up".to_string()))
    }

    pub fn update(&mut self) -> HbvResult<()> {
        self.engine_mut()?.update()
    }

    pub fn time(&self) -> HbvResult<f64> {
        self.engine()?.get_current_time()
    }

    pub fn start_time(&self) -> HbvResult<f64> {
        self.engine()?.get_start_time()
    }

    pub fn end_time(&self) -> HbvResult<f64> {
        self.engine()?.get_end_time()
    }

    pub fn time_step(&self) -> HbvResult<f64> {
        self.engine()?.get_time_step()
    }

    pub fn output_var_names(&self) -> HbvResult<Vec<String>> {
        self.engine()?.get_output_var_names()
    }

    pub fn get_value(&self, name: &str) -> HbvResult<Vec<f64>> {
        self.engine()?.get_value(name)
    }

    pub fn set_value(&mut self, name: &str, values: &[f64]) -> HbvResult<()> {
        self.engine_mut()?.set_value(name, values)
    }

    /// Tear down the engine.
    ///
    /// The engine is finalized once and released whether or not that succeeds;
    /// a failure is returned to the caller. A model that was never set up has
    /// nothing to tear down.
    pub fn finalize(mut self) -> HbvResult<()> {
        let Some(mut engine) = self.engine.take() else {
            return Ok(());
        };
        let result = engine.finalize();
        drop(engine);
        result?;
        info!(engine = %self.strategy.describe(), "Finalized HBV engine");
        Ok(())
    }
}
