//! HBV model configuration.
//!
//! The engine is configured through a small JSON document:
//!
//! ```json
//! {
//!     "precipitation_file": "/data/rhine/pr.nc",
//!     "potential_evaporation_file": "/data/rhine/evspsblpot.nc",
//!     "mean_temperature_file": "/data/rhine/tas.nc",
//!     "parameters": "8,0.5,200,2,0.5,4,0.01,0.001,2.5",
//!     "initial_storage": "0,0,0,0,0"
//! }
//! ```
//!
//! Parameters and initial storages are written as comma separated strings rather
//! than JSON arrays because that is what the engine parses. [`HbvConfigBuilder`]
//! validates the inputs, resolves the forcing paths and writes the document;
//! its [`parameters`](HbvConfigBuilder::parameters) and
//! [`states`](HbvConfigBuilder::states) accessors read the values back by name.

use crate::errors::{HbvError, HbvResult};
use crate::forcing::{ForcingSource, MEAN_TEMPERATURE, POTENTIAL_EVAPORATION, PRECIPITATION};
use crate::value::{join, ScalarValue};
use crate::variables::{parameter_names, state_names, N_PARAMS, N_STATES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the configuration file written into the run's configuration directory.
pub const CONFIG_FILE_NAME: &str = "HBV_config.json";

/// Contents of `HBV_config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub precipitation_file: String,
    pub potential_evaporation_file: String,
    pub mean_temperature_file: String,
    /// Comma separated parameter values, in [`parameter_names`] order
    pub parameters: String,
    /// Comma separated initial storages, in [`state_names`] order
    pub initial_storage: String,
}

impl ModelConfig {
    /// Serialise with 4-space indentation.
    pub fn to_json(&self) -> HbvResult<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn from_file(path: &Path) -> HbvResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Arguments accepted when setting up an HBV model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelArguments {
    /// The nine HBV parameters. Required.
    #[serde(default)]
    pub parameters: Option<Vec<ScalarValue>>,
    /// The five initial storages. Defaults to zeros.
    #[serde(default)]
    pub initial_storage: Option<Vec<ScalarValue>>,
}

impl ModelArguments {
    pub fn new<T: Into<ScalarValue>>(parameters: impl IntoIterator<Item = T>) -> Self {
        Self {
            parameters: Some(parameters.into_iter().map(Into::into).collect()),
            initial_storage: None,
        }
    }

    pub fn with_initial_storage<T: Into<ScalarValue>>(
        mut self,
        initial_storage: impl IntoIterator<Item = T>,
    ) -> Self {
        self.initial_storage = Some(initial_storage.into_iter().map(Into::into).collect());
        self
    }
}

/// Name and raw decimal token pairs, in engine order.
pub type NamedValues = Vec<(&'static str, String)>;

/// Pair canonical names with the tokens of a comma separated string.
///
/// Pairing stops at the shorter side. An empty string splits into a single
/// empty token, so only the first name is returned.
pub fn named_values(names: &[&'static str], joined: &str) -> NamedValues {
    names
        .iter()
        .copied()
        .zip(joined.split(',').map(str::to_string))
        .collect()
}

/// Parse a comma separated string into name and value pairs.
///
/// Unlike [`named_values`] this requires one valid number per name.
pub fn typed_values(
    argument: &str,
    names: &[&'static str],
    joined: &str,
) -> HbvResult<Vec<(&'static str, f64)>> {
    if joined.is_empty() {
        return Err(HbvError::validation(
            argument,
            "no configuration has been built yet",
        ));
    }
    let tokens: Vec<&str> = joined.split(',').collect();
    if tokens.len() != names.len() {
        return Err(HbvError::validation(
            argument,
            format!("expected {} values, got {}", names.len(), tokens.len()),
        ));
    }
    names
        .iter()
        .zip(tokens)
        .map(|(name, token)| {
            token
                .trim()
                .parse::<f64>()
                .map(|v| (*name, v))
                .map_err(|_| {
                    HbvError::validation(argument, format!("{} = '{}' is not a number", name, token))
                })
        })
        .collect()
}

fn check_values(argument: &str, values: &[ScalarValue], expected: usize) -> HbvResult<()> {
    if values.len() != expected {
        return Err(HbvError::validation(
            argument,
            format!("expected {} values, got {}", expected, values.len()),
        ));
    }
    values.iter().try_for_each(|v| v.validate(argument))
}

/// Builds and writes the engine configuration.
///
/// Each builder owns its own [`ModelConfig`], starting out with every field empty.
#[derive(Debug, Clone, Default)]
pub struct HbvConfigBuilder {
    config: ModelConfig,
}

impl HbvConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration as last written.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Validate the arguments and write `HBV_config.json` into `cfg_dir`.
    ///
    /// Nothing is written and the stored configuration is left untouched if
    /// validation or path resolution fails. The forcing files are not required
    /// to exist.
    pub fn make_cfg_file(
        &mut self,
        arguments: &ModelArguments,
        forcing: &dyn ForcingSource,
        cfg_dir: &Path,
    ) -> HbvResult<PathBuf> {
        let parameters = arguments.parameters.as_deref().ok_or_else(|| {
            HbvError::validation(
                "parameters",
                format!(
                    "the model needs the parameters argument, consisting of {} parameters; [{}]",
                    N_PARAMS,
                    parameter_names().join(", ")
                ),
            )
        })?;
        check_values("parameters", parameters, N_PARAMS)?;

        let initial_storage = match arguments.initial_storage.as_deref() {
            Some(storage) => {
                check_values("initial_storage", storage, N_STATES)?;
                storage.to_vec()
            }
            None => vec![ScalarValue::Int(0); N_STATES],
        };

        let config = ModelConfig {
            precipitation_file: path_string(forcing.path_for(PRECIPITATION)?),
            potential_evaporation_file: path_string(forcing.path_for(POTENTIAL_EVAPORATION)?),
            mean_temperature_file: path_string(forcing.path_for(MEAN_TEMPERATURE)?),
            parameters: join(parameters),
            initial_storage: join(&initial_storage),
        };

        std::fs::create_dir_all(cfg_dir)?;
        let config_file = cfg_dir.join(CONFIG_FILE_NAME);
        std::fs::write(&config_file, config.to_json()?)?;
        info!(path = %config_file.display(), "Wrote HBV configuration");

        self.config = config;
        Ok(config_file)
    }

    /// Configured parameters as name and token pairs.
    pub fn parameters(&self) -> NamedValues {
        named_values(&parameter_names(), &self.config.parameters)
    }

    /// Configured initial storages as name and token pairs.
    pub fn states(&self) -> NamedValues {
        named_values(&state_names(), &self.config.initial_storage)
    }

    pub fn parameter_values(&self) -> HbvResult<Vec<(&'static str, f64)>> {
        typed_values("parameters", &parameter_names(), &self.config.parameters)
    }

    pub fn state_values(&self) -> HbvResult<Vec<(&'static str, f64)>> {
        typed_values("initial_storage", &state_names(), &self.config.initial_storage)
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
