//! Forcing containers for the HBV model
//!
//! Two containers are provided:
//!
//! - [`HbvForcing`]: a single tab-delimited text file holding precipitation and
//!   potential evaporation, loaded into a [`ForcingDataset`] with
//!   [`HbvForcing::to_dataset`].
//! - [`LumpedForcing`]: catchment-averaged forcing stored as one file per
//!   variable, as produced by the framework's forcing generators.
//!
//! Both implement [`ForcingSource`], which is what the configuration builder
//! uses to resolve the files the engine reads.

mod dataset;
mod reader;

pub use dataset::ForcingDataset;
pub use reader::{parse_forcing, read_forcing_file};

use crate::errors::{HbvError, HbvResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Identifier of the precipitation forcing variable.
pub const PRECIPITATION: &str = "pr";
/// Identifier of the potential evaporation forcing variable.
pub const POTENTIAL_EVAPORATION: &str = "evspsblpot";
/// Identifier of the near-surface mean temperature forcing variable.
pub const MEAN_TEMPERATURE: &str = "tas";

pub const DEFAULT_FORCING_FILE: &str = "forcing.txt";

/// Parse an ISO 8601 UTC timestamp such as `1989-01-02T00:00:00Z`.
pub fn parse_time(argument: &str, value: &str) -> HbvResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| HbvError::validation(argument, format!("'{}': {}", value, e)))
}

/// Anything that can tell where the files for a forcing variable live.
pub trait ForcingSource {
    /// Directory holding the forcing files.
    fn directory(&self) -> Option<&Path>;

    /// File name for a forcing variable identifier.
    fn filename(&self, variable: &str) -> Option<&str>;

    /// Absolute path of the file for a forcing variable.
    ///
    /// The file is not required to exist.
    fn path_for(&self, variable: &str) -> HbvResult<PathBuf> {
        let directory = self
            .directory()
            .ok_or_else(|| HbvError::Configuration("forcing directory is not set".to_string()))?;
        let filename = self.filename(variable).ok_or_else(|| {
            HbvError::Configuration(format!("no forcing file for variable '{}'", variable))
        })?;
        let path = directory.join(filename);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(std::env::current_dir()?.join(path))
        }
    }
}

fn default_forcing_file() -> Option<String> {
    Some(DEFAULT_FORCING_FILE.to_string())
}

/// Container for HBV forcing stored as a single text file.
///
/// The file holds columns `year month day pr pev`, see [`parse_forcing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HbvForcing {
    /// Directory where the forcing file is stored.
    pub directory: Option<PathBuf>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Shape file used for spatial selection.
    #[serde(default)]
    pub shape: Option<PathBuf>,
    #[serde(default = "default_forcing_file")]
    pub forcing_file: Option<String>,
}

impl HbvForcing {
    /// Create a forcing container from ISO 8601 UTC start and end times.
    pub fn new(directory: impl Into<PathBuf>, start_time: &str, end_time: &str) -> HbvResult<Self> {
        Ok(Self {
            directory: Some(directory.into()),
            start_time: parse_time("start_time", start_time)?,
            end_time: parse_time("end_time", end_time)?,
            shape: None,
            forcing_file: default_forcing_file(),
        })
    }

    pub fn with_shape(mut self, shape: impl Into<PathBuf>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_forcing_file(mut self, forcing_file: impl Into<String>) -> Self {
        self.forcing_file = Some(forcing_file.into());
        self
    }

    /// Load the forcing file into a time-indexed dataset with `pr` and `pev`.
    ///
    /// Fails with [`HbvError::Configuration`] if the directory or file name is unset.
    pub fn to_dataset(&self) -> HbvResult<ForcingDataset> {
        match (&self.directory, &self.forcing_file) {
            (Some(directory), Some(forcing_file)) => {
                read_forcing_file(&directory.join(forcing_file))
            }
            _ => Err(HbvError::Configuration(
                "Directory or forcing_file is not set".to_string(),
            )),
        }
    }
}

impl ForcingSource for HbvForcing {
    fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Every variable lives in the one forcing file.
    fn filename(&self, _variable: &str) -> Option<&str> {
        self.forcing_file.as_deref()
    }
}

/// Catchment-averaged forcing stored as one file per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpedForcing {
    pub directory: PathBuf,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub shape: Option<PathBuf>,
    /// File name per variable identifier (e.g. `pr` -> `pr.nc`)
    #[serde(default)]
    pub filenames: BTreeMap<String, String>,
}

impl LumpedForcing {
    pub fn new(directory: impl Into<PathBuf>, start_time: &str, end_time: &str) -> HbvResult<Self> {
        Ok(Self {
            directory: directory.into(),
            start_time: parse_time("start_time", start_time)?,
            end_time: parse_time("end_time", end_time)?,
            shape: None,
            filenames: BTreeMap::new(),
        })
    }

    pub fn with_shape(mut self, shape: impl Into<PathBuf>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_file(mut self, variable: impl Into<String>, filename: impl Into<String>) -> Self {
        self.filenames.insert(variable.into(), filename.into());
        self
    }
}

impl ForcingSource for LumpedForcing {
    fn directory(&self) -> Option<&Path> {
        Some(&self.directory)
    }

    fn filename(&self, variable: &str) -> Option<&str> {
        self.filenames.get(variable).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_time() {
        let t = parse_time("start_time", "1989-01-02T00:00:00Z").unwrap();
        assert_eq!(t.to_rfc3339(), "1989-01-02T00:00:00+00:00");
        assert!(parse_time("start_time", "1989-01-02").is_err());
    }

    #[test]
    fn test_default_forcing_file() {
        let forcing =
            HbvForcing::new("/data", "2000-01-01T00:00:00Z", "2000-12-31T00:00:00Z").unwrap();
        assert_eq!(forcing.forcing_file.as_deref(), Some(DEFAULT_FORCING_FILE));
        assert!(forcing.shape.is_none());
    }

    #[test]
    fn test_missing_directory_is_configuration_error() {
        let mut forcing =
            HbvForcing::new("/data", "2000-01-01T00:00:00Z", "2000-12-31T00:00:00Z").unwrap();
        forcing.directory = None;

        let err = forcing.to_dataset().unwrap_err();
        assert!(matches!(err, HbvError::Configuration(_)));
    }

    #[test]
    fn test_missing_forcing_file_is_configuration_error() {
        let mut forcing =
            HbvForcing::new("/data", "2000-01-01T00:00:00Z", "2000-12-31T00:00:00Z").unwrap();
        forcing.forcing_file = None;

        assert!(matches!(
            forcing.to_dataset(),
            Err(HbvError::Configuration(_))
        ));
    }

    #[test]
    fn test_to_dataset_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("rhine.txt")).unwrap();
        writeln!(file, "2000\t1\t1\t1.5\t0.3").unwrap();
        writeln!(file, "2000\t1\t2\t0.0\t0.5").unwrap();

        let forcing = HbvForcing::new(dir.path(), "2000-01-01T00:00:00Z", "2000-01-02T00:00:00Z")
            .unwrap()
            .with_forcing_file("rhine.txt");
        let ds = forcing.to_dataset().unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_to_dataset_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let forcing =
            HbvForcing::new(dir.path(), "2000-01-01T00:00:00Z", "2000-01-02T00:00:00Z").unwrap();
        assert!(matches!(forcing.to_dataset(), Err(HbvError::Io(_))));
    }

    #[test]
    fn test_lumped_paths() {
        let forcing = LumpedForcing::new("/data/rhine", "2000-01-01T00:00:00Z", "2001-01-01T00:00:00Z")
            .unwrap()
            .with_file(PRECIPITATION, "pr.nc");

        assert_eq!(
            forcing.path_for(PRECIPITATION).unwrap(),
            PathBuf::from("/data/rhine/pr.nc")
        );
        assert!(matches!(
            forcing.path_for(MEAN_TEMPERATURE),
            Err(HbvError::Configuration(_))
        ));
    }

    #[test]
    fn test_relative_directory_is_made_absolute() {
        let forcing = LumpedForcing::new("forcing", "2000-01-01T00:00:00Z", "2001-01-01T00:00:00Z")
            .unwrap()
            .with_file(PRECIPITATION, "pr.nc");
        let path = forcing.path_for(PRECIPITATION).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("forcing/pr.nc"));
    }

    #[test]
    fn test_hbv_forcing_serde_defaults() {
        let forcing: HbvForcing = serde_json::from_str(
            r#"{"directory": "/data", "start_time": "2000-01-01T00:00:00Z", "end_time": "2000-02-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(forcing.forcing_file.as_deref(), Some("forcing.txt"));
    }
}
