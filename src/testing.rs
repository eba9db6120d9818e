//! In-memory engine doubles for unit tests.

use crate::engine::BmiEngine;
use crate::execution::{ContainerImage, ContainerLauncher};
use hbv_core::{HbvError, HbvResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Shared record of the calls made on a [`MockEngine`].
#[derive(Debug, Clone, Default)]
pub(crate) struct EngineLog(Rc<RefCell<Vec<String>>>);

impl EngineLog {
    fn push(&self, call: impl Into<String>) {
        self.0.borrow_mut().push(call.into());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.0.borrow().iter().filter(|c| c.as_str() == call).count()
    }
}

/// Engine that keeps values in a map and advances time by one day per update.
pub(crate) struct MockEngine {
    log: EngineLog,
    time: f64,
    values: HashMap<String, Vec<f64>>,
    fail_finalize: bool,
}

impl MockEngine {
    pub(crate) fn new(log: EngineLog) -> Self {
        Self {
            log,
            time: 0.0,
            values: HashMap::from([("Q".to_string(), vec![0.0])]),
            fail_finalize: false,
        }
    }

    pub(crate) fn failing_finalize(log: EngineLog) -> Self {
        Self {
            fail_finalize: true,
            ..Self::new(log)
        }
    }
}

impl BmiEngine for MockEngine {
    fn initialize(&mut self, config_file: &Path) -> HbvResult<()> {
        self.log.push(format!("initialize {}", config_file.display()));
        Ok(())
    }

    fn update(&mut self) -> HbvResult<()> {
        self.log.push("update");
        self.time += 1.0;
        Ok(())
    }

    fn get_current_time(&self) -> HbvResult<f64> {
        Ok(self.time)
    }

    fn get_start_time(&self) -> HbvResult<f64> {
        Ok(0.0)
    }

    fn get_end_time(&self) -> HbvResult<f64> {
        Ok(365.0)
    }

    fn get_time_step(&self) -> HbvResult<f64> {
        Ok(1.0)
    }

    fn get_output_var_names(&self) -> HbvResult<Vec<String>> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn get_value(&self, name: &str) -> HbvResult<Vec<f64>> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| HbvError::Engine(format!("unknown variable {}", name)))
    }

    fn set_value(&mut self, name: &str, values: &[f64]) -> HbvResult<()> {
        self.log.push(format!("set_value {}", name));
        self.values.insert(name.to_string(), values.to_vec());
        Ok(())
    }

    fn finalize(&mut self) -> HbvResult<()> {
        self.log.push("finalize");
        if self.fail_finalize {
            Err(HbvError::Engine("engine went away".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Launcher that hands out [`MockEngine`]s and remembers what it launched.
#[derive(Default)]
pub(crate) struct MockLauncher {
    pub(crate) log: EngineLog,
    launched: RefCell<Vec<(ContainerImage, PathBuf)>>,
}

impl MockLauncher {
    pub(crate) fn launches(&self) -> Vec<(ContainerImage, PathBuf)> {
        self.launched.borrow().clone()
    }
}

impl ContainerLauncher for MockLauncher {
    fn launch(&self, image: &ContainerImage, work_dir: &Path) -> HbvResult<Box<dyn BmiEngine>> {
        self.launched
            .borrow_mut()
            .push((image.clone(), work_dir.to_path_buf()));
        Ok(Box::new(MockEngine::new(self.log.clone())))
    }
}
