//! Interface to the external HBV engine.
//!
//! The engine follows the Basic Model Interface (BMI): it is initialised from a
//! configuration file, advanced one step at a time with `update`, inspected and
//! modified through `get_value`/`set_value`, and torn down with `finalize`.
//! Implementations live outside this crate (a gRPC client talking to a container,
//! or an in-process engine); failures they report surface as
//! [`HbvError::Engine`](hbv_core::HbvError::Engine) and are never retried here.

use hbv_core::HbvResult;
use std::path::Path;

/// Handle to a running HBV engine.
pub trait BmiEngine {
    /// Read `config_file` and prepare the engine for time stepping.
    fn initialize(&mut self, config_file: &Path) -> HbvResult<()>;

    /// Advance the model by one time step.
    fn update(&mut self) -> HbvResult<()>;

    fn get_current_time(&self) -> HbvResult<f64>;
    fn get_start_time(&self) -> HbvResult<f64>;
    fn get_end_time(&self) -> HbvResult<f64>;
    fn get_time_step(&self) -> HbvResult<f64>;

    /// Names of the variables that can be read with [`get_value`](BmiEngine::get_value).
    fn get_output_var_names(&self) -> HbvResult<Vec<String>>;

    fn get_value(&self, name: &str) -> HbvResult<Vec<f64>>;
    fn set_value(&mut self, name: &str, values: &[f64]) -> HbvResult<()>;

    /// Release engine resources. The engine must not be used afterwards.
    fn finalize(&mut self) -> HbvResult<()>;
}
