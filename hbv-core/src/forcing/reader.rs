//! Reader for the HBV text forcing format.
//!
//! Each row holds five numeric fields separated by tabs or spaces, with no header:
//!
//! ```text
//! year  month  day  pr  pev
//! ```
//!
//! The date fields become the time index and are then dropped; only `pr` and
//! `pev` are kept as data variables. The input is expected to be daily and
//! gap-free, nothing is resampled or filled.

use super::dataset::ForcingDataset;
use crate::errors::{HbvError, HbvResult};
use chrono::NaiveDate;
use ndarray::Array1;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const N_COLUMNS: usize = 5;

pub const TITLE: &str = "HBV forcing data";
pub const HISTORY: &str = "Created by hbv_core::forcing::HbvForcing::to_dataset()";

/// Read and parse a forcing file.
pub fn read_forcing_file(path: &Path) -> HbvResult<ForcingDataset> {
    let text = std::fs::read_to_string(path)?;
    let dataset = parse_forcing(&text, path)?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        "Loaded HBV forcing"
    );
    Ok(dataset)
}

/// Parse forcing text. `path` is only used in error messages.
pub fn parse_forcing(text: &str, path: &Path) -> HbvResult<ForcingDataset> {
    let mut time = Vec::new();
    let mut pr = Vec::new();
    let mut pev = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let error = |details: String| HbvError::ForcingFormat {
            path: path.to_path_buf(),
            line: line_number,
            details,
        };

        if line.trim().is_empty() {
            continue;
        }

        let fields = line
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| error(format!("'{}' is not a number", field)))
            })
            .collect::<HbvResult<Vec<f64>>>()?;
        if fields.len() != N_COLUMNS {
            return Err(error(format!(
                "expected {} columns (year, month, day, pr, pev), got {}",
                N_COLUMNS,
                fields.len()
            )));
        }

        let ranges = [
            ("year", i32::MIN as f64, i32::MAX as f64),
            ("month", 0.0, u32::MAX as f64),
            ("day", 0.0, u32::MAX as f64),
        ];
        for (value, (name, min, max)) in fields.iter().zip(ranges) {
            if !value.is_finite() || *value < min || *value > max {
                return Err(error(format!("{} '{}' is not a valid date field", name, value)));
            }
        }

        let (year, month, day) = (fields[0] as i32, fields[1] as u32, fields[2] as u32);
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| error(format!("{}-{}-{} is not a calendar date", year, month, day)))?;
        if let Some(previous) = time.last() {
            if date <= *previous {
                return Err(error(format!(
                    "date {} does not follow {}",
                    date, previous
                )));
            }
        }

        time.push(date);
        pr.push(fields[3]);
        pev.push(fields[4]);
    }

    let attrs = BTreeMap::from([
        ("title".to_string(), TITLE.to_string()),
        ("history".to_string(), HISTORY.to_string()),
    ]);
    ForcingDataset::new(
        time,
        vec![
            ("pr".to_string(), Array1::from(pr)),
            ("pev".to_string(), Array1::from(pev)),
        ],
        attrs,
    )
}
