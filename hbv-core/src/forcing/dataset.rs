use crate::errors::{HbvError, HbvResult};
use chrono::NaiveDate;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily forcing time series with named data variables.
///
/// The time index is strictly increasing and every data variable has one value
/// per timestamp. Values are stored as given; physical plausibility (e.g.
/// negative precipitation) is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcingDataset {
    time: Vec<NaiveDate>,
    data_vars: Vec<(String, Array1<f64>)>,
    attrs: BTreeMap<String, String>,
}

impl ForcingDataset {
    pub fn new(
        time: Vec<NaiveDate>,
        data_vars: Vec<(String, Array1<f64>)>,
        attrs: BTreeMap<String, String>,
    ) -> HbvResult<Self> {
        if let Some(pair) = time.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(HbvError::validation(
                "time",
                format!("index is not strictly increasing at {}", pair[1]),
            ));
        }
        for (name, values) in data_vars.iter() {
            if values.len() != time.len() {
                return Err(HbvError::validation(
                    name.as_str(),
                    format!(
                        "expected {} values to match the time index, got {}",
                        time.len(),
                        values.len()
                    ),
                ));
            }
        }
        Ok(Self {
            time,
            data_vars,
            attrs,
        })
    }

    /// Number of timestamps.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[NaiveDate] {
        &self.time
    }

    /// Names of the data variables, in insertion order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.data_vars.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn variable(&self, name: &str) -> Option<&Array1<f64>> {
        self.data_vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    /// Value of a variable on a given day, if both exist.
    pub fn value_at(&self, name: &str, date: NaiveDate) -> Option<f64> {
        let index = self.time.binary_search(&date).ok()?;
        self.variable(name).map(|values| values[index])
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, d).unwrap()
    }

    #[test]
    fn test_lookup() {
        let ds = ForcingDataset::new(
            vec![day(1), day(2), day(3)],
            vec![("pr".to_string(), array![1.0, 2.0, 3.0])],
            BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.value_at("pr", day(2)), Some(2.0));
        assert_eq!(ds.value_at("pr", day(4)), None);
        assert_eq!(ds.value_at("pev", day(1)), None);
        assert_eq!(ds.variable_names(), vec!["pr"]);
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let result = ForcingDataset::new(
            vec![day(1), day(1)],
            vec![("pr".to_string(), array![1.0, 2.0])],
            BTreeMap::new(),
        );
        assert!(matches!(result, Err(HbvError::Validation { .. })));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let result = ForcingDataset::new(
            vec![day(1), day(2)],
            vec![("pev".to_string(), array![1.0])],
            BTreeMap::new(),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("pev"));
    }

    #[test]
    fn test_empty() {
        let ds = ForcingDataset::new(vec![], vec![], BTreeMap::new()).unwrap();
        assert!(ds.is_empty());
    }
}
