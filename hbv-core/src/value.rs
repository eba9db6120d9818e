//! Numeric inputs for parameters and initial storages.
//!
//! Callers may pass whole numbers or reals. The engine reads the configuration as
//! text, so each value keeps enough information to be rendered back in the form it
//! was given: `3` stays `3`, `3.0` stays `3.0`.

use crate::errors::{HbvError, HbvResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single numeric model input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    /// Single precision input, rendered with its own shortest decimal form
    F32(f32),
}

impl ScalarValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            ScalarValue::Int(v) => *v as f64,
            ScalarValue::Float(v) => *v,
            ScalarValue::F32(v) => *v as f64,
        }
    }

    /// Check the value can be written as a decimal token.
    pub fn validate(&self, argument: &str) -> HbvResult<()> {
        match self {
            ScalarValue::Float(v) if !v.is_finite() => Err(HbvError::validation(
                argument,
                format!("{} is not a finite number", v),
            )),
            ScalarValue::F32(v) if !v.is_finite() => Err(HbvError::validation(
                argument,
                format!("{} is not a finite number", v),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{}", v),
            // Whole floats keep a fractional part so they read back as reals
            ScalarValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e16 => write!(f, "{:.1}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::F32(v) if v.fract() == 0.0 && v.abs() < 1e7 => write!(f, "{:.1}", v),
            ScalarValue::F32(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(value as i64)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<f32> for ScalarValue {
    fn from(value: f32) -> Self {
        ScalarValue::F32(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

/// Convert a slice of anything numeric into model inputs.
pub fn scalars<T: Copy + Into<ScalarValue>>(values: &[T]) -> Vec<ScalarValue> {
    values.iter().map(|v| (*v).into()).collect()
}

/// Join values into the comma separated form the engine reads.
pub fn join(values: &[ScalarValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ScalarValue::Int(3).to_string(), "3");
        assert_eq!(ScalarValue::Float(3.0).to_string(), "3.0");
        assert_eq!(ScalarValue::Float(0.25).to_string(), "0.25");
        assert_eq!(ScalarValue::Float(-1.5).to_string(), "-1.5");
    }

    #[test]
    fn test_display_reparses() {
        for v in [0.1, 1e-7, 123456.789, 2.0 / 3.0] {
            let text = ScalarValue::Float(v).to_string();
            assert_eq!(text.parse::<f64>().unwrap(), v);
        }
    }

    #[test]
    fn test_single_precision_keeps_its_digits() {
        assert_eq!(ScalarValue::from(0.1f32).to_string(), "0.1");
        assert_eq!(ScalarValue::from(2.0f32).to_string(), "2.0");
        assert_eq!(join(&scalars(&[0.1f32; 3])), "0.1,0.1,0.1");
        assert!((ScalarValue::from(0.1f32).as_f64() - 0.1).abs() < 1e-7);
        assert!(ScalarValue::from(f32::NAN).validate("parameters").is_err());
    }

    #[test]
    fn test_join_mixed() {
        let values = vec![ScalarValue::Int(1), ScalarValue::Float(2.5), 0.into()];
        assert_eq!(join(&values), "1,2.5,0");
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join(&[]), "");
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ScalarValue::Float(f64::NAN).validate("parameters").unwrap_err();
        assert!(matches!(err, HbvError::Validation { .. }));
        assert!(ScalarValue::Float(1.0).validate("parameters").is_ok());
        assert!(ScalarValue::Int(i64::MAX).validate("parameters").is_ok());
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<ScalarValue> = serde_json::from_str("[1, 2.5]").unwrap();
        assert_eq!(values, vec![ScalarValue::Int(1), ScalarValue::Float(2.5)]);
    }
}
