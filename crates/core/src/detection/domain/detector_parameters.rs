use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{DEFAULT_MIN_NEIGHBORS, DEFAULT_MIN_SIZE, DEFAULT_SCALE_FACTOR};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("scale factor must be greater than 1.0, got {0}")]
    ScaleFactor(f64),
    #[error("min neighbors must be at least 1, got {0}")]
    MinNeighbors(u32),
    #[error("max size {max:?} is smaller than min size {min:?}")]
    SizeRange { min: (u32, u32), max: (u32, u32) },
}

/// Multi-scale scan settings handed to the object detector.
///
/// `scale_factor` is the pyramid step between scan levels; `min_neighbors`
/// is how many overlapping raw hits a candidate needs to survive grouping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParameters {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub min_size: (u32, u32),
    pub max_size: Option<(u32, u32)>,
}

impl DetectorParameters {
    pub fn new(
        scale_factor: f64,
        min_neighbors: u32,
        min_size: (u32, u32),
        max_size: Option<(u32, u32)>,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            scale_factor,
            min_neighbors,
            min_size,
            max_size,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 1.0) {
            return Err(ParameterError::ScaleFactor(self.scale_factor));
        }
        if self.min_neighbors < 1 {
            return Err(ParameterError::MinNeighbors(self.min_neighbors));
        }
        if let Some(max) = self.max_size {
            if max.0 < self.min_size.0 || max.1 < self.min_size.1 {
                return Err(ParameterError::SizeRange {
                    min: self.min_size,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl Default for DetectorParameters {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: DEFAULT_MIN_SIZE,
            max_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let params = DetectorParameters::default();
        assert!(params.validate().is_ok());
        assert_relative_eq!(params.scale_factor, 1.2);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!(params.min_size, (30, 30));
        assert_eq!(params.max_size, None);
    }

    #[rstest]
    #[case::one(1.0)]
    #[case::below_one(0.8)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn test_rejects_scale_factor(#[case] scale_factor: f64) {
        let err = DetectorParameters::new(scale_factor, 3, (30, 30), None).unwrap_err();
        assert!(matches!(err, ParameterError::ScaleFactor(_)));
    }

    #[test]
    fn test_rejects_zero_neighbors() {
        let err = DetectorParameters::new(1.1, 0, (30, 30), None).unwrap_err();
        assert_eq!(err, ParameterError::MinNeighbors(0));
    }

    #[test]
    fn test_rejects_max_below_min() {
        let err = DetectorParameters::new(1.1, 3, (30, 30), Some((20, 40))).unwrap_err();
        assert!(matches!(err, ParameterError::SizeRange { .. }));
    }

    #[test]
    fn test_accepts_max_size() {
        let params = DetectorParameters::new(1.05, 6, (24, 24), Some((200, 200))).unwrap();
        assert_eq!(params.max_size, Some((200, 200)));
    }

    #[test]
    fn test_deserialize_fills_missing_fields_with_defaults() {
        let params: DetectorParameters = serde_json::from_str(r#"{"min_neighbors": 3}"#).unwrap();
        assert_eq!(params.min_neighbors, 3);
        assert_relative_eq!(params.scale_factor, 1.2);
        assert_eq!(params.min_size, (30, 30));
    }
}
