//! Feature scaling applied before classification.

use crate::artifacts::parse_json;
use crate::validation::ensure_finite;
use crate::{ArtifactKind, CardioError, CardioResult};
use serde::Deserialize;
use std::fmt;

/// An affine transform learned per feature slot.
///
/// The transform is positional: slot `i` of the input is normalised with the parameters
/// learned for slot `i`. A row in the wrong order is not detected here and yields wrong
/// scores, so callers must feed rows aligned to the same schema the scaler was fitted on.
pub trait Scaler: Send + Sync + fmt::Debug {
    /// Number of features the transform expects.
    fn n_features(&self) -> usize;

    /// Slot names recorded when the scaler was fitted, if any.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Normalise a row.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::DimensionMismatch`] if `row` has the wrong width.
    fn transform(&self, row: &[f64]) -> CardioResult<Vec<f64>>;

    /// One-line description for diagnostics.
    fn describe(&self) -> String {
        format!("scaler over {} features", self.n_features())
    }
}

/// Z-score scaler: `z = (x - mean) / scale`.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    feature_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StandardScalerWire {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::InvalidArtifact`] if:
    /// - `mean` is empty or its length differs from `scale`,
    /// - any mean is not finite,
    /// - any scale is not finite or not strictly positive,
    /// - `feature_names` is present with a different length.
    pub fn new(
        mean: Vec<f64>,
        scale: Vec<f64>,
        feature_names: Option<Vec<String>>,
    ) -> CardioResult<Self> {
        if mean.is_empty() {
            return Err(CardioError::invalid(
                ArtifactKind::Scaler,
                "mean must not be empty",
            ));
        }
        if mean.len() != scale.len() {
            return Err(CardioError::invalid(
                ArtifactKind::Scaler,
                format!(
                    "mean has {} entries but scale has {}",
                    mean.len(),
                    scale.len()
                ),
            ));
        }
        ensure_finite(ArtifactKind::Scaler, "mean", &mean)?;
        ensure_finite(ArtifactKind::Scaler, "scale", &scale)?;
        if let Some(idx) = scale.iter().position(|s| *s <= 0.0) {
            return Err(CardioError::invalid(
                ArtifactKind::Scaler,
                format!("scale[{idx}] must be positive"),
            ));
        }
        if let Some(names) = &feature_names {
            if names.len() != mean.len() {
                return Err(CardioError::invalid(
                    ArtifactKind::Scaler,
                    format!(
                        "feature_names has {} entries but mean has {}",
                        names.len(),
                        mean.len()
                    ),
                ));
            }
        }

        Ok(Self {
            mean,
            scale,
            feature_names,
        })
    }

    /// Parse a scaler artifact from JSON.
    pub fn from_json_str(text: &str) -> CardioResult<Self> {
        let wire: StandardScalerWire = parse_json(ArtifactKind::Scaler, text)?;
        Self::new(wire.mean, wire.scale, wire.feature_names)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn transform(&self, row: &[f64]) -> CardioResult<Vec<f64>> {
        if row.len() != self.mean.len() {
            return Err(CardioError::DimensionMismatch {
                stage: "scaler",
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    fn describe(&self) -> String {
        let names = if self.feature_names.is_some() {
            "with"
        } else {
            "without"
        };
        format!(
            "standard scaler ({} features, {names} recorded feature names)",
            self.mean.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_per_slot() {
        let scaler = StandardScaler::new(vec![50.0, 0.5], vec![10.0, 0.5], None).expect("scaler");
        let z = scaler.transform(&[60.0, 0.0]).expect("transform");
        assert_eq!(z, vec![1.0, -1.0]);
    }

    #[test]
    fn rejects_wrong_width() {
        let scaler = StandardScaler::new(vec![0.0; 3], vec![1.0; 3], None).expect("scaler");
        let err = scaler.transform(&[1.0, 2.0]).expect_err("width mismatch");
        assert!(matches!(
            err,
            CardioError::DimensionMismatch {
                stage: "scaler",
                expected: 3,
                actual: 2
            }
        ));
        assert!(!err.is_configuration_fault());
    }

    #[test]
    fn rejects_zero_scale() {
        let err = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 0.0], None)
            .expect_err("zero scale");
        assert!(
            matches!(err, CardioError::InvalidArtifact { reason, .. } if reason == "scale[1] must be positive")
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = StandardScaler::new(vec![0.0, 0.0], vec![1.0], None).expect_err("length");
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn parses_json_artifact() {
        let scaler = StandardScaler::from_json_str(
            r#"{"mean": [53.5, 132.4], "scale": [9.4, 18.5], "feature_names": ["Age", "RestingBP"]}"#,
        )
        .expect("parse scaler");
        assert_eq!(scaler.n_features(), 2);
        assert_eq!(
            scaler.feature_names(),
            Some(&["Age".to_string(), "RestingBP".to_string()][..])
        );
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let err = StandardScaler::from_json_str(r#"{"mean": [1.0], "scale": [1.0], "var": [1.0]}"#)
            .expect_err("unknown field");
        match err {
            CardioError::ArtifactFormat {
                artifact, message, ..
            } => {
                assert_eq!(artifact, ArtifactKind::Scaler);
                assert!(message.contains("var"));
            }
            other => panic!("expected ArtifactFormat error, got {other:?}"),
        }
    }
}
