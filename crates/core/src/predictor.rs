//! Risk prediction: scale an encoded row, classify it and report the result.

use crate::{CardioError, CardioResult, Classifier, FeatureRow, Scaler};
use serde::Serialize;
use std::fmt;

/// Binary heart disease risk label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    LowRisk,
    HighRisk,
}

impl RiskLabel {
    /// Map a classifier class (`1` is the disease class) to a label.
    pub fn from_class(label: u8) -> Self {
        if label == 1 {
            Self::HighRisk
        } else {
            Self::LowRisk
        }
    }

    /// Headline shown to the user.
    pub fn headline(self) -> &'static str {
        match self {
            Self::LowRisk => "Low Risk of Heart Disease",
            Self::HighRisk => "High Risk of Heart Disease",
        }
    }

    /// Follow-up advice shown under the headline.
    pub fn advice(self) -> &'static str {
        match self {
            Self::LowRisk => "Keep maintaining a healthy lifestyle!",
            Self::HighRisk => "Please consult a medical professional.",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

/// Result of a single risk assessment.
///
/// `probability` is always the positive-class (disease) probability as a percentage, whatever
/// the label. Use [`PredictionResult::predicted_class_probability`] for the probability of the
/// label actually reported.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PredictionResult {
    label: RiskLabel,
    probability: f64,
}

impl PredictionResult {
    /// Build a result, clamping `probability` into `[0, 100]`. NaN becomes 0.
    pub fn new(label: RiskLabel, probability: f64) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 100.0)
        };
        Self { label, probability }
    }

    pub fn label(&self) -> RiskLabel {
        self.label
    }

    pub fn is_high_risk(&self) -> bool {
        self.label == RiskLabel::HighRisk
    }

    /// Positive-class probability as a percentage in `[0, 100]`.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Probability of the reported label as a percentage.
    pub fn predicted_class_probability(&self) -> f64 {
        match self.label {
            RiskLabel::HighRisk => self.probability,
            RiskLabel::LowRisk => 100.0 - self.probability,
        }
    }

    /// Probability formatted to two decimal places, for example `"66.67%"`.
    pub fn display_probability(&self) -> String {
        format!("{:.2}%", self.probability)
    }

    /// Fill fraction in `[0, 1]` for progress-bar style rendering.
    pub fn gauge_fraction(&self) -> f64 {
        (self.probability / 100.0).clamp(0.0, 1.0)
    }
}

/// Scaler and classifier pair, loaded once and applied to every request.
#[derive(Debug)]
pub struct RiskPredictor {
    scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier>,
}

impl RiskPredictor {
    /// Pair a scaler with a classifier.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::IncompatibleArtifacts`] if the two expect different widths.
    pub fn new(
        scaler: impl Scaler + 'static,
        classifier: impl Classifier + 'static,
    ) -> CardioResult<Self> {
        if scaler.n_features() != classifier.n_features() {
            return Err(CardioError::IncompatibleArtifacts(format!(
                "scaler expects {} features but classifier expects {}",
                scaler.n_features(),
                classifier.n_features()
            )));
        }

        Ok(Self {
            scaler: Box::new(scaler),
            classifier: Box::new(classifier),
        })
    }

    pub fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Scale and classify an encoded row.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::DimensionMismatch`] if the row width differs from the scaler's.
    pub fn predict(&self, row: &FeatureRow<'_>) -> CardioResult<PredictionResult> {
        self.predict_values(&row.to_f64_vec())
    }

    /// Scale and classify a raw row already in model order.
    pub fn predict_values(&self, values: &[f64]) -> CardioResult<PredictionResult> {
        if values.len() != self.scaler.n_features() {
            return Err(CardioError::DimensionMismatch {
                stage: "scaler",
                expected: self.scaler.n_features(),
                actual: values.len(),
            });
        }

        let normalized = self.scaler.transform(values)?;
        let score = self.classifier.predict(&normalized)?;

        Ok(PredictionResult::new(
            RiskLabel::from_class(score.label),
            score.positive_probability * 100.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ClassScore, FeatureEncoder, FeatureSchema, KnnClassifier, NeighborWeights, StandardScaler,
    };
    use cardio_types::ClinicalInput;

    #[derive(Debug)]
    struct FixedClassifier {
        width: usize,
        score: ClassScore,
    }

    impl Classifier for FixedClassifier {
        fn n_features(&self) -> usize {
            self.width
        }

        fn predict(&self, _row: &[f64]) -> CardioResult<ClassScore> {
            Ok(self.score)
        }
    }

    fn identity_scaler(width: usize) -> StandardScaler {
        StandardScaler::new(vec![0.0; width], vec![1.0; width], None).expect("scaler")
    }

    #[test]
    fn result_clamps_probability() {
        assert_eq!(PredictionResult::new(RiskLabel::HighRisk, 130.0).probability(), 100.0);
        assert_eq!(PredictionResult::new(RiskLabel::LowRisk, -4.0).probability(), 0.0);
        assert_eq!(PredictionResult::new(RiskLabel::LowRisk, f64::NAN).probability(), 0.0);
    }

    #[test]
    fn result_formats_two_decimals() {
        let result = PredictionResult::new(RiskLabel::HighRisk, 200.0 / 3.0);
        assert_eq!(result.display_probability(), "66.67%");
        assert!((result.gauge_fraction() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn predicted_class_probability_flips_for_low_risk() {
        let result = PredictionResult::new(RiskLabel::LowRisk, 20.0);
        assert_eq!(result.probability(), 20.0);
        assert_eq!(result.predicted_class_probability(), 80.0);
        assert!(!result.is_high_risk());
    }

    #[test]
    fn maps_positive_class_to_high_risk() {
        let predictor = RiskPredictor::new(
            identity_scaler(2),
            FixedClassifier {
                width: 2,
                score: ClassScore {
                    label: 1,
                    positive_probability: 0.8,
                },
            },
        )
        .expect("predictor");

        let result = predictor.predict_values(&[1.0, 2.0]).expect("predict");
        assert_eq!(result.label(), RiskLabel::HighRisk);
        assert!((result.probability() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_mismatched_collaborators() {
        let err = RiskPredictor::new(
            identity_scaler(3),
            FixedClassifier {
                width: 2,
                score: ClassScore {
                    label: 0,
                    positive_probability: 0.0,
                },
            },
        )
        .expect_err("width mismatch");
        assert!(matches!(err, CardioError::IncompatibleArtifacts(_)));
    }

    #[test]
    fn rejects_row_of_wrong_width() {
        let predictor = RiskPredictor::new(
            identity_scaler(2),
            FixedClassifier {
                width: 2,
                score: ClassScore {
                    label: 0,
                    positive_probability: 0.1,
                },
            },
        )
        .expect("predictor");

        let err = predictor.predict_values(&[1.0]).expect_err("width mismatch");
        assert!(matches!(
            err,
            CardioError::DimensionMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn scales_before_classifying() {
        // Age 65 scales to 1.5, nearest the positive fit point at 2.0.
        let scaler = StandardScaler::new(vec![50.0], vec![10.0], None).expect("scaler");
        let knn = KnnClassifier::new(
            1,
            NeighborWeights::Uniform,
            2.0,
            vec![vec![-2.0], vec![2.0]],
            vec![0, 1],
        )
        .expect("classifier");
        let predictor = RiskPredictor::new(scaler, knn).expect("predictor");

        let schema = FeatureSchema::new(["Age"]).expect("schema");
        let input = ClinicalInput {
            age: 65,
            ..ClinicalInput::default()
        };
        let row = FeatureEncoder::encode(&input, &schema).expect("encode");
        let result = predictor.predict(&row).expect("predict");
        assert_eq!(result.label(), RiskLabel::HighRisk);
        assert_eq!(result.probability(), 100.0);
    }
}
