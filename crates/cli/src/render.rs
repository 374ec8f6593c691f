//! Text and JSON rendering for the `cardio` commands.

use cardio_core::{FeatureRow, ModelArtifacts, PredictionResult, RiskLabel};
use serde::Serialize;

const GAUGE_WIDTH: usize = 40;

#[derive(Serialize)]
struct PredictionReport<'a> {
    label: RiskLabel,
    high_risk: bool,
    headline: &'a str,
    advice: &'a str,
    probability: f64,
    predicted_class_probability: f64,
}

/// Headline, advice, probability and a gauge bar.
pub fn prediction_text(result: &PredictionResult) -> String {
    let label = result.label();
    format!(
        "{}\n{}\n\nPrediction probability: {}\n{}",
        label.headline(),
        label.advice(),
        result.display_probability(),
        gauge(result.gauge_fraction()),
    )
}

pub fn prediction_json(result: &PredictionResult) -> serde_json::Result<String> {
    let label = result.label();
    let report = PredictionReport {
        label,
        high_risk: result.is_high_risk(),
        headline: label.headline(),
        advice: label.advice(),
        probability: result.probability(),
        predicted_class_probability: result.predicted_class_probability(),
    };
    serde_json::to_string_pretty(&report)
}

/// Fixed-width bar, e.g. `[##########------------------------------]`.
fn gauge(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH - filled)
    )
}

/// One `slot  value` line per schema slot.
pub fn row_text(row: &FeatureRow<'_>) -> String {
    let width = row.iter().map(|(slot, _)| slot.len()).max().unwrap_or(0);
    row.iter()
        .map(|(slot, value)| format!("{slot:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn row_json(row: &FeatureRow<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(row)
}

/// Summary of the loaded artifacts for `cardio inspect`.
pub fn artifacts_summary(artifacts: &ModelArtifacts) -> String {
    let schema = artifacts.schema();
    let predictor = artifacts.predictor();
    let mut lines = vec![
        format!("Feature schema: {} slots", schema.len()),
        format!("Slots: {}", schema.slots().join(", ")),
        format!("Scaler: {}", predictor.scaler().describe()),
        format!("Classifier: {}", predictor.classifier().describe()),
    ];

    let unreachable = schema.unreachable_slots();
    if unreachable.is_empty() {
        lines.push("Every schema slot is produced by the encoder".to_string());
    } else {
        lines.push(format!(
            "Slots the encoder never sets (always 0): {}",
            unreachable.join(", ")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardio_core::{
        FeatureEncoder, FeatureSchema, KnnClassifier, NeighborWeights, StandardScaler,
    };
    use cardio_types::ClinicalInput;

    #[test]
    fn gauge_has_fixed_width() {
        assert_eq!(gauge(0.0), format!("[{}]", "-".repeat(GAUGE_WIDTH)));
        assert_eq!(gauge(1.0), format!("[{}]", "#".repeat(GAUGE_WIDTH)));
        let half = gauge(0.5);
        assert_eq!(half.len(), GAUGE_WIDTH + 2);
        assert_eq!(half.matches('#').count(), GAUGE_WIDTH / 2);
    }

    #[test]
    fn prediction_text_shows_headline_and_probability() {
        let result = PredictionResult::new(RiskLabel::HighRisk, 80.0);
        let text = prediction_text(&result);
        assert!(text.starts_with("High Risk of Heart Disease\nPlease consult a medical professional."));
        assert!(text.contains("Prediction probability: 80.00%"));
    }

    #[test]
    fn prediction_json_reports_both_probabilities() {
        let result = PredictionResult::new(RiskLabel::LowRisk, 20.0);
        let value: serde_json::Value =
            serde_json::from_str(&prediction_json(&result).expect("serialize"))
                .expect("valid json");
        assert_eq!(value["label"], "LowRisk");
        assert_eq!(value["high_risk"], false);
        assert_eq!(value["probability"], 20.0);
        assert_eq!(value["predicted_class_probability"], 80.0);
    }

    #[test]
    fn row_text_aligns_values() {
        let schema = FeatureSchema::new(["Age", "Sex_M", "Oldpeak"]).expect("schema");
        let row = FeatureEncoder::encode(&ClinicalInput::default(), &schema).expect("encode");
        assert_eq!(row_text(&row), "Age      40\nSex_M    1\nOldpeak  1");
    }

    #[test]
    fn row_json_keeps_schema_order() {
        let schema = FeatureSchema::new(["MaxHR", "Sex_F", "Age"]).expect("schema");
        let row = FeatureEncoder::encode(&ClinicalInput::default(), &schema).expect("encode");
        let json = row_json(&row).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["MaxHR"], 150);
        assert_eq!(value["Sex_F"], 0);
        assert!(json.find("MaxHR") < json.find("Age"));
    }

    #[test]
    fn summary_lists_unreachable_slots() {
        let schema = FeatureSchema::new(["Age", "Sex_X"]).expect("schema");
        let scaler = StandardScaler::new(vec![50.0, 0.5], vec![10.0, 0.5], None).expect("scaler");
        let classifier = KnnClassifier::new(
            1,
            NeighborWeights::Uniform,
            2.0,
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![0, 1],
        )
        .expect("classifier");
        let artifacts = ModelArtifacts::from_parts(schema, scaler, classifier).expect("artifacts");

        let summary = artifacts_summary(&artifacts);
        assert!(summary.contains("Feature schema: 2 slots"));
        assert!(summary.contains("Slots: Age, Sex_X"));
        assert!(summary.contains("standard scaler (2 features, without recorded feature names)"));
        assert!(summary.contains("Slots the encoder never sets (always 0): Sex_X"));
    }
}
