//! Loading and cross-checking the model artifacts.
//!
//! Three files make up a model bundle: the classifier, the scaler and the feature schema.
//! They are read once at startup; any read, parse or compatibility failure is a configuration
//! fault and the bundle is not built.

use crate::{
    ArtifactKind, CardioError, CardioResult, Classifier, CoreConfig, FeatureSchema,
    KnnClassifier, RiskPredictor, Scaler, StandardScaler,
};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Schema, scaler and classifier, validated against each other.
#[derive(Debug)]
pub struct ModelArtifacts {
    schema: FeatureSchema,
    predictor: RiskPredictor,
}

impl ModelArtifacts {
    /// Read and validate all three artifacts named by `cfg`.
    ///
    /// The schema is read as YAML when its extension is `.yaml` or `.yml`, otherwise as JSON.
    ///
    /// # Errors
    ///
    /// Returns a configuration fault (see [`CardioError::is_configuration_fault`]) if any
    /// artifact is missing, malformed or incompatible with the others.
    pub fn load(cfg: &CoreConfig) -> CardioResult<Self> {
        let schema_text = read_artifact(ArtifactKind::Schema, cfg.schema_path())?;
        let schema = if is_yaml(cfg.schema_path()) {
            FeatureSchema::from_yaml_str(&schema_text)?
        } else {
            FeatureSchema::from_json_str(&schema_text)?
        };

        let scaler_text = read_artifact(ArtifactKind::Scaler, cfg.scaler_path())?;
        let scaler = StandardScaler::from_json_str(&scaler_text)?;

        let classifier_text = read_artifact(ArtifactKind::Classifier, cfg.classifier_path())?;
        let classifier = KnnClassifier::from_json_str(&classifier_text)?;

        let fit_points = classifier.n_samples();
        let n_neighbors = classifier.n_neighbors();
        let artifacts = Self::from_parts(schema, scaler, classifier)?;

        tracing::info!(
            schema = %cfg.schema_path().display(),
            scaler = %cfg.scaler_path().display(),
            classifier = %cfg.classifier_path().display(),
            slots = artifacts.schema.len(),
            fit_points,
            n_neighbors,
            "loaded model artifacts"
        );
        Ok(artifacts)
    }

    /// Assemble a bundle from already-parsed parts.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::IncompatibleArtifacts`] if:
    /// - the scaler or classifier width differs from the schema width,
    /// - the scaler records feature names that differ from the schema slots or their order.
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: impl Scaler + 'static,
        classifier: impl Classifier + 'static,
    ) -> CardioResult<Self> {
        check_width("scaler", scaler.n_features(), &schema)?;
        check_width("classifier", classifier.n_features(), &schema)?;

        if let Some(names) = scaler.feature_names() {
            if let Some(idx) = names
                .iter()
                .zip(schema.slots())
                .position(|(fitted, slot)| fitted != slot)
            {
                return Err(CardioError::IncompatibleArtifacts(format!(
                    "scaler was fitted with '{}' at position {idx} but the schema declares '{}'",
                    names[idx],
                    schema.slots()[idx]
                )));
            }
        }

        let unreachable = schema.unreachable_slots();
        if !unreachable.is_empty() {
            tracing::warn!(
                ?unreachable,
                "schema declares slots the encoder never sets; they will always be 0"
            );
        }

        let predictor = RiskPredictor::new(scaler, classifier)?;
        Ok(Self { schema, predictor })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn predictor(&self) -> &RiskPredictor {
        &self.predictor
    }
}

fn check_width(stage: &str, width: usize, schema: &FeatureSchema) -> CardioResult<()> {
    if width != schema.len() {
        return Err(CardioError::IncompatibleArtifacts(format!(
            "{stage} expects {width} features but the schema declares {}",
            schema.len()
        )));
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn read_artifact(artifact: ArtifactKind, path: &Path) -> CardioResult<String> {
    std::fs::read_to_string(path).map_err(|source| CardioError::ArtifactRead {
        artifact,
        path: path.to_path_buf(),
        source,
    })
}

fn format_error(artifact: ArtifactKind, path: String, message: String) -> CardioError {
    let location = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    CardioError::ArtifactFormat {
        artifact,
        location,
        message,
    }
}

/// Parse JSON text, surfacing the path to the failing field on error.
pub(crate) fn parse_json<T: DeserializeOwned>(
    artifact: ArtifactKind,
    text: &str,
) -> CardioResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let value = serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        format_error(artifact, path, err.into_inner().to_string())
    })?;
    deserializer
        .end()
        .map_err(|err| format_error(artifact, String::new(), err.to_string()))?;
    Ok(value)
}

/// Parse YAML text, surfacing the path to the failing field on error.
pub(crate) fn parse_yaml<T: DeserializeOwned>(
    artifact: ArtifactKind,
    text: &str,
) -> CardioResult<T> {
    let deserializer = serde_yaml::Deserializer::from_str(text);
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        format_error(artifact, path, err.into_inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCHEMA_JSON: &str = r#"["Age", "MaxHR", "Sex_M", "Sex_F"]"#;
    const SCALER_JSON: &str = r#"{
        "mean": [50.0, 140.0, 0.5, 0.5],
        "scale": [10.0, 20.0, 0.5, 0.5],
        "feature_names": ["Age", "MaxHR", "Sex_M", "Sex_F"]
    }"#;
    const CLASSIFIER_JSON: &str = r#"{
        "n_neighbors": 1,
        "fit_x": [[-1.0, 1.0, 1.0, -1.0], [1.0, -1.0, 1.0, -1.0]],
        "fit_y": [0, 1]
    }"#;

    fn write_bundle(schema: &str, scaler: &str, classifier: &str) -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("heart_columns.json"), schema).expect("write schema");
        fs::write(dir.path().join("heart_scaler.json"), scaler).expect("write scaler");
        fs::write(dir.path().join("knn_heart_model.json"), classifier).expect("write classifier");
        dir
    }

    #[test]
    fn loads_consistent_bundle() {
        let dir = write_bundle(SCHEMA_JSON, SCALER_JSON, CLASSIFIER_JSON);
        let artifacts =
            ModelArtifacts::load(&CoreConfig::from_model_dir(dir.path())).expect("load bundle");
        assert_eq!(artifacts.schema().len(), 4);
        assert_eq!(artifacts.predictor().n_features(), 4);
    }

    #[test]
    fn loads_yaml_schema_by_extension() {
        let dir = write_bundle(SCHEMA_JSON, SCALER_JSON, CLASSIFIER_JSON);
        let yaml_path = dir.path().join("columns.yaml");
        fs::write(&yaml_path, "- Age\n- MaxHR\n- Sex_M\n- Sex_F\n").expect("write yaml");

        let cfg = CoreConfig::from_model_dir(dir.path()).with_schema_path(yaml_path);
        let artifacts = ModelArtifacts::load(&cfg).expect("load bundle");
        assert_eq!(artifacts.schema().slots()[1], "MaxHR");
    }

    #[test]
    fn missing_file_is_configuration_fault() {
        let dir = write_bundle(SCHEMA_JSON, SCALER_JSON, CLASSIFIER_JSON);
        fs::remove_file(dir.path().join("heart_scaler.json")).expect("remove scaler");

        let err = ModelArtifacts::load(&CoreConfig::from_model_dir(dir.path()))
            .expect_err("missing scaler");
        assert!(matches!(
            err,
            CardioError::ArtifactRead {
                artifact: ArtifactKind::Scaler,
                ..
            }
        ));
        assert!(err.is_configuration_fault());
    }

    #[test]
    fn malformed_json_reports_location() {
        let dir = write_bundle(
            SCHEMA_JSON,
            SCALER_JSON,
            r#"{"fit_x": [[0.0, 0.0, 0.0, 0.0]], "fit_y": ["yes"]}"#,
        );
        let err = ModelArtifacts::load(&CoreConfig::from_model_dir(dir.path()))
            .expect_err("bad label type");
        match err {
            CardioError::ArtifactFormat {
                artifact, location, ..
            } => {
                assert_eq!(artifact, ArtifactKind::Classifier);
                assert_eq!(location, "fit_y[0]");
            }
            other => panic!("expected ArtifactFormat error, got {other:?}"),
        }
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse_json::<Vec<String>>(ArtifactKind::Schema, r#"["Age"] ]"#)
            .expect_err("trailing characters");
        assert!(matches!(err, CardioError::ArtifactFormat { location, .. } if location == "<root>"));
    }

    #[test]
    fn schema_width_must_match_scaler() {
        let dir = write_bundle(
            r#"["Age", "MaxHR", "Sex_M"]"#,
            r#"{"mean": [0.0, 0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0, 1.0]}"#,
            CLASSIFIER_JSON,
        );
        let err = ModelArtifacts::load(&CoreConfig::from_model_dir(dir.path()))
            .expect_err("width mismatch");
        assert!(
            matches!(err, CardioError::IncompatibleArtifacts(msg) if msg.contains("scaler expects 4"))
        );
    }

    #[test]
    fn scaler_feature_order_must_match_schema() {
        let dir = write_bundle(
            r#"["Age", "MaxHR", "Sex_F", "Sex_M"]"#,
            SCALER_JSON,
            CLASSIFIER_JSON,
        );
        let err = ModelArtifacts::load(&CoreConfig::from_model_dir(dir.path()))
            .expect_err("transposed slots");
        match err {
            CardioError::IncompatibleArtifacts(msg) => {
                assert!(msg.contains("'Sex_M' at position 2"));
            }
            other => panic!("expected IncompatibleArtifacts error, got {other:?}"),
        }
    }
}
