//! Risk assessment service used by front ends.

use crate::{
    CardioResult, CoreConfig, FeatureEncoder, FeatureRow, FeatureSchema, ModelArtifacts,
    PredictionResult,
};
use cardio_types::ClinicalInput;
use std::sync::Arc;

/// Pure risk assessment operations over a loaded model bundle - no presentation concerns.
///
/// Cloning is cheap; clones share the same artifacts.
#[derive(Clone, Debug)]
pub struct RiskService {
    artifacts: Arc<ModelArtifacts>,
}

impl RiskService {
    /// Creates a new instance of RiskService.
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }

    /// Load the artifacts named by `cfg` and wrap them in a service.
    ///
    /// # Errors
    ///
    /// Propagates any configuration fault from [`ModelArtifacts::load`].
    pub fn load(cfg: &CoreConfig) -> CardioResult<Self> {
        Ok(Self::new(Arc::new(ModelArtifacts::load(cfg)?)))
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.artifacts.schema()
    }

    /// Encode `input` against the loaded schema.
    pub fn encode(&self, input: &ClinicalInput) -> CardioResult<FeatureRow<'_>> {
        FeatureEncoder::encode(input, self.artifacts.schema())
    }

    /// Scale and classify an encoded row.
    pub fn predict(&self, row: &FeatureRow<'_>) -> CardioResult<PredictionResult> {
        self.artifacts.predictor().predict(row)
    }

    /// Encode and classify `input` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CardioError::SchemaMismatch`] or
    /// [`crate::CardioError::DimensionMismatch`]; both indicate drift between the schema and
    /// the other artifacts rather than a problem with `input`.
    pub fn assess(&self, input: &ClinicalInput) -> CardioResult<PredictionResult> {
        let row = self.encode(input)?;
        let result = self.predict(&row)?;
        tracing::debug!(
            label = ?result.label(),
            probability = result.probability(),
            "assessed heart disease risk"
        );
        Ok(result)
    }
}
