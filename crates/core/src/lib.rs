//! # Cardio Core
//!
//! Core logic for heart disease risk assessment.
//!
//! This crate contains pure data operations:
//! - Feature schema loading and validation
//! - Feature encoding: one-hot expansion and alignment to the schema
//! - Scaling and k-nearest-neighbours classification behind narrow traits
//! - Artifact loading and cross-checking at startup
//!
//! **No presentation concerns**: argument parsing, rendering and process setup belong in
//! `cardio-cli`.
//!
//! Artifacts are loaded once from a [`CoreConfig`] into [`ModelArtifacts`] and are never
//! mutated afterwards. Every request then runs [`FeatureEncoder::encode`] followed by
//! [`RiskPredictor::predict`], usually through [`RiskService::assess`].

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod predictor;
pub mod scaler;
pub mod schema;
pub mod service;
pub mod validation;

pub use artifacts::ModelArtifacts;
pub use classifier::{ClassScore, Classifier, KnnClassifier, NeighborWeights};
pub use config::{resolve_model_dir, CoreConfig};
pub use encoder::{FeatureEncoder, FeatureRow, FeatureValue, OneHot};
pub use error::{ArtifactKind, CardioError, CardioResult};
pub use predictor::{PredictionResult, RiskLabel, RiskPredictor};
pub use scaler::{Scaler, StandardScaler};
pub use schema::FeatureSchema;
pub use service::RiskService;

pub use cardio_types::ClinicalInput;
