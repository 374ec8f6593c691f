//! Constants used throughout the cardio core crate.
//!
//! Artifact filenames and feature slot names live here so the encoder, the loaders and the
//! CLI agree on them.

/// Default directory holding the model artifacts when no explicit directory is configured.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Filename for the serialized k-nearest-neighbours classifier.
pub const CLASSIFIER_FILENAME: &str = "knn_heart_model.json";

/// Filename for the serialized standard scaler.
pub const SCALER_FILENAME: &str = "heart_scaler.json";

/// Filename for the ordered list of expected feature columns.
pub const SCHEMA_FILENAME: &str = "heart_columns.json";

/// Maximum length of a single feature slot name.
pub const MAX_SLOT_NAME_LEN: usize = 128;

pub const AGE_SLOT: &str = "Age";
pub const RESTING_BP_SLOT: &str = "RestingBP";
pub const CHOLESTEROL_SLOT: &str = "Cholesterol";
pub const FASTING_BS_SLOT: &str = "FastingBS";
pub const MAX_HR_SLOT: &str = "MaxHR";
pub const OLDPEAK_SLOT: &str = "Oldpeak";

/// Slots fed straight from numeric vitals, in canonical order.
pub const DIRECT_SLOTS: [&str; 6] = [
    AGE_SLOT,
    RESTING_BP_SLOT,
    CHOLESTEROL_SLOT,
    FASTING_BS_SLOT,
    MAX_HR_SLOT,
    OLDPEAK_SLOT,
];

pub const SEX_PREFIX: &str = "Sex_";
pub const CHEST_PAIN_PREFIX: &str = "ChestPainType_";
pub const RESTING_ECG_PREFIX: &str = "RestingECG_";
pub const EXERCISE_ANGINA_PREFIX: &str = "ExerciseAngina_";
pub const ST_SLOPE_PREFIX: &str = "ST_Slope_";

/// Neighbour count used when a classifier artifact omits `n_neighbors`.
pub const DEFAULT_N_NEIGHBORS: usize = 5;

/// Minkowski power used when a classifier artifact omits `p`.
pub const DEFAULT_MINKOWSKI_P: f64 = 2.0;
