//! Feature assembly: turning a clinical record into a model-ordered numeric row.
//!
//! Encoding runs in three explicit steps:
//!
//! 1. **Raw features**: direct numeric vitals under their canonical names plus one one-hot
//!    key per categorical field (`prefix + code`, for example `Sex_M`) set to 1.
//! 2. **Reconcile**: every schema slot not produced in step 1 is set to 0. This is how the
//!    unselected branches of each one-hot group become 0.
//! 3. **Align**: values are emitted in schema order. Raw keys the schema does not declare are
//!    dropped.

use crate::constants::{
    AGE_SLOT, CHEST_PAIN_PREFIX, CHOLESTEROL_SLOT, DIRECT_SLOTS, EXERCISE_ANGINA_PREFIX,
    FASTING_BS_SLOT, MAX_HR_SLOT, OLDPEAK_SLOT, RESTING_BP_SLOT, RESTING_ECG_PREFIX, SEX_PREFIX,
    ST_SLOPE_PREFIX,
};
use crate::{CardioError, CardioResult, FeatureSchema};
use cardio_types::{
    Category, ChestPainType, ClinicalInput, ExerciseAngina, RestingEcg, Sex, StSlope,
};
use serde::ser::SerializeMap;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Feature values and rows
// ============================================================================

/// A single numeric feature value.
///
/// One-hot indicators and integer vitals stay integers; only `Oldpeak` is real-valued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeatureValue {
    Integer(i64),
    Real(f64),
}

impl FeatureValue {
    pub const ZERO: Self = Self::Integer(0);
    pub const ONE: Self = Self::Integer(1);

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Real(v) => v,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
        }
    }
}

impl serde::Serialize for FeatureValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Real(v) => serializer.serialize_f64(*v),
        }
    }
}

/// A feature row aligned to the schema it was encoded against.
///
/// The `i`-th value belongs to `schema.slots()[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRow<'a> {
    schema: &'a FeatureSchema,
    values: Vec<FeatureValue>,
}

impl<'a> FeatureRow<'a> {
    pub fn schema(&self) -> &'a FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the named slot, if the schema declares it.
    pub fn get(&self, slot: &str) -> Option<FeatureValue> {
        self.schema.position(slot).map(|idx| self.values[idx])
    }

    /// `(slot, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> + '_ {
        self.schema
            .slots()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// The row as plain floats, ready for scaling.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.as_f64()).collect()
    }
}

impl serde::Serialize for FeatureRow<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (slot, value) in self.iter() {
            map.serialize_entry(slot, &value)?;
        }
        map.end()
    }
}

// ============================================================================
// One-hot groups
// ============================================================================

/// A categorical field encoded as a group of one-hot slots sharing a prefix.
pub trait OneHot: Category {
    const PREFIX: &'static str;

    /// Slot name for this category, for example `ChestPainType_ATA`.
    fn one_hot_key(self) -> String {
        format!("{}{}", Self::PREFIX, self.code())
    }

    /// Slot names for every category of this field.
    fn all_keys() -> Vec<String> {
        Self::ALL.iter().map(|c| c.one_hot_key()).collect()
    }
}

impl OneHot for Sex {
    const PREFIX: &'static str = SEX_PREFIX;
}

impl OneHot for ChestPainType {
    const PREFIX: &'static str = CHEST_PAIN_PREFIX;
}

impl OneHot for RestingEcg {
    const PREFIX: &'static str = RESTING_ECG_PREFIX;
}

impl OneHot for ExerciseAngina {
    const PREFIX: &'static str = EXERCISE_ANGINA_PREFIX;
}

impl OneHot for StSlope {
    const PREFIX: &'static str = ST_SLOPE_PREFIX;
}

/// Every slot name the encoder can produce.
pub fn known_slot_names() -> Vec<String> {
    let mut names: Vec<String> = DIRECT_SLOTS.iter().map(|s| s.to_string()).collect();
    names.extend(Sex::all_keys());
    names.extend(ChestPainType::all_keys());
    names.extend(RestingEcg::all_keys());
    names.extend(ExerciseAngina::all_keys());
    names.extend(StSlope::all_keys());
    names
}

// ============================================================================
// Encoder
// ============================================================================

/// Feature encoding operations.
///
/// This is a zero-sized type used for namespacing; all methods are associated functions.
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Encode `input` into a row aligned to `schema`.
    ///
    /// The function is pure: identical input and schema always produce an identical row.
    /// No range validation happens here; `input` is expected to have passed
    /// [`ClinicalInput::validate`] at the boundary.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::SchemaMismatch`] if a schema slot has no value after
    /// reconciliation. That indicates a broken schema rather than bad input.
    pub fn encode<'a>(
        input: &ClinicalInput,
        schema: &'a FeatureSchema,
    ) -> CardioResult<FeatureRow<'a>> {
        let mut features = Self::raw_features(input);
        Self::reconcile(&mut features, schema);
        Self::align(features, schema)
    }

    fn raw_features(input: &ClinicalInput) -> HashMap<String, FeatureValue> {
        let mut features = HashMap::with_capacity(DIRECT_SLOTS.len() + 5);

        features.insert(
            AGE_SLOT.to_string(),
            FeatureValue::Integer(i64::from(input.age)),
        );
        features.insert(
            RESTING_BP_SLOT.to_string(),
            FeatureValue::Integer(i64::from(input.resting_bp)),
        );
        features.insert(
            CHOLESTEROL_SLOT.to_string(),
            FeatureValue::Integer(i64::from(input.cholesterol)),
        );
        features.insert(
            FASTING_BS_SLOT.to_string(),
            FeatureValue::Integer(i64::from(input.fasting_bs.as_u8())),
        );
        features.insert(
            MAX_HR_SLOT.to_string(),
            FeatureValue::Integer(i64::from(input.max_hr)),
        );
        features.insert(OLDPEAK_SLOT.to_string(), FeatureValue::Real(input.oldpeak));

        features.insert(input.sex.one_hot_key(), FeatureValue::ONE);
        features.insert(input.chest_pain_type.one_hot_key(), FeatureValue::ONE);
        features.insert(input.resting_ecg.one_hot_key(), FeatureValue::ONE);
        features.insert(input.exercise_angina.one_hot_key(), FeatureValue::ONE);
        features.insert(input.st_slope.one_hot_key(), FeatureValue::ONE);

        features
    }

    fn reconcile(features: &mut HashMap<String, FeatureValue>, schema: &FeatureSchema) {
        for slot in schema.slots() {
            features
                .entry(slot.clone())
                .or_insert(FeatureValue::ZERO);
        }
    }

    fn align<'a>(
        mut features: HashMap<String, FeatureValue>,
        schema: &'a FeatureSchema,
    ) -> CardioResult<FeatureRow<'a>> {
        let mut values = Vec::with_capacity(schema.len());
        for slot in schema.slots() {
            let value = features
                .remove(slot)
                .ok_or_else(|| CardioError::SchemaMismatch(slot.clone()))?;
            values.push(value);
        }

        if !features.is_empty() {
            let mut dropped: Vec<String> = features.into_keys().collect();
            dropped.sort();
            tracing::debug!(?dropped, "dropped features not declared by the schema");
        }

        Ok(FeatureRow { schema, values })
    }
}
