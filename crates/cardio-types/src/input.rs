//! The clinical input record and its boundary ranges.

use crate::{
    ChestPainType, ExerciseAngina, FastingBloodSugar, InputError, InputResult, RestingEcg, Sex,
    StSlope,
};
use serde::{Deserialize, Serialize};

/// Inclusive bounds accepted for a numeric vital.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VitalRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl VitalRange {
    pub const AGE: Self = Self::new("age", 18.0, 100.0);
    pub const RESTING_BP: Self = Self::new("resting blood pressure", 80.0, 200.0);
    pub const CHOLESTEROL: Self = Self::new("cholesterol", 100.0, 600.0);
    pub const MAX_HR: Self = Self::new("max heart rate", 60.0, 220.0);
    pub const OLDPEAK: Self = Self::new("oldpeak", 0.0, 6.0);

    const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    /// Check that `value` is finite and within the inclusive bounds.
    pub fn check(&self, value: f64) -> InputResult<()> {
        if !value.is_finite() {
            return Err(InputError::NotFinite { field: self.field });
        }
        if value < self.min || value > self.max {
            return Err(InputError::OutOfRange {
                field: self.field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Patient vitals collected for a single risk assessment.
///
/// The record is plain data. Construct it directly (or start from [`ClinicalInput::default`],
/// which carries the intake form's starting values) and call [`ClinicalInput::validate`]
/// before handing it to the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClinicalInput {
    /// Age in years.
    pub age: u32,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure in mm Hg.
    pub resting_bp: u32,
    /// Serum cholesterol in mg/dL.
    pub cholesterol: u32,
    pub fasting_bs: FastingBloodSugar,
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved.
    pub max_hr: u32,
    pub exercise_angina: ExerciseAngina,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: f64,
    pub st_slope: StSlope,
}

impl Default for ClinicalInput {
    fn default() -> Self {
        Self {
            age: 40,
            sex: Sex::Male,
            chest_pain_type: ChestPainType::AtypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: FastingBloodSugar::Normal,
            resting_ecg: RestingEcg::Normal,
            max_hr: 150,
            exercise_angina: ExerciseAngina::No,
            oldpeak: 1.0,
            st_slope: StSlope::Up,
        }
    }
}

impl ClinicalInput {
    /// Validate every numeric vital against its accepted range.
    ///
    /// Categorical fields need no checking; their types only admit known values.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] encountered, checking fields in form order.
    pub fn validate(&self) -> InputResult<()> {
        VitalRange::AGE.check(f64::from(self.age))?;
        VitalRange::RESTING_BP.check(f64::from(self.resting_bp))?;
        VitalRange::CHOLESTEROL.check(f64::from(self.cholesterol))?;
        VitalRange::MAX_HR.check(f64::from(self.max_hr))?;
        VitalRange::OLDPEAK.check(self.oldpeak)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_intake_form_and_is_valid() {
        let input = ClinicalInput::default();
        assert_eq!(input.age, 40);
        assert_eq!(input.resting_bp, 120);
        assert_eq!(input.cholesterol, 200);
        assert_eq!(input.max_hr, 150);
        assert_eq!(input.oldpeak, 1.0);
        input.validate().expect("defaults should validate");
    }

    #[test]
    fn accepts_inclusive_bounds() {
        let input = ClinicalInput {
            age: 18,
            resting_bp: 200,
            cholesterol: 100,
            max_hr: 220,
            oldpeak: 6.0,
            ..ClinicalInput::default()
        };
        input.validate().expect("bounds are inclusive");
    }

    #[test]
    fn rejects_out_of_range_age() {
        let input = ClinicalInput {
            age: 17,
            ..ClinicalInput::default()
        };
        let err = input.validate().expect_err("should reject age 17");
        assert!(matches!(err, InputError::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn rejects_out_of_range_cholesterol() {
        let input = ClinicalInput {
            cholesterol: 601,
            ..ClinicalInput::default()
        };
        let err = input.validate().expect_err("should reject cholesterol 601");
        assert_eq!(
            err.to_string(),
            "cholesterol must be between 100 and 600, got 601"
        );
    }

    #[test]
    fn rejects_non_finite_oldpeak() {
        let input = ClinicalInput {
            oldpeak: f64::NAN,
            ..ClinicalInput::default()
        };
        let err = input.validate().expect_err("should reject NaN");
        assert!(matches!(err, InputError::NotFinite { field: "oldpeak" }));
    }

    #[test]
    fn deserialises_from_json_with_codes() {
        let json = r#"{
            "age": 58, "sex": "F", "chest_pain_type": "ASY", "resting_bp": 140,
            "cholesterol": 289, "fasting_bs": 1, "resting_ecg": "LVH", "max_hr": 112,
            "exercise_angina": "Y", "oldpeak": 2.5, "st_slope": "Flat"
        }"#;
        let input: ClinicalInput = serde_json::from_str(json).expect("parse input");
        assert_eq!(input.sex, Sex::Female);
        assert_eq!(input.chest_pain_type, ChestPainType::Asymptomatic);
        assert_eq!(input.fasting_bs, FastingBloodSugar::Elevated);
        assert_eq!(input.st_slope, StSlope::Flat);
        input.validate().expect("valid input");
    }
}
