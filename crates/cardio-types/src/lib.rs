//! # Cardio Types
//!
//! Boundary types for the heart disease risk workspace.
//!
//! This crate holds the clinical input record collected from a patient and the closed set of
//! categorical values each field may take. It knows nothing about model artifacts or feature
//! columns; those live in `cardio-core`.
//!
//! Range validation happens here, at the presentation boundary. The core assumes it receives
//! a record that has already passed [`ClinicalInput::validate`].

mod category;
mod input;

pub use category::{
    Category, ChestPainType, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
};
pub use input::{ClinicalInput, VitalRange};

/// Errors raised while accepting clinical input at the boundary.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    /// A numeric vital fell outside the range the form accepts.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A numeric vital was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// A categorical value did not match any known code for its field.
    #[error("unknown {field} value '{value}' (expected one of: {expected})")]
    UnknownCategory {
        field: &'static str,
        value: String,
        expected: String,
    },
}

/// Type alias for Results that can fail with an [`InputError`].
pub type InputResult<T> = Result<T, InputError>;
