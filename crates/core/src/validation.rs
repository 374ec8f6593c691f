//! Artifact validation utilities.
//!
//! This module contains checks applied to artifact contents while they are loaded, before any
//! request is served.

use crate::constants::MAX_SLOT_NAME_LEN;
use crate::{ArtifactKind, CardioError, CardioResult};

/// Validates that a feature slot name is usable as a column key.
///
/// - Rejects empty or whitespace-only names
/// - Rejects leading or trailing whitespace, which would never match an encoded key
/// - Bounds the length to avoid pathological inputs
/// - Rejects control characters
///
/// # Errors
///
/// Returns [`CardioError::InvalidArtifact`] naming the schema artifact.
pub fn validate_slot_name(name: &str) -> CardioResult<()> {
    if name.trim().is_empty() {
        return Err(CardioError::invalid(
            ArtifactKind::Schema,
            "slot name cannot be empty",
        ));
    }

    if name.trim() != name {
        return Err(CardioError::invalid(
            ArtifactKind::Schema,
            format!("slot name '{name}' has surrounding whitespace"),
        ));
    }

    if name.len() > MAX_SLOT_NAME_LEN {
        return Err(CardioError::invalid(
            ArtifactKind::Schema,
            format!("slot name exceeds maximum length of {MAX_SLOT_NAME_LEN} characters"),
        ));
    }

    if name.chars().any(char::is_control) {
        return Err(CardioError::invalid(
            ArtifactKind::Schema,
            format!("slot name {name:?} contains control characters"),
        ));
    }

    Ok(())
}

/// Validates that every value in `values` is finite.
///
/// `field` names the artifact field in the error, for example `mean[3]`.
pub fn ensure_finite(artifact: ArtifactKind, field: &str, values: &[f64]) -> CardioResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(CardioError::invalid(
            artifact,
            format!("{field}[{idx}] is not a finite number"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slot_name_accepts_column_names() {
        assert!(validate_slot_name("Age").is_ok());
        assert!(validate_slot_name("ST_Slope_Flat").is_ok());
        assert!(validate_slot_name("ChestPainType_ASY").is_ok());
    }

    #[test]
    fn test_validate_slot_name_rejects_empty() {
        let err = validate_slot_name("  ").expect_err("should reject whitespace");
        assert!(
            matches!(err, CardioError::InvalidArtifact { reason, .. } if reason.contains("cannot be empty"))
        );
    }

    #[test]
    fn test_validate_slot_name_rejects_padding() {
        let err = validate_slot_name(" Age").expect_err("should reject padded name");
        assert!(
            matches!(err, CardioError::InvalidArtifact { reason, .. } if reason.contains("surrounding whitespace"))
        );
    }

    #[test]
    fn test_validate_slot_name_rejects_too_long() {
        let long_name = "a".repeat(MAX_SLOT_NAME_LEN + 1);
        let err = validate_slot_name(&long_name).expect_err("should reject too long");
        assert!(
            matches!(err, CardioError::InvalidArtifact { reason, .. } if reason.contains("maximum length"))
        );
    }

    #[test]
    fn test_validate_slot_name_rejects_control_chars() {
        let err = validate_slot_name("Age\u{7}").expect_err("should reject control char");
        assert!(
            matches!(err, CardioError::InvalidArtifact { reason, .. } if reason.contains("control characters"))
        );
    }

    #[test]
    fn test_ensure_finite_reports_index() {
        let err = ensure_finite(ArtifactKind::Scaler, "mean", &[0.0, f64::NAN])
            .expect_err("should reject NaN");
        assert!(
            matches!(err, CardioError::InvalidArtifact { artifact: ArtifactKind::Scaler, reason } if reason == "mean[1] is not a finite number")
        );
    }
}
