//! The ordered list of feature slots a trained model expects.

use crate::artifacts::{parse_json, parse_yaml};
use crate::encoder::known_slot_names;
use crate::validation::validate_slot_name;
use crate::{ArtifactKind, CardioError, CardioResult};
use std::collections::{HashMap, HashSet};

/// Ordered feature slots, fixed when the model was trained.
///
/// Every [`FeatureRow`](crate::FeatureRow) produced for inference contains exactly these
/// slots in this order. A schema is loaded once and shared read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    slots: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from slot names in model order.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::InvalidArtifact`] if the list is empty, any name fails
    /// [`validate_slot_name`], or a name appears twice.
    pub fn new<I, S>(slots: I) -> CardioResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots: Vec<String> = slots.into_iter().map(Into::into).collect();
        if slots.is_empty() {
            return Err(CardioError::invalid(
                ArtifactKind::Schema,
                "schema must declare at least one slot",
            ));
        }

        let mut index = HashMap::with_capacity(slots.len());
        for (position, name) in slots.iter().enumerate() {
            validate_slot_name(name)?;
            if index.insert(name.clone(), position).is_some() {
                return Err(CardioError::invalid(
                    ArtifactKind::Schema,
                    format!("duplicate slot '{name}'"),
                ));
            }
        }

        Ok(Self { slots, index })
    }

    /// Parse a schema from a JSON array of slot names.
    pub fn from_json_str(text: &str) -> CardioResult<Self> {
        let slots: Vec<String> = parse_json(ArtifactKind::Schema, text)?;
        Self::new(slots)
    }

    /// Parse a schema from a YAML sequence of slot names.
    pub fn from_yaml_str(text: &str) -> CardioResult<Self> {
        let slots: Vec<String> = parse_yaml(ArtifactKind::Schema, text)?;
        Self::new(slots)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Slots the encoder can never set from clinical input.
    ///
    /// These always resolve to 0, which usually means the schema was produced from a
    /// different dataset than the one this encoder targets.
    pub fn unreachable_slots(&self) -> Vec<&str> {
        let known: HashSet<String> = known_slot_names().into_iter().collect();
        self.slots
            .iter()
            .filter(|slot| !known.contains(slot.as_str()))
            .map(String::as_str)
            .collect()
    }
}
