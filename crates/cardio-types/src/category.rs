//! Categorical clinical fields.
//!
//! Each field is a closed enum whose textual form is the short code used on the intake form
//! (for example `ATA` or `LVH`). Codes parse case-insensitively and always display in their
//! canonical spelling.

use crate::{InputError, InputResult};
use std::fmt;
use std::str::FromStr;

/// A closed set of categories for one clinical field.
pub trait Category: Copy + Eq + fmt::Debug + Sized + 'static {
    /// Human-readable field name, used in error messages.
    const FIELD: &'static str;

    /// Every category in declaration order.
    const ALL: &'static [Self];

    /// Canonical code for this category.
    fn code(self) -> &'static str;

    /// Parse a category from its code, ignoring ASCII case.
    fn parse_code(input: &str) -> InputResult<Self> {
        let trimmed = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InputError::UnknownCategory {
                field: Self::FIELD,
                value: trimmed.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|c| c.code())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl Category for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn code(self) -> &'static str {
                match self {
                    $( Self::$variant => $code ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = InputError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_code(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse_code(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

category! {
    /// Biological sex as recorded on the intake form.
    pub enum Sex as "sex" {
        Male => "M",
        Female => "F",
    }
}

category! {
    /// Presenting chest pain type.
    pub enum ChestPainType as "chest pain type" {
        /// Atypical angina.
        AtypicalAngina => "ATA",
        /// Non-anginal pain.
        NonAnginalPain => "NAP",
        /// Typical angina.
        TypicalAngina => "TA",
        /// Asymptomatic.
        Asymptomatic => "ASY",
    }
}

category! {
    /// Resting electrocardiogram result.
    pub enum RestingEcg as "resting ECG" {
        Normal => "Normal",
        /// ST-T wave abnormality.
        StAbnormality => "ST",
        /// Left ventricular hypertrophy.
        LeftVentricularHypertrophy => "LVH",
    }
}

category! {
    /// Exercise-induced angina.
    pub enum ExerciseAngina as "exercise angina" {
        Yes => "Y",
        No => "N",
    }
}

category! {
    /// Slope of the peak exercise ST segment.
    pub enum StSlope as "ST slope" {
        Up => "Up",
        Flat => "Flat",
        Down => "Down",
    }
}

/// Fasting blood sugar flag: `1` when above 120 mg/dL, otherwise `0`.
///
/// Unlike the other categorical fields this one is fed to the model as a plain number, so it
/// serialises as the integer `0` or `1` rather than a string code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FastingBloodSugar {
    #[default]
    Normal,
    Elevated,
}

impl FastingBloodSugar {
    /// Numeric flag value (`0` or `1`).
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Elevated => 1,
        }
    }

    /// Build from the numeric flag value.
    pub fn from_u8(value: u8) -> InputResult<Self> {
        match value {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Elevated),
            other => Err(InputError::UnknownCategory {
                field: "fasting blood sugar",
                value: other.to_string(),
                expected: "0, 1".into(),
            }),
        }
    }
}

impl fmt::Display for FastingBloodSugar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl FromStr for FastingBloodSugar {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Normal),
            "1" => Ok(Self::Elevated),
            other => Err(InputError::UnknownCategory {
                field: "fasting blood sugar",
                value: other.to_string(),
                expected: "0, 1".into(),
            }),
        }
    }
}

impl serde::Serialize for FastingBloodSugar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> serde::Deserialize<'de> for FastingBloodSugar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value).map_err(serde::de::Error::custom)
    }
}
