use std::fmt;
use std::path::PathBuf;

/// The three artifacts a model bundle is assembled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    Schema,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classifier => f.write_str("classifier"),
            Self::Scaler => f.write_str("scaler"),
            Self::Schema => f.write_str("feature schema"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "failed to read {artifact} artifact (path: {path}): {source}",
        path = path.display()
    )]
    ArtifactRead {
        artifact: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{artifact} artifact schema mismatch at {location}: {message}")]
    ArtifactFormat {
        artifact: ArtifactKind,
        location: String,
        message: String,
    },
    #[error("invalid {artifact} artifact: {reason}")]
    InvalidArtifact {
        artifact: ArtifactKind,
        reason: String,
    },
    #[error("incompatible artifacts: {0}")]
    IncompatibleArtifacts(String),

    #[error("feature schema slot '{0}' could not be resolved")]
    SchemaMismatch(String),
    #[error("{stage} expects {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl CardioError {
    pub(crate) fn invalid(artifact: ArtifactKind, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            artifact,
            reason: reason.into(),
        }
    }

    /// True for faults that mean the model bundle cannot be used at all.
    ///
    /// These are raised while loading artifacts at startup; no request should be served once
    /// one has been observed.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_)
                | Self::ArtifactRead { .. }
                | Self::ArtifactFormat { .. }
                | Self::InvalidArtifact { .. }
                | Self::IncompatibleArtifacts(_)
        )
    }
}

pub type CardioResult<T> = std::result::Result<T, CardioError>;
