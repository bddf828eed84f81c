use std::path::PathBuf;

use thiserror::Error;

use super::ModelKind;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("Failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Model artifact contains a {found} estimator but {expected} was selected")]
    KindMismatch { expected: ModelKind, found: ModelKind },
}
