//! Error types for record generation

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Generation errors
///
/// None of these are recovered from internally: the first one raised aborts
/// generation for the whole document.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Unsupported schema construct: {0}")]
    NotSupported(String),

    #[error("Unrecognized $ref format: '{0}'")]
    InvalidReference(String),

    #[error("$ref='{0}' not present in the schema")]
    UnresolvedReference(String),

    #[error("Anonymous object has no class name: {schema}")]
    UndefinedClassname { schema: String },

    #[error("Unrecognized type identifier: {0}")]
    UnrecognizedType(String),

    #[error("Malformed '{keyword}' keyword: {detail}")]
    Malformed { keyword: &'static str, detail: String },

    #[error("Artifact name '{0}' is not a plain file name")]
    UnsafeArtifactName(String),

    #[error("Artifacts can only be assembled from the root schema")]
    NotRoot,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl GenError {
    pub(crate) fn not_supported(keyword: impl Into<String>) -> Self {
        Self::NotSupported(keyword.into())
    }

    pub(crate) fn malformed(keyword: &'static str, detail: impl Into<String>) -> Self {
        Self::Malformed { keyword, detail: detail.into() }
    }
}
