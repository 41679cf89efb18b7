use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ToastError {
    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("{name}: minimum {min}ms exceeds maximum {max}ms")]
    InvertedRange {
        name: &'static str,
        min: u64,
        max: u64,
    },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("quiet hour {0} is outside 0..=23")]
    InvalidQuietHour(u32),

    #[error("catalog has no {0}")]
    EmptyCatalog(&'static str),

    #[error("variant {0:?} has a positive weight but no templates")]
    EmptyVariant(String),

    #[error("variant weights must be finite, non-negative and not all zero")]
    InvalidWeights,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
