use thiserror::Error;

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("Invalid extents {0:?}: every axis must be positive")]
    InvalidExtents((usize, usize, usize)),

    #[error("Short read: expected {expected} bytes, only {available} available")]
    Read { expected: usize, available: usize },

    #[error("Derived {derived} byte(s) per element, encoding expects {expected}")]
    SizeMismatch { derived: usize, expected: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Texture construction failed: {0}")]
    Texture(String),
}

/// Anomalies that are reported but never abort a decode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VolumeWarning {
    #[error("Derived {derived} byte(s) per element, encoding expects {expected}")]
    SizeMismatch { derived: usize, expected: usize },

    #[error("Could not attach texture: {0}")]
    AttachmentFailed(String),
}
