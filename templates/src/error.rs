use thiserror::Error;

/// Errors returned by template store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("templates: invalid label: {0}")]
    InvalidLabel(String),

    #[error("templates: empty sequence")]
    EmptySequence,

    #[error("templates: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("templates: frame dimension must be positive")]
    ZeroDimension,

    #[error("templates: io: {0}")]
    Io(#[from] std::io::Error),

    #[error("templates: corrupt record {index}: {reason}")]
    CorruptRecord { index: usize, reason: String },
}
