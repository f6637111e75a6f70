use thiserror::Error;

/// Errors returned by DTW operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DtwError {
    #[error("dtw: empty sequence")]
    EmptySequence,

    #[error("dtw: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("dtw: frames must have at least one component")]
    ZeroDimension,

    #[error("dtw: non-finite component at frame {frame}, component {component}")]
    NonFinite { frame: usize, component: usize },
}
