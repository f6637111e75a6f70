use speakerid_dtw::DtwError;
use speakerid_templates::StoreError;
use thiserror::Error;

/// Errors returned by enrollment and identification.
#[derive(Debug, Error)]
pub enum Error {
    #[error("speakerid: empty sequence")]
    EmptySequence,

    #[error("speakerid: invalid label: {0}")]
    InvalidLabel(String),

    #[error("speakerid: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("speakerid: frames must have at least one component")]
    ZeroDimension,

    #[error("speakerid: non-finite component at frame {frame}, component {component}")]
    NonFinite { frame: usize, component: usize },

    #[error("speakerid: template store io: {0}")]
    Io(#[source] std::io::Error),

    #[error("speakerid: corrupt template record {index}: {reason}")]
    CorruptRecord { index: usize, reason: String },

    #[error("speakerid: no templates enrolled")]
    EmptyStore,

    #[error("speakerid: identification cancelled")]
    Cancelled,
}

impl Error {
    /// True for errors caused by the caller's label or sequence.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::EmptySequence
                | Error::InvalidLabel(_)
                | Error::DimensionMismatch { .. }
                | Error::ZeroDimension
                | Error::NonFinite { .. }
        )
    }
}

impl From<DtwError> for Error {
    fn from(e: DtwError) -> Self {
        match e {
            DtwError::EmptySequence => Error::EmptySequence,
            DtwError::DimensionMismatch { expected, got } => {
                Error::DimensionMismatch { expected, got }
            }
            DtwError::ZeroDimension => Error::ZeroDimension,
            DtwError::NonFinite { frame, component } => Error::NonFinite { frame, component },
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidLabel(msg) => Error::InvalidLabel(msg),
            StoreError::EmptySequence => Error::EmptySequence,
            StoreError::DimensionMismatch { expected, got } => {
                Error::DimensionMismatch { expected, got }
            }
            StoreError::ZeroDimension => Error::ZeroDimension,
            StoreError::Io(e) => Error::Io(e),
            StoreError::CorruptRecord { index, reason } => Error::CorruptRecord { index, reason },
        }
    }
}
