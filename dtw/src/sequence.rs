use std::fmt;
use std::slice::ChunksExact;

use serde::{Deserialize, Serialize};

use crate::DtwError;

/// Frame dimension used by the reference front end (13 MFCC coefficients).
pub const DEFAULT_DIM: usize = 13;

/// An ordered sequence of fixed-dimension feature frames.
///
/// Frames are stored contiguously, frame-major. Every frame has exactly
/// [`dim`](Self::dim) finite components; construction rejects ragged or
/// non-finite input, so a `FeatureSequence` is always well formed. It may
/// still be empty, which the matcher and enrollment reject.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct FeatureSequence {
    dim: usize,
    data: Vec<f32>,
}

impl FeatureSequence {
    /// Builds a sequence from individual frames.
    ///
    /// The first frame fixes the dimension; any later frame of a different
    /// length fails with [`DtwError::DimensionMismatch`].
    pub fn from_frames<I, F>(frames: I) -> Result<Self, DtwError>
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[f32]>,
    {
        let mut dim: Option<usize> = None;
        let mut data = Vec::new();
        for (i, frame) in frames.into_iter().enumerate() {
            let frame = frame.as_ref();
            match dim {
                None => {
                    if frame.is_empty() {
                        return Err(DtwError::ZeroDimension);
                    }
                    dim = Some(frame.len());
                }
                Some(d) if d != frame.len() => {
                    return Err(DtwError::DimensionMismatch {
                        expected: d,
                        got: frame.len(),
                    });
                }
                Some(_) => {}
            }
            check_finite(i, frame)?;
            data.extend_from_slice(frame);
        }
        Ok(Self {
            dim: dim.unwrap_or(0),
            data,
        })
    }

    /// Builds a sequence from frame-major flat data.
    pub fn from_flat(dim: usize, data: Vec<f32>) -> Result<Self, DtwError> {
        if dim == 0 {
            return Err(DtwError::ZeroDimension);
        }
        let rem = data.len() % dim;
        if rem != 0 {
            return Err(DtwError::DimensionMismatch {
                expected: dim,
                got: rem,
            });
        }
        for (i, frame) in data.chunks_exact(dim).enumerate() {
            check_finite(i, frame)?;
        }
        Ok(Self { dim, data })
    }

    /// Returns an empty sequence.
    pub fn empty() -> Self {
        Self {
            dim: 0,
            data: Vec::new(),
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Components per frame. Zero for an empty sequence.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns frame `i`. Panics if `i >= len()`.
    pub fn frame(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterates frames in order.
    pub fn frames(&self) -> ChunksExact<'_, f32> {
        // chunks_exact(0) panics; an empty sequence has no data to chunk anyway.
        self.data.chunks_exact(self.dim.max(1))
    }

    /// All components, frame-major.
    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Fails unless the sequence is non-empty and every frame has `dim` components.
    pub fn ensure_matchable(&self, dim: usize) -> Result<(), DtwError> {
        if self.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        if self.dim != dim {
            return Err(DtwError::DimensionMismatch {
                expected: dim,
                got: self.dim,
            });
        }
        Ok(())
    }
}

fn check_finite(frame: usize, values: &[f32]) -> Result<(), DtwError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(component) => Err(DtwError::NonFinite { frame, component }),
        None => Ok(()),
    }
}

impl fmt::Debug for FeatureSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureSequence")
            .field("frames", &self.len())
            .field("dim", &self.dim)
            .finish()
    }
}

impl TryFrom<Vec<Vec<f32>>> for FeatureSequence {
    type Error = DtwError;

    fn try_from(frames: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::from_frames(frames)
    }
}

impl From<FeatureSequence> for Vec<Vec<f32>> {
    fn from(seq: FeatureSequence) -> Self {
        seq.frames().map(|f| f.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_frames_flattens() {
        let seq = FeatureSequence::from_frames([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.dim(), 2);
        assert_eq!(seq.frame(1), &[3.0, 4.0]);
        assert_eq!(seq.as_flat(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(seq.frames().count(), 3);
    }

    #[test]
    fn ragged_frames_rejected() {
        let err = FeatureSequence::from_frames(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, DtwError::DimensionMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn non_finite_rejected() {
        let err = FeatureSequence::from_frames(vec![vec![1.0, 2.0], vec![3.0, f32::NAN]]).unwrap_err();
        assert_eq!(err, DtwError::NonFinite { frame: 1, component: 1 });

        let err = FeatureSequence::from_flat(1, vec![f32::INFINITY]).unwrap_err();
        assert_eq!(err, DtwError::NonFinite { frame: 0, component: 0 });
    }

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(
            FeatureSequence::from_frames(vec![Vec::<f32>::new()]).unwrap_err(),
            DtwError::ZeroDimension
        );
        assert_eq!(
            FeatureSequence::from_flat(0, vec![]).unwrap_err(),
            DtwError::ZeroDimension
        );
    }

    #[test]
    fn from_flat_partial_frame() {
        let err = FeatureSequence::from_flat(3, vec![1.0; 7]).unwrap_err();
        assert_eq!(err, DtwError::DimensionMismatch { expected: 3, got: 1 });
    }

    #[test]
    fn empty_sequence() {
        let seq = FeatureSequence::from_frames(Vec::<Vec<f32>>::new()).unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.frames().count(), 0);
        assert_eq!(seq, FeatureSequence::empty());
        assert_eq!(seq.ensure_matchable(13), Err(DtwError::EmptySequence));
    }

    #[test]
    fn ensure_matchable_checks_dim() {
        let seq = FeatureSequence::from_flat(2, vec![0.0; 4]).unwrap();
        assert!(seq.ensure_matchable(2).is_ok());
        assert_eq!(
            seq.ensure_matchable(13),
            Err(DtwError::DimensionMismatch { expected: 13, got: 2 })
        );
    }

    #[test]
    fn serde_as_nested_arrays() {
        let seq = FeatureSequence::from_frames([[0.5f32, -1.0], [2.0, 3.25]]).unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "[[0.5,-1.0],[2.0,3.25]]");

        let back: FeatureSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);

        assert!(serde_json::from_str::<FeatureSequence>("[[1.0],[1.0,2.0]]").is_err());
    }
}
