//! Dynamic time warping (DTW) over fixed-dimension feature sequences.
//!
//! A [`FeatureSequence`] is an ordered list of frames (e.g. 13 MFCC
//! coefficients per 10 ms window). [`distance`] aligns two sequences of
//! possibly different lengths and returns the minimum cumulative Euclidean
//! cost of the alignment.
//!
//! # Modes
//!
//! ```text
//! Full         all n x m cells              exact, O(n*m)
//! Banded       |i - j| <= |n - m|           approximate, O(n*w)
//! Window(r)    |i - j| <= max(r, |n - m|)   approximate, wider band
//! ```
//!
//! Banded results are never lower than [`Mode::Full`]. They are equal when
//! the optimal alignment path happens to stay inside the band.
//!
//! # Usage
//!
//! ```
//! use speakerid_dtw::{distance, FeatureSequence, Mode};
//!
//! let a = FeatureSequence::from_frames([[1.0, 0.0], [0.0, 1.0]]).unwrap();
//! let b = FeatureSequence::from_frames([[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
//!
//! assert_eq!(distance(&a, &b, Mode::Full).unwrap(), 0.0);
//! ```

mod error;
mod grid;
mod matcher;
mod sequence;

pub use error::DtwError;
pub use grid::{reference_distance, warping_path, CostGrid, WarpingPath};
pub use matcher::{distance, euclidean, Mode};
pub use sequence::{FeatureSequence, DEFAULT_DIM};
