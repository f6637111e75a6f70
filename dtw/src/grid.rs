use serde::Serialize;

use crate::matcher::{check_pair, euclidean};
use crate::{DtwError, FeatureSequence};

/// The full `(n + 1) x (m + 1)` cumulative-cost grid.
///
/// Quadratic in memory. Used as the reference the rolling-row matcher is
/// tested against, and to recover the alignment path.
pub struct CostGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl CostGrid {
    /// Fills the grid for `a` (rows) against `b` (columns).
    pub fn build(a: &FeatureSequence, b: &FeatureSequence) -> Result<Self, DtwError> {
        check_pair(a, b)?;
        let rows = a.len() + 1;
        let cols = b.len() + 1;
        let mut cells = vec![f64::INFINITY; rows * cols];
        cells[0] = 0.0;

        for i in 1..rows {
            for j in 1..cols {
                let up = cells[(i - 1) * cols + j];
                let left = cells[i * cols + j - 1];
                let diag = cells[(i - 1) * cols + j - 1];
                cells[i * cols + j] = euclidean(a.frame(i - 1), b.frame(j - 1)) + up.min(left).min(diag);
            }
        }
        Ok(Self { rows, cols, cells })
    }

    /// Cumulative cost `D[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.cols + j]
    }

    /// `D[n][m]`.
    pub fn total(&self) -> f64 {
        self.get(self.rows - 1, self.cols - 1)
    }

    /// Backtracks the cheapest path from `(n, m)` to `(1, 1)`.
    /// Ties prefer the diagonal, then up, then left.
    pub fn path(&self) -> Vec<(usize, usize)> {
        let mut i = self.rows - 1;
        let mut j = self.cols - 1;
        let mut steps = vec![(i - 1, j - 1)];
        while i > 1 || j > 1 {
            let diag = self.get(i - 1, j - 1);
            let up = self.get(i - 1, j);
            let left = self.get(i, j - 1);
            if diag <= up && diag <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
            steps.push((i - 1, j - 1));
        }
        steps.reverse();
        steps
    }
}

/// An optimal alignment between two sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarpingPath {
    /// Zero-based `(probe_frame, template_frame)` pairs, from `(0, 0)` to
    /// `(n - 1, m - 1)`.
    pub steps: Vec<(usize, usize)>,

    /// Total alignment cost; equals the full DTW distance.
    pub distance: f64,
}

/// Full DTW over the whole two-dimensional grid.
pub fn reference_distance(a: &FeatureSequence, b: &FeatureSequence) -> Result<f64, DtwError> {
    Ok(CostGrid::build(a, b)?.total())
}

/// Returns the cheapest alignment between `probe` and `template`.
pub fn warping_path(probe: &FeatureSequence, template: &FeatureSequence) -> Result<WarpingPath, DtwError> {
    let grid = CostGrid::build(probe, template)?;
    Ok(WarpingPath {
        steps: grid.path(),
        distance: grid.total(),
    })
}
