use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DtwError, FeatureSequence};

/// Selects how much of the cumulative-cost grid is evaluated.
///
/// Serialized as its string form: `full`, `banded` or `window:<radius>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// Every cell of the `n x m` grid. Exact.
    #[default]
    Full,

    /// Sakoe-Chiba band of width `|n - m|` around the diagonal.
    /// Never lower than [`Mode::Full`]; equal only when the optimal path
    /// stays inside the band.
    Banded,

    /// Sakoe-Chiba band of radius `max(r, |n - m|)`.
    Window(usize),
}

impl Mode {
    /// Band radius used for sequences of lengths `n` and `m`,
    /// or `None` when the whole grid is evaluated.
    pub fn band_radius(self, n: usize, m: usize) -> Option<usize> {
        let gap = n.abs_diff(m);
        match self {
            Mode::Full => None,
            Mode::Banded => Some(gap),
            Mode::Window(r) => Some(r.max(gap)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => write!(f, "full"),
            Mode::Banded => write!(f, "banded"),
            Mode::Window(r) => write!(f, "window:{r}"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Parses `full`, `banded` or `window:<radius>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Mode::Full),
            "banded" | "band" => Ok(Mode::Banded),
            other => match other.strip_prefix("window:") {
                Some(r) => r
                    .parse()
                    .map(Mode::Window)
                    .map_err(|_| format!("invalid window radius {r:?}")),
                None => Err(format!(
                    "unknown mode {s:?} (want full, banded or window:<radius>)"
                )),
            },
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.to_string()
    }
}

/// Euclidean distance between two frames, accumulated in f64.
pub fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Fails unless both sequences are non-empty and share a frame dimension.
pub(crate) fn check_pair(a: &FeatureSequence, b: &FeatureSequence) -> Result<(), DtwError> {
    if a.is_empty() || b.is_empty() {
        return Err(DtwError::EmptySequence);
    }
    if a.dim() != b.dim() {
        return Err(DtwError::DimensionMismatch {
            expected: a.dim(),
            got: b.dim(),
        });
    }
    Ok(())
}

/// Returns the DTW alignment cost between `probe` and `template`.
///
/// The alignment starts at the first frame of both sequences and ends at
/// the last frame of both; steps move right, down, or diagonally, and the
/// cost is the sum of Euclidean local costs along the cheapest path.
pub fn distance(
    probe: &FeatureSequence,
    template: &FeatureSequence,
    mode: Mode,
) -> Result<f64, DtwError> {
    check_pair(probe, template)?;
    Ok(match mode.band_radius(probe.len(), template.len()) {
        None => full(probe, template),
        Some(w) => banded(probe, template, w),
    })
}

/// Full grid with two rolling rows.
///
/// Transposing the grid leaves the corner cost unchanged, so rows run over
/// the longer sequence and the row buffers hold `min(n, m) + 1` cells.
fn full(a: &FeatureSequence, b: &FeatureSequence) -> f64 {
    let (rows, cols) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let m = cols.len();

    let mut prev = vec![f64::INFINITY; m + 1];
    let mut cur = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for x in rows.frames() {
        cur[0] = f64::INFINITY;
        for (j, y) in cols.frames().enumerate() {
            // up = prev[j+1], left = cur[j], diagonal = prev[j]; none of them
            // is overwritten before cell j+1 is written.
            let best = prev[j + 1].min(cur[j]).min(prev[j]);
            cur[j + 1] = euclidean(x, y) + best;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[m]
}

/// Row `i` evaluates columns `max(1, i - w) ..= min(m, i + w)`; every other
/// cell is `+inf`.
fn banded(a: &FeatureSequence, b: &FeatureSequence, w: usize) -> f64 {
    let n = a.len();
    let m = b.len();

    let mut prev = vec![f64::INFINITY; m + 1];
    let mut cur = vec![f64::INFINITY; m + 1];
    prev[0] = 0.0;

    for i in 1..=n {
        let lo = i.saturating_sub(w).max(1);
        let hi = (i + w).min(m);

        // The buffer still holds row i-2. The next row reads at most one
        // cell past either edge of this band, so fence both edges.
        cur[lo - 1] = f64::INFINITY;
        if hi < m {
            cur[hi + 1] = f64::INFINITY;
        }

        let x = a.frame(i - 1);
        for j in lo..=hi {
            let best = prev[j].min(cur[j - 1]).min(prev[j - 1]);
            cur[j] = euclidean(x, b.frame(j - 1)) + best;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[m]
}
