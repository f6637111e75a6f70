use serde::{Deserialize, Serialize};
use speakerid_dtw::{Mode, DEFAULT_DIM};

/// Controls identification behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Components per feature frame (13 for MFCC front ends).
    /// Zero means the default.
    #[serde(default)]
    pub dim: usize,

    /// Default matching mode for callers that don't pick one.
    #[serde(default)]
    pub mode: Mode,

    /// Threads used to compare a probe against stored templates.
    /// 0 or 1 compares sequentially.
    #[serde(default)]
    pub workers: usize,
}

impl Config {
    /// Fills zero values with defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.dim == 0 {
            self.dim = DEFAULT_DIM;
        }
        if self.workers == 0 {
            self.workers = 1;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            mode: Mode::Full,
            workers: 1,
        }
    }
}
