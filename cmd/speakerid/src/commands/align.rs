//! Alignment diagnostics.

use clap::Args;
use serde::Serialize;
use speakerid_dtw::{distance, warping_path, Mode};

use crate::features::load_features;
use crate::output::output_result;
use crate::Cli;

/// Show the DTW alignment between two feature files.
///
/// Prints the full and banded distances and the optimal warping path.
#[derive(Args)]
pub struct AlignCommand {
    /// Probe feature file
    probe: String,

    /// Template feature file
    template: String,

    /// Omit the path steps
    #[arg(long)]
    summary: bool,
}

#[derive(Serialize)]
struct AlignOutput {
    probe_frames: usize,
    template_frames: usize,
    distance: f64,
    banded_distance: f64,
    path_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<(usize, usize)>>,
}

impl AlignCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let probe = load_features(&self.probe)?;
        let template = load_features(&self.template)?;

        let path = warping_path(&probe, &template).map_err(speakerid::Error::from)?;
        let banded = distance(&probe, &template, Mode::Banded).map_err(speakerid::Error::from)?;

        output_result(
            &AlignOutput {
                probe_frames: probe.len(),
                template_frames: template.len(),
                distance: path.distance,
                banded_distance: banded,
                path_length: path.steps.len(),
                path: (!self.summary).then_some(path.steps),
            },
            cli,
        )
    }
}
