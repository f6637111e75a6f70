//! Speaker identification.

use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use serde::Serialize;
use speakerid::{CancellationToken, Candidate, SpeakerId};
use speakerid_dtw::{FeatureSequence, Mode};

use super::open_speakers;
use crate::features::load_features;
use crate::output::{output_result, print_success, print_verbose};
use crate::Cli;

/// Identify the speaker of a probe feature file.
///
/// Compares the probe against every enrolled template and reports the
/// closest one. Ctrl-C stops the scan between template comparisons.
#[derive(Args)]
pub struct IdentifyCommand {
    /// Probe feature file
    file: String,

    /// Matching mode: full, banded or window:<radius> (default from config)
    #[arg(short = 'm', long)]
    mode: Option<Mode>,

    /// Also list the N closest templates
    #[arg(short = 'k', long, default_value_t = 0)]
    top: usize,
}

#[derive(Serialize)]
struct IdentifyOutput {
    label: String,
    distance: f64,
    index: usize,
    compared: usize,
    mode: String,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<Vec<Candidate>>,
}

impl IdentifyCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (settings, sid) = open_speakers(cli)?;
        let probe = load_features(&self.file)?;
        let mode = self.mode.unwrap_or(settings.engine.mode);

        print_verbose(cli, &format!("Probe: {} frames, mode {mode}", probe.len()));

        let sid = Arc::new(sid);
        let cancel = CancellationToken::new();
        let top = self.top;
        let mut task = {
            let sid = Arc::clone(&sid);
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || identify(&sid, &probe, mode, top, &cancel))
        };

        let result = tokio::select! {
            res = &mut task => res??,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("interrupted, stopping scan");
                cancel.cancel();
                task.await??
            }
        };

        print_success(&format!(
            "Identified {} (distance {:.4}) among {} template(s)",
            result.label, result.distance, result.compared
        ));
        output_result(&result, cli)
    }
}

/// Runs one scan over the store. With `top > 0` the best match and the
/// candidate list come from the same ranking pass.
fn identify(
    sid: &SpeakerId,
    probe: &FeatureSequence,
    mode: Mode,
    top: usize,
    cancel: &CancellationToken,
) -> Result<IdentifyOutput, speakerid::Error> {
    if top == 0 {
        let m = sid.identify_with_cancel(probe, mode, cancel)?;
        return Ok(IdentifyOutput {
            label: m.label,
            distance: m.distance,
            index: m.index,
            compared: m.compared,
            mode: mode.to_string(),
            elapsed_ms: m.elapsed.as_secs_f64() * 1000.0,
            candidates: None,
        });
    }

    let start = Instant::now();
    let mut ranked = sid.rank(probe, mode, 0, cancel)?;
    let elapsed = start.elapsed();
    let compared = ranked.len();
    ranked.truncate(top);
    let best = ranked.first().cloned().ok_or(speakerid::Error::EmptyStore)?;
    Ok(IdentifyOutput {
        label: best.label,
        distance: best.distance,
        index: best.index,
        compared,
        mode: mode.to_string(),
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        candidates: Some(ranked),
    })
}
