//! Template enrollment.

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;

use super::open_speakers;
use crate::features::load_features;
use crate::output::{output_result, print_success, print_verbose};
use crate::Cli;

/// Enroll templates for a speaker.
///
/// Each feature file becomes one independent template. Enrolling a label
/// again adds more templates; nothing is replaced.
#[derive(Args)]
pub struct EnrollCommand {
    /// Speaker label
    #[arg(short = 'l', long)]
    label: String,

    /// Feature files, one template each
    #[arg(required = true)]
    files: Vec<String>,
}

#[derive(Serialize)]
struct EnrollOutput {
    label: String,
    templates: Vec<EnrolledTemplate>,
}

#[derive(Serialize)]
struct EnrolledTemplate {
    file: String,
    frames: usize,
}

impl EnrollCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (_, sid) = open_speakers(cli)?;

        // Parse and validate every file before the first append, so a bad
        // file doesn't leave a partial enrollment.
        let mut sequences = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let seq = load_features(file)?;
            print_verbose(cli, &format!("{file}: {} frames x {}", seq.len(), seq.dim()));
            sid.validate(&self.label, &seq)
                .with_context(|| format!("rejected feature file {file}"))?;
            sequences.push((file, seq));
        }

        let mut templates = Vec::with_capacity(sequences.len());
        for (file, seq) in sequences {
            let frames = seq.len();
            sid.enroll(&self.label, seq)?;
            templates.push(EnrolledTemplate {
                file: file.clone(),
                frames,
            });
        }

        print_success(&format!(
            "Enrolled {} template(s) for {}",
            templates.len(),
            self.label
        ));
        output_result(
            &EnrollOutput {
                label: self.label.clone(),
                templates,
            },
            cli,
        )
    }
}
