//! Enrolled speaker listing.

use clap::Args;

use super::open_speakers;
use crate::output::{output_result, print_success};
use crate::Cli;

/// List enrolled speakers with their template counts.
#[derive(Args)]
pub struct ListCommand {}

impl ListCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (_, sid) = open_speakers(cli)?;
        let labels = sid.labels()?;
        let templates: usize = labels.iter().map(|l| l.templates).sum();
        print_success(&format!(
            "Found {} speaker(s), {} template(s)",
            labels.len(),
            templates
        ));
        output_result(&labels, cli)
    }
}
