//! Configuration commands.

use clap::{Args, Subcommand};

use crate::output::{output_result, print_success};
use crate::settings::load_settings;
use crate::Cli;

/// Manage CLI configuration.
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Show the effective configuration
    Show,
    /// Set a configuration value (store, dim, mode, workers)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file and template store paths
    Path,
}

impl ConfigCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut settings = load_settings(cli.config.as_deref())?;
        match &self.command {
            ConfigSubcommand::Show => output_result(&settings, cli),
            ConfigSubcommand::Set { key, value } => {
                settings.set(key, value)?;
                settings.save()?;
                print_success(&format!("Set {key} = {value}"));
                Ok(())
            }
            ConfigSubcommand::Path => {
                let paths = serde_json::json!({
                    "config": settings.path().display().to_string(),
                    "store": settings.store_path(cli.store.as_deref()).display().to_string(),
                });
                output_result(&paths, cli)
            }
        }
    }
}
