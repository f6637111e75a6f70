//! speakerid - enroll speaker templates and identify voices by DTW matching.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod features;
mod output;
mod settings;

use commands::{AlignCommand, ConfigCommand, EnrollCommand, IdentifyCommand, ListCommand};

/// speakerid - identify a speaker from a feature sequence.
///
/// Feature files hold one frame per line (components separated by
/// whitespace or commas) or, with a `.json` extension, an array of frames.
///
/// Configuration is stored in ~/.speakerid/config.yaml; templates default to
/// ~/.speakerid/templates.txt.
#[derive(Parser)]
#[command(name = "speakerid")]
#[command(about = "Speaker identification by DTW template matching")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.speakerid/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Template store file (overrides the config)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage CLI configuration
    Config(ConfigCommand),
    /// Enroll one or more templates for a speaker
    Enroll(EnrollCommand),
    /// Identify the speaker of a probe
    Identify(IdentifyCommand),
    /// List enrolled speakers
    List(ListCommand),
    /// Show the DTW alignment between two feature files
    Align(AlignCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli),
        Commands::Enroll(cmd) => cmd.run(&cli),
        Commands::Identify(cmd) => cmd.run(&cli).await,
        Commands::List(cmd) => cmd.run(&cli),
        Commands::Align(cmd) => cmd.run(&cli),
    };

    if let Err(err) = &result {
        if let Some(hint) = commands::hint(err) {
            eprintln!("hint: {hint}");
        }
    }
    result
}
